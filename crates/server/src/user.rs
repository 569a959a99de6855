//! The users table and the canonical form of its identity fields.

use sea_orm::entity::prelude::*;
use unicode_normalization::UnicodeNormalization;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Usernames are stored NFC-normalized and trimmed, so lookups don't depend
/// on how the client composed accented characters.
pub(crate) fn canonical_username(raw: &str) -> String {
    raw.trim().nfc().collect()
}

/// Emails are matched case-insensitively; store them lowercased.
pub(crate) fn canonical_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
