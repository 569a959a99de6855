//! Purchase records.
//!
//! Each purchase belongs to one user and carries an amount, a category
//! (free text, defaulted when absent), an optional description, and the
//! calendar date it happened on. Insert-only, like income records.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// Category stored when the caller provides none.
pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub id: Uuid,
    pub user_id: String,
    pub amount: Money,
    pub category: String,
    pub description: Option<String>,
    pub purchased_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl PurchaseRecord {
    pub fn new(
        user_id: String,
        amount: Money,
        category: Option<String>,
        description: Option<String>,
        purchased_on: NaiveDate,
    ) -> ResultEngine<Self> {
        if amount.is_negative() {
            return Err(EngineError::InvalidAmount(
                "purchase amount must be >= 0".to_string(),
            ));
        }

        let category = match category {
            Some(name) if !name.trim().is_empty() => name,
            _ => DEFAULT_CATEGORY.to_string(),
        };

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            category,
            description,
            purchased_on,
            created_at: Utc::now(),
        })
    }
}

/// First and last calendar day of a tax year, both inclusive.
pub(crate) fn calendar_year_span(year: i32) -> ResultEngine<(NaiveDate, NaiveDate)> {
    let invalid = || EngineError::InvalidDate(format!("invalid year: {year}"));
    let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(invalid)?;
    Ok((start, end))
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub amount_minor: i64,
    pub category: String,
    pub description: Option<String>,
    pub purchased_on: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&PurchaseRecord> for ActiveModel {
    fn from(record: &PurchaseRecord) -> Self {
        Self {
            id: ActiveValue::Set(record.id.to_string()),
            user_id: ActiveValue::Set(record.user_id.clone()),
            amount_minor: ActiveValue::Set(record.amount.minor()),
            category: ActiveValue::Set(record.category.clone()),
            description: ActiveValue::Set(record.description.clone()),
            purchased_on: ActiveValue::Set(record.purchased_on),
            created_at: ActiveValue::Set(record.created_at),
        }
    }
}

impl TryFrom<Model> for PurchaseRecord {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("purchase record".to_string()))?,
            user_id: model.user_id,
            amount: Money::new(model.amount_minor),
            category: model.category,
            description: model.description,
            purchased_on: model.purchased_on,
            created_at: model.created_at,
        })
    }
}
