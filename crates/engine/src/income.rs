//! Income records.
//!
//! One record per user per tax year, holding a primary and an additional
//! amount. Records are insert-only; there is no update or delete path.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, purchases::calendar_year_span};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub id: Uuid,
    pub user_id: String,
    pub primary_income: Money,
    pub additional_income: Money,
    pub year: i32,
    pub created_at: DateTime<Utc>,
}

impl IncomeRecord {
    pub fn new(
        user_id: String,
        primary_income: Money,
        additional_income: Money,
        year: i32,
    ) -> ResultEngine<Self> {
        if primary_income.is_negative() {
            return Err(EngineError::InvalidAmount(
                "primary income must be >= 0".to_string(),
            ));
        }
        if additional_income.is_negative() {
            return Err(EngineError::InvalidAmount(
                "additional income must be >= 0".to_string(),
            ));
        }
        // Rejects years chrono cannot represent as calendar dates.
        calendar_year_span(year)?;

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            primary_income,
            additional_income,
            year,
            created_at: Utc::now(),
        })
    }

    /// Primary plus additional income.
    #[must_use]
    pub fn total_income(&self) -> Money {
        self.primary_income + self.additional_income
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "income")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub primary_income_minor: i64,
    pub additional_income_minor: i64,
    pub year: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&IncomeRecord> for ActiveModel {
    fn from(record: &IncomeRecord) -> Self {
        Self {
            id: ActiveValue::Set(record.id.to_string()),
            user_id: ActiveValue::Set(record.user_id.clone()),
            primary_income_minor: ActiveValue::Set(record.primary_income.minor()),
            additional_income_minor: ActiveValue::Set(record.additional_income.minor()),
            year: ActiveValue::Set(record.year),
            created_at: ActiveValue::Set(record.created_at),
        }
    }
}

impl TryFrom<Model> for IncomeRecord {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("income record".to_string()))?,
            user_id: model.user_id,
            primary_income: Money::new(model.primary_income_minor),
            additional_income: Money::new(model.additional_income_minor),
            year: model.year,
            created_at: model.created_at,
        })
    }
}
