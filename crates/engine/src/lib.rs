pub use error::EngineError;
pub use income::IncomeRecord;
pub use money::Money;
pub use purchases::{DEFAULT_CATEGORY, PurchaseRecord};
pub use report::{ReportUser, TaxReport};
pub use tax::{TaxBreakdown, TaxRates, TaxSummary};

use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, prelude::*,
};

use crate::purchases::calendar_year_span;

mod error;
pub mod income;
mod money;
pub mod purchases;
mod report;
mod tax;

type ResultEngine<T> = Result<T, EngineError>;

/// The record store and calculator behind the HTTP layer.
///
/// Stateless apart from the database handle: every operation reads or
/// writes rows and returns domain types. Identity (tokens, passwords) is
/// someone else's problem; the engine only ever sees opaque user ids.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    rates: TaxRates,
}

impl Engine {
    /// Return a builder for `Engine`.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// The rates this engine assesses with.
    #[must_use]
    pub fn rates(&self) -> &TaxRates {
        &self.rates
    }

    /// Records income for a tax year.
    ///
    /// At most one record may exist per `(user, year)`; a second submission
    /// for the same year is rejected with [`EngineError::Duplicate`].
    pub async fn add_income(
        &self,
        user_id: &str,
        primary_minor: i64,
        additional_minor: i64,
        year: i32,
    ) -> ResultEngine<IncomeRecord> {
        let record = IncomeRecord::new(
            user_id.to_string(),
            Money::new(primary_minor),
            Money::new(additional_minor),
            year,
        )?;

        if self.find_income(user_id, year).await?.is_some() {
            return Err(EngineError::Duplicate(format!("income for year {year}")));
        }

        income::ActiveModel::from(&record).insert(&self.database).await?;
        Ok(record)
    }

    /// Lists a user's income records, most recent year first.
    pub async fn list_income(&self, user_id: &str) -> ResultEngine<Vec<IncomeRecord>> {
        let models = income::Entity::find()
            .filter(income::Column::UserId.eq(user_id))
            .order_by_desc(income::Column::Year)
            .all(&self.database)
            .await?;

        models.into_iter().map(IncomeRecord::try_from).collect()
    }

    /// The income record for `(user, year)`, if any.
    pub async fn find_income(
        &self,
        user_id: &str,
        year: i32,
    ) -> ResultEngine<Option<IncomeRecord>> {
        let model = income::Entity::find()
            .filter(income::Column::UserId.eq(user_id))
            .filter(income::Column::Year.eq(year))
            .one(&self.database)
            .await?;

        model.map(IncomeRecord::try_from).transpose()
    }

    /// Records a purchase.
    pub async fn add_purchase(
        &self,
        user_id: &str,
        amount_minor: i64,
        category: Option<String>,
        description: Option<String>,
        purchased_on: NaiveDate,
    ) -> ResultEngine<PurchaseRecord> {
        let record = PurchaseRecord::new(
            user_id.to_string(),
            Money::new(amount_minor),
            category,
            description,
            purchased_on,
        )?;

        purchases::ActiveModel::from(&record)
            .insert(&self.database)
            .await?;
        Ok(record)
    }

    /// Lists a user's purchases, most recent date first.
    pub async fn list_purchases(&self, user_id: &str) -> ResultEngine<Vec<PurchaseRecord>> {
        let models = purchases::Entity::find()
            .filter(purchases::Column::UserId.eq(user_id))
            .order_by_desc(purchases::Column::PurchasedOn)
            .order_by_desc(purchases::Column::CreatedAt)
            .all(&self.database)
            .await?;

        models.into_iter().map(PurchaseRecord::try_from).collect()
    }

    /// Purchases dated within `[start, end]`, both ends inclusive.
    pub async fn purchases_in_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<Vec<PurchaseRecord>> {
        let models = purchases::Entity::find()
            .filter(purchases::Column::UserId.eq(user_id))
            .filter(purchases::Column::PurchasedOn.between(start, end))
            .order_by_desc(purchases::Column::PurchasedOn)
            .all(&self.database)
            .await?;

        models.into_iter().map(PurchaseRecord::try_from).collect()
    }

    /// Purchases dated within the calendar year.
    pub async fn purchases_in_year(
        &self,
        user_id: &str,
        year: i32,
    ) -> ResultEngine<Vec<PurchaseRecord>> {
        let (start, end) = calendar_year_span(year)?;
        self.purchases_in_range(user_id, start, end).await
    }

    /// Assesses tax for a year from the stored records.
    ///
    /// Fails with [`EngineError::NotFound`] when the year has no income
    /// record, regardless of any purchases dated within it.
    pub async fn calculate_tax(&self, user_id: &str, year: i32) -> ResultEngine<TaxSummary> {
        let income = self
            .find_income(user_id, year)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("income for year {year}")))?;
        let purchases = self.purchases_in_year(user_id, year).await?;

        let total_income = income.total_income();
        let total_purchases = purchases
            .iter()
            .fold(Money::ZERO, |acc, purchase| acc + purchase.amount);

        Ok(TaxSummary {
            year,
            total_income,
            total_purchases,
            breakdown: TaxBreakdown::assess(total_income, total_purchases, &self.rates),
        })
    }

    /// Assembles the full report for a year.
    ///
    /// `user` carries the display fields of the report owner; `user_id` is
    /// the storage key the records are filed under. Same not-found rule as
    /// [`Engine::calculate_tax`].
    pub async fn tax_report(
        &self,
        user: ReportUser,
        user_id: &str,
        year: i32,
    ) -> ResultEngine<TaxReport> {
        let income = self
            .find_income(user_id, year)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("income for year {year}")))?;
        let purchases = self.purchases_in_year(user_id, year).await?;

        Ok(TaxReport::assemble(user, &income, purchases, &self.rates))
    }
}

/// The builder for `Engine`.
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    rates: Option<TaxRates>,
}

impl EngineBuilder {
    /// Pass the required database.
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override the default rates.
    pub fn tax_rates(mut self, rates: TaxRates) -> EngineBuilder {
        self.rates = Some(rates);
        self
    }

    /// Construct `Engine`.
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
            rates: self.rates.unwrap_or_default(),
        }
    }
}
