//! Tax report assembly.
//!
//! A report combines the user's display fields with one year's income, the
//! purchases dated inside that calendar year, and the tax breakdown. It is
//! a read-only view; nothing here touches storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{IncomeRecord, Money, PurchaseRecord, TaxBreakdown, TaxRates};

/// Display fields of the report's owner.
///
/// The engine never resolves users itself; the caller supplies whatever the
/// identity layer knows about them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportUser {
    pub username: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxReport {
    pub generated_at: DateTime<Utc>,
    pub year: i32,
    pub user: ReportUser,
    pub primary_income: Money,
    pub additional_income: Money,
    pub total_income: Money,
    pub total_purchases: Money,
    /// Always equals `purchases.len()`.
    pub purchase_count: usize,
    pub purchases: Vec<PurchaseRecord>,
    pub tax: TaxBreakdown,
}

impl TaxReport {
    pub(crate) fn assemble(
        user: ReportUser,
        income: &IncomeRecord,
        purchases: Vec<PurchaseRecord>,
        rates: &TaxRates,
    ) -> Self {
        let total_income = income.total_income();
        let total_purchases = purchases
            .iter()
            .fold(Money::ZERO, |acc, purchase| acc + purchase.amount);

        Self {
            generated_at: Utc::now(),
            year: income.year,
            user,
            primary_income: income.primary_income,
            additional_income: income.additional_income,
            total_income,
            total_purchases,
            purchase_count: purchases.len(),
            purchases,
            tax: TaxBreakdown::assess(total_income, total_purchases, rates),
        }
    }
}
