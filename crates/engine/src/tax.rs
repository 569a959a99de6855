//! The tax calculator.
//!
//! A deliberately small model: one flat rate on income, one deduction rate
//! on purchases, and a cap tying the deduction to income. No brackets, no
//! carryover. Rates live in [`TaxRates`] rather than inline constants so a
//! future bracket table has an obvious place to grow from.

use serde::{Deserialize, Serialize};

use crate::Money;

/// Tax rates in basis points (1 bp = 0.01%).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRates {
    /// Rate applied to total income.
    pub basic_rate_bp: u32,
    /// Rate applied to total purchases to form the deduction.
    pub deduction_rate_bp: u32,
    /// Deduction ceiling, as a share of total income.
    pub deduction_cap_bp: u32,
}

impl Default for TaxRates {
    /// 20% basic tax, 5% purchase deduction, capped at 10% of income.
    fn default() -> Self {
        Self {
            basic_rate_bp: 2000,
            deduction_rate_bp: 500,
            deduction_cap_bp: 1000,
        }
    }
}

/// Result of a tax assessment.
///
/// Invariant: `final_tax = basic_tax - purchase_deduction`. No floor at
/// zero is applied; with non-negative inputs the cap already keeps
/// `final_tax >= 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub basic_tax: Money,
    pub purchase_deduction: Money,
    pub final_tax: Money,
}

impl TaxBreakdown {
    /// Assesses tax for one year's totals.
    ///
    /// Pure and deterministic. Inputs are validated upstream (records reject
    /// negative amounts), so there are no error conditions here.
    #[must_use]
    pub fn assess(total_income: Money, total_purchases: Money, rates: &TaxRates) -> Self {
        let basic_tax = total_income.scale_bp(rates.basic_rate_bp);
        let cap = total_income.scale_bp(rates.deduction_cap_bp);
        let purchase_deduction = total_purchases.scale_bp(rates.deduction_rate_bp).min(cap);

        Self {
            basic_tax,
            purchase_deduction,
            final_tax: basic_tax - purchase_deduction,
        }
    }
}

/// A year's totals plus the resulting breakdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSummary {
    pub year: i32,
    pub total_income: Money,
    pub total_purchases: Money,
    pub breakdown: TaxBreakdown,
}
