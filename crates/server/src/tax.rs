//! Tax assessment and report endpoints.

use api_types::report::{
    IncomeDetails, PurchaseDetails, ReportPurchase, TaxReport, UserDetails,
};
use api_types::tax::{TaxCalculate, TaxDetails, TaxSummaryResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::{ReportUser, TaxBreakdown};

use crate::{ServerError, required, server::ServerState, user};

fn tax_details(breakdown: TaxBreakdown) -> TaxDetails {
    TaxDetails {
        basic_tax_minor: breakdown.basic_tax.minor(),
        purchase_deduction_minor: breakdown.purchase_deduction.minor(),
        final_tax_minor: breakdown.final_tax.minor(),
    }
}

pub async fn calculate(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TaxCalculate>,
) -> Result<Json<TaxSummaryResponse>, ServerError> {
    let year = required(payload.year, "year")?;

    let summary = state.engine.calculate_tax(&user.id, year).await?;
    tracing::debug!(
        "assessed year {} for {}: final tax {}",
        summary.year,
        user.username,
        summary.breakdown.final_tax
    );

    Ok(Json(TaxSummaryResponse {
        year: summary.year,
        total_income_minor: summary.total_income.minor(),
        total_purchases_minor: summary.total_purchases.minor(),
        tax_details: tax_details(summary.breakdown),
    }))
}

pub async fn report(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(year): Path<i32>,
) -> Result<Json<TaxReport>, ServerError> {
    let report = state
        .engine
        .tax_report(
            ReportUser {
                username: user.username.clone(),
                email: user.email.clone(),
            },
            &user.id,
            year,
        )
        .await?;

    let purchases = report
        .purchases
        .into_iter()
        .map(|purchase| ReportPurchase {
            amount_minor: purchase.amount.minor(),
            category: purchase.category,
            description: purchase.description,
            purchase_date: purchase.purchased_on,
        })
        .collect();

    Ok(Json(TaxReport {
        report_date: report.generated_at,
        tax_year: report.year,
        user_details: UserDetails {
            username: report.user.username,
            email: report.user.email,
        },
        income_details: IncomeDetails {
            primary_income_minor: report.primary_income.minor(),
            additional_income_minor: report.additional_income.minor(),
            total_income_minor: report.total_income.minor(),
        },
        purchase_details: PurchaseDetails {
            total_purchases_minor: report.total_purchases.minor(),
            purchase_count: report.purchase_count as u64,
            purchases,
        },
        tax_calculation: tax_details(report.tax),
    }))
}
