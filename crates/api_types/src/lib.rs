use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod auth {
    use super::*;

    /// Request body for `POST /register`.
    ///
    /// Required fields are `Option` so the server can answer missing fields
    /// with a 400 instead of a deserialization rejection.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterRequest {
        pub username: Option<String>,
        pub email: Option<String>,
        pub password: Option<String>,
    }

    /// Request body for `POST /login`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub username: Option<String>,
        pub password: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: String,
        pub username: String,
        pub email: String,
    }

    /// Returned by both `register` and `login`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuthResponse {
        pub user: UserView,
        /// Opaque bearer token for the `Authorization` header.
        pub token: String,
        /// Token lifetime in seconds.
        pub expires_in: u64,
    }
}

pub mod income {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeNew {
        pub primary_income_minor: Option<i64>,
        /// Defaults to 0 when absent.
        pub additional_income_minor: Option<i64>,
        pub year: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeView {
        pub id: Uuid,
        pub primary_income_minor: i64,
        pub additional_income_minor: i64,
        pub year: i32,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeCreated {
        pub income: IncomeView,
    }

    /// Ordered by year descending.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomesResponse {
        pub incomes: Vec<IncomeView>,
    }
}

pub mod purchase {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseNew {
        pub amount_minor: Option<i64>,
        /// Defaults to "General" when absent or blank.
        pub category: Option<String>,
        pub description: Option<String>,
        /// Calendar date (`YYYY-MM-DD`).
        pub purchase_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseView {
        pub id: Uuid,
        pub amount_minor: i64,
        pub category: String,
        pub description: Option<String>,
        pub purchase_date: NaiveDate,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseCreated {
        pub purchase: PurchaseView,
    }

    /// Ordered by purchase date descending.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchasesResponse {
        pub purchases: Vec<PurchaseView>,
    }
}

pub mod tax {
    use super::*;

    /// Request body for `POST /calculateTax`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TaxCalculate {
        pub year: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TaxDetails {
        pub basic_tax_minor: i64,
        pub purchase_deduction_minor: i64,
        pub final_tax_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TaxSummaryResponse {
        pub year: i32,
        pub total_income_minor: i64,
        pub total_purchases_minor: i64,
        pub tax_details: TaxDetails,
    }
}

pub mod report {
    use super::*;
    use crate::tax::TaxDetails;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserDetails {
        pub username: String,
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeDetails {
        pub primary_income_minor: i64,
        pub additional_income_minor: i64,
        pub total_income_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportPurchase {
        pub amount_minor: i64,
        pub category: String,
        pub description: Option<String>,
        pub purchase_date: NaiveDate,
    }

    /// `purchase_count` always equals `purchases.len()`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseDetails {
        pub total_purchases_minor: i64,
        pub purchase_count: u64,
        pub purchases: Vec<ReportPurchase>,
    }

    /// Full report for one tax year, assembled server-side.
    ///
    /// Read-only view; clients render or export it as they see fit.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TaxReport {
        /// Generation timestamp (RFC3339, UTC).
        pub report_date: DateTime<Utc>,
        pub tax_year: i32,
        pub user_details: UserDetails,
        pub income_details: IncomeDetails,
        pub purchase_details: PurchaseDetails,
        pub tax_calculation: TaxDetails,
    }
}
