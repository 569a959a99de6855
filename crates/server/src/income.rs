//! Income API endpoints.

use api_types::income::{IncomeCreated, IncomeNew, IncomeView, IncomesResponse};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::IncomeRecord;

use crate::{ServerError, required, server::ServerState, user};

fn income_view(record: IncomeRecord) -> IncomeView {
    IncomeView {
        id: record.id,
        primary_income_minor: record.primary_income.minor(),
        additional_income_minor: record.additional_income.minor(),
        year: record.year,
        created_at: record.created_at,
    }
}

pub async fn add(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<IncomeNew>,
) -> Result<(StatusCode, Json<IncomeCreated>), ServerError> {
    let primary = required(payload.primary_income_minor, "primary_income_minor")?;
    let year = required(payload.year, "year")?;

    let record = state
        .engine
        .add_income(
            &user.id,
            primary,
            payload.additional_income_minor.unwrap_or(0),
            year,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(IncomeCreated {
            income: income_view(record),
        }),
    ))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<IncomesResponse>, ServerError> {
    let incomes = state
        .engine
        .list_income(&user.id)
        .await?
        .into_iter()
        .map(income_view)
        .collect();

    Ok(Json(IncomesResponse { incomes }))
}
