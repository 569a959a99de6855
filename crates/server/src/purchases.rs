//! Purchases API endpoints.

use api_types::purchase::{PurchaseCreated, PurchaseNew, PurchaseView, PurchasesResponse};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::PurchaseRecord;

use crate::{ServerError, required, server::ServerState, user};

fn purchase_view(record: PurchaseRecord) -> PurchaseView {
    PurchaseView {
        id: record.id,
        amount_minor: record.amount.minor(),
        category: record.category,
        description: record.description,
        purchase_date: record.purchased_on,
        created_at: record.created_at,
    }
}

pub async fn add(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<PurchaseNew>,
) -> Result<(StatusCode, Json<PurchaseCreated>), ServerError> {
    let amount = required(payload.amount_minor, "amount_minor")?;
    let purchase_date = required(payload.purchase_date, "purchase_date")?;

    let record = state
        .engine
        .add_purchase(
            &user.id,
            amount,
            payload.category,
            payload.description,
            purchase_date,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PurchaseCreated {
            purchase: purchase_view(record),
        }),
    ))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<PurchasesResponse>, ServerError> {
    let purchases = state
        .engine
        .list_purchases(&user.id)
        .await?
        .into_iter()
        .map(purchase_view)
        .collect();

    Ok(Json(PurchasesResponse { purchases }))
}
