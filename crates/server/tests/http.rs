use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use migration::MigratorTrait;
use server::{AuthConfig, AuthManager, ServerState};

async fn test_app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let engine = engine::Engine::builder().database(db.clone()).build();
    let auth = AuthManager::new(&AuthConfig {
        jwt_secret: b"test-secret".to_vec(),
        token_ttl: Duration::from_secs(24 * 60 * 60),
    });

    server::app(ServerState {
        engine: Arc::new(engine),
        db,
        auth: Arc::new(auth),
    })
}

fn post_json(path: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Registers a user and returns a valid bearer token.
async fn register(app: &Router, username: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        post_json(
            "/register",
            None,
            &json!({"username": username, "email": email, "password": "hunter2"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn register_returns_user_and_token() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        post_json(
            "/register",
            None,
            &json!({"username": "alice", "email": "Alice@Example.com", "password": "hunter2"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["username"], "alice");
    // Emails are stored lowercased.
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["expires_in"], 24 * 60 * 60);
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn register_with_missing_fields_is_400() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        post_json("/register", None, &json!({"username": "alice"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("required"));
}

#[tokio::test]
async fn duplicate_username_or_email_is_409_and_creates_nothing() {
    let app = test_app().await;
    register(&app, "alice", "alice@example.com").await;

    // Same username, different email.
    let (status, _) = send(
        &app,
        post_json(
            "/register",
            None,
            &json!({"username": "alice", "email": "other@example.com", "password": "pw"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Same email, different username.
    let (status, _) = send(
        &app,
        post_json(
            "/register",
            None,
            &json!({"username": "bob", "email": "alice@example.com", "password": "pw"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The original account is intact and neither rejected variant exists.
    let (status, _) = send(
        &app,
        post_json(
            "/login",
            None,
            &json!({"username": "alice", "password": "hunter2"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        post_json("/login", None, &json!({"username": "bob", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_verifies_the_password() {
    let app = test_app().await;
    register(&app, "alice", "alice@example.com").await;

    let (status, body) = send(
        &app,
        post_json(
            "/login",
            None,
            &json!({"username": "alice", "password": "hunter2"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["token"].as_str().unwrap().is_empty());

    let (status, _) = send(
        &app,
        post_json(
            "/login",
            None,
            &json!({"username": "alice", "password": "wrong"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, post_json("/login", None, &json!({"username": "alice"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn protected_routes_reject_missing_and_invalid_tokens() {
    let app = test_app().await;

    let (status, _) = send(&app, get("/income", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, get("/income", Some("not-a-token"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn income_can_be_added_and_listed_by_year_descending() {
    let app = test_app().await;
    let token = register(&app, "alice", "alice@example.com").await;

    let (status, body) = send(
        &app,
        post_json(
            "/income",
            Some(&token),
            &json!({"primary_income_minor": 500_000, "additional_income_minor": 50_000, "year": 2023}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["income"]["year"], 2023);
    assert_eq!(body["income"]["primary_income_minor"], 500_000);

    // additional_income_minor defaults to 0.
    let (status, body) = send(
        &app,
        post_json(
            "/income",
            Some(&token),
            &json!({"primary_income_minor": 600_000, "year": 2024}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["income"]["additional_income_minor"], 0);

    let (status, body) = send(&app, get("/income", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let years: Vec<i64> = body["incomes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|income| income["year"].as_i64().unwrap())
        .collect();
    assert_eq!(years, vec![2024, 2023]);
}

#[tokio::test]
async fn income_validation_and_duplicates_map_to_400_and_409() {
    let app = test_app().await;
    let token = register(&app, "alice", "alice@example.com").await;

    let (status, _) = send(
        &app,
        post_json("/income", Some(&token), &json!({"primary_income_minor": 1000})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        post_json(
            "/income",
            Some(&token),
            &json!({"primary_income_minor": -1, "year": 2024}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        post_json(
            "/income",
            Some(&token),
            &json!({"primary_income_minor": 1000, "year": 2024}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        post_json(
            "/income",
            Some(&token),
            &json!({"primary_income_minor": 2000, "year": 2024}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn purchases_default_their_category_and_list_by_date_descending() {
    let app = test_app().await;
    let token = register(&app, "alice", "alice@example.com").await;

    let (status, body) = send(
        &app,
        post_json(
            "/purchases",
            Some(&token),
            &json!({"amount_minor": 10_000, "purchase_date": "2024-01-05"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["purchase"]["category"], "General");

    let (status, _) = send(
        &app,
        post_json(
            "/purchases",
            Some(&token),
            &json!({
                "amount_minor": 20_000,
                "category": "Books",
                "description": "reference manual",
                "purchase_date": "2024-03-10"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        post_json("/purchases", Some(&token), &json!({"amount_minor": 500})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, get("/purchases", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let purchases = body["purchases"].as_array().unwrap();
    assert_eq!(purchases.len(), 2);
    assert_eq!(purchases[0]["purchase_date"], "2024-03-10");
    assert_eq!(purchases[0]["category"], "Books");
    assert_eq!(purchases[1]["purchase_date"], "2024-01-05");
}

#[tokio::test]
async fn calculate_tax_applies_the_deduction_formula() {
    let app = test_app().await;
    let token = register(&app, "alice", "alice@example.com").await;

    let (status, _) = send(&app, post_json("/calculateTax", Some(&token), &json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Purchases alone are not enough; the year needs an income record.
    send(
        &app,
        post_json(
            "/purchases",
            Some(&token),
            &json!({"amount_minor": 10_000, "purchase_date": "2024-02-01"}),
        ),
    )
    .await;
    let (status, _) = send(
        &app,
        post_json("/calculateTax", Some(&token), &json!({"year": 2024})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(
        &app,
        post_json(
            "/income",
            Some(&token),
            &json!({"primary_income_minor": 500_000, "additional_income_minor": 50_000, "year": 2024}),
        ),
    )
    .await;
    send(
        &app,
        post_json(
            "/purchases",
            Some(&token),
            &json!({"amount_minor": 20_000, "purchase_date": "2024-08-15"}),
        ),
    )
    .await;
    // Dated outside 2024; must not count.
    send(
        &app,
        post_json(
            "/purchases",
            Some(&token),
            &json!({"amount_minor": 99_000, "purchase_date": "2023-12-31"}),
        ),
    )
    .await;

    let (status, body) = send(
        &app,
        post_json("/calculateTax", Some(&token), &json!({"year": 2024})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["year"], 2024);
    assert_eq!(body["total_income_minor"], 550_000);
    assert_eq!(body["total_purchases_minor"], 30_000);
    assert_eq!(body["tax_details"]["basic_tax_minor"], 110_000);
    assert_eq!(body["tax_details"]["purchase_deduction_minor"], 1_500);
    assert_eq!(body["tax_details"]["final_tax_minor"], 108_500);
}

#[tokio::test]
async fn tax_report_assembles_the_full_year() {
    let app = test_app().await;
    let token = register(&app, "alice", "alice@example.com").await;

    let (status, _) = send(&app, get("/taxReport/2024", Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(
        &app,
        post_json(
            "/income",
            Some(&token),
            &json!({"primary_income_minor": 500_000, "additional_income_minor": 50_000, "year": 2024}),
        ),
    )
    .await;
    send(
        &app,
        post_json(
            "/purchases",
            Some(&token),
            &json!({"amount_minor": 30_000, "category": "Office", "purchase_date": "2024-04-02"}),
        ),
    )
    .await;

    let (status, body) = send(&app, get("/taxReport/2024", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tax_year"], 2024);
    assert_eq!(body["user_details"]["username"], "alice");
    assert_eq!(body["user_details"]["email"], "alice@example.com");
    assert_eq!(body["income_details"]["total_income_minor"], 550_000);
    assert_eq!(body["purchase_details"]["total_purchases_minor"], 30_000);

    let purchases = body["purchase_details"]["purchases"].as_array().unwrap();
    assert_eq!(
        body["purchase_details"]["purchase_count"].as_u64().unwrap(),
        purchases.len() as u64
    );
    assert_eq!(purchases[0]["category"], "Office");

    assert_eq!(body["tax_calculation"]["basic_tax_minor"], 110_000);
    assert_eq!(body["tax_calculation"]["purchase_deduction_minor"], 1_500);
    assert_eq!(body["tax_calculation"]["final_tax_minor"], 108_500);
    assert!(!body["report_date"].as_str().unwrap().is_empty());
}
