use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use engine::{Engine, EngineError};
use sea_orm::{DatabaseConnection, EntityTrait};

use std::sync::Arc;

use crate::{
    ServerError,
    auth::{self, AuthError, AuthManager},
    income, purchases, tax, user,
};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
    pub auth: Arc<AuthManager>,
}

/// Bearer-token middleware for the protected routes.
///
/// A missing `Authorization` header is a 401; a token that does not
/// validate (or names a user that no longer exists) is a 403. On success
/// the user row is attached as a request extension.
async fn require_user(
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(bearer)) = bearer else {
        return Err(AuthError::MissingCredentials.into());
    };

    let claims = state.auth.validate_token(bearer.token())?;
    let user = user::Entity::find_by_id(claims.sub.as_str())
        .one(&state.db)
        .await
        .map_err(EngineError::from)?
        .ok_or(AuthError::InvalidToken)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn app(state: ServerState) -> Router {
    Router::new()
        .route("/income", get(income::list).post(income::add))
        .route("/purchases", get(purchases::list).post(purchases::add))
        .route("/calculateTax", post(tax::calculate))
        .route("/taxReport/{year}", get(tax::report))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    auth: AuthManager,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
        auth: Arc::new(auth),
    };

    axum::serve(listener, app(state)).await
}
