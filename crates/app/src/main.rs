use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "decima={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;

    let mut builder = engine::Engine::builder().database(db.clone());
    if let Some(tax) = &settings.tax {
        builder = builder.tax_rates(engine::TaxRates {
            basic_rate_bp: tax.basic_rate_bp,
            deduction_rate_bp: tax.deduction_rate_bp,
            deduction_cap_bp: tax.deduction_cap_bp,
        });
    }
    let engine = builder.build();
    tracing::info!("assessing with rates {:?}", engine.rates());

    let token_ttl = settings
        .server
        .token_ttl_hours
        .map(|hours| Duration::from_secs(hours * 60 * 60))
        .unwrap_or(server::DEFAULT_TOKEN_TTL);
    let auth = server::AuthManager::new(&server::AuthConfig {
        jwt_secret: settings.server.jwt_secret.into_bytes(),
        token_ttl,
    });

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    server::run_with_listener(engine, db, auth, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
