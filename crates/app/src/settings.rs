//! Settings for the application, read from `settings.toml`.
//!
//! ```toml
//! [app]
//! level = "info"
//!
//! [server]
//! bind = "127.0.0.1"
//! port = 3000
//! database = { sqlite = "./decima.db" }   # or "memory"
//! jwt_secret = "change-me"
//! token_ttl_hours = 24
//!
//! [tax]                    # optional; defaults are 2000/500/1000 bp
//! basic_rate_bp = 2000
//! deduction_rate_bp = 500
//! deduction_cap_bp = 1000
//! ```

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
    pub jwt_secret: String,
    pub token_ttl_hours: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Tax {
    pub basic_rate_bp: u32,
    pub deduction_rate_bp: u32,
    pub deduction_cap_bp: u32,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub tax: Option<Tax>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .set_default("app.level", "info")?
            .add_source(File::with_name("settings"))
            .build()?
            .try_deserialize()?;

        if settings.server.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "server.jwt_secret must not be empty".to_string(),
            ));
        }

        Ok(settings)
    }
}
