//! Handles settings for the application.
//!
//! Values come, in increasing priority, from built-in defaults, the optional
//! `settings.toml` (path overridable through `CLINIC_SETTINGS`), `CLINIC_*`
//! environment variables (`CLINIC_SERVER__PORT=8080`) and finally the
//! conventional `DATABASE_URL` and `PORT` variables.
use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./clinic.db?mode=rwc";

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level applied to the workspace crates.
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database_url: String,
    pub upload_dir: PathBuf,
    /// Decimal rupee amount, e.g. `"500"`.
    pub appointment_fee: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let path = std::env::var("CLINIC_SETTINGS").unwrap_or_else(|_| "settings".to_string());
        Self::from_sources(
            &path,
            std::env::var("DATABASE_URL").ok(),
            std::env::var("PORT").ok(),
        )
    }

    fn from_sources(
        path: &str,
        database_url: Option<String>,
        port: Option<String>,
    ) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.bind", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.database_url", DEFAULT_DATABASE_URL)?
            .set_default("server.upload_dir", "uploads")?
            .set_default("server.appointment_fee", "500")?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("CLINIC")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("server.database_url", database_url)?
            .set_override_option("server.port", port)?
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_without_file() {
        let settings = Settings::from_sources("does-not-exist", None, None).unwrap();
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.server.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(settings.server.upload_dir, PathBuf::from("uploads"));
        assert_eq!(settings.server.appointment_fee, "500");
    }

    #[test]
    fn file_then_conventional_variables() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[app]\nlevel = \"debug\"\n\n[server]\nport = 7000\nappointment_fee = \"650.50\""
        )
        .unwrap();
        let path = file.path().with_extension("");
        let path = path.to_str().unwrap();

        let settings = Settings::from_sources(path, None, None).unwrap();
        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.server.port, 7000);
        assert_eq!(settings.server.appointment_fee, "650.50");

        let settings = Settings::from_sources(
            path,
            Some("sqlite::memory:".to_string()),
            Some("8080".to_string()),
        )
        .unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.database_url, "sqlite::memory:");
    }
}
