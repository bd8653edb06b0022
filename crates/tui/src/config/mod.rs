use std::path::PathBuf;

use chrono_tz::Tz;
use clap::Parser;
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/tui.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// IANA name used for "today" and for the dates typed into forms.
    pub timezone: String,
    /// Where downloaded PDF and Word reports are written.
    pub export_dir: PathBuf,
    pub page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timezone: "Asia/Kolkata".to_string(),
            export_dir: PathBuf::from("."),
            page_size: 10,
        }
    }
}

impl AppConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|err| AppError::invalid_setting("timezone", err))
    }
}

#[derive(Debug, Parser)]
#[command(name = "clinic_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:5000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    /// Override the directory exports are saved to.
    #[arg(long)]
    export_dir: Option<PathBuf>,
    /// Rows per page in the list pages.
    #[arg(long)]
    page_size: Option<usize>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("CLINIC_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(export_dir) = args.export_dir {
        settings.export_dir = export_dir;
    }
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size;
    }
    if settings.page_size == 0 {
        return Err(AppError::invalid_setting("page_size", "must be at least 1"));
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timezone_parses() {
        let config = AppConfig::default();
        assert_eq!(config.tz().unwrap(), chrono_tz::Asia::Kolkata);
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let config = AppConfig {
            timezone: "Mars/Olympus".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.tz(),
            Err(AppError::InvalidSetting { key: "timezone", .. })
        ));
    }
}
