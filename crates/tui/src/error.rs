use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    /// A setting that loaded fine but holds an unusable value.
    #[error("invalid setting {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("terminal error: {0}")]
    Terminal(String),
}

impl AppError {
    pub(crate) fn invalid_setting(key: &'static str, reason: impl ToString) -> Self {
        Self::InvalidSetting {
            key,
            reason: reason.to_string(),
        }
    }
}
