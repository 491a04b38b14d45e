use crate::datasources::GatewayError;
use crate::models::TimeWindow;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParaweroError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("Invalid forecast data: {0}")]
    InvalidPayloadShape(String),

    #[error("Invalid forecast data: no {window} forecast (date offset {date_offset}) and no daily fallback")]
    EmptyWindowNoFallback { window: TimeWindow, date_offset: u8 },

    #[error("Unknown time window: {0}")]
    InvalidWindow(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Provider gateway error ({}): {}", .0.status, .0.error)]
    Gateway(GatewayError),
}

impl ParaweroError {
    /// Message suitable for showing to the person asking for advice.
    pub fn user_message(&self) -> String {
        match self {
            ParaweroError::InvalidPayloadShape(_) | ParaweroError::EmptyWindowNoFallback { .. } => {
                "We could not process the weather data for this location.".to_string()
            }
            ParaweroError::NotFound(_) => {
                "We could not find that city. Check the name and try again.".to_string()
            }
            ParaweroError::Http(_)
            | ParaweroError::DataSourceUnavailable(_)
            | ParaweroError::Gateway(_) => {
                "We could not fetch the weather forecast. Please try again later.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<GatewayError> for ParaweroError {
    fn from(err: GatewayError) -> Self {
        ParaweroError::Gateway(err)
    }
}

pub type Result<T> = std::result::Result<T, ParaweroError>;
