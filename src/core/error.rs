use thiserror::Error;

use crate::shared::constants::GENERIC_ERROR_MESSAGE;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Text shown in the error banner.
    ///
    /// Server-provided messages are surfaced verbatim; transport failures fall
    /// back to a generic line since reqwest errors are not meant for end users.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Http(e) => {
                tracing::debug!("Transport failure: {:?}", e);
                GENERIC_ERROR_MESSAGE.to_string()
            }
            AppError::Api { message, .. } => message.clone(),
            AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::DataIntegrity(msg)
            | AppError::Config(msg) => msg.clone(),
            AppError::Io(e) => e.to_string(),
            AppError::Serialization(_) => "Unexpected response from server".to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{}: {}", field, msg),
                    None => format!("{}: invalid value", field),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
