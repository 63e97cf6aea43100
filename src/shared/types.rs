use serde::{Deserialize, Serialize};

use crate::core::error::{AppError, Result};

/// Standard `{ success, data, message }` envelope used by the backend
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

/// Paginated list shape returned by some list endpoints
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: T,
    pub page: i64,
    pub total_pages: i64,
    #[serde(default)]
    pub total: Option<i64>,
}

impl<T> Paginated<T> {
    pub fn is_last_page(&self) -> bool {
        self.page >= self.total_pages
    }
}

/// Result of a backend mutation followed by a list reload.
///
/// The mutation has already been applied when this exists; `reload_error`
/// only means the cached list is now stale.
#[derive(Debug)]
pub struct Mutation<T> {
    pub value: T,
    pub reload_error: Option<AppError>,
}

impl<T> Mutation<T> {
    pub fn is_stale(&self) -> bool {
        self.reload_error.is_some()
    }
}

/// Every body shape the backend is known to answer with.
///
/// Variant order matters: the envelope is recognised by its `success` field,
/// the paginated form by `page` and `totalPages`, anything else is taken as
/// the bare payload.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody<T> {
    Envelope(ApiResponse<T>),
    Paginated(Paginated<T>),
    Raw(T),
}

impl<T> ResponseBody<T> {
    /// Collapse the body into one result shape.
    ///
    /// `Ok(None)` means the backend reported success without a payload.
    pub fn into_result(self, status: u16) -> Result<Option<T>> {
        match self {
            ResponseBody::Envelope(envelope) if envelope.success => Ok(envelope.data),
            ResponseBody::Envelope(envelope) => Err(AppError::Api {
                status,
                message: failure_message(envelope.message, envelope.errors, status),
            }),
            ResponseBody::Paginated(page) => {
                let total = page.total.map_or_else(|| "?".to_string(), |t| t.to_string());
                if page.is_last_page() {
                    tracing::debug!(
                        "Received page {} of {} ({} items total)",
                        page.page,
                        page.total_pages,
                        total
                    );
                } else {
                    tracing::warn!(
                        "Only page {} of {} was returned ({} items total); later pages are missing",
                        page.page,
                        page.total_pages,
                        total
                    );
                }
                Ok(Some(page.data))
            }
            ResponseBody::Raw(data) => Ok(Some(data)),
        }
    }
}

/// Loose error body for non-2xx responses; every field is optional
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

impl ErrorBody {
    /// Parse whatever the server sent; non-JSON bodies yield an empty `ErrorBody`.
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    pub fn into_message(self, status: u16) -> String {
        failure_message(self.message.or(self.error), self.errors, status)
    }
}

/// Prefer the server's message, then its first listed error, then a generic line
fn failure_message(message: Option<String>, errors: Option<Vec<String>>, status: u16) -> String {
    message
        .filter(|m| !m.trim().is_empty())
        .or_else(|| errors.and_then(|errs| errs.into_iter().next()))
        .unwrap_or_else(|| format!("Request failed with status {}", status))
}
