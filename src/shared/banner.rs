use crate::core::error::AppError;

/// Page-level dismissible error banner.
///
/// Holds at most one message; a newer failure replaces the older one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    message: Option<String>,
}

impl ErrorBanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, error: &AppError) {
        tracing::warn!("{}", error);
        self.message = Some(error.user_message());
    }

    /// A change was saved but the follow-up reload failed
    pub fn show_stale(&mut self, error: &AppError) {
        tracing::warn!("Reload after save failed: {}", error);
        self.message = Some(format!(
            "Saved, but the list could not be reloaded: {}",
            error.user_message()
        ));
    }

    pub fn dismiss(&mut self) {
        self.message = None;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.message.is_some()
    }

    /// Terminal rendering, `None` when nothing to show
    pub fn render(&self) -> Option<String> {
        self.message.as_ref().map(|m| format!("[error] {}  (dismiss: x)", m))
    }
}
