use thiserror::Error;

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("Invalid {attribute}: {value}. Valid {attribute}s are: {valid}")]
    InvalidValue {
        attribute: &'static str,
        value: String,
        valid: String,
    },

    #[error("Element with id {0} not found in form.")]
    WatchTargetNotFound(String),

    #[error("No form associated with this component. Unable to watch changes to {0}")]
    NoOwningForm(String),

    #[error("Summarizer API not found.")]
    BackendUnavailable,

    #[error("Summarizer not initialized yet.")]
    NotReady,

    #[error("Summarizer backend failed: {0}")]
    Backend(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to parse form state: {0}")]
    StateError(String),
}

impl WidgetError {
    /// Whether the error is a recoverable diagnostic rather than a backend fault.
    #[must_use]
    pub fn is_diagnostic(&self) -> bool {
        !matches!(self, WidgetError::Backend(_) | WidgetError::HttpError(_))
    }
}

impl From<reqwest::Error> for WidgetError {
    fn from(error: reqwest::Error) -> Self {
        WidgetError::HttpError(error.to_string())
    }
}

impl From<anyhow::Error> for WidgetError {
    fn from(error: anyhow::Error) -> Self {
        WidgetError::Backend(error.to_string())
    }
}

impl From<serde_json::Error> for WidgetError {
    fn from(error: serde_json::Error) -> Self {
        WidgetError::StateError(error.to_string())
    }
}
