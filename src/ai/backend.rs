//! Summarizer backend boundary.
//!
//! A backend creates sessions configured from [`SummarizerOptions`]; a
//! session turns free-form text into a summary and must be destroyed when
//! the widget replaces it.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::core::models::SummarizerOptions;
use crate::errors::WidgetError;

#[async_trait]
pub trait SummarizerBackend: Send + Sync {
    /// Whether the capability exists in this host; queried once per widget.
    fn is_available(&self) -> bool;

    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    async fn create(
        &self,
        options: SummarizerOptions,
        monitor: DownloadMonitor,
    ) -> Result<Arc<dyn SummarizerSession>, WidgetError>;
}

#[async_trait]
pub trait SummarizerSession: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the backend rejects the request.
    async fn summarize(&self, input: &str) -> Result<String, WidgetError>;

    fn destroy(&self);
}

/// Download progress reported while a backend prepares a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    pub loaded: u64,
    pub total: Option<u64>,
}

impl DownloadProgress {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn describe(&self) -> String {
        match self.total {
            Some(total) if total > 0 => {
                format!("Downloaded {}%", self.loaded as f64 / total as f64 * 100.0)
            }
            _ => format!("Downloaded {} bytes", self.loaded),
        }
    }
}

/// Progress hook handed to [`SummarizerBackend::create`].
#[derive(Debug, Clone, Default)]
pub struct DownloadMonitor {
    generation: u64,
}

impl DownloadMonitor {
    #[must_use]
    pub fn new(generation: u64) -> Self {
        Self { generation }
    }

    pub fn report(&self, progress: DownloadProgress) {
        info!(generation = self.generation, "{}", progress.describe());
    }
}
