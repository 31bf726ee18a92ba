//! Summarizer backends and the session lifecycle

pub mod backend;
pub mod client;
pub mod handle;

// Re-export main types for convenience
pub use backend::{DownloadMonitor, DownloadProgress, SummarizerBackend, SummarizerSession};
pub use client::LlmBackend;
pub use handle::{BackendHandle, Completion, HandleState};
