//! ai-summarize - a form-participating summarization widget.
//!
//! The widget delegates summarization to a pluggable backend and can keep
//! its summary in sync with another control of the same form.
//!
//! # Architecture
//!
//! The crate is split into:
//! - `core`: validated configuration, the attribute model and env config
//! - `ai`: the backend traits, the session lifecycle and an HTTP backend
//! - `form`: the host form model the widget participates in
//! - `widget`: the widget itself, reconciling attributes, events and rendering
//!
//! # Example
//!
//! ```no_run
//! use ai_summarize::ai::LlmBackend;
//! use ai_summarize::form::{ControlKind, Form};
//! use ai_summarize::widget::SummarizeWidget;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     ai_summarize::setup_logging();
//!
//!     let form = Form::new();
//!     let notes = form.add_control("notes", ControlKind::TextArea);
//!     let backend = Arc::new(LlmBackend::new(Some("sk-...".into()), None, None));
//!
//!     let mut widget = SummarizeWidget::with_attributes(
//!         backend,
//!         Some(form),
//!         [("type", "headline"), ("format", "plain-text"), ("watch", "notes")],
//!     );
//!     widget.settle().await;
//!
//!     notes.user_change("Quarterly revenue grew 12% on strong subscription sales.");
//!     widget.settle().await;
//!     println!("Summary: {}", widget.form_value());
//! }
//! ```

// Module declarations
pub mod ai;
pub mod core;
pub mod errors;
pub mod form;
pub mod widget;

pub use errors::WidgetError;
pub use widget::SummarizeWidget;

/// Configure structured logging with JSON format.
///
/// Sets up tracing-subscriber with a JSON formatter. Calling it more than
/// once is harmless: later calls leave the first subscriber in place.
///
/// # Example
///
/// ```
/// ai_summarize::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
