// Interactive host for a single summarize widget.
//
// Builds a form with a `source` textarea, mounts a widget watching it and
// treats every stdin line as a user edit of the source field.

use ai_summarize::ai::LlmBackend;
use ai_summarize::core::config::AppConfig;
use ai_summarize::form::{ControlKind, Form};
use ai_summarize::widget::SummarizeWidget;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    let backend = Arc::new(LlmBackend::new(
        config.openai_api_key.clone(),
        config.openai_org_id.clone(),
        config.openai_model.clone(),
    ));

    let form = Form::new();
    let source = form.add_control("source", ControlKind::TextArea);

    let mut attributes = config.initial_attributes();
    attributes.push(("watch", "source".to_string()));
    let mut widget = SummarizeWidget::with_attributes(backend, Some(form), attributes);
    widget.connected();
    widget.settle().await;
    if widget.root().button().is_disabled() {
        eprintln!("OPENAI_API_KEY is not set; summaries are disabled.");
    }
    info!(state = ?widget.handle_state(), config = ?widget.config(), "Widget ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        source.user_change(line);
        widget.settle().await;

        match widget.last_error() {
            Some(e) => eprintln!("error: {e}"),
            None => println!("{}", widget.form_value()),
        }
    }

    widget.disconnect();
    Ok(())
}
