#![allow(dead_code)]

use ai_summarize::ai::{DownloadMonitor, DownloadProgress, SummarizerBackend, SummarizerSession};
use ai_summarize::core::models::SummarizerOptions;
use ai_summarize::errors::WidgetError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Recorded {
    unavailable: bool,
    fail_create: AtomicBool,
    fail_summarize: AtomicBool,
    hang_summarize: AtomicBool,
    replies: Mutex<HashMap<String, String>>,
    creations: Mutex<Vec<SummarizerOptions>>,
    summarize_calls: Mutex<Vec<String>>,
    destroyed: AtomicUsize,
}

/// Scripted backend recording every call it receives. Clones share state.
#[derive(Clone, Default)]
pub struct MockBackend {
    inner: Arc<Recorded>,
}

impl MockBackend {
    pub fn available() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            inner: Arc::new(Recorded {
                unavailable: true,
                ..Recorded::default()
            }),
        }
    }

    /// A handle suitable for `SummarizeWidget` construction.
    pub fn shared(&self) -> Arc<dyn SummarizerBackend> {
        Arc::new(self.clone())
    }

    pub fn reply(&self, input: &str, output: &str) {
        self.inner
            .replies
            .lock()
            .unwrap()
            .insert(input.to_string(), output.to_string());
    }

    pub fn fail_create(&self, fail: bool) {
        self.inner.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn fail_summarize(&self, fail: bool) {
        self.inner.fail_summarize.store(fail, Ordering::SeqCst);
    }

    /// Summaries requested from now on never resolve.
    pub fn hang_summarize(&self, hang: bool) {
        self.inner.hang_summarize.store(hang, Ordering::SeqCst);
    }

    pub fn creation_count(&self) -> usize {
        self.inner.creations.lock().unwrap().len()
    }

    pub fn last_options(&self) -> Option<SummarizerOptions> {
        self.inner.creations.lock().unwrap().last().cloned()
    }

    pub fn summarize_inputs(&self) -> Vec<String> {
        self.inner.summarize_calls.lock().unwrap().clone()
    }

    pub fn destroyed(&self) -> usize {
        self.inner.destroyed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SummarizerBackend for MockBackend {
    fn is_available(&self) -> bool {
        !self.inner.unavailable
    }

    async fn create(
        &self,
        options: SummarizerOptions,
        monitor: DownloadMonitor,
    ) -> Result<Arc<dyn SummarizerSession>, WidgetError> {
        self.inner.creations.lock().unwrap().push(options);
        monitor.report(DownloadProgress {
            loaded: 512,
            total: None,
        });
        if self.inner.fail_create.load(Ordering::SeqCst) {
            return Err(WidgetError::Backend("model download failed".to_string()));
        }
        Ok(Arc::new(MockSession {
            recorded: Arc::clone(&self.inner),
        }))
    }
}

struct MockSession {
    recorded: Arc<Recorded>,
}

#[async_trait]
impl SummarizerSession for MockSession {
    async fn summarize(&self, input: &str) -> Result<String, WidgetError> {
        self.recorded
            .summarize_calls
            .lock()
            .unwrap()
            .push(input.to_string());
        if self.recorded.hang_summarize.load(Ordering::SeqCst) {
            futures::future::pending::<()>().await;
        }
        if self.recorded.fail_summarize.load(Ordering::SeqCst) {
            return Err(WidgetError::Backend("summarize rejected".to_string()));
        }
        let scripted = self.recorded.replies.lock().unwrap().get(input).cloned();
        Ok(scripted.unwrap_or_else(|| format!("Summary of: {input}")))
    }

    fn destroy(&self) {
        self.recorded.destroyed.fetch_add(1, Ordering::SeqCst);
    }
}
