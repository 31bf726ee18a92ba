//! The summarize widget and its attribute/event reconciliation.
//!
//! A widget owns its configuration, its backend session, its watch binding
//! and its rendered input. Asynchronous backend work is queued as futures
//! and applied to widget state only when the host pumps the widget with
//! [`SummarizeWidget::settle`], so all state changes happen on the host's
//! own call sequence.
//!
//! # Example
//!
//! ```no_run
//! use ai_summarize::ai::LlmBackend;
//! use ai_summarize::form::{ControlKind, Form};
//! use ai_summarize::widget::SummarizeWidget;
//! use std::sync::Arc;
//!
//! # async fn run() {
//! let form = Form::new();
//! let article = form.add_control("article", ControlKind::TextArea);
//! let backend = Arc::new(LlmBackend::new(Some("sk-...".into()), None, None));
//!
//! let mut widget = SummarizeWidget::with_attributes(
//!     backend,
//!     Some(Arc::clone(&form)),
//!     [("type", "tldr"), ("watch", "article")],
//! );
//! widget.settle().await;
//!
//! article.user_change("A long article ...");
//! widget.settle().await;
//! println!("{}", widget.form_value());
//! # }
//! ```

pub mod binding;
pub mod surface;

use futures::FutureExt;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, error, info, trace, warn};

use crate::ai::{
    BackendHandle, Completion, DownloadMonitor, HandleState, SummarizerBackend, SummarizerSession,
};
use crate::core::models::{AttributeChange, Configuration, FormState, RestoreReason};
use crate::core::store::ConfigStore;
use crate::errors::WidgetError;
use crate::form::{ChangeListener, Form, FormInternals};

pub use binding::WatchBinding;
pub use surface::{ActionButton, InputSurface, ShadowRoot, SurfaceKind};

/// Result of one attribute change.
#[derive(Debug)]
pub enum AttributeOutcome {
    Applied,
    Unchanged,
    /// Not an observed attribute.
    Ignored,
    Rejected(WidgetError),
}

impl AttributeOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, AttributeOutcome::Applied)
    }
}

enum WidgetEvent {
    WatchedChanged(String),
    BackendCreated {
        generation: u64,
        result: Result<Arc<dyn SummarizerSession>, WidgetError>,
    },
    SummaryFinished {
        request: u64,
        correlation_id: String,
        result: Result<String, WidgetError>,
    },
}

pub struct SummarizeWidget {
    backend: Arc<dyn SummarizerBackend>,
    store: ConfigStore,
    handle: BackendHandle,
    binding: Option<WatchBinding>,
    root: ShadowRoot,
    internals: FormInternals,
    attributes: BTreeMap<String, String>,
    events_tx: UnboundedSender<WidgetEvent>,
    events_rx: UnboundedReceiver<WidgetEvent>,
    pending: FuturesUnordered<BoxFuture<'static, WidgetEvent>>,
    latest_request: u64,
    last_error: Option<WidgetError>,
    constructed: bool,
    connected: bool,
}

impl std::fmt::Debug for SummarizeWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizeWidget")
            .field("config", self.store.config())
            .field("handle", &self.handle)
            .field("binding", &self.binding)
            .field("root", &self.root)
            .field("form_value", &self.internals.value())
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl SummarizeWidget {
    #[must_use]
    pub fn new(backend: Arc<dyn SummarizerBackend>, form: Option<Arc<Form>>) -> Self {
        Self::with_attributes(backend, form, std::iter::empty::<(&str, &str)>())
    }

    /// Creates a widget whose host element already carries `attributes`.
    ///
    /// The attributes are applied before the first session is requested, so
    /// construction issues at most one creation call.
    pub fn with_attributes<K, V>(
        backend: Arc<dyn SummarizerBackend>,
        form: Option<Arc<Form>>,
        attributes: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let available = backend.is_available();
        let (events_tx, events_rx) = unbounded_channel();
        let mut widget = Self {
            backend,
            store: ConfigStore::new(),
            handle: BackendHandle::new(available),
            binding: None,
            root: ShadowRoot::new(false),
            internals: FormInternals::new(form),
            attributes: BTreeMap::new(),
            events_tx,
            events_rx,
            pending: FuturesUnordered::new(),
            latest_request: 0,
            last_error: None,
            constructed: false,
            connected: false,
        };

        if !available {
            warn!("{}", WidgetError::BackendUnavailable);
            widget.root.button_mut().disable();
        }

        for (name, value) in attributes {
            widget.set_attribute(name, value);
        }

        widget.constructed = true;
        widget.store.take_backend_stale();
        widget.rebuild_backend();
        widget
    }

    pub fn connected(&mut self) {
        self.connected = true;
        info!("ai-summarize-component connected!");
    }

    /// Detaches from the host: drops the watch binding, disposes the session
    /// and discards any in-flight work. The widget stays inert afterwards.
    pub fn disconnect(&mut self) {
        self.teardown();
        self.connected = false;
        info!("ai-summarize-component disconnected");
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    // ---------------------------------------------------------------------
    // Attributes
    // ---------------------------------------------------------------------

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) -> AttributeOutcome {
        let name = name.into();
        let value = value.into();
        let old = self.attributes.insert(name.clone(), value.clone());
        self.attribute_changed(&name, old.as_deref(), Some(&value))
    }

    pub fn remove_attribute(&mut self, name: &str) -> AttributeOutcome {
        match self.attributes.remove(name) {
            Some(old) => self.attribute_changed(name, Some(&old), None),
            None => AttributeOutcome::Unchanged,
        }
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Reacts to a change of a host attribute.
    pub fn attribute_changed(
        &mut self,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) -> AttributeOutcome {
        let Some(change) = AttributeChange::from_name(name, new_value) else {
            trace!(attribute = name, "Ignoring unobserved attribute");
            return AttributeOutcome::Ignored;
        };

        let outcome = match change {
            // Removing `watch` keeps the current binding.
            AttributeChange::Watch(None) => AttributeOutcome::Unchanged,
            AttributeChange::Watch(Some(id)) => self.rewatch(&id),
            AttributeChange::Type(value) => {
                let result = self.store.set_type(value.as_deref());
                self.reconfigured(result)
            }
            AttributeChange::Format(value) => {
                let result = self.store.set_format(value.as_deref());
                self.reconfigured(result)
            }
            AttributeChange::Length(value) => {
                let result = self.store.set_length(value.as_deref());
                self.reconfigured(result)
            }
            AttributeChange::Context(value) => {
                self.store.set_context(value.as_deref());
                self.reconfigured(Ok(()))
            }
            AttributeChange::Multiline(value) => {
                if self.store.set_multiline(value.as_deref()) {
                    self.rerender_if_stale();
                    info!("Attribute 'multiline' changed to {}", self.store.config().multiline);
                    AttributeOutcome::Applied
                } else {
                    AttributeOutcome::Unchanged
                }
            }
        };

        trace!(attribute = name, ?old_value, ?new_value, "Attribute {name} has changed.");
        outcome
    }

    fn reconfigured(&mut self, result: Result<(), WidgetError>) -> AttributeOutcome {
        match result {
            Ok(()) => {
                if self.store.take_backend_stale() {
                    self.rebuild_backend();
                }
                AttributeOutcome::Applied
            }
            Err(e) => AttributeOutcome::Rejected(e),
        }
    }

    fn rewatch(&mut self, id: &str) -> AttributeOutcome {
        let Some(form) = self.internals.form().cloned() else {
            let e = WidgetError::NoOwningForm(id.to_string());
            warn!("{e}");
            return AttributeOutcome::Rejected(e);
        };

        let Some(control) = form.query_by_id(id) else {
            let e = WidgetError::WatchTargetNotFound(id.to_string());
            warn!("{e}");
            return AttributeOutcome::Rejected(e);
        };

        if let Some(previous) = self.binding.take() {
            previous.detach();
        }
        self.binding = Some(WatchBinding::attach(&control, self.watch_listener()));
        self.store.set_watch_target(Some(id));
        AttributeOutcome::Applied
    }

    fn watch_listener(&self) -> ChangeListener {
        let tx = self.events_tx.clone();
        Arc::new(move |value: &str| {
            // The receiver lives as long as the widget.
            let _ = tx.send(WidgetEvent::WatchedChanged(value.to_string()));
        })
    }

    fn rerender_if_stale(&mut self) {
        if self.store.take_surface_stale() {
            self.root.render_input_area(self.store.config().multiline);
        }
    }

    fn rebuild_backend(&mut self) {
        if !self.constructed {
            return;
        }
        self.handle.mark_stale();
        let Some(generation) = self.handle.begin_rebuild() else {
            return;
        };

        let backend = Arc::clone(&self.backend);
        let options = self.store.config().summarizer_options();
        let monitor = DownloadMonitor::new(generation);
        self.pending.push(
            async move {
                let result = backend.create(options, monitor).await;
                WidgetEvent::BackendCreated { generation, result }
            }
            .boxed(),
        );
    }

    // ---------------------------------------------------------------------
    // Summarization
    // ---------------------------------------------------------------------

    /// Queues a summary of `input`; the newest request wins.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` if the capability is absent and
    /// `NotReady` if no session is ready. Nothing is sent in either case.
    pub fn summarize(&mut self, input: &str) -> Result<u64, WidgetError> {
        if !self.handle.is_available() {
            let e = WidgetError::BackendUnavailable;
            warn!("{e}");
            return Err(e);
        }
        let Some(session) = self.handle.session() else {
            let e = WidgetError::NotReady;
            warn!("{e}");
            return Err(e);
        };

        self.latest_request += 1;
        let request = self.latest_request;
        let correlation_id = uuid::Uuid::new_v4().to_string();
        debug!(request, %correlation_id, "Requesting summary");
        self.root.button_mut().set_processing(true);

        let input = input.to_string();
        self.pending.push(
            async move {
                let result = session.summarize(&input).await;
                WidgetEvent::SummaryFinished {
                    request,
                    correlation_id,
                    result,
                }
            }
            .boxed(),
        );
        Ok(request)
    }

    /// The action button: summarizes the watched control if bound, else the widget's own input.
    ///
    /// # Errors
    ///
    /// See [`SummarizeWidget::summarize`].
    pub fn click(&mut self) -> Result<u64, WidgetError> {
        if self.root.button().is_disabled() {
            let e = WidgetError::BackendUnavailable;
            warn!("{e}");
            return Err(e);
        }
        let input = match self.binding.as_ref().and_then(WatchBinding::control) {
            Some(control) => control.value(),
            None => self.root.surface().value().to_string(),
        };
        self.summarize(&input)
    }

    /// Whether queued host events or backend work are outstanding.
    #[must_use]
    pub fn has_pending_work(&self) -> bool {
        !self.pending.is_empty() || !self.events_rx.is_empty()
    }

    /// Applies one queued event or completed backend future.
    ///
    /// Waits for whichever arrives first while work is in flight. Returns
    /// `false` without waiting when nothing is queued or in flight.
    pub async fn pump_next(&mut self) -> bool {
        if let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            return true;
        }
        if self.pending.is_empty() {
            return false;
        }
        let event = tokio::select! {
            Some(event) = self.pending.next() => event,
            Some(event) = self.events_rx.recv() => event,
            else => return false,
        };
        self.handle_event(event);
        true
    }

    /// Runs queued events and backend work until none is left.
    ///
    /// Does not return while a backend call is still outstanding. Hosts that
    /// must stay responsive to a hung call drive [`Self::pump_next`] instead.
    pub async fn settle(&mut self) {
        while self.pump_next().await {}
    }

    fn handle_event(&mut self, event: WidgetEvent) {
        match event {
            WidgetEvent::WatchedChanged(value) => {
                // Refusals are already logged.
                let _ = self.summarize(&value);
                info!("Watched element changed: {value}");
            }
            WidgetEvent::BackendCreated { generation, result } => {
                let failure = result.as_ref().err().map(ToString::to_string);
                if self.handle.complete(generation, result) == Completion::Failed {
                    self.last_error = failure.map(WidgetError::Backend);
                }
            }
            WidgetEvent::SummaryFinished {
                request,
                correlation_id,
                result,
            } => self.finish_summary(request, &correlation_id, result),
        }
    }

    fn finish_summary(&mut self, request: u64, correlation_id: &str, result: Result<String, WidgetError>) {
        if request != self.latest_request {
            debug!(request, latest = self.latest_request, correlation_id, "Dropping superseded summary");
            return;
        }
        self.root.button_mut().set_processing(false);

        match result {
            Ok(summary) => {
                self.root.surface_mut().set_value(&summary);
                self.commit_value(&summary);
                self.last_error = None;
            }
            Err(e) => {
                error!(request, correlation_id, "Summarization failed: {e}");
                self.last_error = Some(e);
            }
        }
    }

    // ---------------------------------------------------------------------
    // Input surface and form lifecycle
    // ---------------------------------------------------------------------

    /// A user edit of the widget's own input.
    pub fn user_input(&mut self, text: &str) {
        let value = self.root.surface_mut().user_input(text).to_owned();
        self.commit_value(&value);
    }

    pub fn form_reset(&mut self) {
        info!("Form reset called on ai-summarize-component");
        self.root.surface_mut().set_value("");
        self.commit_value("");
    }

    /// Restores a state payload handed back by the host.
    ///
    /// Autocomplete values are typed text and restore verbatim on the current
    /// surface. Session restores decode a [`FormState`] payload (see
    /// [`FormState::from_payload`]).
    pub fn form_state_restore(&mut self, payload: &str, reason: RestoreReason) {
        let state = match reason {
            RestoreReason::Autocomplete => FormState {
                value: payload.to_owned(),
                multiline: false,
            },
            RestoreReason::Restore => FormState::from_payload(payload),
        };
        self.restore_state(state, reason);
    }

    pub fn restore_state(&mut self, state: FormState, reason: RestoreReason) {
        debug!(?reason, "Restoring form state");
        let implies_multiline = state.multiline || self.attribute("multiline") == Some("true");
        if implies_multiline && !self.store.config().multiline {
            self.store.force_multiline(true);
            self.rerender_if_stale();
        }
        self.root.surface_mut().set_value(&state.value);
        self.commit_value(&state.value);
    }

    fn commit_value(&mut self, value: &str) {
        let multiline = self.store.config().multiline;
        self.internals.set_form_value(value, multiline);
    }

    fn teardown(&mut self) {
        if let Some(binding) = self.binding.take() {
            binding.detach();
        }
        self.handle.dispose();
        self.pending.clear();
        self.latest_request += 1;
        self.root.button_mut().set_processing(false);
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &Configuration {
        self.store.config()
    }

    #[must_use]
    pub fn handle_state(&self) -> HandleState {
        self.handle.state()
    }

    #[must_use]
    pub fn form_value(&self) -> &str {
        self.internals.value()
    }

    #[must_use]
    pub fn form_state(&self) -> &FormState {
        self.internals.state()
    }

    #[must_use]
    pub fn form_state_payload(&self) -> Option<String> {
        self.internals.state_payload()
    }

    #[must_use]
    pub fn root(&self) -> &ShadowRoot {
        &self.root
    }

    #[must_use]
    pub fn surface(&self) -> &InputSurface {
        self.root.surface()
    }

    #[must_use]
    pub fn watched_id(&self) -> Option<&str> {
        self.binding.as_ref().map(WatchBinding::target_id)
    }

    /// Last backend failure, cleared by the next successful summary.
    #[must_use]
    pub fn last_error(&self) -> Option<&WidgetError> {
        self.last_error.as_ref()
    }
}

impl Drop for SummarizeWidget {
    fn drop(&mut self) {
        self.teardown();
    }
}
