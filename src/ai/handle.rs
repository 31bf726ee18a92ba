//! Lifecycle of the single summarizer session a widget owns.
//!
//! ```text
//! Uninitialized -> Initializing -> Ready -> (Stale -> Initializing) -> Disposed
//! ```
//!
//! Every rebuild gets a new generation. A creation result is only accepted
//! if its generation is still current, so a slow, superseded creation can
//! never replace a newer session.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::backend::SummarizerSession;
use crate::errors::WidgetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Uninitialized,
    Initializing,
    Ready,
    Stale,
    Disposed,
}

/// What happened to a creation result handed to [`BackendHandle::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Ready,
    Failed,
    Superseded,
}

pub struct BackendHandle {
    available: bool,
    state: HandleState,
    session: Option<Arc<dyn SummarizerSession>>,
    generation: u64,
}

impl std::fmt::Debug for BackendHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendHandle")
            .field("available", &self.available)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl BackendHandle {
    #[must_use]
    pub fn new(available: bool) -> Self {
        Self {
            available,
            state: HandleState::Uninitialized,
            session: None,
            generation: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> HandleState {
        self.state
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Marks a ready session as outdated; it stays usable until the rebuild starts.
    pub fn mark_stale(&mut self) {
        if self.state == HandleState::Ready {
            self.state = HandleState::Stale;
        }
    }

    /// Disposes the current session and opens a new generation.
    ///
    /// Returns `None` when the capability is absent or the handle was disposed.
    pub fn begin_rebuild(&mut self) -> Option<u64> {
        if !self.available || self.state == HandleState::Disposed {
            return None;
        }
        self.destroy_session();
        self.generation += 1;
        self.state = HandleState::Initializing;
        debug!(generation = self.generation, "Initializing summarizer");
        Some(self.generation)
    }

    /// Applies the outcome of the creation request for `generation`.
    pub fn complete(
        &mut self,
        generation: u64,
        result: Result<Arc<dyn SummarizerSession>, WidgetError>,
    ) -> Completion {
        if generation != self.generation || self.state != HandleState::Initializing {
            if let Ok(session) = result {
                session.destroy();
            }
            debug!(generation, current = self.generation, "Discarding superseded summarizer");
            return Completion::Superseded;
        }

        match result {
            Ok(session) => {
                self.session = Some(session);
                self.state = HandleState::Ready;
                info!(generation, "Summarizer ready");
                Completion::Ready
            }
            Err(e) => {
                self.state = HandleState::Uninitialized;
                warn!(generation, "Failed to create summarizer: {e}");
                Completion::Failed
            }
        }
    }

    /// The session, only while the handle is `Ready`.
    #[must_use]
    pub fn session(&self) -> Option<Arc<dyn SummarizerSession>> {
        match self.state {
            HandleState::Ready => self.session.clone(),
            _ => None,
        }
    }

    pub fn dispose(&mut self) {
        self.destroy_session();
        self.generation += 1;
        self.state = HandleState::Disposed;
    }

    fn destroy_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.destroy();
        }
    }
}
