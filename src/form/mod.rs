//! Host form model: id-addressable controls with change listeners.
//!
//! Controls are owned by the host's [`Form`]; widgets only keep weak
//! references plus the [`ListenerId`] they registered.

pub mod internals;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use internals::FormInternals;

pub type ChangeListener = Arc<dyn Fn(&str) + Send + Sync>;

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Text,
    TextArea,
}

pub struct FormControl {
    id: String,
    kind: ControlKind,
    value: Mutex<String>,
    listeners: Mutex<Vec<(ListenerId, ChangeListener)>>,
}

impl std::fmt::Debug for FormControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormControl")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("value", &*lock(&self.value))
            .field("listeners", &lock(&self.listeners).len())
            .finish()
    }
}

impl FormControl {
    #[must_use]
    pub fn new(id: impl Into<String>, kind: ControlKind) -> Self {
        Self {
            id: id.into(),
            kind,
            value: Mutex::new(String::new()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    #[must_use]
    pub fn value(&self) -> String {
        lock(&self.value).clone()
    }

    /// Programmatic assignment; does not fire `change`.
    pub fn set_value(&self, value: impl Into<String>) {
        *lock(&self.value) = value.into();
    }

    /// A user-driven edit: stores the value, then notifies change listeners.
    pub fn user_change(&self, value: impl Into<String>) {
        let value = value.into();
        self.set_value(value.clone());
        let listeners: Vec<ChangeListener> =
            lock(&self.listeners).iter().map(|(_, l)| Arc::clone(l)).collect();
        for listener in listeners {
            listener(&value);
        }
    }

    pub fn add_change_listener(&self, listener: ChangeListener) -> ListenerId {
        let id = ListenerId::next();
        lock(&self.listeners).push((id, listener));
        id
    }

    /// Returns whether a listener was removed.
    pub fn remove_change_listener(&self, id: ListenerId) -> bool {
        let mut listeners = lock(&self.listeners);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }
}

/// A form element owning its controls.
#[derive(Debug, Default)]
pub struct Form {
    controls: Mutex<Vec<Arc<FormControl>>>,
}

impl Form {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_control(&self, id: impl Into<String>, kind: ControlKind) -> Arc<FormControl> {
        let control = Arc::new(FormControl::new(id, kind));
        lock(&self.controls).push(Arc::clone(&control));
        control
    }

    pub fn remove_control(&self, id: &str) -> Option<Arc<FormControl>> {
        let mut controls = lock(&self.controls);
        let index = controls.iter().position(|c| c.id == id)?;
        Some(controls.remove(index))
    }

    /// First control in document order with the given id.
    #[must_use]
    pub fn query_by_id(&self, id: &str) -> Option<Arc<FormControl>> {
        lock(&self.controls).iter().find(|c| c.id == id).cloned()
    }
}
