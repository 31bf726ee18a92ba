use std::sync::{Arc, Weak};
use tracing::debug;

use crate::form::{ChangeListener, FormControl, ListenerId};

/// Association with a control elsewhere in the owning form.
///
/// Holds only a weak reference: the host owns the control.
#[derive(Debug)]
pub struct WatchBinding {
    target_id: String,
    control: Weak<FormControl>,
    listener: ListenerId,
}

impl WatchBinding {
    pub fn attach(control: &Arc<FormControl>, listener: ChangeListener) -> Self {
        let listener = control.add_change_listener(listener);
        debug!(target_id = control.id(), "Attached watch listener");
        Self {
            target_id: control.id().to_string(),
            control: Arc::downgrade(control),
            listener,
        }
    }

    #[must_use]
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// The watched control, if the host still owns it.
    #[must_use]
    pub fn control(&self) -> Option<Arc<FormControl>> {
        self.control.upgrade()
    }

    pub fn detach(self) {
        if let Some(control) = self.control.upgrade() {
            control.remove_change_listener(self.listener);
            debug!(target_id = %self.target_id, "Detached watch listener");
        }
    }
}
