use std::sync::Arc;
use tracing::warn;

use super::Form;
use crate::core::models::FormState;

/// The widget's side of the form-association protocol.
#[derive(Debug, Default)]
pub struct FormInternals {
    form: Option<Arc<Form>>,
    value: String,
    state: FormState,
}

impl FormInternals {
    #[must_use]
    pub fn new(form: Option<Arc<Form>>) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn form(&self) -> Option<&Arc<Form>> {
        self.form.as_ref()
    }

    /// Value contributed to the form's submission.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Serialized restore payload for the current state.
    #[must_use]
    pub fn state_payload(&self) -> Option<String> {
        self.state
            .to_payload()
            .inspect_err(|e| warn!("{e}"))
            .ok()
    }

    pub fn set_form_value(&mut self, value: &str, multiline: bool) {
        self.value = value.to_string();
        self.state = FormState {
            value: value.to_string(),
            multiline,
        };
    }
}
