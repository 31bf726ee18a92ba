//! Validated per-widget configuration with staleness tracking.
//!
//! Setters only record values and mark which derived resources need to be
//! rebuilt; the widget consumes those flags and performs the side effects.

use tracing::warn;

use super::models::{Configuration, SummaryFormat, SummaryLength, SummaryType};
use crate::errors::WidgetError;

#[derive(Debug, Default)]
pub struct ConfigStore {
    config: Configuration,
    backend_stale: bool,
    surface_stale: bool,
}

impl ConfigStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// # Errors
    ///
    /// Returns `InvalidValue` and leaves the field untouched if `value` is not a summary type.
    pub fn set_type(&mut self, value: Option<&str>) -> Result<(), WidgetError> {
        let parsed = SummaryType::parse_attribute(value).inspect_err(|e| warn!("{e}"))?;
        self.config.summary_type = parsed;
        self.backend_stale = true;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `InvalidValue` and leaves the field untouched if `value` is not a format.
    pub fn set_format(&mut self, value: Option<&str>) -> Result<(), WidgetError> {
        let parsed = SummaryFormat::parse_attribute(value).inspect_err(|e| warn!("{e}"))?;
        self.config.format = parsed;
        self.backend_stale = true;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `InvalidValue` and leaves the field untouched if `value` is not a length.
    pub fn set_length(&mut self, value: Option<&str>) -> Result<(), WidgetError> {
        let parsed = SummaryLength::parse_attribute(value).inspect_err(|e| warn!("{e}"))?;
        self.config.length = parsed;
        self.backend_stale = true;
        Ok(())
    }

    pub fn set_context(&mut self, value: Option<&str>) {
        self.config.context = value.map(str::to_string);
        self.backend_stale = true;
    }

    /// Coerces `value` to a flag (only the literal `"true"` is true).
    ///
    /// Returns whether the stored flag changed.
    pub fn set_multiline(&mut self, value: Option<&str>) -> bool {
        self.force_multiline(value == Some("true"))
    }

    /// Sets the flag directly; returns whether it changed.
    pub fn force_multiline(&mut self, multiline: bool) -> bool {
        if self.config.multiline == multiline {
            return false;
        }
        self.config.multiline = multiline;
        self.surface_stale = true;
        true
    }

    pub fn set_watch_target(&mut self, id: Option<&str>) {
        self.config.watch_target_id = id.map(str::to_string);
    }

    /// Returns and clears the backend staleness flag.
    pub fn take_backend_stale(&mut self) -> bool {
        std::mem::take(&mut self.backend_stale)
    }

    /// Returns and clears the surface staleness flag.
    pub fn take_surface_stale(&mut self) -> bool {
        std::mem::take(&mut self.surface_stale)
    }
}
