use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::WidgetError;

fn invalid(attribute: &'static str, value: Option<&str>, valid: &[&str]) -> WidgetError {
    WidgetError::InvalidValue {
        attribute,
        value: value.unwrap_or("null").to_string(),
        valid: valid.join(", "),
    }
}

/// Kind of summary the backend should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryType {
    #[default]
    KeyPoints,
    Tldr,
    Teaser,
    Headline,
}

impl SummaryType {
    pub const VALID: &'static [&'static str] = &["key-points", "tldr", "teaser", "headline"];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SummaryType::KeyPoints => "key-points",
            SummaryType::Tldr => "tldr",
            SummaryType::Teaser => "teaser",
            SummaryType::Headline => "headline",
        }
    }

    /// # Errors
    ///
    /// Returns `InvalidValue` when `value` is absent or not one of [`Self::VALID`].
    pub fn parse_attribute(value: Option<&str>) -> Result<Self, WidgetError> {
        match value {
            Some("key-points") => Ok(SummaryType::KeyPoints),
            Some("tldr") => Ok(SummaryType::Tldr),
            Some("teaser") => Ok(SummaryType::Teaser),
            Some("headline") => Ok(SummaryType::Headline),
            other => Err(invalid("type", other, Self::VALID)),
        }
    }
}

/// Markup of the produced summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryFormat {
    #[default]
    Markdown,
    PlainText,
}

impl SummaryFormat {
    pub const VALID: &'static [&'static str] = &["markdown", "plain-text"];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SummaryFormat::Markdown => "markdown",
            SummaryFormat::PlainText => "plain-text",
        }
    }

    /// # Errors
    ///
    /// Returns `InvalidValue` when `value` is absent or not one of [`Self::VALID`].
    pub fn parse_attribute(value: Option<&str>) -> Result<Self, WidgetError> {
        match value {
            Some("markdown") => Ok(SummaryFormat::Markdown),
            Some("plain-text") => Ok(SummaryFormat::PlainText),
            other => Err(invalid("format", other, Self::VALID)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SummaryLength {
    pub const VALID: &'static [&'static str] = &["short", "medium", "long"];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SummaryLength::Short => "short",
            SummaryLength::Medium => "medium",
            SummaryLength::Long => "long",
        }
    }

    /// # Errors
    ///
    /// Returns `InvalidValue` when `value` is absent or not one of [`Self::VALID`].
    pub fn parse_attribute(value: Option<&str>) -> Result<Self, WidgetError> {
        match value {
            Some("short") => Ok(SummaryLength::Short),
            Some("medium") => Ok(SummaryLength::Medium),
            Some("long") => Ok(SummaryLength::Long),
            other => Err(invalid("length", other, Self::VALID)),
        }
    }
}

macro_rules! display_and_from_str {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = WidgetError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse_attribute(Some(s))
            }
        }
    )*};
}

display_and_from_str!(SummaryType, SummaryFormat, SummaryLength);

/// Current validated widget configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(rename = "type")]
    pub summary_type: SummaryType,
    pub format: SummaryFormat,
    pub length: SummaryLength,
    pub context: Option<String>,
    pub multiline: bool,
    pub watch_target_id: Option<String>,
}

impl Configuration {
    /// The subset of the configuration a backend session is created from.
    #[must_use]
    pub fn summarizer_options(&self) -> SummarizerOptions {
        SummarizerOptions {
            summary_type: self.summary_type,
            format: self.format,
            length: self.length,
            shared_context: self.context.clone(),
        }
    }
}

/// Creation options handed to a summarizer backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizerOptions {
    #[serde(rename = "type")]
    pub summary_type: SummaryType,
    pub format: SummaryFormat,
    pub length: SummaryLength,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_context: Option<String>,
}

/// Observed attribute names, in dispatch order.
pub const OBSERVED_ATTRIBUTES: &[&str] =
    &["watch", "type", "format", "length", "multiline", "context"];

/// A change to one of the observed attributes, carrying its raw new value.
///
/// `None` means the attribute was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeChange {
    Watch(Option<String>),
    Type(Option<String>),
    Format(Option<String>),
    Length(Option<String>),
    Multiline(Option<String>),
    Context(Option<String>),
}

impl AttributeChange {
    /// Maps an attribute name to its change variant; unobserved names yield `None`.
    #[must_use]
    pub fn from_name(name: &str, value: Option<&str>) -> Option<Self> {
        let value = value.map(str::to_string);
        match name {
            "watch" => Some(AttributeChange::Watch(value)),
            "type" => Some(AttributeChange::Type(value)),
            "format" => Some(AttributeChange::Format(value)),
            "length" => Some(AttributeChange::Length(value)),
            "multiline" => Some(AttributeChange::Multiline(value)),
            "context" => Some(AttributeChange::Context(value)),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            AttributeChange::Watch(_) => "watch",
            AttributeChange::Type(_) => "type",
            AttributeChange::Format(_) => "format",
            AttributeChange::Length(_) => "length",
            AttributeChange::Multiline(_) => "multiline",
            AttributeChange::Context(_) => "context",
        }
    }
}

/// State persisted next to the form value so the form can restore it later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub value: String,
    #[serde(default)]
    pub multiline: bool,
}

impl FormState {
    /// Parses a persisted payload.
    ///
    /// A payload that is not a serialized `FormState` is taken as a bare
    /// single-line value, which is what autofill hands back.
    #[must_use]
    pub fn from_payload(payload: &str) -> Self {
        serde_json::from_str(payload).unwrap_or_else(|_| FormState {
            value: payload.to_string(),
            multiline: false,
        })
    }

    /// # Errors
    ///
    /// Returns `StateError` if serialization fails.
    pub fn to_payload(&self) -> Result<String, WidgetError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Why the form is restoring state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreReason {
    Autocomplete,
    Restore,
}
