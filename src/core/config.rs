use std::env;

/// Process-level settings for hosts that mount widgets outside a document.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub summary_type: Option<String>,
    pub summary_format: Option<String>,
    pub summary_length: Option<String>,
    pub shared_context: Option<String>,
    pub multiline: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_org_id: Option<String>,
    pub openai_model: Option<String>,
}

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            summary_type: get("SUMMARIZE_TYPE"),
            summary_format: get("SUMMARIZE_FORMAT"),
            summary_length: get("SUMMARIZE_LENGTH"),
            shared_context: get("SUMMARIZE_CONTEXT"),
            multiline: get("SUMMARIZE_MULTILINE"),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_org_id: get("OPENAI_ORG_ID"),
            openai_model: get("OPENAI_MODEL"),
        }
    }

    /// Declarative attributes implied by this config, in the order they are applied.
    #[must_use]
    pub fn initial_attributes(&self) -> Vec<(&'static str, String)> {
        [
            ("type", &self.summary_type),
            ("format", &self.summary_format),
            ("length", &self.summary_length),
            ("multiline", &self.multiline),
            ("context", &self.shared_context),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.clone().map(|v| (name, v)))
        .collect()
    }
}
