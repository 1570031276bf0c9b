use serde::{Deserialize, Serialize};
use std::fmt;

/// A fetched product page: the full document text and the URL it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    pub html: String,
    pub url: String,
}

impl RawPage {
    pub fn new(html: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            url: url.into(),
        }
    }
}

/// One attribute row, either from an embedded data array or from the markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelValuePair {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_alt: Option<String>,
    pub value: String,
}

impl LabelValuePair {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            label_alt: None,
            value: value.into(),
        }
    }

    pub fn with_alt(mut self, label_alt: impl Into<String>) -> Self {
        self.label_alt = Some(label_alt.into());
        self
    }
}

impl fmt::Display for LabelValuePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label_alt {
            Some(alt) => write!(f, "{} ({}): {}", self.label, alt, self.value),
            None => write!(f, "{}: {}", self.label, self.value),
        }
    }
}
