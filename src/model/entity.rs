//! Sensitive entity type.

use serde::{Deserialize, Serialize};

/// A sensitive text span from the external entity analysis.
///
/// Purely textual: entities carry no position. Category and confidence
/// are passed through for logging; matching uses only the text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// The sensitive text span
    pub text: String,

    /// Entity category (e.g. "NAME", "DATE"), when the analysis provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Detection confidence in [0, 1], when the analysis provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl Entity {
    /// Create an entity from its text span.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: None,
            score: None,
        }
    }

    /// Set the entity category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}
