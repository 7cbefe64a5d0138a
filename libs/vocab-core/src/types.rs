//! Core types for the vocabulary trainer.

use serde::{Deserialize, Serialize};

/// One vocabulary entry from the dataset.
///
/// `en` is the only field used for matching. Entries with an empty `en`
/// are kept but can never be answered correctly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabEntry {
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub ja: String,
    #[serde(default)]
    pub en_example: String,
    #[serde(default)]
    pub ja_example: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

impl VocabEntry {
    /// Create an entry with just the word and its gloss.
    pub fn new(en: impl Into<String>, ja: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ja: ja.into(),
            ..Self::default()
        }
    }

    pub fn with_examples(
        mut self,
        en_example: impl Into<String>,
        ja_example: impl Into<String>,
    ) -> Self {
        self.en_example = en_example.into();
        self.ja_example = ja_example.into();
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Section tag with surrounding whitespace removed, if any.
    pub fn section_tag(&self) -> Option<&str> {
        self.section
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Presentation order of the card pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    Sequential,
    Random,
}

impl Default for SortMode {
    fn default() -> Self {
        Self::Sequential
    }
}

impl SortMode {
    /// Get the mode name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Random => "random",
        }
    }

    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "sequential" => Some(Self::Sequential),
            "random" => Some(Self::Random),
            _ => None,
        }
    }
}
