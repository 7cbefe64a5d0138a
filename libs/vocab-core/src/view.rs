//! Per-card view model handed to the presentation layer.

use crate::matching::{build_matcher, escape_html};
use crate::types::VocabEntry;
use serde::Serialize;

/// Shown instead of a card when the active filter selects nothing.
pub const EMPTY_POOL_MESSAGE: &str = "選択したセクションに該当する単語がありません。";

/// Prefix of the hint line.
pub const HINT_PREFIX: &str = "英語: ";

/// What the front end shows for one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    /// Japanese gloss.
    pub gloss: String,
    /// Japanese translation of the example.
    pub example_ja: String,
    /// The answer, prefixed for display. Empty when the entry has no word.
    pub hint: String,
    /// English example with the answer blanked out.
    pub cloze: String,
    /// English example as markup with the answer wrapped in a span.
    pub reveal: String,
    pub section: Option<String>,
}

impl CardView {
    pub fn from_entry(entry: &VocabEntry) -> Self {
        let sentence = entry.en_example.as_str();
        let (cloze, reveal) = match build_matcher(&entry.en) {
            Some(matcher) if !sentence.is_empty() => {
                (matcher.mask(sentence), matcher.highlight(sentence))
            }
            _ => (sentence.to_string(), escape_html(sentence)),
        };

        Self {
            gloss: entry.ja.clone(),
            example_ja: entry.ja_example.clone(),
            hint: if entry.en.is_empty() {
                String::new()
            } else {
                format!("{HINT_PREFIX}{}", entry.en)
            },
            cloze,
            reveal,
            section: entry.section_tag().map(str::to_string),
        }
    }

    /// Section tag for display, `"none"` when untagged.
    pub fn section_label(&self) -> &str {
        self.section.as_deref().unwrap_or("none")
    }
}
