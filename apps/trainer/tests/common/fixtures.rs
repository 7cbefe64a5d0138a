//! Vocabulary fixtures.

use serde_json::json;
use vocab_core::{parse_dataset, VocabEntry};

/// Dataset file contents with three usable entries and two junk elements.
pub fn dataset_json() -> String {
    json!([
        {
            "en": "run",
            "ja": "走る",
            "en_example": "He runs every morning.",
            "ja_example": "彼は毎朝走る。",
            "section": "Verbs"
        },
        {
            "en": "apple",
            "ja": "りんご",
            "en_example": "She ate two apples.",
            "ja_example": "彼女はりんごを二つ食べた。",
            "section": "Nouns"
        },
        null,
        {
            "en": "look after",
            "ja": "世話をする",
            "en_example": "She looks after her brother.",
            "ja_example": "彼女は弟の世話をする。",
            "section": "Verbs"
        },
        42
    ])
    .to_string()
}

pub fn entries() -> Vec<VocabEntry> {
    parse_dataset(&dataset_json()).expect("fixture dataset parses")
}
