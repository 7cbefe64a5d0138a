//! Core vocabulary trainer library.
//!
//! Provides:
//! - Dataset parser for the vocabulary JSON file
//! - Inflection-aware phrase matcher for cloze and highlight rendering
//! - Answer normalization and comparison
//! - Session state machine with a versioned persistence codec
//! - Key-value store abstraction for progress and preferences

pub mod error;
pub mod matching;
pub mod parser;
pub mod session;
pub mod store;
pub mod types;
pub mod view;

pub use error::{DatasetError, RestoreError, Result, StoreError};
pub use matching::{
    build_matcher, compare_answers, escape_html, inflections, make_cloze, make_highlighted,
    normalize_answer, MatchResult, Matcher, Segment, BLANK,
};
pub use parser::{parse_dataset, sections};
pub use session::{
    AdvanceTicket, Command, Phase, Scoreboard, SessionMachine, SessionState, Transition,
};
pub use store::{KeyValueStore, MemoryStore, ProgressStore, POPUP_KEY, PROGRESS_KEY};
pub use types::{SortMode, VocabEntry};
pub use view::{CardView, EMPTY_POOL_MESSAGE, HINT_PREFIX};
