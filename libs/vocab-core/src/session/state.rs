//! Persisted session state.

use crate::types::SortMode;
use serde::{Deserialize, Serialize};

/// Everything needed to resume a quiz session.
///
/// `pool` holds dataset indices selected by the section filter and `order`
/// is the presentation sequence built from it. `cursor` is `None` before the
/// first card is shown, otherwise an index into `order`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub pool: Vec<usize>,
    pub order: Vec<usize>,
    pub cursor: Option<usize>,
    pub attempts: u32,
    pub correct: u32,
    pub filter_section: String,
    pub sort_mode: SortMode,
}

impl SessionState {
    /// Dataset index of the card under the cursor.
    pub fn current_index(&self) -> Option<usize> {
        self.cursor.and_then(|c| self.order.get(c).copied())
    }

    /// Cards left in the current pass, not counting the current one.
    pub fn remaining(&self) -> usize {
        let shown = self.cursor.map_or(0, |c| c + 1);
        self.order.len().saturating_sub(shown)
    }

    pub(crate) fn reset_score(&mut self) {
        self.attempts = 0;
        self.correct = 0;
    }
}

/// Score counters for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Scoreboard {
    pub correct: u32,
    pub attempts: u32,
    pub remaining: usize,
    pub total: usize,
}
