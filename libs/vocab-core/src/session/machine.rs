//! Quiz session state machine.
//!
//! The machine owns the dataset and a [`SessionState`]. Every transition is a
//! synchronous method call (or a [`Command`] passed to
//! [`SessionMachine::dispatch`]) and reports what happened as a
//! [`Transition`]. Persistence and timers belong to the caller.

use super::state::{Scoreboard, SessionState};
use crate::matching::compare_answers;
use crate::parser::sections;
use crate::types::{SortMode, VocabEntry};
use crate::view::CardView;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Identifies one scheduled advance after a correct answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdvanceTicket(u64);

/// Where the session is in its card cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No card matches the active filter.
    Empty,
    /// A card is current and accepts answers, including retries after a
    /// wrong answer.
    Presenting,
    /// The current card was answered correctly and waits for its advance.
    Judged,
}

/// Input to the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit(String),
    Skip,
    Reset,
    SetFilter(String),
    SetSortMode(SortMode),
    /// Fires a previously scheduled advance.
    Tick(AdvanceTicket),
}

/// Outcome of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed.
    Ignored,
    /// A card is now current.
    Presented,
    /// The active filter selects no cards.
    Emptied,
    /// The answer was right; the caller should fire `Tick(ticket)` later.
    Correct(AdvanceTicket),
    /// The answer was wrong; the same card stays current.
    Incorrect,
}

impl Transition {
    /// Whether the session state may have changed and should be saved.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

pub struct SessionMachine {
    entries: Vec<VocabEntry>,
    state: SessionState,
    phase: Phase,
    pending: Option<AdvanceTicket>,
    next_ticket: u64,
    rng: StdRng,
}

impl SessionMachine {
    /// Create an unstarted machine. Call [`start`](Self::start) next.
    pub fn new(entries: Vec<VocabEntry>) -> Self {
        Self::with_rng(entries, StdRng::from_os_rng())
    }

    /// Create an unstarted machine with a given shuffle source.
    pub fn with_rng(entries: Vec<VocabEntry>, rng: StdRng) -> Self {
        Self {
            entries,
            state: SessionState::default(),
            phase: Phase::Empty,
            pending: None,
            next_ticket: 0,
            rng,
        }
    }

    /// Resume a saved session, or start unfiltered when there is none.
    pub fn start(&mut self, saved: Option<SessionState>) -> Transition {
        match saved {
            Some(state) => self.resume(state),
            None => self.set_filter(""),
        }
    }

    fn resume(&mut self, mut state: SessionState) -> Transition {
        let size = self.entries.len();
        state.order.retain(|&i| i < size);
        state.pool.retain(|&i| i < size);
        if state.order.is_empty() {
            return self.set_filter("");
        }
        if state.pool.is_empty() {
            state.pool = state.order.clone();
        }
        if !state.filter_section.is_empty()
            && !sections(&self.entries).contains(&state.filter_section)
        {
            // The saved pool belongs to a section that no longer exists.
            tracing::info!(section = %state.filter_section, "saved section gone, starting over");
            self.state.sort_mode = state.sort_mode;
            return self.set_filter("");
        }
        state.correct = state.correct.min(state.attempts);
        state.cursor = state.cursor.filter(|&c| c < state.order.len());

        tracing::debug!(
            cursor = ?state.cursor,
            cards = state.order.len(),
            "resuming session"
        );
        self.state = state;
        self.pending = None;

        if self.state.cursor.is_some() {
            self.phase = Phase::Presenting;
            Transition::Presented
        } else {
            self.advance()
        }
    }

    /// Apply a command.
    pub fn dispatch(&mut self, command: Command) -> Transition {
        match command {
            Command::Submit(text) => self.submit(&text),
            Command::Skip => self.skip(),
            Command::Reset => self.reset(),
            Command::SetFilter(section) => self.set_filter(&section),
            Command::SetSortMode(mode) => self.set_sort_mode(mode),
            Command::Tick(ticket) => self.tick(ticket),
        }
    }

    /// Restrict the pool to one section (`""` for all), rebuild the order
    /// and show the first card.
    pub fn set_filter(&mut self, section: &str) -> Transition {
        let section = section.trim();
        self.state.pool = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| {
                section.is_empty() || entry.section.as_deref().map(str::trim) == Some(section)
            })
            .map(|(i, _)| i)
            .collect();
        self.state.filter_section = section.to_string();
        self.state.reset_score();
        self.rebuild_order();

        tracing::debug!(section, cards = self.state.pool.len(), "filter applied");
        self.advance()
    }

    /// Switch presentation order, rebuild it and show the first card.
    pub fn set_sort_mode(&mut self, mode: SortMode) -> Transition {
        self.state.sort_mode = mode;
        self.state.reset_score();
        self.rebuild_order();
        self.advance()
    }

    /// Zero the score and start the pool over.
    pub fn reset(&mut self) -> Transition {
        self.state.reset_score();
        self.rebuild_order();
        self.advance()
    }

    /// Move to the next card, wrapping (and reshuffling in random mode) at
    /// the end of the order.
    pub fn advance(&mut self) -> Transition {
        self.pending = None;

        if self.state.order.is_empty() {
            self.state.cursor = None;
            self.phase = Phase::Empty;
            return Transition::Emptied;
        }

        let mut next = self.state.cursor.map_or(0, |c| c + 1);
        if next >= self.state.order.len() {
            next = 0;
            if self.state.sort_mode == SortMode::Random {
                self.state.order.shuffle(&mut self.rng);
            }
        }
        self.state.cursor = Some(next);
        self.phase = Phase::Presenting;
        Transition::Presented
    }

    /// Move on without scoring.
    pub fn skip(&mut self) -> Transition {
        self.advance()
    }

    /// Judge a typed answer against the current card.
    ///
    /// Blank input, input while no card is shown and input while a correct
    /// answer waits for its advance are ignored.
    pub fn submit(&mut self, raw: &str) -> Transition {
        if self.phase != Phase::Presenting {
            return Transition::Ignored;
        }
        let Some(entry) = self.current_card() else {
            return Transition::Ignored;
        };
        let result = compare_answers(raw, &entry.en);
        if result.typed_normalized.is_empty() {
            return Transition::Ignored;
        }

        self.state.attempts = self.state.attempts.saturating_add(1);
        if !result.is_correct {
            return Transition::Incorrect;
        }

        self.state.correct = self.state.correct.saturating_add(1);
        let ticket = AdvanceTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending = Some(ticket);
        self.phase = Phase::Judged;
        Transition::Correct(ticket)
    }

    /// Fire a scheduled advance. Stale tickets are ignored.
    pub fn tick(&mut self, ticket: AdvanceTicket) -> Transition {
        if self.pending == Some(ticket) {
            self.advance()
        } else {
            Transition::Ignored
        }
    }

    fn rebuild_order(&mut self) {
        self.state.order = self.state.pool.clone();
        if self.state.sort_mode == SortMode::Random {
            self.state.order.shuffle(&mut self.rng);
        }
        self.state.cursor = None;
        self.pending = None;
    }

    pub fn entries(&self) -> &[VocabEntry] {
        &self.entries
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Ticket of the advance waiting to fire, if any.
    pub fn pending_advance(&self) -> Option<AdvanceTicket> {
        self.pending
    }

    pub fn current_card(&self) -> Option<&VocabEntry> {
        self.state
            .current_index()
            .and_then(|i| self.entries.get(i))
    }

    pub fn current_view(&self) -> Option<CardView> {
        self.current_card().map(CardView::from_entry)
    }

    pub fn sections(&self) -> Vec<String> {
        sections(&self.entries)
    }

    pub fn scoreboard(&self) -> Scoreboard {
        let total = if self.state.pool.is_empty() {
            self.entries.len()
        } else {
            self.state.pool.len()
        };
        Scoreboard {
            correct: self.state.correct,
            attempts: self.state.attempts,
            remaining: self.state.remaining(),
            total,
        }
    }
}
