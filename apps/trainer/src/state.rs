//! Application state.

use vocab_core::{Command, KeyValueStore, ProgressStore, SessionMachine, Transition};

/// The session machine plus its persistence.
///
/// Every mutating transition is saved before returning. Saving is
/// best-effort and never fails a transition.
pub struct AppState<S> {
    pub machine: SessionMachine,
    pub progress: ProgressStore<S>,
    pub show_popup: bool,
    load_error: Option<String>,
}

impl<S: KeyValueStore> AppState<S> {
    pub fn new(machine: SessionMachine, store: S) -> Self {
        let progress = ProgressStore::new(store);
        let show_popup = progress.popup_enabled();
        Self {
            machine,
            progress,
            show_popup,
            load_error: None,
        }
    }

    /// State for a dataset that failed to load. Commands are ignored and
    /// nothing is saved, so earlier progress survives.
    pub fn failed(machine: SessionMachine, store: S, error: impl Into<String>) -> Self {
        let mut state = Self::new(machine, store);
        state.load_error = Some(error.into());
        state
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Resume saved progress or start fresh.
    pub fn start(&mut self) -> Transition {
        if self.load_error.is_some() {
            return Transition::Emptied;
        }
        let saved = self.progress.load(self.machine.entries().len());
        let resumed = saved.is_some();
        let transition = self.machine.start(saved);
        tracing::info!(resumed, cards = self.machine.state().order.len(), "session started");
        self.persist();
        transition
    }

    /// Apply a command and save the result.
    pub fn apply(&mut self, command: Command) -> Transition {
        if self.load_error.is_some() {
            return Transition::Ignored;
        }
        if command == Command::Reset {
            self.progress.clear();
        }

        tracing::debug!(?command, "applying command");
        let transition = self.machine.dispatch(command);
        if transition.is_mutation() {
            self.persist();
        }
        transition
    }

    pub fn set_popup(&mut self, enabled: bool) {
        self.show_popup = enabled;
        self.progress.set_popup_enabled(enabled);
    }

    fn persist(&self) {
        self.progress
            .save(self.machine.state(), self.machine.entries().len());
    }
}
