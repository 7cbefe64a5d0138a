//! Quiz session: state, transitions and the persistence codec.

pub mod codec;
pub mod machine;
pub mod state;

pub use machine::{AdvanceTicket, Command, Phase, SessionMachine, Transition};
pub use state::{Scoreboard, SessionState};
