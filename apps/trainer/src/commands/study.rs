//! Answering, skipping, and resetting.

use crate::render;
use crate::scheduler::AdvanceScheduler;
use crate::state::AppState;
use std::io::{self, Write};
use vocab_core::{AdvanceTicket, Command, KeyValueStore, Transition};

/// Submit an answer. A correct one schedules the advance.
pub fn answer<S: KeyValueStore, W: Write>(
    text: &str,
    app: &mut AppState<S>,
    scheduler: &mut AdvanceScheduler,
    out: &mut W,
) -> io::Result<()> {
    match app.apply(Command::Submit(text.to_string())) {
        Transition::Correct(ticket) => {
            render::correct(out)?;
            if app.show_popup {
                if let Some(entry) = app.machine.current_card() {
                    render::reveal(out, entry)?;
                }
            }
            scheduler.schedule(ticket);
        }
        Transition::Incorrect => render::incorrect(out)?,
        _ => {}
    }
    Ok(())
}

pub fn skip<S: KeyValueStore, W: Write>(
    app: &mut AppState<S>,
    scheduler: &mut AdvanceScheduler,
    out: &mut W,
) -> io::Result<()> {
    scheduler.cancel();
    app.apply(Command::Skip);
    render::card(out, &app.machine)
}

/// Start over. Saved progress is removed first.
pub fn reset<S: KeyValueStore, W: Write>(
    app: &mut AppState<S>,
    scheduler: &mut AdvanceScheduler,
    out: &mut W,
) -> io::Result<()> {
    scheduler.cancel();
    app.apply(Command::Reset);
    tracing::info!("progress reset");
    render::card(out, &app.machine)
}

/// A scheduled advance came due. Stale tickets do nothing.
pub fn tick<S: KeyValueStore, W: Write>(
    ticket: AdvanceTicket,
    app: &mut AppState<S>,
    out: &mut W,
) -> io::Result<bool> {
    match app.apply(Command::Tick(ticket)) {
        Transition::Ignored => {
            tracing::debug!(?ticket, "stale advance ignored");
            Ok(false)
        }
        _ => {
            render::card(out, &app.machine)?;
            Ok(true)
        }
    }
}

pub fn hint<S: KeyValueStore, W: Write>(app: &AppState<S>, out: &mut W) -> io::Result<()> {
    match app.machine.current_view() {
        Some(view) => render::hint(out, &view),
        None => Ok(()),
    }
}

pub fn reveal<S: KeyValueStore, W: Write>(app: &AppState<S>, out: &mut W) -> io::Result<()> {
    match app.machine.current_card() {
        Some(entry) => render::reveal(out, entry),
        None => Ok(()),
    }
}
