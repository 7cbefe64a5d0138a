//! Filter, sort, and popup settings.

use crate::render;
use crate::scheduler::AdvanceScheduler;
use crate::state::AppState;
use std::io::{self, Write};
use vocab_core::{Command, KeyValueStore, SortMode};

/// Restrict the session to one section. An empty name selects everything.
pub fn filter<S: KeyValueStore, W: Write>(
    section: &str,
    app: &mut AppState<S>,
    scheduler: &mut AdvanceScheduler,
    out: &mut W,
) -> io::Result<()> {
    scheduler.cancel();
    app.apply(Command::SetFilter(section.to_string()));
    render::card(out, &app.machine)
}

pub fn sort<S: KeyValueStore, W: Write>(
    mode: SortMode,
    app: &mut AppState<S>,
    scheduler: &mut AdvanceScheduler,
    out: &mut W,
) -> io::Result<()> {
    scheduler.cancel();
    app.apply(Command::SetSortMode(mode));
    writeln!(out, "sort: {}", mode.as_str())?;
    render::card(out, &app.machine)
}

pub fn popup<S: KeyValueStore, W: Write>(
    enabled: bool,
    app: &mut AppState<S>,
    out: &mut W,
) -> io::Result<()> {
    app.set_popup(enabled);
    writeln!(out, "popup: {}", if enabled { "on" } else { "off" })
}

pub fn list_sections<S: KeyValueStore, W: Write>(
    app: &AppState<S>,
    out: &mut W,
) -> io::Result<()> {
    render::sections(out, &app.machine.sections(), &app.machine.state().filter_section)
}
