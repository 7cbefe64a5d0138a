//! Line commands typed at the prompt.

pub mod settings;
pub mod study;

use crate::render;
use crate::scheduler::AdvanceScheduler;
use crate::state::AppState;
use std::io::{self, Write};
use vocab_core::{KeyValueStore, SortMode};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Anything not starting with `:`.
    Answer(String),
    Skip,
    Reset,
    Filter(String),
    Sort(SortMode),
    Popup(bool),
    Sections,
    Hint,
    Reveal,
    Help,
    Quit,
    /// A `:` command that did not parse, with a usage message.
    Invalid(String),
}

/// What the event loop does after handling an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Ask before resetting; the next line answers.
    ConfirmReset,
    Quit,
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    let Some(rest) = line.strip_prefix(':') else {
        return Input::Answer(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "skip" | "s" => Input::Skip,
        "reset" => Input::Reset,
        "filter" | "f" => Input::Filter(arg.to_string()),
        "sort" => match SortMode::parse(arg) {
            Some(mode) => Input::Sort(mode),
            None => Input::Invalid("usage: :sort sequential|random".into()),
        },
        "popup" => match arg {
            "on" => Input::Popup(true),
            "off" => Input::Popup(false),
            _ => Input::Invalid("usage: :popup on|off".into()),
        },
        "sections" => Input::Sections,
        "hint" | "h" => Input::Hint,
        "reveal" | "r" => Input::Reveal,
        "help" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        other => Input::Invalid(format!("unknown command :{other} (try :help)")),
    }
}

/// Yes-answers to the reset confirmation.
pub fn is_confirmation(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Apply one input to the session and print the result.
pub fn handle<S, W>(
    input: Input,
    app: &mut AppState<S>,
    scheduler: &mut AdvanceScheduler,
    out: &mut W,
) -> io::Result<Flow>
where
    S: KeyValueStore,
    W: Write,
{
    if app.load_error().is_some() {
        return match input {
            Input::Quit => Ok(Flow::Quit),
            Input::Help => render::help(out).map(|_| Flow::Continue),
            _ => Ok(Flow::Continue),
        };
    }

    match input {
        Input::Answer(text) => study::answer(&text, app, scheduler, out)?,
        Input::Skip => study::skip(app, scheduler, out)?,
        Input::Reset => return Ok(Flow::ConfirmReset),
        Input::Hint => study::hint(app, out)?,
        Input::Reveal => study::reveal(app, out)?,
        Input::Filter(section) => settings::filter(&section, app, scheduler, out)?,
        Input::Sort(mode) => settings::sort(mode, app, scheduler, out)?,
        Input::Popup(enabled) => settings::popup(enabled, app, out)?,
        Input::Sections => settings::list_sections(app, out)?,
        Input::Help => render::help(out)?,
        Input::Quit => return Ok(Flow::Quit),
        Input::Invalid(message) => writeln!(out, "{message}")?,
    }
    Ok(Flow::Continue)
}
