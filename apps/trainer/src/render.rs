//! Terminal output.

use crossterm::style::Stylize;
use std::io::{self, Write};
use vocab_core::{
    build_matcher, CardView, Scoreboard, SessionMachine, VocabEntry, EMPTY_POOL_MESSAGE,
};

pub const CORRECT_MESSAGE: &str = "正解！";
pub const INCORRECT_MESSAGE: &str = "不正解… もう一度入力してください。";

const HELP: &str = "\
<answer>              answer the current card
:skip                 move to the next card
:hint                 show the answer word
:reveal               show the example with the answer
:filter [section]     study one section, or all with no argument
:sections             list sections
:sort sequential|random
:popup on|off         show the example after a correct answer
:reset                start over and clear saved progress
:help                 show this help
:quit                 exit";

/// The current card, or the empty-pool message.
pub fn card<W: Write>(out: &mut W, machine: &SessionMachine) -> io::Result<()> {
    writeln!(out)?;
    match machine.current_view() {
        Some(view) => {
            writeln!(out, "{}", format!("[{}]", view.section_label()).dark_grey())?;
            writeln!(out, "{}", view.gloss.as_str().bold())?;
            if !view.example_ja.is_empty() {
                writeln!(out, "{}", view.example_ja)?;
            }
            if !view.cloze.is_empty() {
                writeln!(out, "{}", view.cloze)?;
            }
        }
        None => writeln!(out, "{EMPTY_POOL_MESSAGE}")?,
    }
    scoreboard(out, &machine.scoreboard())
}

pub fn scoreboard<W: Write>(out: &mut W, score: &Scoreboard) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        format!(
            "正解 {}/{}  残り {}/{}",
            score.correct, score.attempts, score.remaining, score.total
        )
        .dark_grey()
    )
}

pub fn correct<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", CORRECT_MESSAGE.green().bold())
}

pub fn incorrect<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", INCORRECT_MESSAGE.red())
}

pub fn hint<W: Write>(out: &mut W, view: &CardView) -> io::Result<()> {
    if view.hint.is_empty() {
        return Ok(());
    }
    writeln!(out, "{}", view.hint.as_str().yellow())
}

/// The English example with every occurrence of the answer emphasized.
pub fn reveal<W: Write>(out: &mut W, entry: &VocabEntry) -> io::Result<()> {
    let sentence = entry.en_example.as_str();
    if sentence.is_empty() {
        return writeln!(out, "{}", entry.en.as_str().bold());
    }

    match build_matcher(&entry.en) {
        Some(matcher) => {
            for segment in matcher.segments(sentence) {
                if segment.is_match {
                    write!(out, "{}", segment.text.bold().underlined().cyan())?;
                } else {
                    write!(out, "{}", segment.text)?;
                }
            }
            writeln!(out)
        }
        None => writeln!(out, "{sentence}"),
    }
}

pub fn sections<W: Write>(out: &mut W, sections: &[String], active: &str) -> io::Result<()> {
    if sections.is_empty() {
        return writeln!(out, "(no sections)");
    }
    for section in sections {
        if section == active {
            writeln!(out, "* {}", section.as_str().bold())?;
        } else {
            writeln!(out, "  {section}")?;
        }
    }
    Ok(())
}

pub fn help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{HELP}")
}

pub fn prompt<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}
