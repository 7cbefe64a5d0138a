//! Answer matching and example-sentence cloze generation.
//!
//! A [`Matcher`] finds a target word or phrase inside an example sentence,
//! accepting regular English inflections of the last word (plural, past,
//! gerund, possessive). It never matches inside a longer word.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Character that replaces each letter of a masked match.
pub const BLANK: char = '_';

const VOWELS: &str = "aeiouAEIOU";

/// Result of comparing a typed answer to the target word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Whether the normalized strings are identical.
    pub is_correct: bool,
    /// Normalized typed answer (for display).
    pub typed_normalized: String,
    /// Normalized target (for display).
    pub target_normalized: String,
}

/// Compare a typed answer to the target word. No partial credit.
pub fn compare_answers(typed: &str, target: &str) -> MatchResult {
    let typed_normalized = normalize_answer(typed);
    let target_normalized = normalize_answer(target);

    MatchResult {
        is_correct: typed_normalized == target_normalized,
        typed_normalized,
        target_normalized,
    }
}

/// Lowercase, collapse whitespace runs to one space and trim.
pub fn normalize_answer(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn is_consonant(c: char) -> bool {
    c.is_ascii_alphabetic() && !VOWELS.contains(c)
}

fn push_form(forms: &mut Vec<String>, form: String) {
    if !forms.contains(&form) {
        forms.push(form);
    }
}

/// Surface forms accepted for the last word of a phrase.
///
/// The list keeps insertion order and has no duplicates. The exact token is
/// always first.
pub fn inflections(token: &str) -> Vec<String> {
    let mut forms = Vec::new();
    let mut rev = token.chars().rev();
    let Some(last) = rev.next() else {
        return forms;
    };
    let prev = rev.next();
    let stem = &token[..token.len() - last.len_utf8()];
    let lower_last = last.to_ascii_lowercase();

    push_form(&mut forms, token.to_string());
    push_form(&mut forms, format!("{token}'s"));
    push_form(&mut forms, format!("{token}s"));
    push_form(&mut forms, format!("{token}es"));

    // study -> studies, studied
    if lower_last == 'y' && prev.map_or(true, |p| !VOWELS.contains(p)) {
        push_form(&mut forms, format!("{stem}ies"));
        push_form(&mut forms, format!("{stem}ied"));
    }

    push_form(&mut forms, format!("{token}ed"));
    if lower_last == 'e' {
        push_form(&mut forms, format!("{token}d"));
    }

    push_form(&mut forms, format!("{token}ing"));
    if token.to_ascii_lowercase().ends_with("ie") {
        // lie -> lying
        push_form(&mut forms, format!("{}ying", &token[..token.len() - 2]));
    } else if lower_last == 'e' {
        // make -> making
        push_form(&mut forms, format!("{stem}ing"));
    }

    // plan -> planned, planning
    if is_consonant(last) {
        push_form(&mut forms, format!("{token}{last}ed"));
        push_form(&mut forms, format!("{token}{last}ing"));
    }

    forms
}

/// A piece of a sentence, either matched text or the text between matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub is_match: bool,
}

/// Compiled matcher for one target phrase.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
}

impl Matcher {
    /// Build a matcher, or `None` for an empty or whitespace-only phrase.
    ///
    /// Every word but the last must appear literally (ignoring case),
    /// separated by one or more whitespace characters. The last word may
    /// take any of its [`inflections`].
    pub fn new(phrase: &str) -> Option<Self> {
        let tokens: Vec<&str> = phrase.split_whitespace().collect();
        let (last, leading) = tokens.split_last()?;

        let mut parts: Vec<String> = leading.iter().map(|t| regex::escape(t)).collect();
        let alternation = inflections(last)
            .iter()
            .map(|form| regex::escape(form))
            .collect::<Vec<_>>()
            .join("|");
        parts.push(format!("(?:{alternation})"));

        // Case folding stays ASCII-only so letters like U+017F never stand in
        // for `s`. Non-ASCII phrases need Unicode mode to compile at all.
        let flags = if phrase.is_ascii() { "i-u" } else { "i" };

        // Group 3 stands in for a lookahead: it is consumed by the regex but
        // the scan restarts at the end of group 2.
        let pattern = format!(
            r"(^|[^A-Za-z])((?{flags}:{}))([^A-Za-z]|$)",
            parts.join(r"\s+")
        );

        match Regex::new(&pattern) {
            Ok(regex) => Some(Self { regex }),
            Err(err) => {
                tracing::warn!(phrase, %err, "could not compile phrase matcher");
                None
            }
        }
    }

    /// Byte ranges of all non-overlapping matches, left to right.
    pub fn spans(&self, sentence: &str) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        let mut at = 0;

        while at <= sentence.len() {
            let Some(target) = self
                .regex
                .captures_at(sentence, at)
                .and_then(|caps| caps.get(2))
            else {
                break;
            };

            let next = if target.end() > at {
                target.end()
            } else {
                // Never stall on an empty match.
                at + sentence[at..].chars().next().map_or(1, char::len_utf8)
            };
            if !target.is_empty() {
                spans.push(target.range());
            }
            at = next;
        }

        spans
    }

    /// First match, if any.
    pub fn find(&self, sentence: &str) -> Option<Range<usize>> {
        self.regex
            .captures(sentence)
            .and_then(|caps| caps.get(2))
            .map(|m| m.range())
    }

    /// Split a sentence into matched and unmatched segments.
    pub fn segments<'a>(&self, sentence: &'a str) -> Vec<Segment<'a>> {
        let mut segments = Vec::new();
        let mut last = 0;

        for span in self.spans(sentence) {
            if span.start > last {
                segments.push(Segment {
                    text: &sentence[last..span.start],
                    is_match: false,
                });
            }
            segments.push(Segment {
                text: &sentence[span.clone()],
                is_match: true,
            });
            last = span.end;
        }
        if last < sentence.len() {
            segments.push(Segment {
                text: &sentence[last..],
                is_match: false,
            });
        }

        segments
    }

    /// Replace each ASCII letter of every match with [`BLANK`].
    ///
    /// Byte and character lengths are preserved.
    pub fn mask(&self, sentence: &str) -> String {
        let mut out = String::with_capacity(sentence.len());
        for segment in self.segments(sentence) {
            if segment.is_match {
                out.extend(
                    segment
                        .text
                        .chars()
                        .map(|c| if c.is_ascii_alphabetic() { BLANK } else { c }),
                );
            } else {
                out.push_str(segment.text);
            }
        }
        out
    }

    /// Escape the sentence for markup and wrap each match in an answer span.
    pub fn highlight(&self, sentence: &str) -> String {
        let mut out = String::with_capacity(sentence.len() + 32);
        for segment in self.segments(sentence) {
            if segment.is_match {
                out.push_str(r#"<span class="answer">"#);
                out.push_str(&escape_html(segment.text));
                out.push_str("</span>");
            } else {
                out.push_str(&escape_html(segment.text));
            }
        }
        out
    }
}

/// Build a matcher for a phrase. See [`Matcher::new`].
pub fn build_matcher(phrase: &str) -> Option<Matcher> {
    Matcher::new(phrase)
}

/// Mask `phrase` in `sentence`. Returns the sentence unchanged when the
/// phrase is blank.
pub fn make_cloze(sentence: &str, phrase: &str) -> String {
    match build_matcher(phrase) {
        Some(matcher) if !sentence.is_empty() => matcher.mask(sentence),
        _ => sentence.to_string(),
    }
}

/// Highlight `phrase` in `sentence`. Returns escaped text when the phrase
/// is blank.
pub fn make_highlighted(sentence: &str, phrase: &str) -> String {
    match build_matcher(phrase) {
        Some(matcher) => matcher.highlight(sentence),
        None => escape_html(sentence),
    }
}

/// Escape `&`, `<`, `>`, `"` and `'` as HTML entities.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn matched<'a>(phrase: &str, sentence: &'a str) -> Vec<&'a str> {
        let matcher = build_matcher(phrase).expect("matcher");
        matcher
            .spans(sentence)
            .into_iter()
            .map(|r| &sentence[r])
            .collect()
    }

    fn strip_markup(markup: &str) -> String {
        markup
            .replace(r#"<span class="answer">"#, "")
            .replace("</span>", "")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&")
    }

    #[test]
    fn test_normalize_answer() {
        assert_eq!(normalize_answer("  Look   AFTER \t"), "look after");
        assert_eq!(normalize_answer(""), "");
        assert_eq!(normalize_answer(" \n "), "");
    }

    #[test]
    fn test_compare_answers() {
        assert!(compare_answers("Run", "run").is_correct);
        assert!(compare_answers(" give  up ", "give up").is_correct);
        assert!(!compare_answers("runs", "run").is_correct);
        assert!(!compare_answers("giveup", "give up").is_correct);

        let result = compare_answers("  HELLO   World ", "hello world");
        assert_eq!(result.typed_normalized, "hello world");
        assert_eq!(result.target_normalized, "hello world");
    }

    #[test]
    fn blank_phrase_has_no_matcher() {
        assert!(build_matcher("").is_none());
        assert!(build_matcher("   \t ").is_none());
    }

    #[test]
    fn inflections_start_with_exact_form() {
        let forms = inflections("plan");
        assert_eq!(forms[0], "plan");
        for form in ["plan's", "plans", "planes", "planed", "planing", "planned", "planning"] {
            assert!(forms.contains(&form.to_string()), "missing {form}");
        }
    }

    #[test]
    fn inflections_of_consonant_y() {
        let forms = inflections("study");
        assert!(forms.contains(&"studies".to_string()));
        assert!(forms.contains(&"studied".to_string()));

        let forms = inflections("play");
        assert!(!forms.contains(&"plaies".to_string()));
        assert!(forms.contains(&"played".to_string()));
    }

    #[test]
    fn inflections_have_no_duplicates() {
        for word in ["see", "lie", "y", "ax", "study", "Make"] {
            let forms = inflections(word);
            let mut unique = forms.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), forms.len(), "duplicates for {word}");
        }
    }

    #[test]
    fn matches_literal_word_case_insensitively() {
        for word in ["run", "apple", "go", "x", "Tokyo"] {
            let sentence = format!("We say {} here.", word.to_uppercase());
            let upper = word.to_uppercase();
            assert_eq!(matched(word, &sentence), vec![upper.as_str()]);
        }
    }

    #[test]
    fn matches_regular_inflections() {
        assert_eq!(matched("run", "He runs fast."), vec!["runs"]);
        assert_eq!(matched("watch", "She watches TV."), vec!["watches"]);
        assert_eq!(matched("walk", "They walked home."), vec!["walked"]);
        assert_eq!(matched("walk", "I'm walking."), vec!["walking"]);

        // Either the bare word or the possessive is an accepted match.
        let possessive = matched("dog", "The dog's bone.");
        assert_eq!(possessive.len(), 1);
        assert!(["dog", "dog's"].contains(&possessive[0]));
    }

    #[test]
    fn matches_doubled_final_consonant() {
        assert_eq!(matched("plan", "We planned it."), vec!["planned"]);
        assert_eq!(matched("plan", "Planning is key."), vec!["Planning"]);
        assert_eq!(matched("stop", "It stopped, then kept stopping."), vec!["stopped", "stopping"]);
    }

    #[test]
    fn matches_silent_e_forms() {
        assert_eq!(matched("make", "She is making tea."), vec!["making"]);
        assert_eq!(matched("like", "I liked it."), vec!["liked"]);
        assert_eq!(matched("lie", "He was lying."), vec!["lying"]);
    }

    #[test]
    fn matches_consonant_y_forms() {
        assert_eq!(matched("study", "She studies and studied."), vec!["studies", "studied"]);
        assert_eq!(matched("carry", "He carried it."), vec!["carried"]);
    }

    #[test]
    fn does_not_match_inside_longer_words() {
        assert!(matched("cat", "A category of concatenated bobcats.").is_empty());
        assert!(matched("art", "He started a party.").is_empty());
        assert!(matched("run", "rerun").is_empty());
    }

    #[test]
    fn accepts_non_letter_boundaries() {
        assert_eq!(matched("run", "run"), vec!["run"]);
        assert_eq!(matched("run", "(run)"), vec!["run"]);
        assert_eq!(matched("run", "run-off"), vec!["run"]);
        assert_eq!(matched("run", "2run3"), vec!["run"]);
    }

    #[test]
    fn multi_word_phrase_inflects_last_word_only() {
        assert_eq!(matched("give up", "Never gives up, never give ups."), vec!["give ups"]);
        assert_eq!(
            matched("look forward to", "I look  forward\tto it."),
            vec!["look  forward\tto"]
        );
        assert_eq!(matched("take care", "She takes care of him."), Vec::<&str>::new());
        assert_eq!(matched("pick up", "He will pick up the box, then picking up"), vec!["pick up"]);
        assert_eq!(matched("set off", "We set off early."), vec!["set off"]);
    }

    #[test]
    fn phrase_whitespace_is_collapsed() {
        assert_eq!(matched("  look   after ", "Please look after him."), vec!["look after"]);
    }

    #[test]
    fn finds_all_matches_left_to_right() {
        assert_eq!(
            matched("run", "run, runs, ran, running run"),
            vec!["run", "runs", "running", "run"]
        );
        assert_eq!(matched("go", "go go go"), vec!["go", "go", "go"]);
    }

    #[test]
    fn find_returns_first_match() {
        let matcher = build_matcher("run").expect("matcher");
        assert_eq!(matcher.find("I ran, then runs"), Some(12..16));
        assert_eq!(matcher.find("Run!"), Some(0..3));
        assert_eq!(matcher.find("rerun"), None);
    }

    #[test]
    fn case_folding_is_ascii_only() {
        assert_eq!(make_cloze("He paid the \u{17F}um.", "sum"), "He paid the \u{17F}um.");
        assert_eq!(make_cloze("A \u{212A}ing rules.", "king"), "A \u{212A}ing rules.");
        assert_eq!(make_cloze("The KING rules.", "king"), "The ____ rules.");
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        assert_eq!(matched("c++", "I like c++ a lot."), vec!["c++"]);
        assert!(matched("a.b", "axb").is_empty());
        assert_eq!(matched("don't", "Don't go."), vec!["Don't"]);
    }

    #[test]
    fn mask_blanks_matched_letters() {
        assert_eq!(make_cloze("He runs fast.", "run"), "He ____ fast.");
        assert_eq!(make_cloze("They studied hard.", "study"), "They _______ hard.");
        assert_eq!(make_cloze("Never give  up!", "give up"), "Never ____  __!");
    }

    #[test]
    fn mask_leaves_unmatched_text_untouched() {
        let sentence = "Runners run; a rerun runs.";
        let masked = make_cloze(sentence, "run");
        assert_eq!(masked, "Runners ___; a rerun ____.");
        assert_eq!(masked.len(), sentence.len());
        assert_eq!(masked.chars().count(), sentence.chars().count());
    }

    #[test]
    fn mask_preserves_length_with_non_ascii() {
        let sentence = "彼は走る run を使う — runs!";
        let masked = make_cloze(sentence, "run");
        assert_eq!(masked.len(), sentence.len());
        assert_eq!(masked, "彼は走る ___ を使う — ____!");
    }

    #[test]
    fn mask_degrades_gracefully() {
        assert_eq!(make_cloze("He runs.", ""), "He runs.");
        assert_eq!(make_cloze("", "run"), "");
        assert_eq!(make_cloze("Nothing here.", "run"), "Nothing here.");
    }

    #[test]
    fn highlight_wraps_matches() {
        assert_eq!(
            make_highlighted("He runs fast.", "run"),
            r#"He <span class="answer">runs</span> fast."#
        );
    }

    #[test]
    fn highlight_escapes_markup() {
        assert_eq!(
            make_highlighted(r#"<b>"Tom's" & run</b>"#, "run"),
            r#"&lt;b&gt;&quot;Tom&#39;s&quot; &amp; <span class="answer">run</span>&lt;/b&gt;"#
        );
        assert_eq!(make_highlighted("a < b", ""), "a &lt; b");
        assert_eq!(make_highlighted("", "run"), "");
    }

    #[test]
    fn highlight_round_trips_without_markup() {
        let sentences = [
            "He runs & walks <fast>.",
            "\"Run,\" she said, 'run!'",
            "No match here.",
            "run run run",
        ];
        for sentence in sentences {
            assert_eq!(strip_markup(&make_highlighted(sentence, "run")), sentence);
        }
    }

    #[test]
    fn segments_cover_sentence() {
        let matcher = build_matcher("go").expect("matcher");
        let segments = matcher.segments("Let's go now, going!");
        let joined: String = segments.iter().map(|s| s.text).collect();
        assert_eq!(joined, "Let's go now, going!");
        let hits: Vec<&str> = segments.iter().filter(|s| s.is_match).map(|s| s.text).collect();
        assert_eq!(hits, vec!["go", "going"]);
        assert!(matcher.segments("").is_empty());
    }
}
