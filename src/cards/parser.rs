//! Free-text card reference parsing.
//!
//! Players type card references in wildly different shapes: "red 5",
//! "play the Red Five card", "r5", "d2", "wild4", "+2". The parser
//! normalizes all of them into one canonical [`CardToken`] through a fixed
//! sequence of passes. The priority orders inside each pass (spelled-out
//! digits zero through nine, colors red/green/blue/yellow, Draw-Two aliases
//! before Wild-Draw-Four aliases) are part of the contract and must not be
//! reordered.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catalog::{Color, Value};

/// Classified parse failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input names a colored card but no color could be found.
    #[error("no color given for a colored card")]
    NoColor,
    /// No recognizable card value in the input.
    #[error("no recognizable card value in input")]
    NoNumber,
}

/// Canonical parsed card reference.
///
/// `color` is `None` for wild-family references given without a color; the
/// wild keeps its placeholder until a color is chosen at play time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardToken {
    pub color: Option<Color>,
    pub value: Value,
}

impl std::fmt::Display for CardToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.color {
            Some(color) => write!(f, "{} {}", color, self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

const DIGIT_WORDS: [(&str, char); 10] = [
    ("zero", '0'),
    ("one", '1'),
    ("two", '2'),
    ("three", '3'),
    ("four", '4'),
    ("five", '5'),
    ("six", '6'),
    ("seven", '7'),
    ("eight", '8'),
    ("nine", '9'),
];

const DRAW_TWO_ALIASES: [&str; 5] = ["+2", "draw2", "d2", "plus2", "p2"];

const WILD_DRAW_FOUR_ALIASES: [&str; 10] = [
    "+4", "w+4", "wildraw4", "draw4", "d4", "wild4", "w4", "plus4", "p4", "wild",
];

/// Parse a sequence of input words into a canonical card token.
///
/// # Errors
///
/// [`ParseError::NoNumber`] when no value can be recognized at all,
/// [`ParseError::NoColor`] when a non-wild value has no color attached.
pub fn parse(tokens: &[&str]) -> Result<CardToken, ParseError> {
    let mut buf = normalize(tokens);

    substitute_first_digit_word(&mut buf);

    let mut color = strip_full_color(&mut buf);
    if color.is_none() {
        color = strip_color_prefix(&mut buf);
    }

    let value = if buf.chars().any(|c| c.is_ascii_digit()) {
        resolve_digit_value(&mut buf)
    } else {
        resolve_word_value(&mut buf).ok_or(ParseError::NoNumber)?
    };

    // Color may trail the value ("skip red" reduces to residual "red...").
    if color.is_none() {
        color = match buf.chars().next() {
            Some('r') => Some(Color::Red),
            Some('g') => Some(Color::Green),
            Some('b') => Some(Color::Blue),
            Some('y') => Some(Color::Yellow),
            _ => None,
        };
    }

    if color.is_none() && !value.is_wild_family() {
        return Err(ParseError::NoColor);
    }

    Ok(CardToken { color, value })
}

/// Concatenate, lowercase, and drop everything but letters, digits, and `+`,
/// along with the filler words "card" and "play".
fn normalize(tokens: &[&str]) -> String {
    let joined = tokens.join("").to_lowercase();
    let mut out = String::with_capacity(joined.len());
    let mut i = 0;
    while let Some(c) = joined[i..].chars().next() {
        let rest = &joined[i..];
        if rest.starts_with("card") || rest.starts_with("play") {
            i += 4;
        } else if c.is_ascii_alphanumeric() || c == '+' {
            out.push(c);
            i += 1;
        } else {
            i += c.len_utf8();
        }
    }
    out
}

/// Replace the first spelled-out digit word (in fixed zero-to-nine priority
/// order) with its digit. Only that one word is substituted; all its
/// occurrences are.
fn substitute_first_digit_word(buf: &mut String) {
    for (word, digit) in DIGIT_WORDS {
        if buf.contains(word) {
            *buf = buf.replace(word, &digit.to_string());
            return;
        }
    }
}

/// Detect and remove a full color name, in red/green/blue/yellow priority.
fn strip_full_color(buf: &mut String) -> Option<Color> {
    for (word, color) in [
        ("red", Color::Red),
        ("green", Color::Green),
        ("blue", Color::Blue),
        ("yellow", Color::Yellow),
    ] {
        if buf.contains(word) {
            *buf = buf.replace(word, "");
            return Some(color);
        }
    }
    None
}

/// Detect an abbreviated leading color letter, consuming it and any
/// full-word continuation ("r"/"red", "g"/"green", ...). A leading `r`
/// followed by "ev" is reverse, not red.
fn strip_color_prefix(buf: &mut String) -> Option<Color> {
    let (color, consumed) = if buf.starts_with('r') && !buf.starts_with("rev") {
        (Color::Red, 1 + continuation_len(&buf[1..], &["ed"]))
    } else if buf.starts_with('g') {
        (Color::Green, 1 + continuation_len(&buf[1..], &["reen"]))
    } else if buf.starts_with('b') {
        (Color::Blue, 1 + continuation_len(&buf[1..], &["lue"]))
    } else if buf.starts_with('y') {
        (Color::Yellow, 1 + continuation_len(&buf[1..], &["ellow"]))
    } else {
        return None;
    };
    buf.drain(..consumed);
    Some(color)
}

fn continuation_len(rest: &str, continuations: &[&str]) -> usize {
    continuations
        .iter()
        .find(|word| rest.starts_with(**word))
        .map_or(0, |word| word.len())
}

/// A digit survived normalization: resolve multi-character aliases first
/// (Draw-Two before Wild-Draw-Four), otherwise take the first lone digit.
fn resolve_digit_value(buf: &mut String) -> Value {
    if DRAW_TWO_ALIASES.iter().any(|alias| buf.contains(alias)) {
        for alias in DRAW_TWO_ALIASES {
            *buf = buf.replace(alias, "");
        }
        return Value::DrawTwo;
    }

    if WILD_DRAW_FOUR_ALIASES.iter().any(|alias| buf.contains(alias)) {
        for alias in WILD_DRAW_FOUR_ALIASES {
            *buf = buf.replace(alias, "");
        }
        return Value::WildDrawFour;
    }

    let digit = buf
        .chars()
        .find(char::is_ascii_digit)
        .and_then(|c| c.to_digit(10))
        .unwrap_or(0) as u8;
    buf.retain(|c| !c.is_ascii_digit());
    Value::Number(digit)
}

/// No digit anywhere: look for Skip, Reverse, or Wild by leading letter,
/// consuming the optional full word.
fn resolve_word_value(buf: &mut String) -> Option<Value> {
    let (value, consumed) = if buf.starts_with('s') {
        (Value::Skip, 1 + continuation_len(&buf[1..], &["kip"]))
    } else if buf.starts_with('r') {
        (Value::Reverse, 1 + continuation_len(&buf[1..], &["eversed", "everse"]))
    } else if buf.starts_with('w') {
        (Value::Wild, 1 + continuation_len(&buf[1..], &["ild"]))
    } else {
        return None;
    };
    buf.drain(..consumed);
    Some(value)
}
