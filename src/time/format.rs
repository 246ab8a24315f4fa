use std::fmt::{self, Write};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::ValidationError;

/// Wire format used when a layer does not declare one.
pub const DEFAULT_TIME_FORMAT: &str = "YYYY-MM-DDTHH:mm:ssZ";
/// Format of the slider's start/mid/end marks.
pub const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD";
/// Format of the current-value readout next to the slider.
pub const VALUE_DISPLAY_FORMAT: &str = "DD.MM.YYYY HH:mm:ss";

/// A moment-style date pattern (`YYYY-MM-DD HH:mm`) compiled to a chrono
/// format string. Letters without a token meaning pass through verbatim,
/// `[...]` escapes literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFormat {
    pattern: String,
    compiled: String,
}

impl TimeFormat {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns an error when the pattern is empty or a `[` literal is not
    /// closed.
    pub fn parse(pattern: &str) -> Result<Self, ValidationError> {
        if pattern.trim().is_empty() {
            return Err(ValidationError::TimeFormatEmpty);
        }
        Ok(Self {
            pattern: pattern.to_owned(),
            compiled: compile(pattern)?,
        })
    }

    #[must_use]
    pub fn wire_default() -> Self {
        Self::builtin(DEFAULT_TIME_FORMAT)
    }

    #[must_use]
    pub fn date_default() -> Self {
        Self::builtin(DEFAULT_DATE_FORMAT)
    }

    #[must_use]
    pub fn value_display() -> Self {
        Self::builtin(VALUE_DISPLAY_FORMAT)
    }

    fn builtin(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_owned(),
            compiled: compile(pattern).unwrap_or_else(|_| pattern.replace('%', "%%")),
        }
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn render(&self, instant: DateTime<Utc>) -> String {
        let mut out = String::with_capacity(self.compiled.len().saturating_add(8));
        if write!(out, "{}", instant.format(&self.compiled)).is_err() {
            return instant.to_rfc3339_opts(SecondsFormat::Secs, true);
        }
        out
    }
}

impl Default for TimeFormat {
    fn default() -> Self {
        Self::wire_default()
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

fn compile(pattern: &str) -> Result<String, ValidationError> {
    let mut out = String::with_capacity(pattern.len().saturating_mul(2));
    let mut chars = pattern.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '[' {
            let mut closed = false;
            for literal in chars.by_ref() {
                if literal == ']' {
                    closed = true;
                    break;
                }
                push_literal(&mut out, literal);
            }
            if !closed {
                return Err(ValidationError::UnterminatedFormatLiteral {
                    value: pattern.to_owned(),
                });
            }
            continue;
        }

        if !ch.is_ascii_alphabetic() {
            push_literal(&mut out, ch);
            continue;
        }

        let mut run = 1usize;
        while chars.next_if_eq(&ch).is_some() {
            run = run.saturating_add(1);
        }
        match token(ch, run) {
            Some(spec) => out.push_str(spec),
            // fractions of other widths; instants never carry sub-seconds
            None if ch == 'S' => out.extend(std::iter::repeat_n('0', run)),
            None => {
                for _ in 0..run {
                    push_literal(&mut out, ch);
                }
            }
        }
    }

    Ok(out)
}

fn token(letter: char, run: usize) -> Option<&'static str> {
    let spec = match (letter, run) {
        ('Y', 2) => "%y",
        ('Y', _) => "%Y",
        ('M', 1) => "%-m",
        ('M', 2) => "%m",
        ('M', 3) => "%b",
        ('M', _) => "%B",
        ('D', 1) => "%-d",
        ('D', 2) => "%d",
        ('D', _) => "%j",
        ('d', 3) => "%a",
        ('d', 4) => "%A",
        ('H', 1) => "%-H",
        ('H', _) => "%H",
        ('h', 1) => "%-I",
        ('h', _) => "%I",
        ('m', 1) => "%-M",
        ('m', _) => "%M",
        ('s', 1) => "%-S",
        ('s', _) => "%S",
        ('S', 3) => "%3f",
        ('S', 6) => "%6f",
        ('S', 9) => "%9f",
        ('Z', 1) => "%:z",
        ('Z', _) => "%z",
        ('A', _) => "%p",
        ('a', _) => "%P",
        ('X', _) => "%s",
        _ => return None,
    };
    Some(spec)
}

fn push_literal(out: &mut String, ch: char) {
    if ch == '%' {
        out.push_str("%%");
    } else {
        out.push(ch);
    }
}
