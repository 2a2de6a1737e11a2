//! Human-formatted numeric label notations.
//!
//! Notations are tried in table order; the first whose predicate accepts the
//! text decides how it is parsed and re-rendered. Adding a notation means
//! adding a row.

use std::fmt;

/// Marker for thousands-abbreviated labels ("+25mil").
pub const THOUSANDS_MARKER: &str = "mil";

/// Labels that fade in instead of counting.
pub const FADE_ONLY: &[&str] = &["24/7"];

/// One row of the notation table.
#[derive(Copy, Clone)]
pub struct Notation {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub parse: fn(&str) -> Option<f64>,
    pub format: fn(f64) -> String,
}

impl Notation {
    /// Text rendered before the count starts.
    pub fn zero(&self) -> String {
        (self.format)(0.0)
    }

    pub fn format(&self, value: f64) -> String {
        (self.format)(value)
    }
}

impl fmt::Debug for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Notation").field(&self.name).finish()
    }
}

impl PartialEq for Notation {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// `98,6%`: one decimal, comma separator.
pub static PERCENT: Notation = Notation {
    name: "percent",
    matches: |s| s.contains('%'),
    parse: |s| parse_float_prefix(&s.replacen(',', ".", 1).replacen('%', "", 1)),
    format: |v| format!("{}%", fixed_one(v)).replacen('.', ",", 1),
};

/// `+25mil`: whole thousands, floored while counting.
pub static THOUSANDS: Notation = Notation {
    name: "thousands",
    matches: |s| s.contains(THOUSANDS_MARKER),
    parse: |s| {
        parse_int_prefix(&s.replacen('+', "", 1).replacen(THOUSANDS_MARKER, "", 1))
            .map(|n| n * 1000.0)
    },
    format: |v| format!("+{:.0}{THOUSANDS_MARKER}", (v / 1000.0).floor() + 0.0),
};

/// `+500`: plain integer, rounded while counting.
pub static PLUS_INTEGER: Notation = Notation {
    name: "plus-integer",
    matches: |s| s.starts_with('+') && parse_int_prefix(&s.replacen('+', "", 1)).is_some(),
    parse: |s| parse_int_prefix(&s.replacen('+', "", 1)),
    format: |v| format!("+{:.0}", v.round() + 0.0),
};

/// Priority order.
pub static NOTATIONS: [&Notation; 3] = [&PERCENT, &THOUSANDS, &PLUS_INTEGER];

/// How a label should be animated.
#[derive(Clone, Debug, PartialEq)]
pub enum LabelKind {
    Counter {
        notation: &'static Notation,
        target: f64,
    },
    FadeOnly,
    Unrecognized,
}

/// Classify trimmed label text against the notation table.
pub fn classify(text: &str) -> LabelKind {
    let text = text.trim();
    if let Some(notation) = NOTATIONS.iter().copied().find(|n| (n.matches)(text)) {
        return match (notation.parse)(text) {
            Some(target) => LabelKind::Counter { notation, target },
            None => LabelKind::Unrecognized,
        };
    }
    if FADE_ONLY.contains(&text) {
        return LabelKind::FadeOnly;
    }
    LabelKind::Unrecognized
}

/// One fractional digit with exact ties rounded away from zero.
/// `{:.1}` alone would send `0.25` to `0.2`.
fn fixed_one(v: f64) -> String {
    let scaled = v * 10.0;
    let exact_tie = scaled.fract().abs() == 0.5 && v.mul_add(10.0, -scaled) == 0.0;
    if exact_tie {
        format!("{:.1}", scaled.round() / 10.0)
    } else {
        format!("{v:.1}")
    }
}

/// Longest leading decimal literal, ignoring leading whitespace.
fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse().ok()
}

/// Longest leading integer literal, ignoring leading whitespace.
fn parse_int_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse().ok()
}
