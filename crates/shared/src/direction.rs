//! Direction alphabet and the text form of direction sequences.
//!
//! A sequence is stored as arrow glyphs separated by single spaces, e.g. `"↑ → ↓"`.
//! The panel's direction pad speaks in compass labels (`上`, `右上`, ...), so every
//! entry point here accepts either a label or a glyph.

use crate::error::ValidationError;

pub const SEPARATOR: char = ' ';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

// (direction, compass label, glyph)
static TABLE: [(Direction, &str, &str); 8] = [
    (Direction::Up, "上", "↑"),
    (Direction::UpRight, "右上", "↗"),
    (Direction::Right, "右", "→"),
    (Direction::DownRight, "右下", "↘"),
    (Direction::Down, "下", "↓"),
    (Direction::DownLeft, "左下", "↙"),
    (Direction::Left, "左", "←"),
    (Direction::UpLeft, "左上", "↖"),
];

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
    ];

    fn entry(self) -> &'static (Direction, &'static str, &'static str) {
        // TABLE is declared in the same order as the enum.
        &TABLE[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.entry().1
    }

    pub fn symbol(self) -> &'static str {
        self.entry().2
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label)
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.symbol() == symbol)
    }
}

/// Maps a compass label to its glyph. Glyphs and unknown tokens come back unchanged,
/// so the call is idempotent.
pub fn to_symbol(token: &str) -> &str {
    match Direction::from_label(token) {
        Some(direction) => direction.symbol(),
        None => token,
    }
}

/// Inverse of [`to_symbol`]: glyph to compass label, anything else unchanged.
pub fn to_label(token: &str) -> &str {
    match Direction::from_symbol(token) {
        Some(direction) => direction.label(),
        None => token,
    }
}

pub fn is_valid_symbol(token: &str) -> bool {
    Direction::from_symbol(token).is_some()
}

/// Appends one direction, keeping exactly one separator between glyphs.
pub fn append(sequence: &str, token: &str) -> String {
    let symbol = to_symbol(token.trim());
    let base = sequence.trim_end();
    if base.is_empty() {
        symbol.to_string()
    } else {
        format!("{base}{SEPARATOR}{symbol}")
    }
}

/// Drops the final glyph together with the separator in front of it.
pub fn remove_last(sequence: &str) -> String {
    let trimmed = sequence.trim_end();
    match trimmed.rfind(char::is_whitespace) {
        Some(idx) => trimmed[..idx].trim_end().to_string(),
        None => String::new(),
    }
}

/// Rewrites labels as glyphs and collapses runs of whitespace. Unknown tokens are
/// kept as typed so [`validate`] can still point at them.
pub fn normalize(sequence: &str) -> String {
    sequence
        .split_whitespace()
        .map(to_symbol)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn parse(sequence: &str) -> Result<Vec<Direction>, ValidationError> {
    if sequence.trim().is_empty() {
        return Err(ValidationError::EmptyDirections);
    }
    sequence
        .split_whitespace()
        .map(|token| {
            Direction::from_symbol(token)
                .ok_or_else(|| ValidationError::UnknownDirection(token.to_string()))
        })
        .collect()
}

pub fn validate(sequence: &str) -> Result<(), ValidationError> {
    parse(sequence).map(|_| ())
}

#[cfg(test)]
#[path = "tests/direction_tests.rs"]
mod tests;
