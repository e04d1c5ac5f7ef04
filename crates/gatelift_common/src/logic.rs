//! IEEE 1164 four-state logic values and their constant-token spelling.
//!
//! Literal bit-strings in the HDL intermediate representation are expanded into
//! one constant token per character. A token is the logic character wrapped in
//! single quotes (`'0'`, `'1'`, `'X'`, `'Z'`), which can never collide with a
//! flattened signal name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single 4-state logic value following the IEEE 1164 standard.
///
/// The four states represent:
/// - `Zero`: logic low (driven 0)
/// - `One`: logic high (driven 1)
/// - `X`: unknown or uninitialized value
/// - `Z`: high-impedance (tri-state, not driven)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum Logic {
    /// Logic low (0).
    Zero = 0,
    /// Logic high (1).
    One = 1,
    /// Unknown or uninitialized.
    X = 2,
    /// High-impedance (tri-state).
    Z = 3,
}

impl Logic {
    /// Converts a character to a [`Logic`] value.
    ///
    /// Accepts '0', '1', 'x'/'X', and 'z'/'Z'.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Logic::Zero),
            '1' => Some(Logic::One),
            'x' | 'X' => Some(Logic::X),
            'z' | 'Z' => Some(Logic::Z),
            _ => None,
        }
    }

    /// Parses a quoted constant token such as `'1'`.
    pub fn from_token(token: &str) -> Option<Self> {
        let inner = token.strip_prefix('\'')?.strip_suffix('\'')?;
        let mut chars = inner.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
    }

    /// Returns the quoted constant token for this value.
    pub fn token(self) -> String {
        format!("'{self}'")
    }

    /// Returns `true` for the values a GND/VCC gate can drive.
    pub fn is_driven(self) -> bool {
        matches!(self, Logic::Zero | Logic::One)
    }
}

/// Returns `true` if `name` is spelled like a constant token (`'c'`).
///
/// The character itself is not validated; `'q'` is still a token, just not a
/// valid [`Logic`] value.
pub fn is_constant_token(name: &str) -> bool {
    name.len() >= 3 && name.starts_with('\'') && name.ends_with('\'')
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logic::Zero => write!(f, "0"),
            Logic::One => write!(f, "1"),
            Logic::X => write!(f, "X"),
            Logic::Z => write!(f, "Z"),
        }
    }
}
