//! Bit-blasting of signals into flat scalar names.
//!
//! `a` with ranges `[[1, 0], [0, 1]]` expands to `a(1)(0)`, `a(1)(1)`,
//! `a(0)(0)`, `a(0)(1)`: the first dimension varies slowest. A literal expands
//! to one constant token per character, left to right. Assignment matching
//! pairs the two sides positionally, so this order is part of the contract.

use gatelift_common::Logic;

use crate::signal::Signal;

/// Expands a signal into its ordered flat names or constant tokens.
pub fn expand(signal: &Signal) -> Vec<String> {
    debug_assert!(
        signal.is_ranges_known(),
        "signal `{}` expanded before its ranges were resolved",
        signal.name()
    );

    if signal.is_binary() {
        return signal.name().chars().map(literal_token).collect();
    }

    let mut out = Vec::with_capacity(signal.size().unwrap_or(1) as usize);
    expand_dimension(&mut out, signal.name().to_string(), signal.ranges());
    out
}

/// Expands a concatenation of signals, in order.
pub fn expand_all(signals: &[Signal]) -> Vec<String> {
    signals.iter().flat_map(expand).collect()
}

fn expand_dimension(out: &mut Vec<String>, prefix: String, ranges: &[Vec<u32>]) {
    match ranges.split_first() {
        None => out.push(prefix),
        Some((indices, rest)) => {
            for index in indices {
                expand_dimension(out, format!("{prefix}({index})"), rest);
            }
        }
    }
}

// Unknown characters still become tokens; resolution rejects them later.
fn literal_token(c: char) -> String {
    match Logic::from_char(c) {
        Some(value) => value.token(),
        None => format!("'{c}'"),
    }
}
