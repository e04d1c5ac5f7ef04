//! Bit-vector signal references.
//!
//! A [`Signal`] names a scalar, a (multi-dimensional) vector, a slice of a
//! vector, or a literal bit-string. Vectors carry one index list per
//! dimension; the front-end spells out every index in the order it should be
//! expanded, so `a[3:0]` arrives as `[[3, 2, 1, 0]]`.

use serde::{Deserialize, Serialize};

use crate::attribute::Attribute;

/// A signal reference or declaration in the intermediate representation.
///
/// The bit width is derived from the ranges and kept in sync by every method
/// that changes them. A signal whose ranges are not known yet (the port side
/// of an instance connection before it has been matched against its target)
/// reports no size and must not be expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSignal", into = "RawSignal")]
pub struct Signal {
    line: u32,
    name: String,
    ranges: Vec<Vec<u32>>,
    binary: bool,
    ranges_known: bool,
    size: Option<u32>,
    attributes: Vec<Attribute>,
}

impl Signal {
    /// Creates a scalar (single-bit, dimensionless) signal.
    pub fn scalar(line: u32, name: impl Into<String>) -> Self {
        Self::build(line, name.into(), Vec::new(), false, true)
    }

    /// Creates a vector signal with one index list per dimension.
    pub fn vector(line: u32, name: impl Into<String>, ranges: Vec<Vec<u32>>) -> Self {
        Self::build(line, name.into(), ranges, false, true)
    }

    /// Creates a literal bit-string such as `"0101"`; each character is one bit.
    pub fn literal(line: u32, bits: impl Into<String>) -> Self {
        Self::build(line, bits.into(), Vec::new(), true, true)
    }

    /// Creates a signal whose ranges are resolved later, used for the port
    /// side of an instance connection that names a whole port.
    pub fn unresolved(line: u32, name: impl Into<String>) -> Self {
        Self::build(line, name.into(), Vec::new(), false, false)
    }

    fn build(line: u32, name: String, ranges: Vec<Vec<u32>>, binary: bool, known: bool) -> Self {
        let mut signal = Self {
            line,
            name,
            ranges,
            binary,
            ranges_known: known,
            size: None,
            attributes: Vec::new(),
        };
        signal.compute_size();
        signal
    }

    /// Source line of the declaration or reference.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Signal name, or the bit characters of a literal.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-dimension index lists.
    pub fn ranges(&self) -> &[Vec<u32>] {
        &self.ranges
    }

    /// Returns `true` if this is a literal bit-string.
    pub fn is_binary(&self) -> bool {
        self.binary
    }

    /// Returns `true` once the ranges are known.
    pub fn is_ranges_known(&self) -> bool {
        self.ranges_known
    }

    /// Width in bits, or `None` while the ranges are unknown.
    pub fn size(&self) -> Option<u32> {
        self.size
    }

    /// Replaces the ranges, marks them known, and recomputes the size.
    pub fn set_ranges(&mut self, ranges: Vec<Vec<u32>>) {
        self.ranges = ranges;
        self.ranges_known = true;
        self.compute_size();
    }

    /// Attaches an attribute.
    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    /// Attributes in declaration order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    fn compute_size(&mut self) {
        self.size = if !self.ranges_known {
            None
        } else if self.binary {
            Some(self.name.chars().count() as u32)
        } else if self.ranges.is_empty() {
            Some(1)
        } else {
            Some(self.ranges.iter().map(|r| r.len() as u32).product())
        };
    }
}

/// Wire format of [`Signal`]; the size is derived, never trusted from input.
#[derive(Clone, Serialize, Deserialize)]
struct RawSignal {
    line: u32,
    name: String,
    #[serde(default)]
    ranges: Vec<Vec<u32>>,
    #[serde(default)]
    binary: bool,
    #[serde(default = "known_by_default")]
    ranges_known: bool,
    #[serde(default)]
    attributes: Vec<Attribute>,
}

fn known_by_default() -> bool {
    true
}

impl From<RawSignal> for Signal {
    fn from(raw: RawSignal) -> Self {
        let mut signal = Signal::build(
            raw.line,
            raw.name,
            raw.ranges,
            raw.binary,
            raw.ranges_known,
        );
        signal.attributes = raw.attributes;
        signal
    }
}

impl From<Signal> for RawSignal {
    fn from(s: Signal) -> Self {
        RawSignal {
            line: s.line,
            name: s.name,
            ranges: s.ranges,
            binary: s.binary,
            ranges_known: s.ranges_known,
            attributes: s.attributes,
        }
    }
}
