//! `(name, type, value)` attribute triples attached to IR objects.

use serde::{Deserialize, Serialize};

/// A user attribute as written in the HDL source.
///
/// The elaborator copies attributes verbatim onto the netlist object created
/// for the carrier (module, gate, or net); no interpretation happens here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Declared data type of the value, as spelled by the front-end.
    pub ty: String,
    /// Attribute value.
    pub value: String,
}

impl Attribute {
    /// Creates an attribute triple.
    pub fn new(name: impl Into<String>, ty: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            value: value.into(),
        }
    }
}
