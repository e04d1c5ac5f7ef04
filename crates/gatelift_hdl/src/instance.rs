//! Instances of entities or gate types inside a parent entity.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::attribute::Attribute;
use crate::signal::Signal;

/// One port connection: the port on the instantiated type, fed by a
/// concatenation of signal fragments from the parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortAssignment {
    /// The port (or port slice) being connected.
    pub port: Signal,
    /// Signals assigned to the port, most significant fragment first.
    pub signals: Vec<Signal>,
}

impl PortAssignment {
    /// Summed width of the assigned fragments, or `None` if any is unknown.
    pub fn assigned_width(&self) -> Option<u32> {
        self.signals.iter().map(Signal::size).sum()
    }
}

/// A generic (parameter) value supplied by the instantiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generic {
    /// Declared data type of the value.
    pub ty: String,
    /// The value as written.
    pub value: String,
}

/// A single use of an entity or gate type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Source line of the instantiation.
    pub line: u32,
    /// Instance name, unique within the parent entity.
    pub name: String,
    /// Name of the instantiated entity or gate type, resolved during elaboration.
    pub type_name: String,
    /// Port connections in declaration order.
    #[serde(default)]
    pub port_assignments: Vec<PortAssignment>,
    /// Generic assignments by generic name.
    #[serde(default)]
    pub generics: IndexMap<String, Generic>,
    /// Instance attributes.
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Instance {
    /// Creates an instance without connections.
    pub fn new(line: u32, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            line,
            name: name.into(),
            type_name: type_name.into(),
            port_assignments: Vec::new(),
            generics: IndexMap::new(),
            attributes: Vec::new(),
        }
    }

    /// Connects `port` to the concatenation `signals`.
    pub fn add_port_assignment(&mut self, port: Signal, signals: Vec<Signal>) {
        self.port_assignments.push(PortAssignment { port, signals });
    }

    /// Connects the whole port `port` (ranges resolved later) to `signals`.
    pub fn connect(&mut self, port: &str, signals: Vec<Signal>) {
        self.add_port_assignment(Signal::unresolved(self.line, port), signals);
    }

    /// Sets a generic; a later assignment to the same name wins.
    pub fn add_generic(
        &mut self,
        name: impl Into<String>,
        ty: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.generics.insert(
            name.into(),
            Generic {
                ty: ty.into(),
                value: value.into(),
            },
        );
    }

    /// Attaches an attribute.
    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }
}
