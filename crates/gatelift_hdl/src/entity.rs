//! Entity design units and their bit-blasted caches.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::attribute::Attribute;
use crate::expand::{expand, expand_all};
use crate::instance::Instance;
use crate::port::PortDirection;
use crate::signal::Signal;

/// A port of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Direction of data flow.
    pub direction: PortDirection,
    /// The port signal, including its ranges and attributes.
    pub signal: Signal,
}

/// A direct wire assignment `lhs = rhs` between two concatenations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned-to fragments.
    pub lhs: Vec<Signal>,
    /// Assigned-from fragments; may contain literals.
    pub rhs: Vec<Signal>,
}

/// One bit of a direct assignment after expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatAssignment {
    /// Flat name on the assigned-to side.
    pub lhs: String,
    /// Flat name or constant token on the assigned-from side.
    pub rhs: String,
    /// Source line of the assignment.
    pub line: u32,
}

/// Bit-blasted view of an entity, computed by [`Entity::initialize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedEntity {
    /// Port name → flat names.
    pub ports: IndexMap<String, Vec<String>>,
    /// Internal signal name → flat names.
    pub signals: IndexMap<String, Vec<String>>,
    /// Direct assignments, one entry per bit, in declaration order.
    pub assignments: Vec<FlatAssignment>,
}

/// A hierarchical design unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Source line of the declaration.
    pub line: u32,
    /// Entity name.
    pub name: String,
    /// Ports by name.
    #[serde(default)]
    pub ports: IndexMap<String, Port>,
    /// Internal signals by name.
    #[serde(default)]
    pub signals: IndexMap<String, Signal>,
    /// Direct wire assignments.
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    /// Sub-instances by name.
    #[serde(default)]
    pub instances: IndexMap<String, Instance>,
    /// Entity attributes.
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(skip)]
    expanded: Option<ExpandedEntity>,
}

impl Entity {
    /// Creates an empty entity.
    pub fn new(line: u32, name: impl Into<String>) -> Self {
        Self {
            line,
            name: name.into(),
            ports: IndexMap::new(),
            signals: IndexMap::new(),
            assignments: Vec::new(),
            instances: IndexMap::new(),
            attributes: Vec::new(),
            expanded: None,
        }
    }

    /// Adds a port, keyed by the signal name.
    pub fn add_port(&mut self, direction: PortDirection, signal: Signal) {
        self.ports
            .insert(signal.name().to_string(), Port { direction, signal });
    }

    /// Adds an internal signal.
    pub fn add_signal(&mut self, signal: Signal) {
        self.signals.insert(signal.name().to_string(), signal);
    }

    /// Adds a direct assignment `lhs = rhs`.
    pub fn add_assignment(&mut self, lhs: Vec<Signal>, rhs: Vec<Signal>) {
        self.assignments.push(Assignment { lhs, rhs });
    }

    /// Adds a sub-instance, keyed by its name.
    pub fn add_instance(&mut self, instance: Instance) {
        self.instances.insert(instance.name.clone(), instance);
    }

    /// Attaches an attribute.
    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    /// Computes the bit-blasted caches. Calling it again recomputes them.
    ///
    /// Assignments pair the expanded left and right sides positionally; a
    /// side that is longer than the other is truncated.
    pub fn initialize(&mut self) {
        let ports = self
            .ports
            .iter()
            .map(|(name, port)| (name.clone(), expand(&port.signal)))
            .collect();
        let signals = self
            .signals
            .iter()
            .map(|(name, signal)| (name.clone(), expand(signal)))
            .collect();

        let mut assignments = Vec::new();
        for assignment in &self.assignments {
            let line = assignment
                .lhs
                .first()
                .or(assignment.rhs.first())
                .map_or(self.line, Signal::line);
            let lhs = expand_all(&assignment.lhs);
            let rhs = expand_all(&assignment.rhs);
            assignments.extend(
                lhs.into_iter()
                    .zip(rhs)
                    .map(|(lhs, rhs)| FlatAssignment { lhs, rhs, line }),
            );
        }

        self.expanded = Some(ExpandedEntity {
            ports,
            signals,
            assignments,
        });
    }

    /// Returns `true` once [`initialize`](Self::initialize) has run.
    pub fn is_initialized(&self) -> bool {
        self.expanded.is_some()
    }

    /// The bit-blasted caches, if initialized.
    pub fn expanded(&self) -> Option<&ExpandedEntity> {
        self.expanded.as_ref()
    }
}
