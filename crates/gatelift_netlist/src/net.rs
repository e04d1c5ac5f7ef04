//! Nets: named wires connecting gate pins.

use crate::data::DataMap;
use crate::ids::{GateId, NetId};
use serde::{Deserialize, Serialize};

/// A `(gate, pin)` attachment point of a net.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Endpoint {
    /// The gate owning the pin.
    pub gate: GateId,
    /// The pin name on the gate's type.
    pub pin: String,
}

impl Endpoint {
    /// Creates a new endpoint.
    pub fn new(gate: GateId, pin: impl Into<String>) -> Self {
        Self {
            gate,
            pin: pin.into(),
        }
    }
}

/// A named wire with driving (source) and sinking (destination) endpoints.
///
/// Endpoint lists are only mutated through [`Netlist`](crate::Netlist) so
/// that the per-gate pin bookkeeping stays consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    id: NetId,
    name: String,
    sources: Vec<Endpoint>,
    destinations: Vec<Endpoint>,
    global_input: bool,
    global_output: bool,
    data: DataMap,
}

impl Net {
    pub(crate) fn new(id: NetId, name: String) -> Self {
        Self {
            id,
            name,
            sources: Vec::new(),
            destinations: Vec::new(),
            global_input: false,
            global_output: false,
            data: DataMap::new(),
        }
    }

    /// The net ID.
    pub fn id(&self) -> NetId {
        self.id
    }

    /// The net name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Driving endpoints in attachment order.
    pub fn sources(&self) -> &[Endpoint] {
        &self.sources
    }

    /// Sinking endpoints in attachment order.
    pub fn destinations(&self) -> &[Endpoint] {
        &self.destinations
    }

    /// Number of driving endpoints.
    pub fn num_sources(&self) -> usize {
        self.sources.len()
    }

    /// Number of sinking endpoints.
    pub fn num_destinations(&self) -> usize {
        self.destinations.len()
    }

    /// Returns `true` if `(gate, pin)` drives this net.
    pub fn is_a_source(&self, gate: GateId, pin: &str) -> bool {
        self.sources.iter().any(|e| e.gate == gate && e.pin == pin)
    }

    /// Returns `true` if `(gate, pin)` sinks this net.
    pub fn is_a_destination(&self, gate: GateId, pin: &str) -> bool {
        self.destinations.iter().any(|e| e.gate == gate && e.pin == pin)
    }

    /// Returns `true` if the net is a global (top-level) input.
    pub fn is_global_input(&self) -> bool {
        self.global_input
    }

    /// Returns `true` if the net is a global (top-level) output.
    pub fn is_global_output(&self) -> bool {
        self.global_output
    }

    /// Returns `true` if the net carries a global input or output marking.
    pub fn is_global(&self) -> bool {
        self.global_input || self.global_output
    }

    /// Returns `true` if nothing drives or sinks this net and it is not global.
    pub fn is_orphan(&self) -> bool {
        self.sources.is_empty() && self.destinations.is_empty() && !self.is_global()
    }

    /// Attribute and generic data attached to the net.
    pub fn data(&self) -> &DataMap {
        &self.data
    }

    /// Mutable access to the net's data.
    pub fn data_mut(&mut self) -> &mut DataMap {
        &mut self.data
    }

    pub(crate) fn push_source(&mut self, endpoint: Endpoint) {
        self.sources.push(endpoint);
    }

    pub(crate) fn push_destination(&mut self, endpoint: Endpoint) {
        self.destinations.push(endpoint);
    }

    pub(crate) fn take_source(&mut self, gate: GateId, pin: &str) -> bool {
        let before = self.sources.len();
        self.sources.retain(|e| !(e.gate == gate && e.pin == pin));
        self.sources.len() != before
    }

    pub(crate) fn take_destination(&mut self, gate: GateId, pin: &str) -> bool {
        let before = self.destinations.len();
        self.destinations.retain(|e| !(e.gate == gate && e.pin == pin));
        self.destinations.len() != before
    }

    pub(crate) fn set_global_input(&mut self, marked: bool) {
        self.global_input = marked;
    }

    pub(crate) fn set_global_output(&mut self, marked: bool) {
        self.global_output = marked;
    }
}
