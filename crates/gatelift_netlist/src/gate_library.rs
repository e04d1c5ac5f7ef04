//! Gate-library catalogue: the primitive cell types a netlist may instantiate.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Direction of a gate pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinDirection {
    /// A pin that sinks a net (the gate is a destination).
    Input,
    /// A pin that drives a net (the gate is a source).
    Output,
}

impl fmt::Display for PinDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinDirection::Input => write!(f, "input"),
            PinDirection::Output => write!(f, "output"),
        }
    }
}

/// A primitive cell type with ordered pins and optional pin groups.
///
/// A pin group bundles several pins under one bus-like name (e.g. `I` for
/// `I0..I3`); the ordinal keys define the bit positions an HDL instance port
/// with the group's name expands to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateType {
    name: String,
    input_pins: Vec<String>,
    output_pins: Vec<String>,
    input_pin_groups: IndexMap<String, BTreeMap<u32, String>>,
    output_pin_groups: IndexMap<String, BTreeMap<u32, String>>,
}

impl GateType {
    /// Creates a gate type with no pins.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input_pins: Vec::new(),
            output_pins: Vec::new(),
            input_pin_groups: IndexMap::new(),
            output_pin_groups: IndexMap::new(),
        }
    }

    /// Appends input pins in order.
    pub fn with_inputs<I, S>(mut self, pins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_pins.extend(pins.into_iter().map(Into::into));
        self
    }

    /// Appends output pins in order.
    pub fn with_outputs<I, S>(mut self, pins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_pins.extend(pins.into_iter().map(Into::into));
        self
    }

    /// Adds an input pin group. Member pins are registered as input pins too.
    pub fn with_input_group<I, S>(mut self, group: impl Into<String>, pins: I) -> Self
    where
        I: IntoIterator<Item = (u32, S)>,
        S: Into<String>,
    {
        let members = collect_group(&mut self.input_pins, pins);
        self.input_pin_groups.insert(group.into(), members);
        self
    }

    /// Adds an output pin group. Member pins are registered as output pins too.
    pub fn with_output_group<I, S>(mut self, group: impl Into<String>, pins: I) -> Self
    where
        I: IntoIterator<Item = (u32, S)>,
        S: Into<String>,
    {
        let members = collect_group(&mut self.output_pins, pins);
        self.output_pin_groups.insert(group.into(), members);
        self
    }

    /// The type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input pins in declaration order.
    pub fn input_pins(&self) -> &[String] {
        &self.input_pins
    }

    /// Output pins in declaration order.
    pub fn output_pins(&self) -> &[String] {
        &self.output_pins
    }

    /// Returns `true` if `pin` is an input pin.
    pub fn has_input_pin(&self, pin: &str) -> bool {
        self.input_pins.iter().any(|p| p == pin)
    }

    /// Returns `true` if `pin` is an output pin.
    pub fn has_output_pin(&self, pin: &str) -> bool {
        self.output_pins.iter().any(|p| p == pin)
    }

    /// Returns the direction of `pin`, if the type has it.
    pub fn pin_direction(&self, pin: &str) -> Option<PinDirection> {
        if self.has_input_pin(pin) {
            Some(PinDirection::Input)
        } else if self.has_output_pin(pin) {
            Some(PinDirection::Output)
        } else {
            None
        }
    }

    /// Looks up an input or output pin group by name.
    pub fn pin_group(&self, group: &str) -> Option<&BTreeMap<u32, String>> {
        self.input_pin_groups
            .get(group)
            .or_else(|| self.output_pin_groups.get(group))
    }

    /// Input pin groups in declaration order.
    pub fn input_pin_groups(&self) -> &IndexMap<String, BTreeMap<u32, String>> {
        &self.input_pin_groups
    }

    /// Output pin groups in declaration order.
    pub fn output_pin_groups(&self) -> &IndexMap<String, BTreeMap<u32, String>> {
        &self.output_pin_groups
    }
}

fn collect_group<I, S>(pins: &mut Vec<String>, members: I) -> BTreeMap<u32, String>
where
    I: IntoIterator<Item = (u32, S)>,
    S: Into<String>,
{
    let members: BTreeMap<u32, String> = members
        .into_iter()
        .map(|(index, pin)| (index, pin.into()))
        .collect();
    for pin in members.values() {
        if !pins.contains(pin) {
            pins.push(pin.clone());
        }
    }
    members
}

/// A named set of gate types plus the types acting as global GND/VCC sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateLibrary {
    name: String,
    gate_types: IndexMap<String, GateType>,
    gnd_types: IndexSet<String>,
    vcc_types: IndexSet<String>,
}

impl GateLibrary {
    /// Creates an empty library.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The library name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a gate type, replacing any type of the same name.
    pub fn add_gate_type(&mut self, gate_type: GateType) {
        self.gate_types.insert(gate_type.name.clone(), gate_type);
    }

    /// Builder form of [`add_gate_type`](Self::add_gate_type).
    pub fn with_gate_type(mut self, gate_type: GateType) -> Self {
        self.add_gate_type(gate_type);
        self
    }

    /// Registers a gate type and flags it as a global GND source.
    pub fn with_gnd_type(mut self, gate_type: GateType) -> Self {
        self.gnd_types.insert(gate_type.name.clone());
        self.add_gate_type(gate_type);
        self
    }

    /// Registers a gate type and flags it as a global VCC source.
    pub fn with_vcc_type(mut self, gate_type: GateType) -> Self {
        self.vcc_types.insert(gate_type.name.clone());
        self.add_gate_type(gate_type);
        self
    }

    /// Looks up a gate type by name.
    pub fn gate_type(&self, name: &str) -> Option<&GateType> {
        self.gate_types.get(name)
    }

    /// All gate types in registration order.
    pub fn gate_types(&self) -> impl Iterator<Item = &GateType> {
        self.gate_types.values()
    }

    /// Returns `true` if `name` is flagged as a GND source.
    pub fn is_gnd_type(&self, name: &str) -> bool {
        self.gnd_types.contains(name)
    }

    /// Returns `true` if `name` is flagged as a VCC source.
    pub fn is_vcc_type(&self, name: &str) -> bool {
        self.vcc_types.contains(name)
    }

    /// The first registered GND type.
    pub fn gnd_type(&self) -> Option<&GateType> {
        self.gnd_types.iter().find_map(|name| self.gate_types.get(name))
    }

    /// The first registered VCC type.
    pub fn vcc_type(&self) -> Option<&GateType> {
        self.vcc_types.iter().find_map(|name| self.gate_types.get(name))
    }
}
