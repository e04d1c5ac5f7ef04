//! Gates: instances of library cell types.

use crate::data::DataMap;
use crate::ids::{GateId, ModuleId, NetId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An instantiated gate and the nets its pins connect to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    id: GateId,
    name: String,
    type_name: String,
    module: ModuleId,
    fan_in: BTreeMap<String, NetId>,
    fan_out: BTreeMap<String, NetId>,
    is_gnd: bool,
    is_vcc: bool,
    data: DataMap,
}

impl Gate {
    pub(crate) fn new(id: GateId, name: String, type_name: String, module: ModuleId) -> Self {
        Self {
            id,
            name,
            type_name,
            module,
            fan_in: BTreeMap::new(),
            fan_out: BTreeMap::new(),
            is_gnd: false,
            is_vcc: false,
            data: DataMap::new(),
        }
    }

    /// The gate ID.
    pub fn id(&self) -> GateId {
        self.id
    }

    /// The instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The library type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The module the gate is assigned to.
    pub fn module(&self) -> ModuleId {
        self.module
    }

    /// Input pin to net connections, sorted by pin name.
    pub fn fan_in(&self) -> &BTreeMap<String, NetId> {
        &self.fan_in
    }

    /// Output pin to net connections, sorted by pin name.
    pub fn fan_out(&self) -> &BTreeMap<String, NetId> {
        &self.fan_out
    }

    /// The net connected to input `pin`, if any.
    pub fn fan_in_net(&self, pin: &str) -> Option<NetId> {
        self.fan_in.get(pin).copied()
    }

    /// The net connected to output `pin`, if any.
    pub fn fan_out_net(&self, pin: &str) -> Option<NetId> {
        self.fan_out.get(pin).copied()
    }

    /// Returns `true` if the gate is a global GND source.
    pub fn is_gnd(&self) -> bool {
        self.is_gnd
    }

    /// Returns `true` if the gate is a global VCC source.
    pub fn is_vcc(&self) -> bool {
        self.is_vcc
    }

    /// Attribute and generic data attached to the gate.
    pub fn data(&self) -> &DataMap {
        &self.data
    }

    /// Mutable access to the gate's data.
    pub fn data_mut(&mut self) -> &mut DataMap {
        &mut self.data
    }

    pub(crate) fn set_module(&mut self, module: ModuleId) {
        self.module = module;
    }

    pub(crate) fn fan_in_mut(&mut self) -> &mut BTreeMap<String, NetId> {
        &mut self.fan_in
    }

    pub(crate) fn fan_out_mut(&mut self) -> &mut BTreeMap<String, NetId> {
        &mut self.fan_out
    }

    pub(crate) fn set_gnd(&mut self) {
        self.is_gnd = true;
    }

    pub(crate) fn set_vcc(&mut self) {
        self.is_vcc = true;
    }
}
