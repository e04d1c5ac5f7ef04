//! Modules: the hierarchy gates are grouped into.

use crate::data::DataMap;
use crate::ids::{GateId, ModuleId, NetId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A node of the module hierarchy.
///
/// Port names map a net crossing the module boundary to the name of the
/// entity port it was bound to. A net may be named as both an input and an
/// output port (inout).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    id: ModuleId,
    name: String,
    type_name: String,
    parent: Option<ModuleId>,
    submodules: Vec<ModuleId>,
    gates: Vec<GateId>,
    input_ports: BTreeMap<NetId, String>,
    output_ports: BTreeMap<NetId, String>,
    data: DataMap,
}

impl Module {
    pub(crate) fn new(id: ModuleId, name: String, parent: Option<ModuleId>) -> Self {
        Self {
            id,
            name,
            type_name: String::new(),
            parent,
            submodules: Vec::new(),
            gates: Vec::new(),
            input_ports: BTreeMap::new(),
            output_ports: BTreeMap::new(),
            data: DataMap::new(),
        }
    }

    /// The module ID.
    pub fn id(&self) -> ModuleId {
        self.id
    }

    /// The instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The module type (the entity it was elaborated from).
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The parent module, `None` for the top module.
    pub fn parent(&self) -> Option<ModuleId> {
        self.parent
    }

    /// Direct submodules in creation order.
    pub fn submodules(&self) -> &[ModuleId] {
        &self.submodules
    }

    /// Gates directly assigned to this module, in assignment order.
    pub fn gates(&self) -> &[GateId] {
        &self.gates
    }

    /// Input port names keyed by net.
    pub fn input_ports(&self) -> &BTreeMap<NetId, String> {
        &self.input_ports
    }

    /// Output port names keyed by net.
    pub fn output_ports(&self) -> &BTreeMap<NetId, String> {
        &self.output_ports
    }

    /// The input port name bound to `net`, if any.
    pub fn input_port_name(&self, net: NetId) -> Option<&str> {
        self.input_ports.get(&net).map(String::as_str)
    }

    /// The output port name bound to `net`, if any.
    pub fn output_port_name(&self, net: NetId) -> Option<&str> {
        self.output_ports.get(&net).map(String::as_str)
    }

    /// Attribute and generic data attached to the module.
    pub fn data(&self) -> &DataMap {
        &self.data
    }

    /// Mutable access to the module's data.
    pub fn data_mut(&mut self) -> &mut DataMap {
        &mut self.data
    }

    /// Sets the instance name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Sets the module type.
    pub fn set_type(&mut self, type_name: impl Into<String>) {
        self.type_name = type_name.into();
    }

    /// Binds `net` to the input port `name`.
    pub fn set_input_port_name(&mut self, net: NetId, name: impl Into<String>) {
        self.input_ports.insert(net, name.into());
    }

    /// Binds `net` to the output port `name`.
    pub fn set_output_port_name(&mut self, net: NetId, name: impl Into<String>) {
        self.output_ports.insert(net, name.into());
    }

    pub(crate) fn push_submodule(&mut self, module: ModuleId) {
        self.submodules.push(module);
    }

    pub(crate) fn push_gate(&mut self, gate: GateId) {
        if !self.gates.contains(&gate) {
            self.gates.push(gate);
        }
    }

    pub(crate) fn take_gate(&mut self, gate: GateId) {
        self.gates.retain(|g| *g != gate);
    }

    pub(crate) fn forget_net(&mut self, net: NetId) {
        self.input_ports.remove(&net);
        self.output_ports.remove(&net);
    }
}
