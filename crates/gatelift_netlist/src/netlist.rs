//! The netlist graph and its builder operations.

use crate::arena::Arena;
use crate::error::NetlistError;
use crate::gate::Gate;
use crate::gate_library::{GateLibrary, PinDirection};
use crate::ids::{GateId, ModuleId, NetId};
use crate::module::Module;
use crate::net::{Endpoint, Net};
use gatelift_common::{ContentHash, ContentHasher};
use serde::{Deserialize, Serialize};

/// A flat gate-level netlist with a module hierarchy.
///
/// The netlist owns a copy of the [`GateLibrary`] its gates instantiate, and
/// validates every pin attachment against it. Each gate pin connects to at
/// most one net; attempting to wire it to a second net is an error rather than
/// a silent rewire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Netlist {
    design_name: String,
    library: GateLibrary,
    nets: Arena<NetId, Net>,
    gates: Arena<GateId, Gate>,
    modules: Arena<ModuleId, Module>,
    top_module: ModuleId,
}

impl Netlist {
    /// Name given to the top module until the caller renames it.
    pub const DEFAULT_TOP_MODULE_NAME: &'static str = "top_module";

    /// Creates an empty netlist with a top module.
    pub fn new(library: GateLibrary) -> Self {
        let mut modules = Arena::new();
        let top_module = modules.next_id();
        modules.alloc(Module::new(
            top_module,
            Self::DEFAULT_TOP_MODULE_NAME.to_string(),
            None,
        ));
        Self {
            design_name: String::new(),
            library,
            nets: Arena::new(),
            gates: Arena::new(),
            modules,
            top_module,
        }
    }

    /// The design name.
    pub fn design_name(&self) -> &str {
        &self.design_name
    }

    /// Sets the design name.
    pub fn set_design_name(&mut self, name: impl Into<String>) {
        self.design_name = name.into();
    }

    /// The gate library the netlist instantiates from.
    pub fn library(&self) -> &GateLibrary {
        &self.library
    }

    /// The root of the module hierarchy.
    pub fn top_module(&self) -> ModuleId {
        self.top_module
    }

    // ---- creation / deletion ----

    /// Creates an unconnected net.
    pub fn create_net(&mut self, name: impl Into<String>) -> NetId {
        let id = self.nets.next_id();
        self.nets.alloc(Net::new(id, name.into()))
    }

    /// Creates a module under `parent`.
    pub fn create_module(
        &mut self,
        name: impl Into<String>,
        parent: ModuleId,
    ) -> Result<ModuleId, NetlistError> {
        if !self.modules.contains(parent) {
            return Err(NetlistError::UnknownModule(parent));
        }
        let id = self.modules.next_id();
        self.modules.alloc(Module::new(id, name.into(), Some(parent)));
        if let Some(parent) = self.modules.get_mut(parent) {
            parent.push_submodule(id);
        }
        Ok(id)
    }

    /// Creates a gate of library type `type_name` inside `module`.
    pub fn create_gate(
        &mut self,
        type_name: &str,
        name: impl Into<String>,
        module: ModuleId,
    ) -> Result<GateId, NetlistError> {
        if self.library.gate_type(type_name).is_none() {
            return Err(NetlistError::UnknownGateType {
                type_name: type_name.to_string(),
                library: self.library.name().to_string(),
            });
        }
        let parent = self
            .modules
            .get_mut(module)
            .ok_or(NetlistError::UnknownModule(module))?;
        let id = self.gates.next_id();
        parent.push_gate(id);
        self.gates
            .alloc(Gate::new(id, name.into(), type_name.to_string(), module));
        Ok(id)
    }

    /// Deletes a net, detaching it from every gate pin and module port.
    pub fn delete_net(&mut self, id: NetId) -> Result<Net, NetlistError> {
        let net = self.nets.remove(id).ok_or(NetlistError::UnknownNet(id))?;
        for endpoint in net.sources() {
            if let Some(gate) = self.gates.get_mut(endpoint.gate) {
                gate.fan_out_mut().remove(&endpoint.pin);
            }
        }
        for endpoint in net.destinations() {
            if let Some(gate) = self.gates.get_mut(endpoint.gate) {
                gate.fan_in_mut().remove(&endpoint.pin);
            }
        }
        for module in self.modules.values_mut() {
            module.forget_net(id);
        }
        Ok(net)
    }

    // ---- connectivity ----

    /// Attaches output `pin` of `gate` as a driver of `net`.
    pub fn add_source(&mut self, net: NetId, gate: GateId, pin: &str) -> Result<(), NetlistError> {
        self.check_attach(net, gate, pin, PinDirection::Output)?;
        if let Some(n) = self.nets.get_mut(net) {
            n.push_source(Endpoint::new(gate, pin));
        }
        if let Some(g) = self.gates.get_mut(gate) {
            g.fan_out_mut().insert(pin.to_string(), net);
        }
        Ok(())
    }

    /// Attaches input `pin` of `gate` as a sink of `net`.
    pub fn add_destination(
        &mut self,
        net: NetId,
        gate: GateId,
        pin: &str,
    ) -> Result<(), NetlistError> {
        self.check_attach(net, gate, pin, PinDirection::Input)?;
        if let Some(n) = self.nets.get_mut(net) {
            n.push_destination(Endpoint::new(gate, pin));
        }
        if let Some(g) = self.gates.get_mut(gate) {
            g.fan_in_mut().insert(pin.to_string(), net);
        }
        Ok(())
    }

    /// Detaches a driver; returns `false` if it was not attached.
    pub fn remove_source(
        &mut self,
        net: NetId,
        gate: GateId,
        pin: &str,
    ) -> Result<bool, NetlistError> {
        let n = self.nets.get_mut(net).ok_or(NetlistError::UnknownNet(net))?;
        let removed = n.take_source(gate, pin);
        if removed {
            if let Some(g) = self.gates.get_mut(gate) {
                if g.fan_out_net(pin) == Some(net) {
                    g.fan_out_mut().remove(pin);
                }
            }
        }
        Ok(removed)
    }

    /// Detaches a sink; returns `false` if it was not attached.
    pub fn remove_destination(
        &mut self,
        net: NetId,
        gate: GateId,
        pin: &str,
    ) -> Result<bool, NetlistError> {
        let n = self.nets.get_mut(net).ok_or(NetlistError::UnknownNet(net))?;
        let removed = n.take_destination(gate, pin);
        if removed {
            if let Some(g) = self.gates.get_mut(gate) {
                if g.fan_in_net(pin) == Some(net) {
                    g.fan_in_mut().remove(pin);
                }
            }
        }
        Ok(removed)
    }

    /// Returns `true` if `(gate, pin)` drives `net`.
    pub fn is_a_source(&self, net: NetId, gate: GateId, pin: &str) -> bool {
        self.nets.get(net).is_some_and(|n| n.is_a_source(gate, pin))
    }

    /// Returns `true` if `(gate, pin)` sinks `net`.
    pub fn is_a_destination(&self, net: NetId, gate: GateId, pin: &str) -> bool {
        self.nets
            .get(net)
            .is_some_and(|n| n.is_a_destination(gate, pin))
    }

    fn check_attach(
        &self,
        net: NetId,
        gate: GateId,
        pin: &str,
        direction: PinDirection,
    ) -> Result<(), NetlistError> {
        let n = self.nets.get(net).ok_or(NetlistError::UnknownNet(net))?;
        let g = self.gates.get(gate).ok_or(NetlistError::UnknownGate(gate))?;
        let has_pin = self
            .library
            .gate_type(g.type_name())
            .is_some_and(|ty| match direction {
                PinDirection::Input => ty.has_input_pin(pin),
                PinDirection::Output => ty.has_output_pin(pin),
            });
        if !has_pin {
            return Err(NetlistError::InvalidPin {
                pin: pin.to_string(),
                gate: g.name().to_string(),
                gate_type: g.type_name().to_string(),
                direction,
            });
        }
        let (attached, existing) = match direction {
            PinDirection::Input => (n.is_a_destination(gate, pin), g.fan_in_net(pin)),
            PinDirection::Output => (n.is_a_source(gate, pin), g.fan_out_net(pin)),
        };
        if attached {
            return Err(NetlistError::DuplicateEndpoint {
                pin: pin.to_string(),
                gate: g.name().to_string(),
                net: n.name().to_string(),
            });
        }
        if let Some(other) = existing.filter(|other| *other != net) {
            let existing = self
                .nets
                .get(other)
                .map_or_else(|| other.to_string(), |o| o.name().to_string());
            return Err(NetlistError::PinAlreadyConnected {
                pin: pin.to_string(),
                gate: g.name().to_string(),
                existing,
                requested: n.name().to_string(),
            });
        }
        Ok(())
    }

    // ---- marking ----

    /// Marks `net` as a global input of the design.
    pub fn mark_global_input_net(&mut self, net: NetId) -> Result<(), NetlistError> {
        self.nets
            .get_mut(net)
            .ok_or(NetlistError::UnknownNet(net))?
            .set_global_input(true);
        Ok(())
    }

    /// Marks `net` as a global output of the design.
    pub fn mark_global_output_net(&mut self, net: NetId) -> Result<(), NetlistError> {
        self.nets
            .get_mut(net)
            .ok_or(NetlistError::UnknownNet(net))?
            .set_global_output(true);
        Ok(())
    }

    /// Flags `gate` as a global GND source.
    pub fn mark_gnd_gate(&mut self, gate: GateId) -> Result<(), NetlistError> {
        self.gates
            .get_mut(gate)
            .ok_or(NetlistError::UnknownGate(gate))?
            .set_gnd();
        Ok(())
    }

    /// Flags `gate` as a global VCC source.
    pub fn mark_vcc_gate(&mut self, gate: GateId) -> Result<(), NetlistError> {
        self.gates
            .get_mut(gate)
            .ok_or(NetlistError::UnknownGate(gate))?
            .set_vcc();
        Ok(())
    }

    /// Moves `gate` into `module`.
    pub fn assign_gate(&mut self, module: ModuleId, gate: GateId) -> Result<(), NetlistError> {
        if !self.modules.contains(module) {
            return Err(NetlistError::UnknownModule(module));
        }
        let g = self.gates.get_mut(gate).ok_or(NetlistError::UnknownGate(gate))?;
        let previous = g.module();
        g.set_module(module);
        if let Some(old) = self.modules.get_mut(previous) {
            old.take_gate(gate);
        }
        if let Some(new) = self.modules.get_mut(module) {
            new.push_gate(gate);
        }
        Ok(())
    }

    // ---- lookup ----

    /// Looks up a live net.
    pub fn net(&self, id: NetId) -> Option<&Net> {
        self.nets.get(id)
    }

    /// Mutable access to a live net's name-independent state (data).
    pub fn net_mut(&mut self, id: NetId) -> Option<&mut Net> {
        self.nets.get_mut(id)
    }

    /// Looks up a gate.
    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(id)
    }

    /// Mutable access to a gate's data.
    pub fn gate_mut(&mut self, id: GateId) -> Option<&mut Gate> {
        self.gates.get_mut(id)
    }

    /// Looks up a module.
    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(id)
    }

    /// Mutable access to a module.
    pub fn module_mut(&mut self, id: ModuleId) -> Option<&mut Module> {
        self.modules.get_mut(id)
    }

    /// Live nets in creation order.
    pub fn nets(&self) -> impl Iterator<Item = &Net> {
        self.nets.values()
    }

    /// Gates in creation order.
    pub fn gates(&self) -> impl Iterator<Item = &Gate> {
        self.gates.values()
    }

    /// Modules in creation order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// Number of live nets.
    pub fn num_nets(&self) -> usize {
        self.nets.len()
    }

    /// Number of gates.
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// Number of modules, including the top module.
    pub fn num_modules(&self) -> usize {
        self.modules.len()
    }

    /// The first live net named `name`.
    pub fn net_by_name(&self, name: &str) -> Option<&Net> {
        self.nets.values().find(|n| n.name() == name)
    }

    /// The first gate named `name`.
    pub fn gate_by_name(&self, name: &str) -> Option<&Gate> {
        self.gates.values().find(|g| g.name() == name)
    }

    /// The first module named `name`.
    pub fn module_by_name(&self, name: &str) -> Option<&Module> {
        self.modules.values().find(|m| m.name() == name)
    }

    /// Nets marked as global inputs.
    pub fn global_input_nets(&self) -> Vec<NetId> {
        self.nets
            .iter()
            .filter(|(_, n)| n.is_global_input())
            .map(|(id, _)| id)
            .collect()
    }

    /// Nets marked as global outputs.
    pub fn global_output_nets(&self) -> Vec<NetId> {
        self.nets
            .iter()
            .filter(|(_, n)| n.is_global_output())
            .map(|(id, _)| id)
            .collect()
    }

    /// Gates flagged as GND sources.
    pub fn gnd_gates(&self) -> Vec<GateId> {
        self.gates
            .iter()
            .filter(|(_, g)| g.is_gnd())
            .map(|(id, _)| id)
            .collect()
    }

    /// Gates flagged as VCC sources.
    pub fn vcc_gates(&self) -> Vec<GateId> {
        self.gates
            .iter()
            .filter(|(_, g)| g.is_vcc())
            .map(|(id, _)| id)
            .collect()
    }

    /// Pre-order walk of the hierarchy below (and including) `root`.
    pub fn module_tree(&self, root: ModuleId) -> Vec<ModuleId> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(module) = self.modules.get(id) else {
                continue;
            };
            order.push(id);
            stack.extend(module.submodules().iter().rev().copied());
        }
        order
    }

    /// Computes a fingerprint over names, hierarchy, connectivity, and data.
    ///
    /// Objects are visited in creation order, so two netlists share a
    /// fingerprint only if they were built identically.
    pub fn fingerprint(&self) -> ContentHash {
        let mut hasher = ContentHasher::new();
        let net_name = |id: &NetId| self.nets.get(*id).map_or("", Net::name);
        let gate_name = |id: GateId| self.gates.get(id).map_or("", Gate::name);
        let module_name = |id: ModuleId| self.modules.get(id).map_or("", Module::name);

        hasher.field("design").field(&self.design_name);
        for module in self.modules.values() {
            hasher
                .field("module")
                .field(module.name())
                .field(module.type_name())
                .field(module.parent().map_or("", module_name));
            for (net, port) in module.input_ports() {
                hasher.field("in").field(net_name(net)).field(port);
            }
            for (net, port) in module.output_ports() {
                hasher.field("out").field(net_name(net)).field(port);
            }
            for (category, key, value) in module.data().iter() {
                hasher.field(category).field(key).field(&value.ty).field(&value.value);
            }
        }
        for gate in self.gates.values() {
            hasher
                .field("gate")
                .field(gate.name())
                .field(gate.type_name())
                .field(module_name(gate.module()))
                .field([u8::from(gate.is_gnd()), u8::from(gate.is_vcc())]);
            for (category, key, value) in gate.data().iter() {
                hasher.field(category).field(key).field(&value.ty).field(&value.value);
            }
        }
        for net in self.nets.values() {
            hasher
                .field("net")
                .field(net.name())
                .field([u8::from(net.is_global_input()), u8::from(net.is_global_output())]);
            for endpoint in net.sources() {
                hasher.field("src").field(gate_name(endpoint.gate)).field(&endpoint.pin);
            }
            for endpoint in net.destinations() {
                hasher.field("dst").field(gate_name(endpoint.gate)).field(&endpoint.pin);
            }
            for (category, key, value) in net.data().iter() {
                hasher.field(category).field(key).field(&value.ty).field(&value.value);
            }
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataValue, ATTRIBUTE_CATEGORY};
    use crate::gate_library::GateType;

    fn library() -> GateLibrary {
        GateLibrary::new("test")
            .with_gate_type(GateType::new("AND2").with_inputs(["A", "B"]).with_outputs(["Y"]))
            .with_gate_type(GateType::new("INV").with_inputs(["A"]).with_outputs(["Y"]))
            .with_vcc_type(GateType::new("VCC").with_outputs(["O"]))
    }

    #[test]
    fn new_netlist_has_top_module() {
        let nl = Netlist::new(library());
        let top = nl.module(nl.top_module()).unwrap();
        assert_eq!(top.name(), Netlist::DEFAULT_TOP_MODULE_NAME);
        assert!(top.parent().is_none());
        assert_eq!(nl.num_modules(), 1);
        assert_eq!(nl.num_nets(), 0);
    }

    #[test]
    fn create_gate_rejects_unknown_type() {
        let mut nl = Netlist::new(library());
        let top = nl.top_module();
        let err = nl.create_gate("XOR2", "u1", top).unwrap_err();
        assert!(matches!(err, NetlistError::UnknownGateType { .. }));
    }

    #[test]
    fn connect_gate() {
        let mut nl = Netlist::new(library());
        let top = nl.top_module();
        let g = nl.create_gate("AND2", "u1", top).unwrap();
        let a = nl.create_net("a");
        let y = nl.create_net("y");
        nl.add_destination(a, g, "A").unwrap();
        nl.add_source(y, g, "Y").unwrap();
        assert!(nl.is_a_destination(a, g, "A"));
        assert!(nl.is_a_source(y, g, "Y"));
        assert_eq!(nl.gate(g).unwrap().fan_in_net("A"), Some(a));
        assert_eq!(nl.module(top).unwrap().gates(), [g]);
    }

    #[test]
    fn wrong_pin_direction_is_rejected() {
        let mut nl = Netlist::new(library());
        let top = nl.top_module();
        let g = nl.create_gate("AND2", "u1", top).unwrap();
        let a = nl.create_net("a");
        let err = nl.add_source(a, g, "A").unwrap_err();
        assert!(matches!(
            err,
            NetlistError::InvalidPin { direction: PinDirection::Output, .. }
        ));
    }

    #[test]
    fn duplicate_endpoint_is_rejected() {
        let mut nl = Netlist::new(library());
        let top = nl.top_module();
        let g = nl.create_gate("INV", "u1", top).unwrap();
        let a = nl.create_net("a");
        nl.add_destination(a, g, "A").unwrap();
        let err = nl.add_destination(a, g, "A").unwrap_err();
        assert!(matches!(err, NetlistError::DuplicateEndpoint { .. }));
    }

    #[test]
    fn pin_cannot_drive_two_nets() {
        let mut nl = Netlist::new(library());
        let top = nl.top_module();
        let g = nl.create_gate("INV", "u1", top).unwrap();
        let y1 = nl.create_net("y1");
        let y2 = nl.create_net("y2");
        nl.add_source(y1, g, "Y").unwrap();
        let err = nl.add_source(y2, g, "Y").unwrap_err();
        assert_eq!(
            err,
            NetlistError::PinAlreadyConnected {
                pin: "Y".into(),
                gate: "u1".into(),
                existing: "y1".into(),
                requested: "y2".into(),
            }
        );
    }

    #[test]
    fn remove_then_reattach_elsewhere() {
        let mut nl = Netlist::new(library());
        let top = nl.top_module();
        let g = nl.create_gate("INV", "u1", top).unwrap();
        let y1 = nl.create_net("y1");
        let y2 = nl.create_net("y2");
        nl.add_source(y1, g, "Y").unwrap();
        assert!(nl.remove_source(y1, g, "Y").unwrap());
        assert!(!nl.remove_source(y1, g, "Y").unwrap());
        nl.add_source(y2, g, "Y").unwrap();
        assert_eq!(nl.gate(g).unwrap().fan_out_net("Y"), Some(y2));
    }

    #[test]
    fn delete_net_detaches_everything() {
        let mut nl = Netlist::new(library());
        let top = nl.top_module();
        let g = nl.create_gate("INV", "u1", top).unwrap();
        let a = nl.create_net("a");
        nl.add_destination(a, g, "A").unwrap();
        nl.module_mut(top).unwrap().set_input_port_name(a, "a");
        let deleted = nl.delete_net(a).unwrap();
        assert_eq!(deleted.name(), "a");
        assert!(nl.net(a).is_none());
        assert!(nl.gate(g).unwrap().fan_in().is_empty());
        assert!(nl.module(top).unwrap().input_ports().is_empty());
        assert_eq!(nl.delete_net(a).unwrap_err(), NetlistError::UnknownNet(a));
    }

    #[test]
    fn global_marking_and_queries() {
        let mut nl = Netlist::new(library());
        let a = nl.create_net("a");
        let y = nl.create_net("y");
        nl.mark_global_input_net(a).unwrap();
        nl.mark_global_output_net(y).unwrap();
        assert_eq!(nl.global_input_nets(), vec![a]);
        assert_eq!(nl.global_output_nets(), vec![y]);
        assert_eq!(nl.net_by_name("y").map(Net::id), Some(y));
    }

    #[test]
    fn vcc_marking() {
        let mut nl = Netlist::new(library());
        let top = nl.top_module();
        let g = nl.create_gate("VCC", "global_vcc", top).unwrap();
        nl.mark_vcc_gate(g).unwrap();
        assert_eq!(nl.vcc_gates(), vec![g]);
        assert!(nl.gnd_gates().is_empty());
    }

    #[test]
    fn module_hierarchy_and_assign_gate() {
        let mut nl = Netlist::new(library());
        let top = nl.top_module();
        let sub = nl.create_module("u_sub", top).unwrap();
        let leaf = nl.create_module("u_leaf", sub).unwrap();
        let other = nl.create_module("u_other", top).unwrap();
        assert_eq!(nl.module_tree(top), vec![top, sub, leaf, other]);

        let g = nl.create_gate("INV", "u1", top).unwrap();
        nl.assign_gate(leaf, g).unwrap();
        assert!(nl.module(top).unwrap().gates().is_empty());
        assert_eq!(nl.module(leaf).unwrap().gates(), [g]);
        assert_eq!(nl.gate(g).unwrap().module(), leaf);
    }

    #[test]
    fn fingerprint_tracks_structure() {
        let build = |with_attr: bool| {
            let mut nl = Netlist::new(library());
            nl.set_design_name("top");
            let top = nl.top_module();
            let g = nl.create_gate("INV", "u1", top).unwrap();
            let a = nl.create_net("a");
            nl.add_destination(a, g, "A").unwrap();
            if with_attr {
                nl.net_mut(a)
                    .unwrap()
                    .data_mut()
                    .set(ATTRIBUTE_CATEGORY, "keep", DataValue::new("boolean", "true"));
            }
            nl.fingerprint()
        };
        assert_eq!(build(false), build(false));
        assert_ne!(build(false), build(true));
    }

    #[test]
    fn serde_roundtrip_preserves_fingerprint() {
        let mut nl = Netlist::new(library());
        let top = nl.top_module();
        let g = nl.create_gate("AND2", "u1", top).unwrap();
        let y = nl.create_net("y");
        nl.add_source(y, g, "Y").unwrap();
        nl.module_mut(top).unwrap().set_output_port_name(y, "y");
        let json = serde_json::to_string(&nl).unwrap();
        let back: Netlist = serde_json::from_str(&json).unwrap();
        assert_eq!(nl.fingerprint(), back.fingerprint());
    }
}
