//! The netlist object an instantiation produces.

use gatelift_hdl::{Attribute, Generic};
use gatelift_netlist::{
    DataMap, DataValue, GateId, ModuleId, NetId, Netlist, ATTRIBUTE_CATEGORY, GENERIC_CATEGORY,
};
use indexmap::IndexMap;

use crate::context::ElaborationContext;
use crate::errors;

/// What an instance became: a module for an entity, a gate for a library
/// cell. Both receive the instance's attributes and generics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// An elaborated entity.
    Module(ModuleId),
    /// An instantiated gate.
    Gate(GateId),
}

impl Container {
    fn data_mut(self, netlist: &mut Netlist) -> Option<&mut DataMap> {
        match self {
            Container::Module(id) => netlist.module_mut(id).map(|m| m.data_mut()),
            Container::Gate(id) => netlist.gate_mut(id).map(|g| g.data_mut()),
        }
    }

    /// Stores `attributes` under the `attribute` category.
    pub fn apply_attributes(
        self,
        ctx: &mut ElaborationContext<'_>,
        attributes: &[Attribute],
        owner: &str,
        line: u32,
    ) {
        for attribute in attributes {
            let value = DataValue::new(&attribute.ty, &attribute.value);
            match self.data_mut(&mut ctx.netlist) {
                Some(data) => {
                    data.set(ATTRIBUTE_CATEGORY, &attribute.name, value);
                }
                None => ctx.sink.emit(errors::warn_data_write(owner, &attribute.name, line)),
            }
        }
    }

    /// Stores `generics` under the `generic` category.
    pub fn apply_generics(
        self,
        ctx: &mut ElaborationContext<'_>,
        generics: &IndexMap<String, Generic>,
        owner: &str,
        line: u32,
    ) {
        for (name, generic) in generics {
            let value = DataValue::new(&generic.ty, &generic.value);
            match self.data_mut(&mut ctx.netlist) {
                Some(data) => {
                    data.set(GENERIC_CATEGORY, name, value);
                }
                None => ctx.sink.emit(errors::warn_data_write(owner, name, line)),
            }
        }
    }
}

/// Stores signal or port attributes on a net.
pub(crate) fn apply_net_attributes(
    ctx: &mut ElaborationContext<'_>,
    net: NetId,
    attributes: &[Attribute],
    owner: &str,
    line: u32,
) {
    for attribute in attributes {
        let value = DataValue::new(&attribute.ty, &attribute.value);
        match ctx.netlist.net_mut(net) {
            Some(n) => {
                n.data_mut().set(ATTRIBUTE_CATEGORY, &attribute.name, value);
            }
            None => ctx.sink.emit(errors::warn_data_write(owner, &attribute.name, line)),
        }
    }
}
