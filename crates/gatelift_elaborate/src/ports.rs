//! Top-level I/O nets and module port names.

use gatelift_hdl::{Entity, PortDirection};

use crate::context::{expanded, ElaborationContext};
use crate::errors::ElaborateError;
use crate::instantiate::Bindings;

/// Creates one global net per flat top port name and returns the bindings
/// the top entity is instantiated with.
pub(crate) fn create_top_ports(
    ctx: &mut ElaborationContext<'_>,
    top: &Entity,
) -> Result<Bindings, ElaborateError> {
    let expanded = expanded(top)?;
    let mut bindings = Bindings::new();
    for (port_name, port) in &top.ports {
        let Some(flat_names) = expanded.ports.get(port_name) else {
            continue;
        };
        for flat in flat_names {
            let net = ctx.create_net(flat);
            if port.direction.is_input() {
                ctx.netlist.mark_global_input_net(net)?;
            }
            if port.direction.is_output() {
                ctx.netlist.mark_global_output_net(net)?;
            }
            bindings.insert(flat.clone(), flat.clone());
        }
    }
    tracing::debug!(nets = bindings.len(), "created top-level port nets");
    Ok(bindings)
}

/// Applies the port bindings collected during instantiation to the nets that
/// survived merging. Returns the number of bindings applied.
pub(crate) fn assign_module_ports(ctx: &mut ElaborationContext<'_>) -> usize {
    let pending = std::mem::take(&mut ctx.pending_ports);
    let mut applied = 0;
    for (net_name, ports) in pending {
        let Some(net) = ctx.resolve_net(&net_name) else {
            tracing::trace!(net = %net_name, "dropping port binding of deleted net");
            continue;
        };
        for port in ports {
            let Some(module) = ctx.netlist.module_mut(port.module) else {
                continue;
            };
            if matches!(port.direction, PortDirection::Input | PortDirection::InOut) {
                module.set_input_port_name(net, port.port_name.clone());
            }
            if matches!(port.direction, PortDirection::Output | PortDirection::InOut) {
                module.set_output_port_name(net, port.port_name);
            }
            applied += 1;
        }
    }
    tracing::debug!(applied, "assigned module port names");
    applied
}
