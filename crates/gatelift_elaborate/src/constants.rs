//! GND/VCC driver gates for constant placeholders and constant-driven nets.

use gatelift_common::{InternalError, Logic};
use gatelift_netlist::NetId;

use crate::context::ElaborationContext;
use crate::errors::ElaborateError;

/// Materializes driver gates for `'0'` and `'1'`. Returns the number of
/// gates created.
///
/// A placeholder net with sinks or a global marking gets a driver; any
/// other placeholder is deleted. Every net tied to a constant by a direct
/// assignment gets its own driver, since a gate pin connects to exactly one
/// net.
pub(crate) fn inject_constants(ctx: &mut ElaborationContext<'_>) -> Result<usize, ElaborateError> {
    let mut created = 0;
    for value in [Logic::Zero, Logic::One] {
        created += inject(ctx, value)?;
    }
    tracing::debug!(created, "injected constant drivers");
    Ok(created)
}

fn inject(ctx: &mut ElaborationContext<'_>, value: Logic) -> Result<usize, ElaborateError> {
    let placeholder = value.token();
    let mut targets: Vec<NetId> = Vec::new();

    if let Some(id) = ctx.resolve_net(&placeholder) {
        let used = ctx
            .netlist
            .net(id)
            .map(|net| net.num_destinations() > 0 || net.is_global());
        match used {
            Some(true) => targets.push(id),
            Some(false) => {
                ctx.netlist.delete_net(id)?;
                ctx.nets.shift_remove(&placeholder);
            }
            None => {}
        }
    }

    let driven: Vec<String> = ctx
        .constant_drives
        .iter()
        .filter(|(_, v)| *v == value)
        .map(|(name, _)| name.clone())
        .collect();
    for name in driven {
        match ctx.resolve_net(&name) {
            Some(id) if !targets.contains(&id) => targets.push(id),
            Some(_) => {}
            None => tracing::trace!(net = %name, "constant-driven net no longer exists"),
        }
    }

    if targets.is_empty() {
        return Ok(0);
    }

    let library = ctx.library;
    let config = ctx.config;
    let (gate_type, base_name, kind) = match value {
        Logic::Zero => (library.gnd_type(), &config.gnd_gate_name, "GND"),
        _ => (library.vcc_type(), &config.vcc_gate_name, "VCC"),
    };
    let gate_type = gate_type.ok_or_else(|| ElaborateError::MissingGndVccType {
        kind: kind.to_string(),
    })?;
    let pin = gate_type.output_pins().first().ok_or_else(|| {
        InternalError::new(format!(
            "{kind} gate type `{}` has no output pin",
            gate_type.name()
        ))
    })?;

    let top = ctx.netlist.top_module();
    ctx.declare_instances(base_name, targets.len());
    for &net in &targets {
        let name = ctx.instance_alias(base_name);
        let gate = ctx.netlist.create_gate(gate_type.name(), name, top)?;
        match value {
            Logic::Zero => ctx.netlist.mark_gnd_gate(gate)?,
            _ => ctx.netlist.mark_vcc_gate(gate)?,
        }
        ctx.netlist.add_source(net, gate, pin)?;
    }
    Ok(targets.len())
}
