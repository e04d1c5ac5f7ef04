//! Pre-elaboration checks and port range resolution.
//!
//! Runs on the mutable design before any netlist object exists: lazily
//! initializes entities, fills in the ranges of instance ports that were
//! written as bare names, and checks every port connection's width. Unused
//! entities are reported once the alias walk has counted instantiations.

use gatelift_config::ElaborateConfig;
use gatelift_diagnostics::DiagnosticSink;
use gatelift_hdl::{HdlDesign, Instance};
use gatelift_netlist::GateLibrary;
use indexmap::IndexMap;

use crate::context::ElaborationContext;
use crate::errors::{self, ElaborateError};

/// Port ranges per entity, snapshotted before instances are mutated.
type PortRanges = IndexMap<String, IndexMap<String, Vec<Vec<u32>>>>;

/// Returns the name of the entity elaboration starts from.
pub fn select_top<'d>(
    design: &'d HdlDesign,
    config: &ElaborateConfig,
) -> Result<&'d str, ElaborateError> {
    match &config.top {
        Some(name) => design
            .entity(name)
            .map(|e| e.name.as_str())
            .ok_or_else(|| ElaborateError::UnknownTopEntity { name: name.clone() }),
        None => design.last_entity_name().ok_or(ElaborateError::NoEntities),
    }
}

/// Validates `design` in place.
pub fn validate_design(
    design: &mut HdlDesign,
    library: &GateLibrary,
    sink: &DiagnosticSink,
) -> Result<(), ElaborateError> {
    for entity in design.entities.values_mut() {
        if !entity.is_initialized() {
            sink.emit(errors::warn_uninitialized_entity(&entity.name, entity.line));
            entity.initialize();
        }
    }

    let port_ranges: PortRanges = design
        .entities
        .iter()
        .map(|(name, entity)| {
            let ports = entity
                .ports
                .iter()
                .map(|(port, p)| (port.clone(), p.signal.ranges().to_vec()))
                .collect();
            (name.clone(), ports)
        })
        .collect();

    let mut resolved = 0usize;
    for entity in design.entities.values_mut() {
        for instance in entity.instances.values_mut() {
            resolved += resolve_instance_ports(instance, &port_ranges, library)?;
        }
    }
    tracing::debug!(resolved, "resolved instance port ranges");
    Ok(())
}

/// Warns about every entity the instantiation walk from the top never
/// reached. Unused entities stay in the design.
pub(crate) fn report_unused_entities(ctx: &ElaborationContext<'_>) -> usize {
    if !ctx.config.warn_unused_entities {
        return 0;
    }
    let mut unused = 0;
    for entity in ctx.design.entities.values() {
        if ctx.instantiation_count(&entity.name) == 0 {
            ctx.sink.emit(errors::warn_unused_entity(&entity.name, entity.line));
            unused += 1;
        }
    }
    unused
}

/// Fills unknown port ranges of one instance and checks connection widths.
fn resolve_instance_ports(
    instance: &mut Instance,
    port_ranges: &PortRanges,
    library: &GateLibrary,
) -> Result<usize, ElaborateError> {
    let mut resolved = 0;
    let entity_ports = port_ranges.get(&instance.type_name);
    let gate_type = library.gate_type(&instance.type_name);
    if entity_ports.is_none() && gate_type.is_none() {
        return Err(ElaborateError::UnknownType {
            type_name: instance.type_name.clone(),
            instance: instance.name.clone(),
            line: instance.line,
        });
    }

    for assignment in &mut instance.port_assignments {
        let port = &mut assignment.port;
        if let Some(ports) = entity_ports {
            let ranges = ports
                .get(port.name())
                .ok_or_else(|| ElaborateError::UnknownPort {
                    port: port.name().to_string(),
                    instance: instance.name.clone(),
                    entity: instance.type_name.clone(),
                    line: port.line(),
                })?;
            if !port.is_ranges_known() {
                port.set_ranges(ranges.clone());
                resolved += 1;
            }
        } else if let Some(gate_type) = gate_type.filter(|_| !port.is_ranges_known()) {
            if gate_type.pin_direction(port.name()).is_some() {
                port.set_ranges(Vec::new());
            } else if let Some(group) = gate_type.pin_group(port.name()) {
                port.set_ranges(vec![group.keys().copied().collect()]);
            } else {
                return Err(ElaborateError::UndefinedPin {
                    pin: port.name().to_string(),
                    gate: instance.name.clone(),
                    gate_type: gate_type.name().to_string(),
                    line: port.line(),
                });
            }
            resolved += 1;
        }

        let left = assignment.port.size();
        let right = assignment.assigned_width();
        if left.is_none() || left != right {
            return Err(ElaborateError::PortWidthMismatch {
                port: assignment.port.name().to_string(),
                instance: instance.name.clone(),
                left: left.unwrap_or(0),
                right: right.unwrap_or(0),
                line: assignment.port.line(),
            });
        }
    }
    Ok(resolved)
}
