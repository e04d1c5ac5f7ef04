//! Recursive instantiation of entities into modules, gates, and nets.

use gatelift_common::{InternalError, Logic};
use gatelift_hdl::{expand, expand_all, Entity, FlatAssignment, Instance};
use gatelift_netlist::{ModuleId, PinDirection};
use indexmap::IndexMap;

use crate::container::{apply_net_attributes, Container};
use crate::context::{expanded, ElaborationContext, PendingPort};
use crate::errors::{self, ElaborateError};

/// Flat port name → name of the parent net bound to it.
pub type Bindings = IndexMap<String, String>;

/// What a flat name refers to inside one entity instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Resolved {
    /// A net, by its registered name.
    Net(String),
    /// A driven constant (`'0'` or `'1'`).
    Constant(Logic),
    /// `'Z'` or `'X'`: left unconnected.
    Floating,
    /// Not visible in this scope.
    Unresolved,
}

/// Name lookup tables of one entity instantiation.
struct Scope<'s> {
    entity: &'s Entity,
    bindings: &'s Bindings,
    signal_alias: &'s IndexMap<String, String>,
}

impl Scope<'_> {
    /// Port bindings win over local signals; anything else must be a
    /// constant token.
    fn resolve(&self, name: &str) -> Resolved {
        if let Some(net) = self.bindings.get(name) {
            return Resolved::Net(net.clone());
        }
        if let Some(alias) = self.signal_alias.get(name) {
            return Resolved::Net(alias.clone());
        }
        match Logic::from_token(name) {
            Some(value) if value.is_driven() => Resolved::Constant(value),
            Some(_) => Resolved::Floating,
            None => Resolved::Unresolved,
        }
    }
}

/// Elaborates the top entity into the netlist's existing top module.
pub(crate) fn instantiate_top<'a>(
    ctx: &mut ElaborationContext<'a>,
    top: &'a Entity,
    bindings: &Bindings,
) -> Result<Container, ElaborateError> {
    let module = ctx.netlist.top_module();
    let name = ctx.config.top_instance_name.clone();
    if let Some(m) = ctx.netlist.module_mut(module) {
        m.set_name(name);
    }
    ctx.netlist.set_design_name(top.name.clone());
    elaborate_entity(ctx, top, module, bindings)
}

fn elaborate_entity<'a>(
    ctx: &mut ElaborationContext<'a>,
    entity: &'a Entity,
    module: ModuleId,
    bindings: &Bindings,
) -> Result<Container, ElaborateError> {
    let expanded = expanded(entity)?;
    tracing::trace!(entity = %entity.name, %module, "elaborating entity");

    if let Some(m) = ctx.netlist.module_mut(module) {
        m.set_type(entity.name.clone());
    }
    let container = Container::Module(module);
    container.apply_attributes(ctx, &entity.attributes, &entity.name, entity.line);

    for (port_name, port) in &entity.ports {
        let Some(flat_names) = expanded.ports.get(port_name) else {
            continue;
        };
        for flat in flat_names {
            let Some(net_name) = bindings.get(flat) else {
                continue;
            };
            ctx.schedule_port(
                net_name,
                PendingPort {
                    direction: port.direction,
                    port_name: flat.clone(),
                    module,
                },
            );
            if let Some(net) = ctx.nets.get(net_name).copied() {
                apply_net_attributes(ctx, net, port.signal.attributes(), flat, port.signal.line());
            }
        }
    }

    let mut signal_alias = IndexMap::new();
    for (signal_name, signal) in &entity.signals {
        let Some(flat_names) = expanded.signals.get(signal_name) else {
            continue;
        };
        for flat in flat_names {
            let alias = ctx.signal_alias(flat);
            let net = ctx.create_net(&alias);
            apply_net_attributes(ctx, net, signal.attributes(), &alias, signal.line());
            signal_alias.insert(flat.clone(), alias);
        }
    }

    let scope = Scope {
        entity,
        bindings,
        signal_alias: &signal_alias,
    };

    for assignment in &expanded.assignments {
        connect_assignment(ctx, &scope, assignment)?;
    }

    for instance in entity.instances.values() {
        let (child, owner) = instantiate_instance(ctx, &scope, instance, module)?;
        child.apply_attributes(ctx, &instance.attributes, &owner, instance.line);
        child.apply_generics(ctx, &instance.generics, &owner, instance.line);
    }

    Ok(container)
}

/// Turns one flat direct assignment `lhs = rhs` into a merge or a constant
/// drive.
fn connect_assignment(
    ctx: &mut ElaborationContext<'_>,
    scope: &Scope<'_>,
    assignment: &FlatAssignment,
) -> Result<(), ElaborateError> {
    let lhs = scope.resolve(&assignment.lhs);
    let rhs = scope.resolve(&assignment.rhs);
    match (lhs, rhs) {
        (Resolved::Unresolved, _) => unresolved_alias(ctx, scope, &assignment.lhs, assignment.line),
        (_, Resolved::Unresolved) => unresolved_alias(ctx, scope, &assignment.rhs, assignment.line),
        (Resolved::Net(lhs), Resolved::Net(rhs)) => {
            ctx.schedule_merge(&rhs, &lhs);
            Ok(())
        }
        (Resolved::Net(net), Resolved::Constant(value))
        | (Resolved::Constant(value), Resolved::Net(net)) => {
            ctx.drive_constant(&net, value);
            Ok(())
        }
        _ => {
            tracing::trace!(
                lhs = %assignment.lhs,
                rhs = %assignment.rhs,
                "skipping assignment without a net"
            );
            Ok(())
        }
    }
}

fn unresolved_alias(
    ctx: &mut ElaborationContext<'_>,
    scope: &Scope<'_>,
    name: &str,
    line: u32,
) -> Result<(), ElaborateError> {
    if ctx.config.strict_aliases {
        return Err(ElaborateError::UnresolvedAlias {
            name: name.to_string(),
            entity: scope.entity.name.clone(),
            line,
        });
    }
    ctx.sink
        .emit(errors::warn_unresolved_alias(name, &scope.entity.name, line));
    Ok(())
}

/// Instantiates one sub-instance; returns the container and its alias.
fn instantiate_instance<'a>(
    ctx: &mut ElaborationContext<'a>,
    scope: &Scope<'_>,
    instance: &Instance,
    parent: ModuleId,
) -> Result<(Container, String), ElaborateError> {
    let mut connections: Vec<(String, Option<String>)> = Vec::new();
    for assignment in &instance.port_assignments {
        let ports = expand(&assignment.port);
        let signals = expand_all(&assignment.signals);
        for (port, signal) in ports.into_iter().zip(signals) {
            let net = match scope.resolve(&signal) {
                Resolved::Net(net) => Some(net),
                Resolved::Constant(value) => Some(value.token()),
                Resolved::Floating => None,
                Resolved::Unresolved => {
                    return Err(ElaborateError::UnresolvedConnection {
                        port,
                        signal,
                        instance: instance.name.clone(),
                        line: assignment.port.line(),
                    })
                }
            };
            connections.push((port, net));
        }
    }

    let design = ctx.design;
    if let Some(child) = design.entity(&instance.type_name) {
        let bindings: Bindings = connections
            .into_iter()
            .filter_map(|(port, net)| net.map(|net| (port, net)))
            .collect();
        let alias = ctx.instance_alias(&instance.name);
        let module = ctx.netlist.create_module(alias.clone(), parent)?;
        let container = elaborate_entity(ctx, child, module, &bindings)?;
        return Ok((container, alias));
    }

    let library = ctx.library;
    let gate_type = library
        .gate_type(&instance.type_name)
        .ok_or_else(|| ElaborateError::UnknownType {
            type_name: instance.type_name.clone(),
            instance: instance.name.clone(),
            line: instance.line,
        })?;

    let alias = ctx.instance_alias(&instance.name);
    let gate = ctx.netlist.create_gate(gate_type.name(), alias.clone(), parent)?;
    if library.is_gnd_type(gate_type.name()) {
        ctx.netlist.mark_gnd_gate(gate)?;
    }
    if library.is_vcc_type(gate_type.name()) {
        ctx.netlist.mark_vcc_gate(gate)?;
    }

    // `group(ordinal)` → member pin
    let group_pins: IndexMap<String, &str> = gate_type
        .input_pin_groups()
        .iter()
        .chain(gate_type.output_pin_groups())
        .flat_map(|(group, members)| {
            members
                .iter()
                .map(move |(ordinal, pin)| (format!("{group}({ordinal})"), pin.as_str()))
        })
        .collect();

    for (port, net) in connections {
        let pin = group_pins.get(&port).copied().unwrap_or(port.as_str());
        let direction = gate_type
            .pin_direction(pin)
            .ok_or_else(|| ElaborateError::UndefinedPin {
                pin: port.clone(),
                gate: alias.clone(),
                gate_type: gate_type.name().to_string(),
                line: instance.line,
            })?;
        let Some(net_name) = net else {
            continue;
        };
        let net = ctx.nets.get(&net_name).copied().ok_or_else(|| {
            InternalError::new(format!("net `{net_name}` is not registered"))
        })?;
        match direction {
            PinDirection::Input => ctx.netlist.add_destination(net, gate, pin)?,
            PinDirection::Output => ctx.netlist.add_source(net, gate, pin)?,
        }
    }

    Ok((Container::Gate(gate), alias))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatelift_hdl::Signal;

    #[test]
    fn scope_resolution_order() {
        let entity = Entity::new(1, "e");
        let mut bindings = Bindings::new();
        bindings.insert("p".into(), "parent_net".into());
        let mut signal_alias = IndexMap::new();
        signal_alias.insert("p".into(), "shadowed".into());
        signal_alias.insert("s".into(), "s__[2]__".into());
        let scope = Scope {
            entity: &entity,
            bindings: &bindings,
            signal_alias: &signal_alias,
        };
        assert_eq!(scope.resolve("p"), Resolved::Net("parent_net".into()));
        assert_eq!(scope.resolve("s"), Resolved::Net("s__[2]__".into()));
        assert_eq!(scope.resolve("'1'"), Resolved::Constant(Logic::One));
        assert_eq!(scope.resolve("'Z'"), Resolved::Floating);
        assert_eq!(scope.resolve("ghost"), Resolved::Unresolved);
    }

    #[test]
    fn literal_expansion_resolves_to_constants() {
        let entity = Entity::new(1, "e");
        let bindings = Bindings::new();
        let signal_alias = IndexMap::new();
        let scope = Scope {
            entity: &entity,
            bindings: &bindings,
            signal_alias: &signal_alias,
        };
        let resolved: Vec<_> = expand(&Signal::literal(1, "10z"))
            .iter()
            .map(|t| scope.resolve(t))
            .collect();
        assert_eq!(
            resolved,
            vec![
                Resolved::Constant(Logic::One),
                Resolved::Constant(Logic::Zero),
                Resolved::Floating,
            ]
        );
    }
}
