//! Folding of aliased nets.
//!
//! Direct assignments schedule `slave` nets to be folded into `master` nets.
//! Each pass processes every master none of whose slaves is itself a
//! pending master, so chains collapse from the leaves up. A pass that makes
//! no progress means the aliasing is cyclic.

use gatelift_netlist::NetId;

use crate::context::ElaborationContext;
use crate::errors::{self, ElaborateError};

/// Runs the merge schedule to completion. Returns the number of nets merged.
pub(crate) fn merge_nets(ctx: &mut ElaborationContext<'_>) -> Result<usize, ElaborateError> {
    let mut schedule = std::mem::take(&mut ctx.merge_schedule);
    let mut merged = 0;
    let mut passes = 0;
    while !schedule.is_empty() {
        let leaves: Vec<String> = schedule
            .iter()
            .filter(|(_, slaves)| slaves.iter().all(|slave| !schedule.contains_key(slave)))
            .map(|(master, _)| master.clone())
            .collect();
        if leaves.is_empty() {
            return Err(ElaborateError::CyclicNetAlias {
                nets: schedule.keys().cloned().collect(),
            });
        }
        for master in leaves {
            let Some(slaves) = schedule.shift_remove(&master) else {
                continue;
            };
            for slave in slaves {
                if merge_pair(ctx, &master, &slave)? {
                    merged += 1;
                }
            }
        }
        passes += 1;
    }
    tracing::debug!(merged, passes, "merged aliased nets");
    Ok(merged)
}

/// Folds `slave` into `master`. A slave that was already folded elsewhere is
/// followed to its surviving net first.
fn merge_pair(
    ctx: &mut ElaborationContext<'_>,
    master: &str,
    slave: &str,
) -> Result<bool, ElaborateError> {
    let master = ctx.resolve_name(master);
    let slave = ctx.resolve_name(slave);
    if master == slave {
        return Ok(false);
    }
    let (Some(master_id), Some(slave_id)) =
        (ctx.nets.get(&master).copied(), ctx.nets.get(&slave).copied())
    else {
        ctx.sink.emit(errors::warn_merge_missing_net(&master, &slave));
        return Ok(false);
    };

    transfer_endpoints(ctx, master_id, slave_id)?;

    let slave_net = ctx.netlist.delete_net(slave_id)?;
    if slave_net.is_global_input() {
        ctx.netlist.mark_global_input_net(master_id)?;
    }
    if slave_net.is_global_output() {
        ctx.netlist.mark_global_output_net(master_id)?;
    }

    let mut conflicts = Vec::new();
    if let Some(master_net) = ctx.netlist.net_mut(master_id) {
        for (category, key, value) in slave_net.data().iter() {
            match master_net.data().get(category, key) {
                Some(existing) if existing != value => conflicts.push(format!("{category}.{key}")),
                Some(_) => {}
                None => {
                    master_net.data_mut().set(category, key, value.clone());
                }
            }
        }
    }
    for key in conflicts {
        ctx.sink
            .emit(errors::warn_merge_data_conflict(&master, &slave, &key));
    }

    if let Some(ports) = ctx.pending_ports.shift_remove(&slave) {
        ctx.pending_ports.entry(master.clone()).or_default().extend(ports);
    }
    ctx.nets.shift_remove(&slave);
    tracing::trace!(%master, %slave, "merged net");
    ctx.merged_into.insert(slave, master);
    Ok(true)
}

/// Moves every source and destination of `slave` onto `master`, skipping
/// endpoints `master` already has.
fn transfer_endpoints(
    ctx: &mut ElaborationContext<'_>,
    master: NetId,
    slave: NetId,
) -> Result<(), ElaborateError> {
    let Some(net) = ctx.netlist.net(slave) else {
        return Ok(());
    };
    let sources = net.sources().to_vec();
    let destinations = net.destinations().to_vec();

    for endpoint in sources {
        ctx.netlist.remove_source(slave, endpoint.gate, &endpoint.pin)?;
        if !ctx.netlist.is_a_source(master, endpoint.gate, &endpoint.pin) {
            ctx.netlist.add_source(master, endpoint.gate, &endpoint.pin)?;
        }
    }
    for endpoint in destinations {
        ctx.netlist
            .remove_destination(slave, endpoint.gate, &endpoint.pin)?;
        if !ctx.netlist.is_a_destination(master, endpoint.gate, &endpoint.pin) {
            ctx.netlist
                .add_destination(master, endpoint.gate, &endpoint.pin)?;
        }
    }
    Ok(())
}
