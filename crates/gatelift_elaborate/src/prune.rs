//! Removal of nets nothing connects to.

use std::collections::HashSet;

use gatelift_netlist::{Net, NetId};

use crate::context::ElaborationContext;
use crate::errors::ElaborateError;

/// Deletes every net without sources, destinations, or global marking.
/// Returns the number of nets deleted.
pub(crate) fn prune_orphans(ctx: &mut ElaborationContext<'_>) -> Result<usize, ElaborateError> {
    let orphans: HashSet<NetId> = ctx
        .netlist
        .nets()
        .filter(|net| net.is_orphan())
        .map(Net::id)
        .collect();
    for &id in &orphans {
        ctx.netlist.delete_net(id)?;
    }
    ctx.nets.retain(|_, id| !orphans.contains(id));
    tracing::debug!(pruned = orphans.len(), "pruned orphan nets");
    Ok(orphans.len())
}
