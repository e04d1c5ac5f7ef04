//! Collision-free flat names for signals and instances.
//!
//! Every signal bit and every instance that ends up in the netlist needs a
//! name that is unique across the flattened hierarchy. Occurrences are
//! declared up front by a breadth-first walk over the instantiation tree;
//! names are then issued during elaboration. A name that occurs once keeps
//! it; a repeated name keeps it on its first issue and gets an occurrence
//! suffix (`tmp__[2]__`) afterwards. Names issued outside the hierarchy,
//! such as constant driver gates, are declared right before they are issued.

use std::collections::VecDeque;

use gatelift_hdl::Entity;
use indexmap::IndexMap;

use crate::context::ElaborationContext;

/// How often a flat name is declared and how often it has been issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NameCounter {
    /// Occurrences found by the seeding walk.
    pub declared: u32,
    /// Names handed out so far, including reserved ones.
    pub issued: u32,
}

impl NameCounter {
    /// Returns `true` if the name occurs more than once in the hierarchy.
    pub fn is_repeated(&self) -> bool {
        self.declared > 1
    }
}

/// Per-name occurrence counters, in first-declaration order.
pub type NameCounters = IndexMap<String, NameCounter>;

/// Issues the next unique alias for `name`.
///
/// A name declared at most once in the hierarchy is returned verbatim. A
/// repeated name is verbatim on its first issue and suffixed with its issue
/// ordinal afterwards, so reserved names push every other occurrence to a
/// suffix.
pub fn unique_alias(counters: &mut NameCounters, name: &str) -> String {
    let counter = counters.entry(name.to_string()).or_default();
    counter.issued += 1;
    if counter.is_repeated() && counter.issued > 1 {
        format!("{name}__[{}]__", counter.issued)
    } else {
        name.to_string()
    }
}

/// Records one declared occurrence of `name`.
pub fn declare(counters: &mut NameCounters, name: &str) {
    counters.entry(name.to_string()).or_default().declared += 1;
}

/// Records a declared occurrence that is already issued under its own name.
pub fn reserve(counters: &mut NameCounters, name: &str) {
    let counter = counters.entry(name.to_string()).or_default();
    counter.declared += 1;
    counter.issued += 1;
}

/// Seeds the alias counters from the hierarchy below `top`.
///
/// The top instance name and the flat names of the top ports are reserved:
/// they keep their names, and every other occurrence is suffixed. Entities
/// are visited once per instantiation.
pub(crate) fn seed_counters<'a>(ctx: &mut ElaborationContext<'a>, top: &'a Entity) {
    let design = ctx.design;
    reserve(&mut ctx.instance_names, &ctx.config.top_instance_name);
    if let Some(expanded) = top.expanded() {
        for flat in expanded.ports.values().flatten() {
            reserve(&mut ctx.signal_names, flat);
        }
    }

    let mut queue = VecDeque::from([top]);
    while let Some(entity) = queue.pop_front() {
        *ctx.instantiations.entry(entity.name.clone()).or_default() += 1;
        if let Some(expanded) = entity.expanded() {
            for flat in expanded.signals.values().flatten() {
                declare(&mut ctx.signal_names, flat);
            }
        }
        for instance in entity.instances.values() {
            declare(&mut ctx.instance_names, &instance.name);
            if let Some(child) = design.entity(&instance.type_name) {
                queue.push_back(child);
            }
        }
    }

    tracing::debug!(
        signals = ctx.signal_names.len(),
        repeated_signals = ctx.signal_names.values().filter(|c| c.is_repeated()).count(),
        instances = ctx.instance_names.len(),
        "seeded alias counters"
    );
}
