//! Mutable elaboration state carried through recursive instantiation.
//!
//! [`ElaborationContext`] owns the netlist under construction together with
//! every transient table of one run: alias counters, the flat-name to net
//! index, the merge schedule, constant drives, and pending module ports.

use gatelift_common::{GateliftResult, InternalError, Logic};
use gatelift_config::ElaborateConfig;
use gatelift_diagnostics::DiagnosticSink;
use gatelift_hdl::{Entity, ExpandedEntity, HdlDesign, PortDirection};
use gatelift_netlist::{GateLibrary, ModuleId, NetId, Netlist};
use indexmap::IndexMap;

use crate::alias::{declare, unique_alias, NameCounters};

/// A module port binding that is applied once merging has settled which net
/// survives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPort {
    /// Direction of the entity port.
    pub direction: PortDirection,
    /// Flat port name, e.g. `A(3)`.
    pub port_name: String,
    /// The module whose boundary the net crosses.
    pub module: ModuleId,
}

/// Mutable state for one elaboration run.
pub struct ElaborationContext<'a> {
    /// The validated design being elaborated.
    pub design: &'a HdlDesign,
    /// The gate library instances are resolved against.
    pub library: &'a GateLibrary,
    /// Run configuration.
    pub config: &'a ElaborateConfig,
    /// The diagnostic sink for warnings.
    pub sink: &'a DiagnosticSink,
    /// The netlist being built.
    pub netlist: Netlist,
    /// Flat signal name occurrence counters.
    pub signal_names: NameCounters,
    /// Instance name occurrence counters.
    pub instance_names: NameCounters,
    /// How often each entity is instantiated below the top.
    pub instantiations: IndexMap<String, u32>,
    /// Flat (aliased) name → live net.
    pub nets: IndexMap<String, NetId>,
    /// Master net name → slave net names folded into it.
    pub merge_schedule: IndexMap<String, Vec<String>>,
    /// Nets assigned a literal `'0'`/`'1'` in a direct assignment.
    pub constant_drives: Vec<(String, Logic)>,
    /// Net name → module port bindings to apply after merging.
    pub pending_ports: IndexMap<String, Vec<PendingPort>>,
    /// Deleted slave name → the master it was merged into.
    pub merged_into: IndexMap<String, String>,
}

impl<'a> ElaborationContext<'a> {
    /// Creates a context with a fresh netlist and the two constant
    /// placeholder nets `'0'` and `'1'`.
    pub fn new(
        design: &'a HdlDesign,
        library: &'a GateLibrary,
        config: &'a ElaborateConfig,
        sink: &'a DiagnosticSink,
    ) -> Self {
        let mut ctx = Self {
            design,
            library,
            config,
            sink,
            netlist: Netlist::new(library.clone()),
            signal_names: NameCounters::new(),
            instance_names: NameCounters::new(),
            instantiations: IndexMap::new(),
            nets: IndexMap::new(),
            merge_schedule: IndexMap::new(),
            constant_drives: Vec::new(),
            pending_ports: IndexMap::new(),
            merged_into: IndexMap::new(),
        };
        for value in [Logic::Zero, Logic::One] {
            ctx.create_net(&value.token());
        }
        ctx
    }

    /// Creates a net and registers it under `name` in the net index.
    pub fn create_net(&mut self, name: &str) -> NetId {
        let id = self.netlist.create_net(name);
        self.nets.insert(name.to_string(), id);
        id
    }

    /// Issues a unique alias for a flat signal name.
    pub fn signal_alias(&mut self, name: &str) -> String {
        unique_alias(&mut self.signal_names, name)
    }

    /// Issues a unique alias for an instance name.
    pub fn instance_alias(&mut self, name: &str) -> String {
        unique_alias(&mut self.instance_names, name)
    }

    /// Schedules `slave` to be folded into `master`.
    ///
    /// A constant placeholder is never folded: pairing it with a net ties
    /// that net to the constant instead. A name paired with itself is kept,
    /// so the merge resolver reports it as cyclic.
    pub fn schedule_merge(&mut self, master: &str, slave: &str) {
        match (constant_value(master), constant_value(slave)) {
            (Some(value), None) => return self.drive_constant(slave, value),
            (None, Some(value)) => return self.drive_constant(master, value),
            (Some(a), Some(b)) => {
                if a != b {
                    tracing::trace!(%master, %slave, "ignoring alias of two different constants");
                }
                return;
            }
            (None, None) => {}
        }
        let slaves = self.merge_schedule.entry(master.to_string()).or_default();
        if !slaves.iter().any(|s| s == slave) {
            slaves.push(slave.to_string());
        }
    }

    /// Records that `net` is tied to a constant.
    pub fn drive_constant(&mut self, net: &str, value: Logic) {
        self.constant_drives.push((net.to_string(), value));
    }

    /// Records a module port binding for the net named `net`.
    pub fn schedule_port(&mut self, net: &str, port: PendingPort) {
        self.pending_ports.entry(net.to_string()).or_default().push(port);
    }

    /// Follows merge redirects to the name of the surviving net.
    pub fn resolve_name(&self, name: &str) -> String {
        let mut current = name;
        while let Some(next) = self.merged_into.get(current) {
            current = next;
        }
        current.to_string()
    }

    /// The live net a name refers to after merging.
    pub fn resolve_net(&self, name: &str) -> Option<NetId> {
        self.nets.get(&self.resolve_name(name)).copied()
    }

    /// Declares `count` more occurrences of an instance name issued outside
    /// the seeded hierarchy.
    pub fn declare_instances(&mut self, name: &str, count: usize) {
        for _ in 0..count {
            declare(&mut self.instance_names, name);
        }
    }

    /// Instantiation count of `entity` found by counter seeding.
    pub fn instantiation_count(&self, entity: &str) -> u32 {
        self.instantiations.get(entity).copied().unwrap_or(0)
    }

    /// Finishes the run and hands out the netlist.
    pub fn into_netlist(self) -> Netlist {
        self.netlist
    }
}

/// The flat caches of an entity; validation initializes every entity.
pub(crate) fn expanded(entity: &Entity) -> GateliftResult<&ExpandedEntity> {
    entity.expanded().ok_or_else(|| {
        InternalError::new(format!("entity `{}` was not initialized", entity.name))
    })
}

fn constant_value(name: &str) -> Option<Logic> {
    Logic::from_token(name).filter(|value| value.is_driven())
}
