//! Flattening of an HDL entity hierarchy into a gate-level netlist.
//!
//! [`elaborate`] takes a design whose entities were produced by a front-end,
//! a gate library, and a configuration, and builds a [`Netlist`]. The run is
//! a fixed sequence of passes:
//!
//! 1. validate entities and resolve instance port ranges,
//! 2. seed the alias counters,
//! 3. create the global top-level port nets,
//! 4. instantiate the hierarchy from the top entity down,
//! 5. merge nets aliased by direct assignments,
//! 6. inject GND/VCC drivers for referenced constants,
//! 7. assign module port names,
//! 8. prune nets nothing connects to.
//!
//! # Usage
//!
//! ```ignore
//! let netlist = elaborate(&mut design, &library, &config.elaborate, &sink)?;
//! ```

#![warn(missing_docs)]

pub mod alias;
pub mod constants;
pub mod container;
pub mod context;
pub mod errors;
pub mod instantiate;
pub mod merge;
pub mod ports;
pub mod prune;
pub mod validate;

use gatelift_config::ElaborateConfig;
use gatelift_diagnostics::DiagnosticSink;
use gatelift_hdl::HdlDesign;
use gatelift_netlist::{GateLibrary, Netlist};

pub use container::Container;
pub use context::ElaborationContext;
pub use errors::ElaborateError;

/// Elaborates `design` against `library` into a new netlist.
///
/// Non-fatal findings are emitted to `sink`. On failure the error is also
/// emitted to `sink` as a diagnostic and no netlist is returned. The design
/// is mutated only to initialize entities and fill in instance port ranges.
pub fn elaborate(
    design: &mut HdlDesign,
    library: &GateLibrary,
    config: &ElaborateConfig,
    sink: &DiagnosticSink,
) -> Result<Netlist, ElaborateError> {
    let result = run(design, library, config, sink);
    if let Err(err) = &result {
        sink.emit(err.to_diagnostic());
    }
    result
}

fn run(
    design: &mut HdlDesign,
    library: &GateLibrary,
    config: &ElaborateConfig,
    sink: &DiagnosticSink,
) -> Result<Netlist, ElaborateError> {
    let top_name = validate::select_top(design, config)?.to_string();
    let _span = tracing::info_span!("elaborate", top = %top_name).entered();

    validate::validate_design(design, library, sink)?;

    let design: &HdlDesign = design;
    let top = design
        .entity(&top_name)
        .ok_or_else(|| ElaborateError::UnknownTopEntity {
            name: top_name.clone(),
        })?;

    let mut ctx = ElaborationContext::new(design, library, config, sink);
    alias::seed_counters(&mut ctx, top);
    validate::report_unused_entities(&ctx);
    let bindings = ports::create_top_ports(&mut ctx, top)?;
    instantiate::instantiate_top(&mut ctx, top, &bindings)?;
    merge::merge_nets(&mut ctx)?;
    constants::inject_constants(&mut ctx)?;
    ports::assign_module_ports(&mut ctx);
    prune::prune_orphans(&mut ctx)?;

    let netlist = ctx.into_netlist();
    tracing::debug!(
        nets = netlist.num_nets(),
        gates = netlist.num_gates(),
        modules = netlist.num_modules(),
        "elaboration finished"
    );
    Ok(netlist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatelift_hdl::{Entity, Instance, PortDirection, Signal};
    use gatelift_netlist::GateType;

    fn library() -> GateLibrary {
        GateLibrary::new("lib")
            .with_gate_type(GateType::new("BUF").with_inputs(["A"]).with_outputs(["Y"]))
    }

    #[test]
    fn empty_design_fails_with_diagnostic() {
        let sink = DiagnosticSink::new();
        let err = elaborate(
            &mut HdlDesign::new(),
            &library(),
            &ElaborateConfig::default(),
            &sink,
        )
        .unwrap_err();
        assert!(matches!(err, ElaborateError::NoEntities));
        assert_eq!(sink.first_error().map(|d| d.code), Some(errors::E308));
    }

    #[test]
    fn buffer_design() {
        let mut top = Entity::new(1, "top");
        top.add_port(PortDirection::Input, Signal::scalar(2, "a"));
        top.add_port(PortDirection::Output, Signal::scalar(3, "y"));
        let mut buf = Instance::new(4, "u_buf", "BUF");
        buf.connect("A", vec![Signal::scalar(4, "a")]);
        buf.connect("Y", vec![Signal::scalar(4, "y")]);
        top.add_instance(buf);
        top.initialize();
        let mut design = HdlDesign::new();
        design.add_entity(top);

        let sink = DiagnosticSink::new();
        let config = ElaborateConfig::default();
        let netlist = elaborate(&mut design, &library(), &config, &sink).unwrap();
        assert_eq!(netlist.design_name(), "top");
        assert_eq!(netlist.num_nets(), 2);
        assert_eq!(netlist.num_gates(), 1);
        assert!(!sink.has_errors());
        assert_eq!(sink.warning_count(), 0);
    }
}
