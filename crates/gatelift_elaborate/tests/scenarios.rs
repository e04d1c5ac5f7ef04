//! End-to-end elaboration scenarios.

use gatelift_config::{load_config_from_str, ElaborateConfig};
use gatelift_diagnostics::DiagnosticSink;
use gatelift_elaborate::errors::{E301, E306, W302, W303};
use gatelift_elaborate::{elaborate, ElaborateError};
use gatelift_hdl::{expand, Attribute, Entity, HdlDesign, Instance, PortDirection, Signal};
use gatelift_netlist::{GateLibrary, GateType, Net, Netlist, ATTRIBUTE_CATEGORY, GENERIC_CATEGORY};

fn library() -> GateLibrary {
    GateLibrary::new("test_lib")
        .with_gate_type(GateType::new("AND2").with_inputs(["A", "B"]).with_outputs(["Y"]))
        .with_gate_type(GateType::new("INV").with_inputs(["A"]).with_outputs(["Y"]))
        .with_gate_type(
            GateType::new("LUT4")
                .with_input_group("I", [(0, "I0"), (1, "I1"), (2, "I2"), (3, "I3")])
                .with_outputs(["O"]),
        )
        .with_gnd_type(GateType::new("GND").with_outputs(["O"]))
        .with_vcc_type(GateType::new("VCC").with_outputs(["O"]))
}

fn design(entities: Vec<Entity>) -> HdlDesign {
    let mut design = HdlDesign::new();
    for mut entity in entities {
        entity.initialize();
        design.add_entity(entity);
    }
    design
}

fn run(design: &mut HdlDesign) -> (Result<Netlist, ElaborateError>, DiagnosticSink) {
    run_with(design, &library(), &ElaborateConfig::default())
}

fn run_with(
    design: &mut HdlDesign,
    library: &GateLibrary,
    config: &ElaborateConfig,
) -> (Result<Netlist, ElaborateError>, DiagnosticSink) {
    let sink = DiagnosticSink::new();
    let result = elaborate(design, library, config, &sink);
    (result, sink)
}

fn net<'n>(netlist: &'n Netlist, name: &str) -> &'n Net {
    netlist
        .net_by_name(name)
        .unwrap_or_else(|| panic!("net `{name}` not found"))
}

fn source_names(netlist: &Netlist, name: &str) -> Vec<String> {
    net(netlist, name)
        .sources()
        .iter()
        .map(|e| format!("{}.{}", netlist.gate(e.gate).unwrap().name(), e.pin))
        .collect()
}

fn destination_names(netlist: &Netlist, name: &str) -> Vec<String> {
    net(netlist, name)
        .destinations()
        .iter()
        .map(|e| format!("{}.{}", netlist.gate(e.gate).unwrap().name(), e.pin))
        .collect()
}

fn net_names(netlist: &Netlist) -> Vec<String> {
    netlist.nets().map(|n| n.name().to_string()).collect()
}

fn inv(line: u32, name: &str, a: Signal, y: Signal) -> Instance {
    let mut inst = Instance::new(line, name, "INV");
    inst.connect("A", vec![a]);
    inst.connect("Y", vec![y]);
    inst
}

fn and_gate_entity() -> Entity {
    let mut top = Entity::new(1, "top");
    top.add_port(PortDirection::Input, Signal::scalar(2, "a"));
    top.add_port(PortDirection::Input, Signal::scalar(2, "b"));
    top.add_port(PortDirection::Output, Signal::scalar(3, "y"));
    let mut u = Instance::new(4, "u_and", "AND2");
    u.connect("A", vec![Signal::scalar(4, "a")]);
    u.connect("B", vec![Signal::scalar(4, "b")]);
    u.connect("Y", vec![Signal::scalar(4, "y")]);
    top.add_instance(u);
    top
}

fn and_gate_design() -> HdlDesign {
    design(vec![and_gate_entity()])
}

/// `sub` inverts `i` into an internal `tmp` and assigns it to `o`.
fn sub_entity() -> Entity {
    let mut sub = Entity::new(1, "sub");
    sub.add_port(PortDirection::Input, Signal::scalar(2, "i"));
    sub.add_port(PortDirection::Output, Signal::scalar(3, "o"));
    sub.add_signal(Signal::scalar(4, "tmp"));
    sub.add_instance(inv(5, "u1", Signal::scalar(5, "i"), Signal::scalar(5, "tmp")));
    sub.add_assignment(vec![Signal::scalar(6, "o")], vec![Signal::scalar(6, "tmp")]);
    sub
}

fn twice_instantiated_design() -> HdlDesign {
    let mut top = Entity::new(10, "top");
    top.add_port(PortDirection::Input, Signal::scalar(11, "a"));
    top.add_port(PortDirection::Output, Signal::scalar(12, "y1"));
    top.add_port(PortDirection::Output, Signal::scalar(12, "y2"));
    for (name, out) in [("s1", "y1"), ("s2", "y2")] {
        let mut inst = Instance::new(13, name, "sub");
        inst.connect("i", vec![Signal::scalar(13, "a")]);
        inst.connect("o", vec![Signal::scalar(13, out)]);
        top.add_instance(inst);
    }
    design(vec![sub_entity(), top])
}

#[test]
fn single_gate_with_global_ports() {
    let mut d = and_gate_design();
    let (result, sink) = run(&mut d);
    let netlist = result.unwrap();

    assert_eq!(netlist.num_nets(), 3);
    assert_eq!(netlist.num_gates(), 1);
    assert!(netlist.nets().all(Net::is_global));
    assert_eq!(netlist.global_input_nets().len(), 2);
    assert_eq!(netlist.global_output_nets().len(), 1);
    assert_eq!(destination_names(&netlist, "a"), vec!["u_and.A"]);
    assert_eq!(destination_names(&netlist, "b"), vec!["u_and.B"]);
    assert_eq!(source_names(&netlist, "y"), vec!["u_and.Y"]);

    let top = netlist.module(netlist.top_module()).unwrap();
    assert_eq!(top.name(), "top_module");
    assert_eq!(top.type_name(), "top");
    assert_eq!(netlist.design_name(), "top");
    assert_eq!(top.input_port_name(net(&netlist, "a").id()), Some("a"));
    assert_eq!(top.output_port_name(net(&netlist, "y").id()), Some("y"));
    assert!(sink.diagnostics().is_empty());
}

#[test]
fn vector_port_bits_absorb_internal_signals() {
    let bits = vec![vec![3, 2, 1, 0]];
    assert_eq!(
        expand(&Signal::vector(1, "A", bits.clone())),
        vec!["A(3)", "A(2)", "A(1)", "A(0)"]
    );

    let mut top = Entity::new(1, "top");
    top.add_port(PortDirection::Input, Signal::vector(2, "A", bits.clone()));
    top.add_port(PortDirection::Output, Signal::vector(3, "Y", bits));
    let scalars: Vec<Signal> = (0..4).rev().map(|i| Signal::scalar(4, format!("s{i}"))).collect();
    for s in &scalars {
        top.add_signal(s.clone());
    }
    top.add_assignment(scalars, vec![Signal::vector(5, "A", vec![vec![3, 2, 1, 0]])]);
    for i in 0..4 {
        top.add_instance(inv(
            6,
            &format!("u{i}"),
            Signal::scalar(6, format!("s{i}")),
            Signal::vector(6, "Y", vec![vec![i]]),
        ));
    }
    let mut d = design(vec![top]);
    let netlist = run(&mut d).0.unwrap();

    assert_eq!(
        net_names(&netlist),
        vec!["A(3)", "A(2)", "A(1)", "A(0)", "Y(3)", "Y(2)", "Y(1)", "Y(0)"]
    );
    for i in 0..4 {
        assert_eq!(destination_names(&netlist, &format!("A({i})")), vec![format!("u{i}.A")]);
        assert!(netlist.net_by_name(&format!("s{i}")).is_none());
    }
}

#[test]
fn repeated_sub_entity_gets_suffixed_aliases() {
    let mut d = twice_instantiated_design();
    let (result, sink) = run(&mut d);
    let netlist = result.unwrap();

    assert_eq!(net_names(&netlist), vec!["a", "tmp", "tmp__[2]__"]);
    assert_eq!(source_names(&netlist, "tmp"), vec!["u1.Y"]);
    assert_eq!(source_names(&netlist, "tmp__[2]__"), vec!["u1__[2]__.Y"]);
    assert_eq!(destination_names(&netlist, "a"), vec!["u1.A", "u1__[2]__.A"]);
    assert!(net(&netlist, "tmp").is_global_output());

    let s1 = netlist.module_by_name("s1").unwrap();
    let s2 = netlist.module_by_name("s2").unwrap();
    assert_eq!(s1.type_name(), "sub");
    assert_eq!(s2.parent(), Some(netlist.top_module()));
    let tmp = net(&netlist, "tmp").id();
    assert_eq!(s1.output_port_name(tmp), Some("o"));
    let top = netlist.module(netlist.top_module()).unwrap();
    assert_eq!(top.output_port_name(tmp), Some("y1"));
    assert_eq!(s1.input_port_name(net(&netlist, "a").id()), Some("i"));
    assert!(!sink.has_errors());
}

#[test]
fn constant_assignment_gets_vcc_driver() {
    let mut top = Entity::new(1, "top");
    top.add_port(PortDirection::Output, Signal::scalar(2, "out"));
    top.add_assignment(vec![Signal::scalar(3, "out")], vec![Signal::literal(3, "1")]);
    let mut d = design(vec![top]);
    let netlist = run(&mut d).0.unwrap();

    assert_eq!(net_names(&netlist), vec!["out"]);
    assert_eq!(netlist.vcc_gates().len(), 1);
    assert!(netlist.gnd_gates().is_empty());
    assert_eq!(source_names(&netlist, "out"), vec!["global_vcc.O"]);
    assert!(netlist.gate_by_name("global_vcc").unwrap().is_vcc());
}

#[test]
fn port_width_mismatch_is_fatal() {
    let mut sub = Entity::new(1, "sub");
    sub.add_port(PortDirection::Input, Signal::vector(2, "d", vec![vec![1, 0]]));
    let mut top = Entity::new(5, "top");
    top.add_signal(Signal::scalar(6, "x"));
    let mut inst = Instance::new(7, "u_sub", "sub");
    inst.connect("d", vec![Signal::scalar(7, "x")]);
    top.add_instance(inst);
    let mut d = design(vec![sub, top]);

    let (result, sink) = run(&mut d);
    match result {
        Err(ElaborateError::PortWidthMismatch {
            port,
            instance,
            left,
            right,
            line,
        }) => {
            assert_eq!(port, "d");
            assert_eq!(instance, "u_sub");
            assert_eq!((left, right, line), (2, 1, 7));
        }
        other => panic!("expected a width mismatch, got {other:?}"),
    }
    let first = sink.first_error().unwrap();
    assert_eq!(first.code, E301);
    assert_eq!(first.line, Some(7));
}

#[test]
fn cyclic_aliasing_is_fatal() {
    let mut top = Entity::new(1, "top");
    top.add_signal(Signal::scalar(2, "a"));
    top.add_signal(Signal::scalar(2, "b"));
    top.add_assignment(vec![Signal::scalar(3, "a")], vec![Signal::scalar(3, "b")]);
    top.add_assignment(vec![Signal::scalar(4, "b")], vec![Signal::scalar(4, "a")]);
    let mut d = design(vec![top]);

    let (result, sink) = run(&mut d);
    match result {
        Err(ElaborateError::CyclicNetAlias { nets }) => {
            assert!(nets.contains(&"a".to_string()));
            assert!(nets.contains(&"b".to_string()));
        }
        other => panic!("expected cyclic aliasing, got {other:?}"),
    }
    assert_eq!(sink.first_error().unwrap().code, E306);
}

#[test]
fn elaboration_is_deterministic() {
    let run_once = || {
        let mut d = twice_instantiated_design();
        run(&mut d).0.unwrap()
    };
    let a = run_once();
    let b = run_once();
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(net_names(&a), net_names(&b));
    let gates = |n: &Netlist| n.gates().map(|g| g.name().to_string()).collect::<Vec<_>>();
    assert_eq!(gates(&a), gates(&b));
}

#[test]
fn no_constants_means_no_drivers() {
    let mut d = and_gate_design();
    let netlist = run(&mut d).0.unwrap();
    assert!(netlist.gnd_gates().is_empty());
    assert!(netlist.vcc_gates().is_empty());
    assert!(netlist.net_by_name("'0'").is_none());
    assert!(netlist.net_by_name("'1'").is_none());
}

#[test]
fn gate_input_tied_low_keeps_placeholder() {
    let mut top = Entity::new(1, "top");
    top.add_port(PortDirection::Output, Signal::scalar(2, "y"));
    top.add_instance(inv(3, "u_inv", Signal::literal(3, "0"), Signal::scalar(3, "y")));
    let mut d = design(vec![top]);
    let netlist = run(&mut d).0.unwrap();

    assert_eq!(source_names(&netlist, "'0'"), vec!["global_gnd.O"]);
    assert_eq!(destination_names(&netlist, "'0'"), vec!["u_inv.A"]);
    assert!(netlist.net_by_name("'1'").is_none());
    assert_eq!(netlist.gnd_gates().len(), 1);
}

#[test]
fn each_constant_driven_net_gets_its_own_driver() {
    let mut top = Entity::new(1, "top");
    top.add_port(PortDirection::Output, Signal::vector(2, "o", vec![vec![1, 0]]));
    top.add_assignment(
        vec![Signal::vector(3, "o", vec![vec![1, 0]])],
        vec![Signal::literal(3, "11")],
    );
    let mut d = design(vec![top]);
    let netlist = run(&mut d).0.unwrap();

    assert_eq!(source_names(&netlist, "o(1)"), vec!["global_vcc.O"]);
    assert_eq!(source_names(&netlist, "o(0)"), vec!["global_vcc__[2]__.O"]);
    assert_eq!(netlist.vcc_gates().len(), 2);
}

#[test]
fn missing_gnd_type_is_fatal() {
    let mut top = Entity::new(1, "top");
    top.add_port(PortDirection::Output, Signal::scalar(2, "y"));
    top.add_assignment(vec![Signal::scalar(3, "y")], vec![Signal::literal(3, "0")]);
    let mut d = design(vec![top]);
    let library = GateLibrary::new("no_globals")
        .with_gate_type(GateType::new("INV").with_inputs(["A"]).with_outputs(["Y"]));
    let (result, _) = run_with(&mut d, &library, &ElaborateConfig::default());
    match result {
        Err(ElaborateError::MissingGndVccType { kind }) => assert_eq!(kind, "GND"),
        other => panic!("expected missing GND type, got {other:?}"),
    }
}

#[test]
fn unused_internal_signals_are_pruned() {
    let mut top = Entity::new(1, "top");
    top.add_port(PortDirection::Input, Signal::scalar(2, "a"));
    top.add_port(PortDirection::Output, Signal::scalar(2, "y"));
    top.add_signal(Signal::scalar(3, "unused"));
    top.add_signal(Signal::scalar(3, "mid"));
    top.add_instance(inv(4, "u0", Signal::scalar(4, "a"), Signal::scalar(4, "mid")));
    top.add_instance(inv(5, "u1", Signal::scalar(5, "mid"), Signal::scalar(5, "y")));
    let mut d = design(vec![top]);
    let netlist = run(&mut d).0.unwrap();

    assert_eq!(net_names(&netlist), vec!["a", "y", "mid"]);
    assert!(netlist.nets().all(|n| !n.is_orphan()));
}

#[test]
fn floating_connection_leaves_pin_open() {
    let mut top = Entity::new(1, "top");
    top.add_port(PortDirection::Output, Signal::scalar(2, "y"));
    top.add_instance(inv(3, "u_inv", Signal::literal(3, "Z"), Signal::scalar(3, "y")));
    let mut d = design(vec![top]);
    let (result, sink) = run(&mut d);
    let netlist = result.unwrap();

    let gate = netlist.gate_by_name("u_inv").unwrap();
    assert!(gate.fan_in().is_empty());
    assert_eq!(net_names(&netlist), vec!["y"]);
    assert!(!sink.has_errors());
}

#[test]
fn unknown_type_is_fatal() {
    let mut top = Entity::new(1, "top");
    top.add_instance(Instance::new(2, "u_x", "XOR3"));
    let mut d = design(vec![top]);
    assert!(matches!(run(&mut d).0, Err(ElaborateError::UnknownType { .. })));
}

#[test]
fn undefined_pin_is_fatal() {
    let mut top = Entity::new(1, "top");
    top.add_signal(Signal::scalar(2, "s"));
    let mut inst = Instance::new(3, "u_inv", "INV");
    inst.connect("Q", vec![Signal::scalar(3, "s")]);
    top.add_instance(inst);
    let mut d = design(vec![top]);
    match run(&mut d).0 {
        Err(ElaborateError::UndefinedPin { pin, gate_type, .. }) => {
            assert_eq!(pin, "Q");
            assert_eq!(gate_type, "INV");
        }
        other => panic!("expected an undefined pin, got {other:?}"),
    }
}

#[test]
fn unknown_entity_port_is_fatal() {
    let mut top = Entity::new(10, "top");
    top.add_signal(Signal::scalar(11, "s"));
    let mut inst = Instance::new(12, "s1", "sub");
    inst.connect("nope", vec![Signal::scalar(12, "s")]);
    top.add_instance(inst);
    let mut d = design(vec![sub_entity(), top]);
    assert!(matches!(run(&mut d).0, Err(ElaborateError::UnknownPort { .. })));
}

#[test]
fn unresolved_connection_is_fatal() {
    let mut top = Entity::new(1, "top");
    top.add_port(PortDirection::Output, Signal::scalar(2, "y"));
    top.add_instance(inv(3, "u_inv", Signal::scalar(3, "ghost"), Signal::scalar(3, "y")));
    let mut d = design(vec![top]);
    match run(&mut d).0 {
        Err(ElaborateError::UnresolvedConnection { port, signal, .. }) => {
            assert_eq!(port, "A");
            assert_eq!(signal, "ghost");
        }
        other => panic!("expected an unresolved connection, got {other:?}"),
    }
}

fn ghost_assignment_design() -> HdlDesign {
    let mut top = Entity::new(1, "top");
    top.add_port(PortDirection::Output, Signal::scalar(2, "y"));
    top.add_assignment(vec![Signal::scalar(3, "y")], vec![Signal::scalar(3, "ghost")]);
    design(vec![top])
}

#[test]
fn unresolved_alias_warns_by_default() {
    let mut d = ghost_assignment_design();
    let (result, sink) = run(&mut d);
    let netlist = result.unwrap();
    assert_eq!(net_names(&netlist), vec!["y"]);
    let diags = sink.diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, W303);
    assert_eq!(diags[0].line, Some(3));
}

#[test]
fn unresolved_alias_is_fatal_in_strict_mode() {
    let config = load_config_from_str(
        r#"
        [elaborate]
        strict_aliases = true
        "#,
    )
    .unwrap();
    let mut d = ghost_assignment_design();
    let (result, _) = run_with(&mut d, &library(), &config.elaborate);
    match result {
        Err(ElaborateError::UnresolvedAlias { name, entity, line }) => {
            assert_eq!((name.as_str(), entity.as_str(), line), ("ghost", "top", 3));
        }
        other => panic!("expected an unresolved alias, got {other:?}"),
    }
}

#[test]
fn pin_group_bits_map_to_member_pins() {
    let mut top = Entity::new(1, "top");
    top.add_port(PortDirection::Input, Signal::vector(2, "x", vec![vec![3, 2, 1, 0]]));
    top.add_port(PortDirection::Output, Signal::scalar(3, "y"));
    let mut lut = Instance::new(4, "u_lut", "LUT4");
    lut.connect("I", vec![Signal::vector(4, "x", vec![vec![3, 2, 1, 0]])]);
    lut.connect("O", vec![Signal::scalar(4, "y")]);
    lut.add_generic("INIT", "bit_vector", "X\"8000\"");
    lut.add_attribute(Attribute::new("LOC", "string", "SLICE_X0Y0"));
    top.add_instance(lut);
    let mut d = design(vec![top]);
    let netlist = run(&mut d).0.unwrap();

    // ordinals ascend, so the first bit of `x` lands on I0
    assert_eq!(destination_names(&netlist, "x(3)"), vec!["u_lut.I0"]);
    assert_eq!(destination_names(&netlist, "x(0)"), vec!["u_lut.I3"]);
    let gate = netlist.gate_by_name("u_lut").unwrap();
    assert_eq!(gate.data().get(GENERIC_CATEGORY, "INIT").unwrap().value, "X\"8000\"");
    assert_eq!(gate.data().get(ATTRIBUTE_CATEGORY, "LOC").unwrap().ty, "string");
}

#[test]
fn attributes_reach_modules_and_nets() {
    let mut sub = sub_entity();
    sub.add_attribute(Attribute::new("DONT_TOUCH", "boolean", "true"));
    let mut top = Entity::new(10, "top");
    let mut a = Signal::scalar(11, "a");
    a.add_attribute(Attribute::new("IOSTANDARD", "string", "LVCMOS33"));
    top.add_port(PortDirection::Input, a);
    top.add_port(PortDirection::Output, Signal::scalar(12, "y"));
    let mut inst = Instance::new(13, "s1", "sub");
    inst.connect("i", vec![Signal::scalar(13, "a")]);
    inst.connect("o", vec![Signal::scalar(13, "y")]);
    inst.add_generic("WIDTH", "integer", "1");
    top.add_instance(inst);
    let mut d = design(vec![sub, top]);
    let netlist = run(&mut d).0.unwrap();

    let s1 = netlist.module_by_name("s1").unwrap();
    assert_eq!(s1.data().get(ATTRIBUTE_CATEGORY, "DONT_TOUCH").unwrap().value, "true");
    assert_eq!(s1.data().get(GENERIC_CATEGORY, "WIDTH").unwrap().value, "1");
    let a = net(&netlist, "a");
    assert_eq!(a.data().get(ATTRIBUTE_CATEGORY, "IOSTANDARD").unwrap().value, "LVCMOS33");
}

#[test]
fn three_level_hierarchy() {
    let leaf = sub_entity();
    let mut mid = Entity::new(20, "mid");
    mid.add_port(PortDirection::Input, Signal::scalar(21, "x"));
    mid.add_port(PortDirection::Output, Signal::scalar(22, "z"));
    let mut inst = Instance::new(23, "u_leaf", "sub");
    inst.connect("i", vec![Signal::scalar(23, "x")]);
    inst.connect("o", vec![Signal::scalar(23, "z")]);
    mid.add_instance(inst);

    let mut top = Entity::new(30, "top");
    top.add_port(PortDirection::Input, Signal::scalar(31, "a"));
    top.add_port(PortDirection::Output, Signal::scalar(32, "y"));
    let mut inst = Instance::new(33, "u_mid", "mid");
    inst.connect("x", vec![Signal::scalar(33, "a")]);
    inst.connect("z", vec![Signal::scalar(33, "y")]);
    top.add_instance(inst);

    let mut d = design(vec![leaf, mid, top]);
    let netlist = run(&mut d).0.unwrap();

    let names: Vec<&str> = netlist
        .module_tree(netlist.top_module())
        .into_iter()
        .map(|id| netlist.module(id).unwrap().name())
        .collect();
    assert_eq!(names, vec!["top_module", "u_mid", "u_leaf"]);
    let u_leaf = netlist.module_by_name("u_leaf").unwrap();
    assert_eq!(u_leaf.gates().len(), 1);
    assert_eq!(netlist.module(u_leaf.parent().unwrap()).unwrap().type_name(), "mid");
    assert_eq!(source_names(&netlist, "tmp"), vec!["u1.Y"]);
    assert!(net(&netlist, "tmp").is_global_output());
}

#[test]
fn inout_port_binds_both_directions() {
    let mut top = Entity::new(1, "top");
    top.add_port(PortDirection::InOut, Signal::scalar(2, "io"));
    top.add_port(PortDirection::Output, Signal::scalar(2, "y"));
    top.add_instance(inv(3, "u_inv", Signal::scalar(3, "io"), Signal::scalar(3, "y")));
    let mut d = design(vec![top]);
    let netlist = run(&mut d).0.unwrap();

    let io = net(&netlist, "io");
    assert!(io.is_global_input() && io.is_global_output());
    let top = netlist.module(netlist.top_module()).unwrap();
    assert_eq!(top.input_port_name(io.id()), Some("io"));
    assert_eq!(top.output_port_name(io.id()), Some("io"));
}

#[test]
fn unused_entities_are_reported_not_removed() {
    let mut spare = Entity::new(1, "spare");
    spare.add_port(PortDirection::Input, Signal::scalar(2, "p"));
    let mut d = design(vec![spare, and_gate_entity()]);

    let (result, sink) = run(&mut d);
    assert!(result.is_ok());
    assert_eq!(sink.diagnostics().iter().filter(|d| d.code == W302).count(), 1);
    assert!(d.entity("spare").is_some());

    let quiet = ElaborateConfig {
        warn_unused_entities: false,
        ..ElaborateConfig::default()
    };
    let (_, sink) = run_with(&mut d, &library(), &quiet);
    assert!(sink.diagnostics().is_empty());
}

#[test]
fn design_loaded_from_json_elaborates_identically() {
    let mut original = twice_instantiated_design();
    let json = serde_json::to_string(&original).unwrap();
    let mut loaded: HdlDesign = serde_json::from_str(&json).unwrap();

    let a = run(&mut original).0.unwrap();
    let (b, sink) = run(&mut loaded);
    assert_eq!(a.fingerprint(), b.unwrap().fingerprint());
    // the derived caches are not serialized, so every entity is re-initialized
    assert_eq!(sink.warning_count(), 2);
}

#[test]
fn explicit_top_selection() {
    let mut d = twice_instantiated_design();
    let config = ElaborateConfig::default().with_top("sub");
    let (result, _) = run_with(&mut d, &library(), &config);
    let netlist = result.unwrap();
    assert_eq!(netlist.design_name(), "sub");
    assert_eq!(net_names(&netlist), vec!["i", "tmp"]);
    assert!(net(&netlist, "tmp").is_global_output());

    let config = ElaborateConfig::default().with_top("missing");
    assert!(matches!(
        run_with(&mut d, &library(), &config).0,
        Err(ElaborateError::UnknownTopEntity { .. })
    ));
}

/// `o = i` with no logic in between.
fn wire_entity() -> Entity {
    let mut wire = Entity::new(1, "wire");
    wire.add_port(PortDirection::Input, Signal::scalar(2, "i"));
    wire.add_port(PortDirection::Output, Signal::scalar(3, "o"));
    wire.add_assignment(vec![Signal::scalar(4, "o")], vec![Signal::scalar(4, "i")]);
    wire
}

#[test]
fn constant_through_a_wire_drives_the_output() {
    let mut top = Entity::new(10, "top");
    top.add_port(PortDirection::Output, Signal::scalar(11, "y"));
    let mut inst = Instance::new(12, "u_wire", "wire");
    inst.connect("i", vec![Signal::literal(12, "1")]);
    inst.connect("o", vec![Signal::scalar(12, "y")]);
    top.add_instance(inst);
    let mut d = design(vec![wire_entity(), top]);
    let netlist = run(&mut d).0.unwrap();

    assert_eq!(net_names(&netlist), vec!["y"]);
    assert!(net(&netlist, "y").is_global_output());
    assert_eq!(source_names(&netlist, "y"), vec!["global_vcc.O"]);
    assert_eq!(netlist.vcc_gates().len(), 1);
    let u_wire = netlist.module_by_name("u_wire").unwrap();
    assert_eq!(u_wire.output_port_name(net(&netlist, "y").id()), Some("o"));
}

#[test]
fn constant_bound_port_keeps_every_tie_off_driven() {
    let mut sub = Entity::new(1, "sub");
    sub.add_port(PortDirection::Input, Signal::scalar(2, "p"));
    sub.add_port(PortDirection::Output, Signal::scalar(2, "q"));
    sub.add_signal(Signal::scalar(3, "s"));
    sub.add_assignment(vec![Signal::scalar(4, "p")], vec![Signal::scalar(4, "s")]);
    sub.add_instance(inv(5, "u1", Signal::scalar(5, "s"), Signal::scalar(5, "q")));

    let mut top = Entity::new(10, "top");
    top.add_port(PortDirection::Output, Signal::scalar(11, "y0"));
    top.add_port(PortDirection::Output, Signal::scalar(11, "y1"));
    top.add_instance(inv(12, "u0", Signal::literal(12, "1"), Signal::scalar(12, "y0")));
    let mut inst = Instance::new(13, "s1", "sub");
    inst.connect("p", vec![Signal::literal(13, "1")]);
    inst.connect("q", vec![Signal::scalar(13, "y1")]);
    top.add_instance(inst);
    let mut d = design(vec![sub, top]);
    let netlist = run(&mut d).0.unwrap();

    for gate in ["u0", "u1"] {
        let gate = netlist.gate_by_name(gate).unwrap();
        let input = netlist.net(gate.fan_in_net("A").unwrap()).unwrap();
        assert_eq!(input.num_sources(), 1, "input of `{}` is undriven", gate.name());
        let driver = netlist.gate(input.sources()[0].gate).unwrap();
        assert!(driver.is_vcc());
    }
    assert_eq!(destination_names(&netlist, "'1'"), vec!["u0.A"]);
    assert_eq!(destination_names(&netlist, "s"), vec!["u1.A"]);
    assert_eq!(netlist.vcc_gates().len(), 2);
}

#[test]
fn self_assignment_is_cyclic() {
    let mut top = Entity::new(1, "top");
    top.add_signal(Signal::scalar(2, "s"));
    top.add_assignment(vec![Signal::scalar(3, "s")], vec![Signal::scalar(3, "s")]);
    let mut d = design(vec![top]);
    match run(&mut d).0 {
        Err(ElaborateError::CyclicNetAlias { nets }) => assert_eq!(nets, ["s"]),
        other => panic!("expected cyclic aliasing, got {other:?}"),
    }
}

#[test]
fn entity_only_used_by_an_unused_entity_is_unused() {
    let mut wrapper = Entity::new(20, "wrapper");
    wrapper.add_instance(Instance::new(21, "u_wire", "wire"));
    let mut d = design(vec![wire_entity(), wrapper, and_gate_entity()]);
    let (result, sink) = run(&mut d);
    assert!(result.is_ok());
    let unused: Vec<_> = sink
        .diagnostics()
        .into_iter()
        .filter(|d| d.code == W302)
        .map(|d| d.line)
        .collect();
    assert_eq!(unused, vec![Some(1), Some(20)]);
}
