//! Diagnostic codes, helper functions, and the fatal error type of elaboration.
//!
//! Error codes `E301`--`E312` cover fatal structural failures (width
//! mismatches, unknown types and pins, cyclic aliasing, ...). Warning codes
//! `W301`--`W306` cover findings that do not stop elaboration.

use gatelift_common::InternalError;
use gatelift_diagnostics::{Category, Diagnostic, DiagnosticCode};
use gatelift_netlist::NetlistError;

/// Port width differs from the width of the signals assigned to it.
pub const E301: DiagnosticCode = DiagnosticCode::new(Category::Error, 301);

/// Instance port matches no pin of its gate type.
pub const E302: DiagnosticCode = DiagnosticCode::new(Category::Error, 302);

/// Instance type is neither an entity nor a library gate type.
pub const E303: DiagnosticCode = DiagnosticCode::new(Category::Error, 303);

/// Instance port does not exist on the instantiated entity.
pub const E304: DiagnosticCode = DiagnosticCode::new(Category::Error, 304);

/// Instance connection names a signal that is not visible in the parent.
pub const E305: DiagnosticCode = DiagnosticCode::new(Category::Error, 305);

/// Direct assignments alias nets in a cycle.
pub const E306: DiagnosticCode = DiagnosticCode::new(Category::Error, 306);

/// A constant needs a driver but the library has no GND/VCC type.
pub const E307: DiagnosticCode = DiagnosticCode::new(Category::Error, 307);

/// The design contains no entities.
pub const E308: DiagnosticCode = DiagnosticCode::new(Category::Error, 308);

/// The configured top entity does not exist.
pub const E309: DiagnosticCode = DiagnosticCode::new(Category::Error, 309);

/// Unresolved direct assignment alias (strict mode).
pub const E310: DiagnosticCode = DiagnosticCode::new(Category::Error, 310);

/// A netlist mutation was rejected.
pub const E311: DiagnosticCode = DiagnosticCode::new(Category::Error, 311);

/// Internal invariant violation.
pub const E312: DiagnosticCode = DiagnosticCode::new(Category::Error, 312);

/// Entity was not initialized by the front-end.
pub const W301: DiagnosticCode = DiagnosticCode::new(Category::Warning, 301);

/// Entity is never instantiated.
pub const W302: DiagnosticCode = DiagnosticCode::new(Category::Warning, 302);

/// Direct assignment names a signal that cannot be resolved.
pub const W303: DiagnosticCode = DiagnosticCode::new(Category::Warning, 303);

/// Data could not be attached to a netlist object.
pub const W304: DiagnosticCode = DiagnosticCode::new(Category::Warning, 304);

/// Merging two nets found conflicting data values.
pub const W305: DiagnosticCode = DiagnosticCode::new(Category::Warning, 305);

/// A scheduled merge refers to a net that no longer exists.
pub const W306: DiagnosticCode = DiagnosticCode::new(Category::Warning, 306);

/// A fatal elaboration failure. No netlist is produced.
#[derive(Debug, thiserror::Error)]
pub enum ElaborateError {
    /// Port width and assigned width differ.
    #[error("port `{port}` of instance `{instance}` has width {left} but the assigned signals have width {right} (line {line})")]
    PortWidthMismatch {
        /// The port name.
        port: String,
        /// The instance name.
        instance: String,
        /// Expanded width of the port.
        left: u32,
        /// Summed width of the assigned signals.
        right: u32,
        /// Source line of the port connection.
        line: u32,
    },

    /// Port matches no input or output pin of the gate type.
    #[error("undefined pin `{pin}` for gate `{gate}` of type `{gate_type}` (line {line})")]
    UndefinedPin {
        /// The pin name as written on the instance.
        pin: String,
        /// The gate instance name.
        gate: String,
        /// The gate type name.
        gate_type: String,
        /// Source line of the instance.
        line: u32,
    },

    /// Type is neither an entity nor a gate type.
    #[error("unknown type `{type_name}` of instance `{instance}` (line {line})")]
    UnknownType {
        /// The unresolved type name.
        type_name: String,
        /// The instance name.
        instance: String,
        /// Source line of the instance.
        line: u32,
    },

    /// Port does not exist on the instantiated entity.
    #[error("entity `{entity}` has no port `{port}` (instance `{instance}`, line {line})")]
    UnknownPort {
        /// The port name.
        port: String,
        /// The instance name.
        instance: String,
        /// The instantiated entity.
        entity: String,
        /// Source line of the port connection.
        line: u32,
    },

    /// A connection names a signal that is neither a port binding, a local
    /// signal, nor a constant.
    #[error("connection `{port} => {signal}` of instance `{instance}` cannot be resolved (line {line})")]
    UnresolvedConnection {
        /// The flat port name.
        port: String,
        /// The flat signal name.
        signal: String,
        /// The instance name.
        instance: String,
        /// Source line of the port connection.
        line: u32,
    },

    /// Direct assignments alias nets in a cycle.
    #[error("cyclic net aliasing between {}", format_names(.nets))]
    CyclicNetAlias {
        /// The nets left in the merge schedule.
        nets: Vec<String>,
    },

    /// No gate type of the required kind is registered.
    #[error("a {kind} driver is required but the gate library defines no {kind} gate type")]
    MissingGndVccType {
        /// `GND` or `VCC`.
        kind: String,
    },

    /// Nothing to elaborate.
    #[error("the design contains no entities")]
    NoEntities,

    /// The selected top entity does not exist.
    #[error("top entity `{name}` not found")]
    UnknownTopEntity {
        /// The requested top entity.
        name: String,
    },

    /// A direct assignment alias cannot be resolved (strict mode).
    #[error("unresolved signal `{name}` in direct assignment of entity `{entity}` (line {line})")]
    UnresolvedAlias {
        /// The flat signal name.
        name: String,
        /// The entity containing the assignment.
        entity: String,
        /// Source line of the assignment.
        line: u32,
    },

    /// The netlist rejected a mutation, e.g. a pin wired to two nets.
    #[error(transparent)]
    Netlist(#[from] NetlistError),

    /// An internal invariant was violated.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

fn format_names(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("`{n}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ElaborateError {
    /// The diagnostic code of this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            ElaborateError::PortWidthMismatch { .. } => E301,
            ElaborateError::UndefinedPin { .. } => E302,
            ElaborateError::UnknownType { .. } => E303,
            ElaborateError::UnknownPort { .. } => E304,
            ElaborateError::UnresolvedConnection { .. } => E305,
            ElaborateError::CyclicNetAlias { .. } => E306,
            ElaborateError::MissingGndVccType { .. } => E307,
            ElaborateError::NoEntities => E308,
            ElaborateError::UnknownTopEntity { .. } => E309,
            ElaborateError::UnresolvedAlias { .. } => E310,
            ElaborateError::Netlist(_) => E311,
            ElaborateError::Internal(_) => E312,
        }
    }

    /// The source line the error refers to, if any.
    pub fn line(&self) -> Option<u32> {
        match self {
            ElaborateError::PortWidthMismatch { line, .. }
            | ElaborateError::UndefinedPin { line, .. }
            | ElaborateError::UnknownType { line, .. }
            | ElaborateError::UnknownPort { line, .. }
            | ElaborateError::UnresolvedConnection { line, .. }
            | ElaborateError::UnresolvedAlias { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Converts the error into a structured diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code(), self.to_string());
        if let Some(line) = self.line() {
            diag = diag.with_line(line);
        }
        match self {
            ElaborateError::UnknownType { .. } => {
                diag.with_help("declare the entity or add the gate type to the gate library")
            }
            ElaborateError::CyclicNetAlias { .. } => {
                diag.with_note(
                    "every chain of direct assignments must end in a net that is never assigned",
                )
            }
            ElaborateError::UnknownTopEntity { .. } => {
                diag.with_help(
                    "set `elaborate.top` in gatelift.toml to the name of an existing entity",
                )
            }
            ElaborateError::UnresolvedAlias { .. } => {
                diag.with_help("disable `elaborate.strict_aliases` to downgrade this to a warning")
            }
            ElaborateError::Internal(_) => {
                diag.with_note("this is a bug in gatelift, not in the design")
            }
            _ => diag,
        }
    }
}

/// Creates a warning for an entity the front-end left uninitialized.
pub fn warn_uninitialized_entity(entity: &str, line: u32) -> Diagnostic {
    Diagnostic::warning(W301, format!("entity `{entity}` is not initialized, initializing now"))
        .with_line(line)
}

/// Creates a warning for an entity that is never instantiated.
pub fn warn_unused_entity(entity: &str, line: u32) -> Diagnostic {
    Diagnostic::warning(
        W302,
        format!("entity `{entity}` is never instantiated below the top entity"),
    )
    .with_line(line)
    .with_note("the entity is kept but does not contribute to the netlist")
}

/// Creates a warning for a direct assignment whose signal is unknown.
pub fn warn_unresolved_alias(name: &str, entity: &str, line: u32) -> Diagnostic {
    Diagnostic::warning(
        W303,
        format!("signal `{name}` in direct assignment of entity `{entity}` cannot be resolved"),
    )
    .with_line(line)
    .with_note("the assignment is skipped")
}

/// Creates a warning when data could not be attached to its owner.
pub fn warn_data_write(owner: &str, key: &str, line: u32) -> Diagnostic {
    Diagnostic::warning(W304, format!("could not set data `{key}` on `{owner}`")).with_line(line)
}

/// Creates a warning for conflicting data found while merging two nets.
pub fn warn_merge_data_conflict(master: &str, slave: &str, key: &str) -> Diagnostic {
    Diagnostic::warning(
        W305,
        format!("net `{slave}` merged into `{master}` carries a different value for `{key}`"),
    )
    .with_note(format!("the value of `{master}` is kept"))
}

/// Creates a warning for a merge whose nets no longer exist.
pub fn warn_merge_missing_net(master: &str, slave: &str) -> Diagnostic {
    Diagnostic::warning(
        W306,
        format!("cannot merge net `{slave}` into `{master}`: net does not exist"),
    )
}
