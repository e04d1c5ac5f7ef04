//! Errors reported by the netlist builder.

use crate::ids::{GateId, ModuleId, NetId};
use crate::gate_library::PinDirection;

/// A failed netlist mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetlistError {
    /// The referenced net does not exist (never created or already deleted).
    #[error("unknown net {0}")]
    UnknownNet(NetId),

    /// The referenced gate does not exist.
    #[error("unknown gate {0}")]
    UnknownGate(GateId),

    /// The referenced module does not exist.
    #[error("unknown module {0}")]
    UnknownModule(ModuleId),

    /// The gate type is not part of the netlist's gate library.
    #[error("gate type `{type_name}` is not defined in library `{library}`")]
    UnknownGateType {
        /// The requested gate type.
        type_name: String,
        /// The library that was searched.
        library: String,
    },

    /// The pin does not exist on the gate type in the requested direction.
    #[error("gate `{gate}` of type `{gate_type}` has no {direction} pin `{pin}`")]
    InvalidPin {
        /// The pin name.
        pin: String,
        /// The gate instance name.
        gate: String,
        /// The gate type name.
        gate_type: String,
        /// The direction the pin was used in.
        direction: PinDirection,
    },

    /// The `(gate, pin)` endpoint is already attached to this net.
    #[error("pin `{pin}` of gate `{gate}` is already attached to net `{net}`")]
    DuplicateEndpoint {
        /// The pin name.
        pin: String,
        /// The gate instance name.
        gate: String,
        /// The net name.
        net: String,
    },

    /// The gate pin already connects to a different net.
    #[error("pin `{pin}` of gate `{gate}` is already connected to net `{existing}`, cannot connect it to `{requested}`")]
    PinAlreadyConnected {
        /// The pin name.
        pin: String,
        /// The gate instance name.
        gate: String,
        /// The net the pin already connects to.
        existing: String,
        /// The net the caller tried to connect.
        requested: String,
    },
}
