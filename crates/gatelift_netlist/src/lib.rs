//! Gate-level netlist graph and gate-library catalogue.
//!
//! The [`Netlist`] owns [`Net`]s, [`Gate`]s, and the [`Module`] hierarchy and
//! is the only mutation path the elaborator uses. Gates are instances of the
//! [`GateType`]s registered in a [`GateLibrary`]; every pin a net attaches to
//! is validated against the library.

#![warn(missing_docs)]

pub mod arena;
pub mod data;
pub mod error;
pub mod gate;
pub mod gate_library;
pub mod ids;
pub mod module;
pub mod net;
pub mod netlist;

pub use arena::{Arena, ArenaId};
pub use data::{DataMap, DataValue, ATTRIBUTE_CATEGORY, GENERIC_CATEGORY};
pub use error::NetlistError;
pub use gate::Gate;
pub use gate_library::{GateLibrary, GateType, PinDirection};
pub use ids::{GateId, ModuleId, NetId};
pub use module::Module;
pub use net::{Endpoint, Net};
pub use netlist::Netlist;
