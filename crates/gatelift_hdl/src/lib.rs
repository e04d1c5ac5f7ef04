//! Dialect-independent HDL intermediate representation.
//!
//! Front-ends for the individual hardware-description dialects normalize their
//! parse results into the types of this crate: [`Entity`] design units with
//! ports, internal [`Signal`]s, direct wire assignments, and sub-[`Instance`]s.
//! The elaborator consumes an [`HdlDesign`] and flattens it into a gate-level
//! netlist.
//!
//! All name-keyed containers are [`IndexMap`](indexmap::IndexMap)s so that
//! iteration follows declaration order; alias numbering during elaboration
//! depends on it.

#![warn(missing_docs)]

pub mod attribute;
pub mod design;
pub mod entity;
pub mod expand;
pub mod instance;
pub mod port;
pub mod signal;

pub use attribute::Attribute;
pub use design::HdlDesign;
pub use entity::{Assignment, Entity, ExpandedEntity, FlatAssignment, Port};
pub use expand::{expand, expand_all};
pub use instance::{Generic, Instance, PortAssignment};
pub use port::PortDirection;
pub use signal::Signal;
