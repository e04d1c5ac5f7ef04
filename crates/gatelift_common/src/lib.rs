//! Shared foundational types used across the gatelift workspace.
//!
//! This crate provides the four-state [`Logic`] values behind literal constant
//! tokens, content hashing for netlist fingerprints, and the common internal
//! result type.

#![warn(missing_docs)]

pub mod hash;
pub mod logic;
pub mod result;

pub use hash::{ContentHash, ContentHasher};
pub use logic::{is_constant_token, Logic};
pub use result::{GateliftResult, InternalError};
