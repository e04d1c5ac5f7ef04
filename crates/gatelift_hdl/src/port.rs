//! Port directions for entity interfaces.

use serde::{Deserialize, Serialize};

/// The direction of a port on an entity boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// An input port (data flows into the entity).
    Input,
    /// An output port (data flows out of the entity).
    Output,
    /// A bidirectional port.
    InOut,
}

impl PortDirection {
    /// Returns `true` for `Input` and `InOut`.
    pub fn is_input(self) -> bool {
        matches!(self, PortDirection::Input | PortDirection::InOut)
    }

    /// Returns `true` for `Output` and `InOut`.
    pub fn is_output(self) -> bool {
        matches!(self, PortDirection::Output | PortDirection::InOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inout_is_both() {
        assert!(PortDirection::InOut.is_input());
        assert!(PortDirection::InOut.is_output());
        assert!(PortDirection::Input.is_input());
        assert!(!PortDirection::Input.is_output());
        assert!(!PortDirection::Output.is_input());
    }

    #[test]
    fn serde_roundtrip() {
        let json = serde_json::to_string(&PortDirection::InOut).unwrap();
        let back: PortDirection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PortDirection::InOut);
    }
}
