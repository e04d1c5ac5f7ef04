//! Configuration types deserialized from `gatelift.toml`.

use serde::Deserialize;

/// The top-level configuration parsed from `gatelift.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Elaboration settings.
    #[serde(default)]
    pub elaborate: ElaborateConfig,
}

/// Settings for one elaboration run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ElaborateConfig {
    /// Name of the top entity. `None` selects the last declared entity.
    pub top: Option<String>,
    /// Treat direct assignments whose names cannot be resolved as fatal
    /// instead of warning and leaving them unmerged.
    pub strict_aliases: bool,
    /// Emit a warning for every entity that is never instantiated.
    pub warn_unused_entities: bool,
    /// Name given to the automatically created GND driver gate.
    pub gnd_gate_name: String,
    /// Name given to the automatically created VCC driver gate.
    pub vcc_gate_name: String,
    /// Synthetic instance name of the top entity; the top module carries it.
    pub top_instance_name: String,
}

impl Default for ElaborateConfig {
    fn default() -> Self {
        Self {
            top: None,
            strict_aliases: false,
            warn_unused_entities: true,
            gnd_gate_name: "global_gnd".to_string(),
            vcc_gate_name: "global_vcc".to_string(),
            top_instance_name: "top_module".to_string(),
        }
    }
}

impl ElaborateConfig {
    /// Returns a copy with the top entity set to `name`.
    pub fn with_top(mut self, name: impl Into<String>) -> Self {
        self.top = Some(name.into());
        self
    }

    /// Returns a copy with strict alias checking switched on or off.
    pub fn with_strict_aliases(mut self, strict: bool) -> Self {
        self.strict_aliases = strict;
        self
    }
}
