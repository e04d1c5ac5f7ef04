//! The complete set of entities handed over by a front-end.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// All entities of a design, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HdlDesign {
    /// Entities by name.
    pub entities: IndexMap<String, Entity>,
}

impl HdlDesign {
    /// Creates an empty design.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity, returning the previous entity of the same name.
    ///
    /// A redeclared entity keeps its original position in declaration order.
    pub fn add_entity(&mut self, entity: Entity) -> Option<Entity> {
        self.entities.insert(entity.name.clone(), entity)
    }

    /// Looks up an entity by name.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// Name of the last declared entity, the default top.
    pub fn last_entity_name(&self) -> Option<&str> {
        self.entities.last().map(|(name, _)| name.as_str())
    }

    /// Returns `true` if the design declares no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
