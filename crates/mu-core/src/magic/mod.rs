//! Skill catalog: spells a monster species may cast as its basic attack

use std::path::Path;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::world::ConfigError;

/// Identifier of a skill/spell in the skill catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpellId(pub u16);

/// Catalog entry for one skill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDef {
    pub id: SpellId,
    pub name: String,
    pub damage_min: i32,
    pub damage_max: i32,
}

/// Skill definitions keyed by id
#[derive(Debug, Clone, Default)]
pub struct SkillCatalog {
    skills: HashMap<SpellId, SkillDef>,
}

impl SkillCatalog {
    pub fn new(defs: impl IntoIterator<Item = SkillDef>) -> Self {
        Self {
            skills: defs.into_iter().map(|def| (def.id, def)).collect(),
        }
    }

    /// Load a JSON array of skill definitions
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let defs: Vec<SkillDef> = serde_json::from_str(contents)?;
        if let Some(bad) = defs.iter().find(|d| d.damage_min > d.damage_max) {
            return Err(ConfigError::invalid(
                format!("skills.{}", bad.name),
                "damage_min exceeds damage_max",
            ));
        }
        Ok(Self::new(defs))
    }

    pub fn get(&self, id: SpellId) -> Option<&SkillDef> {
        self.skills.get(&id)
    }
}
