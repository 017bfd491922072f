//! Monster species templates
//!
//! One immutable template per species, loaded once and shared by every
//! spawned instance through an `Arc`.

use std::path::Path;
use std::sync::Arc;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_MONSTER_HP;
use crate::magic::SpellId;
use crate::world::ConfigError;

/// Species identifier in the monster catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpeciesId(pub u16);

/// Static stats of a monster species
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterTemplate {
    pub id: SpeciesId,
    pub name: String,
    pub level: u16,

    /// Max hit points
    pub hp: i32,
    /// Max mana
    #[serde(default)]
    pub mp: i32,

    /// Cells within which the monster can hit its target
    pub attack_range: u8,
    /// Cells within which the monster notices and keeps a target
    pub view_range: u8,
    /// Max per-axis offset of an idle wander step
    pub move_range: u8,

    /// Milliseconds between steps
    pub move_speed: u32,
    /// Milliseconds between attacks
    pub attack_speed: u32,

    pub attack: i32,
    pub damage_min: i32,
    pub damage_max: i32,
    /// Hit rating
    pub success: i32,
    pub defense: i32,
    #[serde(default)]
    pub defense_rate: i32,

    /// Seconds between death and regeneration
    pub regen_secs: u32,

    /// Innate spell cast with every attack
    #[serde(default)]
    pub spell: Option<SpellId>,
}

impl MonsterTemplate {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let field = |name: &str| format!("monsters.{}.{name}", self.name);
        if self.hp <= 0 {
            return Err(ConfigError::invalid(field("hp"), "must be positive"));
        }
        if self.hp > MAX_MONSTER_HP {
            return Err(ConfigError::invalid(
                field("hp"),
                format!("{} exceeds {MAX_MONSTER_HP}", self.hp),
            ));
        }
        if self.damage_min > self.damage_max {
            return Err(ConfigError::invalid(
                field("damage_min"),
                format!("{} exceeds damage_max {}", self.damage_min, self.damage_max),
            ));
        }
        Ok(())
    }
}

/// Species templates keyed by id
#[derive(Debug, Clone, Default)]
pub struct MonsterCatalog {
    templates: HashMap<SpeciesId, Arc<MonsterTemplate>>,
}

impl MonsterCatalog {
    pub fn new(templates: impl IntoIterator<Item = MonsterTemplate>) -> Self {
        Self {
            templates: templates
                .into_iter()
                .map(|t| (t.id, Arc::new(t)))
                .collect(),
        }
    }

    /// Load a JSON array of templates
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let templates: Vec<MonsterTemplate> = serde_json::from_str(contents)?;
        for template in &templates {
            template.validate()?;
        }
        Ok(Self::new(templates))
    }

    pub fn get(&self, id: SpeciesId) -> Option<Arc<MonsterTemplate>> {
        self.templates.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Species ids in ascending order
    pub fn ids(&self) -> Vec<SpeciesId> {
        let mut ids: Vec<_> = self.templates.keys().copied().collect();
        ids.sort_by_key(|id| id.0);
        ids
    }
}
