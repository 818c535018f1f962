//! Plain entity snapshots handed in by the data layer for one render pass.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::api::types::Point2D;

/// A body on the innermost tier (a moon), identified only for hashing.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitingEntity {
    pub id: String,
    pub sibling_index: usize,
}

/// A planet: orbits its system and owns its own orbiting children.
#[derive(Debug, Clone, PartialEq)]
pub struct MidNode {
    pub id: String,
    pub children: Vec<OrbitingEntity>,
}

/// A top-level system anchored at a world position.
/// Child order determines orbit radius.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemNode {
    pub id: String,
    pub position: Point2D,
    pub children: Vec<MidNode>,
}

impl SystemNode {
    /// A system with no planets yet, e.g. a creation draft.
    pub fn empty(id: impl Into<String>, position: Point2D) -> Self {
        Self {
            id: id.into(),
            position,
            children: Vec::new(),
        }
    }

    pub fn with_planet(mut self, id: impl Into<String>, moon_ids: &[&str]) -> Self {
        let children = moon_ids
            .iter()
            .enumerate()
            .map(|(sibling_index, m)| OrbitingEntity {
                id: m.to_string(),
                sibling_index,
            })
            .collect();
        self.children.push(MidNode {
            id: id.into(),
            children,
        });
        self
    }
}

// ── Wire shape ─────────────────────────────────────────────────────

/// System as returned by the data collaborator. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct SystemRecord {
    #[serde(deserialize_with = "id_string", default)]
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub planets: Vec<PlanetRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlanetRecord {
    #[serde(deserialize_with = "id_string", default)]
    pub id: String,
    #[serde(default)]
    pub moons: Vec<MoonRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MoonRecord {
    #[serde(deserialize_with = "id_string", default)]
    pub id: String,
}

impl From<SystemRecord> for SystemNode {
    fn from(record: SystemRecord) -> Self {
        let children = record
            .planets
            .into_iter()
            .map(|p| MidNode {
                id: p.id,
                children: p
                    .moons
                    .into_iter()
                    .enumerate()
                    .map(|(sibling_index, m)| OrbitingEntity {
                        id: m.id,
                        sibling_index,
                    })
                    .collect(),
            })
            .collect();
        Self {
            id: record.id,
            position: Point2D::new(record.x, record.y),
            children,
        }
    }
}

/// Accept string or numeric ids; anything else becomes empty.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}
