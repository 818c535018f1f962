// core/chart.rs
//
// Immutable arena of systems, planets and moons addressed by NodeKey.
// Every edit returns a new Chart; untouched nodes are shared through Arc,
// so views holding an older chart never observe a change.
//
// Usage:
//   let chart = Chart::from_json(json)?;
//   let moved = chart.with_system_position(key, Point2D::new(10.0, 20.0));

use std::collections::HashSet;
use std::sync::Arc;

use crate::api::error::SnapshotError;
use crate::api::types::{NodeKey, Point2D};
use crate::core::extent::SystemShape;
use crate::core::orbit::Tier;
use crate::core::scene::{MidNode, OrbitingEntity, SystemNode, SystemRecord};

/// What a node is, and where systems sit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    System { position: Point2D },
    Body(Tier),
}

#[derive(Debug, Clone)]
struct Node {
    id: String,
    kind: NodeKind,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

/// Snapshot of the whole entity tree.
#[derive(Debug, Clone, Default)]
pub struct Chart {
    nodes: Vec<Arc<Node>>,
    systems: Arc<Vec<NodeKey>>,
}

impl Chart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a chart from owned snapshots, rejecting malformed systems.
    pub fn from_systems(systems: &[SystemNode]) -> Result<Self, SnapshotError> {
        let mut seen = HashSet::new();
        let mut chart = Chart::new();
        for (index, system) in systems.iter().enumerate() {
            if system.id.is_empty() {
                return Err(SnapshotError::EmptySystemId { index });
            }
            if !seen.insert(system.id.as_str()) {
                return Err(SnapshotError::DuplicateSystemId {
                    id: system.id.clone(),
                });
            }
            if !system.position.is_finite() {
                return Err(SnapshotError::NonFinitePosition {
                    id: system.id.clone(),
                    x: system.position.x,
                    y: system.position.y,
                });
            }
            chart.push_system(system);
        }
        Ok(chart)
    }

    /// Parse the data layer's JSON array of systems.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let records: Vec<SystemRecord> = serde_json::from_str(json)?;
        let systems: Vec<SystemNode> = records.into_iter().map(SystemNode::from).collect();
        let chart = Self::from_systems(&systems)?;
        log::info!(
            "chart loaded: {} systems, {} nodes",
            chart.system_count(),
            chart.nodes.len()
        );
        Ok(chart)
    }

    fn alloc(&mut self, id: String, kind: NodeKind, parent: Option<NodeKey>) -> NodeKey {
        let key = NodeKey(self.nodes.len() as u32);
        self.nodes.push(Arc::new(Node {
            id,
            kind,
            parent,
            children: Vec::new(),
        }));
        key
    }

    fn link(&mut self, parent: NodeKey, child: NodeKey) {
        Arc::make_mut(&mut self.nodes[parent.index()]).children.push(child);
    }

    fn push_system(&mut self, system: &SystemNode) -> NodeKey {
        let key = self.alloc(
            system.id.clone(),
            NodeKind::System { position: system.position },
            None,
        );
        Arc::make_mut(&mut self.systems).push(key);
        for planet in &system.children {
            let pk = self.alloc(planet.id.clone(), NodeKind::Body(Tier::Planet), Some(key));
            self.link(key, pk);
            for moon in &planet.children {
                let mk = self.alloc(moon.id.clone(), NodeKind::Body(Tier::Moon), Some(pk));
                self.link(pk, mk);
            }
        }
        key
    }

    fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key.index()).map(Arc::as_ref)
    }

    // -- Queries --

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Iterate over systems in insertion order.
    pub fn systems(&self) -> impl Iterator<Item = SystemRef<'_>> {
        self.systems.iter().map(move |&key| SystemRef { chart: self, key })
    }

    /// View a system by key. `None` if the key is not a system.
    pub fn system(&self, key: NodeKey) -> Option<SystemRef<'_>> {
        match self.node(key)?.kind {
            NodeKind::System { .. } => Some(SystemRef { chart: self, key }),
            NodeKind::Body(_) => None,
        }
    }

    pub fn system_by_id(&self, id: &str) -> Option<SystemRef<'_>> {
        self.systems().find(|s| s.id() == id)
    }

    pub fn kind(&self, key: NodeKey) -> Option<NodeKind> {
        self.node(key).map(|n| n.kind)
    }

    pub fn node_id(&self, key: NodeKey) -> Option<&str> {
        self.node(key).map(|n| n.id.as_str())
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.node(key)?.parent
    }

    /// Ordered children of a node (empty for unknown keys).
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.node(key).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    // -- Edits (each returns a new chart) --

    /// Move a system. `None` if `key` is not a system.
    pub fn with_system_position(&self, key: NodeKey, position: Point2D) -> Option<Chart> {
        self.system(key)?;
        let mut next = self.clone();
        let node = Arc::make_mut(&mut next.nodes[key.index()]);
        node.kind = NodeKind::System { position };
        Some(next)
    }

    /// Append a new system (with its whole subtree).
    pub fn with_system(&self, system: &SystemNode) -> (Chart, NodeKey) {
        let mut next = self.clone();
        let key = next.push_system(system);
        (next, key)
    }

    /// Append a planet as the outermost orbit of `system`.
    pub fn with_planet(&self, system: NodeKey, id: impl Into<String>) -> Option<(Chart, NodeKey)> {
        self.system(system)?;
        let mut next = self.clone();
        let key = next.alloc(id.into(), NodeKind::Body(Tier::Planet), Some(system));
        next.link(system, key);
        Some((next, key))
    }

    /// Append a moon as the outermost orbit of `planet`.
    pub fn with_moon(&self, planet: NodeKey, id: impl Into<String>) -> Option<(Chart, NodeKey)> {
        if self.kind(planet)? != NodeKind::Body(Tier::Planet) {
            return None;
        }
        let mut next = self.clone();
        let key = next.alloc(id.into(), NodeKind::Body(Tier::Moon), Some(planet));
        next.link(planet, key);
        Some((next, key))
    }
}

/// Borrowed view of one system inside a chart.
#[derive(Debug, Clone, Copy)]
pub struct SystemRef<'a> {
    chart: &'a Chart,
    key: NodeKey,
}

/// Borrowed view of an orbiting body with its rank among siblings.
#[derive(Debug, Clone, Copy)]
pub struct BodyRef<'a> {
    pub key: NodeKey,
    pub id: &'a str,
    pub sibling_index: usize,
}

impl<'a> SystemRef<'a> {
    pub fn key(&self) -> NodeKey {
        self.key
    }

    /// Planets in orbit order.
    pub fn planets(&self) -> impl Iterator<Item = BodyRef<'a>> + 'a {
        bodies(self.chart, self.key)
    }

    /// Moons of one planet in orbit order.
    pub fn moons(&self, planet: NodeKey) -> impl Iterator<Item = BodyRef<'a>> + 'a {
        bodies(self.chart, planet)
    }

    /// Copy out an owned snapshot of this system.
    pub fn to_node(&self) -> SystemNode {
        let children = self
            .planets()
            .map(|p| MidNode {
                id: p.id.to_string(),
                children: self
                    .moons(p.key)
                    .map(|m| OrbitingEntity {
                        id: m.id.to_string(),
                        sibling_index: m.sibling_index,
                    })
                    .collect(),
            })
            .collect();
        SystemNode {
            id: self.id().to_string(),
            position: self.position(),
            children,
        }
    }
}

fn bodies(chart: &Chart, parent: NodeKey) -> impl Iterator<Item = BodyRef<'_>> + '_ {
    chart
        .children(parent)
        .iter()
        .enumerate()
        .filter_map(move |(sibling_index, &key)| {
            chart.node_id(key).map(|id| BodyRef {
                key,
                id,
                sibling_index,
            })
        })
}

impl SystemShape for SystemRef<'_> {
    fn id(&self) -> &str {
        self.chart.node_id(self.key).unwrap_or("")
    }

    fn position(&self) -> Point2D {
        match self.chart.kind(self.key) {
            Some(NodeKind::System { position }) => position,
            _ => Point2D::ZERO,
        }
    }

    fn planet_count(&self) -> usize {
        self.chart.children(self.key).len()
    }

    fn max_moon_count(&self) -> usize {
        self.chart
            .children(self.key)
            .iter()
            .map(|&p| self.chart.children(p).len())
            .max()
            .unwrap_or(0)
    }
}
