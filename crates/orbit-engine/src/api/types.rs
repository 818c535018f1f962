use glam::DVec2;

/// World-space point. f64 throughout; the renderer narrows to f32 at the end.
pub type Point2D = DVec2;

/// Stable key of a node inside a [`Chart`](crate::core::chart::Chart).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u32);

impl NodeKey {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A corrected system position the host should persist.
/// Fire-and-forget: the next frame renders correctly without confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionUpdate {
    pub system: NodeKey,
    pub id: String,
    pub position: Point2D,
}
