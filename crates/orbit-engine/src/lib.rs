pub mod api;
pub mod core;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::{EngineConfig, OrbitConfig, ResolverConfig, TierConfig, ViewportConfig};
pub use api::error::{ConfigError, SnapshotError};
pub use api::map::OrbitMap;
pub use api::preview::SystemPreview;
pub use api::types::{NodeKey, Point2D, PositionUpdate};
pub use crate::core::chart::{BodyRef, Chart, NodeKind, SystemRef};
pub use crate::core::extent::{system_extent, SystemShape};
pub use crate::core::hash::{hash_for, stable_hash};
pub use crate::core::orbit::{OrbitParams, OrbitalModel, Tier};
pub use crate::core::overlap::{OverlapResolver, ResolveReport};
pub use crate::core::scene::{MidNode, OrbitingEntity, SystemNode};
pub use crate::core::time::TimeDriver;
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::instance::{BodyBuffer, BodyInstance};
pub use renderer::viewport::{ViewTransform, Viewport};
pub use systems::layout::{BodyKind, FrameLayout, PlacedBody};
