pub mod chart;
pub mod extent;
pub mod hash;
pub mod orbit;
pub mod overlap;
pub mod scene;
pub mod time;
