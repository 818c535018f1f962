pub mod config;
pub mod error;
pub mod map;
pub mod preview;
pub mod types;
