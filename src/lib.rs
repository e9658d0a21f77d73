//! Spatial indexing and overlap queries for large swarms of 2D colliders,
//! driven by a fixed-timestep `hecs` simulation.

pub mod config;
pub mod debug;
pub mod ecs;
pub mod geom;
pub mod sim;
pub mod spatial;
pub mod spawn;
pub mod steering;
pub mod util;

pub use config::{ConfigError, GridConfig, SeparationConfig, SimConfig};
pub use geom::{Collider, HasColliders, Population, Shape};
pub use sim::Simulation;
