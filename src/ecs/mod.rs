pub mod components;
pub mod snapshot;
pub mod systems;
