pub mod separation;

pub use separation::Separation;
