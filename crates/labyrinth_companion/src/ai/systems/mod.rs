//! AI systems (decision cycle + movement)

pub mod decision;
pub mod movement;

// Re-export all systems
pub use decision::*;
pub use movement::*;
