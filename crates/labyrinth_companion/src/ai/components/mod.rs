//! AI components (decision state, config, in-flight запросы)

pub mod config;
pub mod decision;
pub mod pending;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod decision_tests;

// Re-export all components
pub use config::*;
pub use decision::*;
pub use pending::*;
