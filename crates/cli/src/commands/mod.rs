//! CLI command implementations.

pub mod lifecycle;
pub mod settings;
pub mod sign;
