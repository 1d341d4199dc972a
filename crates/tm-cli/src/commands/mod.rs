//! Command implementations

pub mod migrate;
pub mod status;
