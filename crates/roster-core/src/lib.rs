//! Ambient plumbing shared across the roster workspace: tracing setup and
//! SeaORM helpers. Domain logic does not belong here.

pub mod sea_ext;
pub mod tracing;
