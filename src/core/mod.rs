//! Foundational value types for the settlement engine.

pub mod currency;
pub mod expense;
pub mod group;
pub mod person;
