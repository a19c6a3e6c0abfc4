//! Shared types and models for the Inventory Indent System
//!
//! This crate contains the domain types shared between the backend and any
//! future clients of the system: roles, cart lifecycle, indent numbering,
//! pagination and validation helpers.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
