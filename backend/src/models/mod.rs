//! Domain models for the Inventory Indent System
//!
//! Re-exports models from the shared crate; row types specific to a
//! service live next to that service

pub use shared::models::*;
