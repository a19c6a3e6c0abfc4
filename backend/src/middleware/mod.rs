//! HTTP middleware for the Inventory Indent System

pub mod auth;

pub use auth::{auth_middleware, require_role, AuthUser, CurrentUser};
