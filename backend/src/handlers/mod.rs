//! HTTP request handlers

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod health;
pub mod orders;
pub mod reporting;

pub use admin::*;
pub use auth::*;
pub use cart::*;
pub use catalog::*;
pub use health::*;
pub use orders::*;
pub use reporting::*;
