//! Domain models for the Inventory Indent System

mod cart;
mod indent;
mod user;

pub use cart::*;
pub use indent::*;
pub use user::*;
