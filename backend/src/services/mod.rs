//! Business logic services for the Inventory Indent System

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod fulfillment;
pub mod reporting;
pub mod sequence;

pub use auth::AuthService;
pub use cart::CartService;
pub use catalog::CatalogService;
pub use fulfillment::FulfillmentService;
pub use reporting::ReportingService;
pub use sequence::IndentSequencer;
