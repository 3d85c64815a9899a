//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod cloudinary;
#[cfg(test)]
pub mod memory;
pub mod payment;
pub mod postgres;

// Re-exports
pub use cloudinary::CloudinaryStorage;
pub use payment::MockPaymentGateway;
pub use postgres::{
    PgCartRepository, PgMaintenance, PgOrderRepository, PgProductRepository, PgReviewRepository,
    PgUserRepository, TableCounts,
};
