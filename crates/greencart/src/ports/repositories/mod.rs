//! Repository Ports
//!
//! Data access interfaces. All operations return `DomainError` on failure.

mod cart_repository;
mod order_repository;
mod product_repository;
mod review_repository;
mod user_repository;

pub use cart_repository::*;
pub use order_repository::*;
pub use product_repository::*;
pub use review_repository::*;
pub use user_repository::*;
