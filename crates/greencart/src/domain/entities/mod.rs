//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - User: Account with a marketplace role
//! - Product: Catalog listing owned by a seller
//! - CartItem: Line in a user's shopping cart
//! - Order: Completed purchase with price snapshots
//! - Review: Buyer feedback tied to an order

mod cart;
mod order;
mod product;
mod review;
mod user;

pub use cart::*;
pub use order::*;
pub use product::*;
pub use review::*;
pub use user::*;
