//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod order_status;
mod role;
mod sustainability_tag;

pub use order_status::*;
pub use role::*;
pub use sustainability_tag::*;
