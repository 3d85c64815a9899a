//! GreenCart API Models
//!
//! Request and response bodies. JSON field names are camelCase.

mod admin;
mod auth;
mod cart;
mod order;
mod product;
mod response;
mod review;
mod seller;

pub use admin::*;
pub use auth::*;
pub use cart::*;
pub use order::*;
pub use product::*;
pub use response::*;
pub use review::*;
pub use seller::*;
