//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and external services. Each service has its own error
//! enum carrying the API error code of every failure it can produce.

mod admin_service;
mod auth_service;
mod cart_service;
mod order_service;
mod product_service;
mod review_service;
mod seller_service;

pub use admin_service::{AdminError, AdminService};
pub use auth_service::{AuthError, AuthService, ProfileUpdate, Registration, SellerApplication};
pub use cart_service::{CartError, CartService};
pub use order_service::{OrderError, OrderService};
pub use product_service::{ProductError, ProductInput, ProductService};
pub use review_service::{ReviewError, ReviewService, ReviewSubmission};
pub use seller_service::{SellerError, SellerService, SellerStats};
