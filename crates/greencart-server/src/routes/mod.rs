//! GreenCart API Routes
//!
//! - /api/health - Liveness check (not rate limited)
//! - /api/auth - Registration, login, profile, seller upgrade
//! - /api/products - Catalog and seller listings
//! - /api/cart - The caller's cart
//! - /api/orders - Checkout and order history
//! - /api/reviews - Product reviews
//! - /api/sellers - Public seller storefronts
//! - /api/admin - User management and moderation

pub mod admin;
pub mod auth;
pub mod cart;
pub mod health;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod sellers;
pub mod swagger;
