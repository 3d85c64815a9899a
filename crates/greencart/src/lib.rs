//! GreenCart Domain Library
//!
//! Core domain types and interfaces for the GreenCart marketplace.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (User, Product, CartItem, Order, Review)
//!   - `value_objects/`: Immutable value types (Role, SustainabilityTag, OrderStatus)
//!   - `services/`: Stateless rules (sanitizers, catalog filters, ratings, checkout)
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Data access interfaces
//!   - `services/`: External service interfaces (image hosting, payments)
//!
//! # Usage
//!
//! ```rust,ignore
//! use greencart::domain::{Product, ProductFilter};
//! use greencart::ports::{ProductRepository, ImageStorage};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    services, CartItem, CartLine, CartView, CheckoutError, DomainError, Order, OrderItem,
    OrderStatus, Pagination, PaymentStatus, Product, ProductFilter, ProductPatch,
    ProductWithSeller, RatingSummary, Review, ReviewDetails, Role, SellerProfile,
    SellerSummary, SustainabilityTag, User,
};
pub use ports::{
    CartRepository, ImageStorage, ImageUpload, OrderRepository, PaymentGateway,
    ProductRepository, ReviewRepository, UserRepository,
};
