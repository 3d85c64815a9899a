//! Domain Services
//!
//! Stateless business rules shared by the application layer and adapters.

pub mod catalog;
pub mod checkout;
pub mod rating;
pub mod sanitize;
