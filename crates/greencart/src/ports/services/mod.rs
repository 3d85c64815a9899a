//! Service Ports
//!
//! Interfaces for external services.

mod image_storage;
mod payment;

pub use image_storage::*;
pub use payment::*;
