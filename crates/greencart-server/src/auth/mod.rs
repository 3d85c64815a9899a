//! Authentication
//!
//! - `jwt`: HS256 bearer tokens
//! - `password`: argon2 password hashes
//! - `extractor`: `CurrentUser` / `AdminUser` request extractors

mod extractor;
mod jwt;
mod password;

pub use extractor::{bearer_token, AdminUser, CurrentUser};
pub use jwt::{Claims, JwtKeys, TokenError};
pub use password::{hash_password, verify_password, PasswordError};
