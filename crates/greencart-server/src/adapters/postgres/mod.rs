//! PostgreSQL Repository Implementations

mod cart_repository;
mod maintenance;
mod order_repository;
mod product_repository;
mod review_repository;
mod user_repository;

pub use cart_repository::PgCartRepository;
pub use maintenance::{PgMaintenance, TableCounts};
pub use order_repository::PgOrderRepository;
pub use product_repository::PgProductRepository;
pub use review_repository::PgReviewRepository;
pub use user_repository::PgUserRepository;

use greencart::{DomainError, SustainabilityTag};
use product_repository::ProductRow;

/// Map a sqlx error, surfacing unique violations as `Conflict(<constraint>)`
pub(crate) fn db_error(e: sqlx::Error) -> DomainError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return DomainError::Conflict(
                db.constraint().unwrap_or("unique constraint").to_string(),
            );
        }
    }
    DomainError::Repository(e.to_string())
}

pub(crate) fn parse_column<T: std::str::FromStr>(column: &str, value: &str) -> Result<T, DomainError> {
    value
        .parse()
        .map_err(|_| DomainError::Repository(format!("Unexpected {column} value: {value}")))
}

/// Tags are stored as lowercase text; unknown values are skipped
pub(crate) fn tags_from_db(values: Vec<String>) -> Vec<SustainabilityTag> {
    values.iter().filter_map(|v| v.parse().ok()).collect()
}

pub(crate) fn tags_to_db(tags: &[SustainabilityTag]) -> Vec<String> {
    tags.iter().map(|t| t.as_str().to_string()).collect()
}
