use diesel::r2d2::PoolError;
use thiserror::Error;

use crate::domain::product::FieldViolation;
use crate::domain::types::{ProductId, TypeConstraintError};

/// Errors surfaced by repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The payload broke one or more field rules; nothing was written.
    #[error("validation failed: {}", join_violations(.0))]
    Validation(Vec<FieldViolation>),
    #[error("product {0} not found")]
    NotFound(ProductId),
    /// A stored row could not be mapped back to a domain value.
    #[error("invalid stored data: {0}")]
    InvalidData(#[from] TypeConstraintError),
    #[error("storage error: {0}")]
    Storage(#[from] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Field rules that failed, empty for every other kind of error.
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::Validation(violations) => violations,
            _ => &[],
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenient alias for results returned from repository functions.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_every_field() {
        let err = RepositoryError::Validation(vec![
            FieldViolation::new("name", "must be between 1 and 100 characters"),
            FieldViolation::new("price", "must be at least 0.01"),
        ]);
        assert_eq!(
            err.to_string(),
            "validation failed: name must be between 1 and 100 characters; price must be at least 0.01"
        );
        assert!(err.is_validation());
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn not_found_names_the_id() {
        let err = RepositoryError::NotFound(ProductId::new(42).unwrap());
        assert_eq!(err.to_string(), "product 42 not found");
        assert!(err.is_not_found());
        assert!(err.violations().is_empty());
    }
}
