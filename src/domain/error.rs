//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid input to the content model.
/// Traversal itself never fails; these cover identifiers and settings values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid story slug: '{0}'")]
    InvalidSlug(String),

    #[error("unknown region '{0}' (expected eu, us, ap or ca)")]
    UnknownRegion(String),

    #[error("unknown story version '{0}' (expected draft or published)")]
    UnknownVersion(String),

    #[error("invalid api base url '{0}': expected scheme://host")]
    InvalidBaseUrl(String),
}
