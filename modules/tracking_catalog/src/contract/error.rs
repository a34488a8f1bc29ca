//! Contract error types for the tracking catalog
//!
//! These errors are transport-agnostic. The REST layer maps each variant
//! to exactly one HTTP status.

/// Catalog domain errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Client sent structurally or semantically wrong data
    InvalidInput {
        /// Validation error message
        message: String,
    },
    /// Referenced entity does not exist
    NotFound {
        /// Resource type (event, property, tracking plan)
        resource: String,
        /// Resource identifier
        id: String,
    },
    /// Unique-key collision or description mismatch
    Conflict {
        /// Conflict reason
        reason: String,
    },
    /// Store unavailable, transaction failure or unexpected I/O error
    Internal,
}

impl CatalogError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { message } => write!(f, "{}", message),
            Self::NotFound { resource, id } => write!(f, "{} not found: {}", resource, id),
            Self::Conflict { reason } => write!(f, "Conflict: {}", reason),
            Self::Internal => write!(f, "Internal error"),
        }
    }
}

impl std::error::Error for CatalogError {}
