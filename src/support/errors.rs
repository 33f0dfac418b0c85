use thiserror::Error;

/// Rejections raised by the store, the property bags and request parsing.
///
/// Every variant is terminal for the operation that raised it: nothing has
/// been mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Malformed input (ids, i18n texts, query parameters, bodies)
    #[error("{0}")]
    Validation(String),

    /// Unknown entity, sub-entity or unset property
    #[error("{0}")]
    NotFound(String),

    /// Duplicate id or compare-and-swap mismatch
    #[error("{0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Human readable description, as sent back in `{"description": ...}`
    pub fn description(&self) -> &str {
        match self {
            Self::Validation(msg) | Self::NotFound(msg) | Self::Conflict(msg) => msg,
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_the_bare_message() {
        let err = DomainError::conflict("RoamingNetworkId already exists!");
        assert_eq!(err.description(), "RoamingNetworkId already exists!");
        assert_eq!(err.to_string(), "RoamingNetworkId already exists!");
    }
}
