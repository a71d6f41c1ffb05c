use thiserror::Error;

#[derive(Debug, Error)]
pub enum DealerFinanceError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown {kind}: {id}")]
    UnknownCatalogEntry { kind: String, id: String },

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DealerFinanceError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        DealerFinanceError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True for caller input that failed a bound check (an HTTP 400 at the site boundary).
    pub fn is_validation(&self) -> bool {
        matches!(self, DealerFinanceError::InvalidInput { .. })
    }

    /// Offending field name, when the error is tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            DealerFinanceError::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DealerFinanceError {
    fn from(e: serde_json::Error) -> Self {
        DealerFinanceError::SerializationError(e.to_string())
    }
}

impl From<serde_yaml::Error> for DealerFinanceError {
    fn from(e: serde_yaml::Error) -> Self {
        DealerFinanceError::ConfigError(e.to_string())
    }
}
