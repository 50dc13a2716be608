//! Errors raised while turning configuration into API models.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExpandError {
    /// Attribute values that are individually valid but cannot be combined
    #[error("{0}")]
    Conflict(String),

    #[error("failed to parse JSON from `{field}`: {source}")]
    InvalidJson {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("parsing `{field}`: {source}")]
    InvalidId {
        field: String,
        #[source]
        source: azurerm_resourceids::ParseError,
    },

    #[error("`{0}` is required")]
    Missing(&'static str),
}

impl ExpandError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

pub type ExpandResult<T> = Result<T, ExpandError>;
