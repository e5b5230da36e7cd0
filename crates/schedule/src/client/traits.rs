//! DowntimeApi trait definition and shared error types.

use crate::dto::{ExternalCreateInput, ExternalUpdateInput};
use crate::tags::DowntimeEntity;

/// Errors reported by a downtime API implementation.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("downtime '{0}' not found")]
    NotFound(String),

    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Remote operations on monitor downtimes.
#[async_trait::async_trait]
pub trait DowntimeApi: Send + Sync {
    /// Create a downtime in `account_id`, returning the new entity GUID.
    async fn create(&self, account_id: u64, input: &ExternalCreateInput) -> Result<String, ApiError>;

    /// Edit a downtime in place. The mode of `input` must match the deployed mode.
    async fn update(&self, guid: &str, input: &ExternalUpdateInput) -> Result<(), ApiError>;

    async fn delete(&self, guid: &str) -> Result<(), ApiError>;

    /// Fetch the entity with its tags, or `None` when it no longer exists.
    async fn read(&self, guid: &str) -> Result<Option<DowntimeEntity>, ApiError>;

    /// Human-readable backend name (e.g., "in-memory").
    fn api_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_downtime() {
        assert_eq!(ApiError::NotFound("dt-1".into()).to_string(), "downtime 'dt-1' not found");
        assert_eq!(
            ApiError::Rejected("mode change".into()).to_string(),
            "request rejected: mode change"
        );
    }
}
