use async_trait::async_trait;

use super::domain::Listing;

/// Read access to the hosted listing tables.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the full, unfiltered case list.
    async fn all_cases(&self) -> Result<Vec<Listing>, SourceError>;
}

/// Error enumeration for listing fetch failures.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("listing source unavailable: {0}")]
    Unavailable(String),
    #[error("listing payload could not be decoded: {0}")]
    Decode(String),
}
