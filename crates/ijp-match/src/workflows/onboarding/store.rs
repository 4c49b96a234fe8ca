use async_trait::async_trait;
use tracing::info;

use super::domain::{ProfileLanguage, ProfileRole, ProfileToUpload};
use super::session::FlushError;

/// Write access to the hosted profile tables.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert only the profile row.
    async fn insert_profile(&self, profile: ProfileToUpload) -> Result<(), StoreError>;

    /// Insert the profile row together with its language and role rows.
    async fn create_new_profile(
        &self,
        profile: ProfileToUpload,
        languages: Vec<ProfileLanguage>,
        roles: Vec<ProfileRole>,
    ) -> Result<(), StoreError>;
}

/// Error enumeration for profile writes.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("profile already exists")]
    Conflict,
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}

/// Write a bare profile row with no language or role rows, as the standalone
/// profile form does. Both names must be present; nothing is written otherwise.
pub async fn insert_profile_row<S>(store: &S, profile: ProfileToUpload) -> Result<(), FlushError>
where
    S: ProfileStore + ?Sized,
{
    if profile.first_name.trim().is_empty() {
        return Err(FlushError::FirstNameRequired);
    }
    if profile.last_name.trim().is_empty() {
        return Err(FlushError::LastNameRequired);
    }

    let user_id = profile.user_id;
    store.insert_profile(profile).await?;
    info!(user_id = %user_id, "profile row inserted");
    Ok(())
}
