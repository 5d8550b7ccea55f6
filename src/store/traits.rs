//! `ProfileStore` trait: async interface for finished-profile persistence.

use async_trait::async_trait;

use crate::error::DatabaseError;
use crate::onboarding::model::ProfileSnapshot;

/// Backend-agnostic storage for finished profiles, keyed by user id.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert or replace the profile for `user_id`. Last write wins.
    async fn upsert_profile(
        &self,
        user_id: &str,
        snapshot: &ProfileSnapshot,
    ) -> Result<(), DatabaseError>;

    /// Get the stored profile for `user_id`.
    async fn get_profile(&self, user_id: &str) -> Result<Option<ProfileSnapshot>, DatabaseError>;

    /// Delete the stored profile. Returns whether a row was removed.
    async fn delete_profile(&self, user_id: &str) -> Result<bool, DatabaseError>;
}
