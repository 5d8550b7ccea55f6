//! Persistence sink writing finished profiles into a [`ProfileStore`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::error::PersistError;
use crate::onboarding::model::ProfileSnapshot;
use crate::onboarding::ports::PersistenceSink;

use super::traits::ProfileStore;

/// Saves one session's finished profile under a fixed user id.
pub struct ProfileStoreSink {
    store: Arc<dyn ProfileStore>,
    user_id: String,
}

impl ProfileStoreSink {
    pub fn new(store: Arc<dyn ProfileStore>, user_id: impl Into<String>) -> Self {
        Self {
            store,
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

#[async_trait]
impl PersistenceSink for ProfileStoreSink {
    async fn save(&self, snapshot: ProfileSnapshot) -> Result<(), PersistError> {
        self.store.upsert_profile(&self.user_id, &snapshot).await?;
        info!(user_id = %self.user_id, "Profile saved");
        Ok(())
    }
}
