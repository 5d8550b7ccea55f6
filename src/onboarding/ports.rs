//! Collaborator interfaces injected into the flow controller.
//!
//! Authentication, profile storage and place autocomplete live outside the
//! onboarding core. The controller only sees them through these traits,
//! which keeps sessions testable with in-memory stand-ins.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{PersistError, PlaceLookupError};

use super::model::ProfileSnapshot;

/// What the authentication layer knows about the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Source of identity data used to pre-populate a new draft.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// The current user's identity, if one is known.
    async fn identity(&self) -> Option<IdentityClaims>;
}

/// Destination for finished profiles.
///
/// Implementations should upsert: two saves of the same profile must leave a
/// single record, last write winning.
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    async fn save(&self, snapshot: ProfileSnapshot) -> Result<(), PersistError>;
}

/// Autocomplete for affiliation names.
#[async_trait]
pub trait PlaceLookup: Send + Sync {
    /// Suggest place names matching `query` within the given categories.
    async fn suggest(
        &self,
        query: &str,
        categories: &[&str],
    ) -> Result<Vec<String>, PlaceLookupError>;
}

/// Identity source for anonymous sessions.
pub struct NoIdentity;

#[async_trait]
impl IdentitySource for NoIdentity {
    async fn identity(&self) -> Option<IdentityClaims> {
        None
    }
}

/// Identity source returning fixed claims.
pub struct StaticIdentity {
    claims: IdentityClaims,
}

impl StaticIdentity {
    pub fn new(claims: IdentityClaims) -> Self {
        Self { claims }
    }
}

#[async_trait]
impl IdentitySource for StaticIdentity {
    async fn identity(&self) -> Option<IdentityClaims> {
        Some(self.claims.clone())
    }
}

/// Sink that logs finished profiles and drops them.
pub struct DiscardSink;

#[async_trait]
impl PersistenceSink for DiscardSink {
    async fn save(&self, snapshot: ProfileSnapshot) -> Result<(), PersistError> {
        info!(
            affiliations = snapshot.profile.affiliations.len(),
            updated_at = %snapshot.updated_at,
            "Discarding finished profile (no store configured)"
        );
        Ok(())
    }
}

/// Place lookup that never suggests anything; users type names by hand.
pub struct NoPlaceLookup;

#[async_trait]
impl PlaceLookup for NoPlaceLookup {
    async fn suggest(
        &self,
        _query: &str,
        _categories: &[&str],
    ) -> Result<Vec<String>, PlaceLookupError> {
        Ok(Vec::new())
    }
}

/// Place lookup over a fixed catalogue of `(category, name)` entries.
///
/// Matches names starting with the query, case-insensitively.
pub struct StaticPlaceLookup {
    places: Vec<(String, String)>,
    limit: usize,
}

impl StaticPlaceLookup {
    pub fn new(places: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            places: places.into_iter().collect(),
            limit: 5,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

#[async_trait]
impl PlaceLookup for StaticPlaceLookup {
    async fn suggest(
        &self,
        query: &str,
        categories: &[&str],
    ) -> Result<Vec<String>, PlaceLookupError> {
        let needle = query.to_lowercase();
        Ok(self
            .places
            .iter()
            .filter(|(category, _)| categories.contains(&category.as_str()))
            .filter(|(_, name)| name.to_lowercase().starts_with(&needle))
            .map(|(_, name)| name.clone())
            .take(self.limit)
            .collect())
    }
}
