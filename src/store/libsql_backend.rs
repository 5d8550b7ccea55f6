//! libSQL backend: async `ProfileStore` implementation.
//!
//! Supports local file and in-memory databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};

use crate::error::DatabaseError;
use crate::onboarding::model::{ProfileSnapshot, UserProfile};
use crate::store::migrations;
use crate::store::traits::ProfileStore;

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run_migrations(backend.conn()).await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run_migrations(backend.conn()).await?;
        Ok(backend)
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Parse an RFC 3339 or SQLite datetime string into DateTime<Utc>.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return ndt.and_utc();
    }
    DateTime::<Utc>::MIN_UTC
}

#[async_trait]
impl ProfileStore for LibSqlBackend {
    async fn upsert_profile(
        &self,
        user_id: &str,
        snapshot: &ProfileSnapshot,
    ) -> Result<(), DatabaseError> {
        let profile_json = serde_json::to_string(&snapshot.profile)
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;
        // Fixed-width UTC so timestamps compare correctly as strings
        let updated_at = snapshot
            .updated_at
            .to_rfc3339_opts(SecondsFormat::Micros, true);

        // An older snapshot landing late never replaces a newer one
        self.conn()
            .execute(
                "INSERT INTO profiles (user_id, profile, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT (user_id) DO UPDATE SET profile = ?2, updated_at = ?3
                 WHERE excluded.updated_at >= profiles.updated_at",
                params![user_id, profile_json, updated_at],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("upsert_profile: {e}")))?;

        debug!(user_id, "Profile upserted");
        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<ProfileSnapshot>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT profile, updated_at FROM profiles WHERE user_id = ?1",
                params![user_id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_profile: {e}")))?;

        let row = match rows.next().await {
            Ok(Some(row)) => row,
            Ok(None) => return Ok(None),
            Err(e) => return Err(DatabaseError::Query(format!("get_profile: {e}"))),
        };

        let profile_json: String = row
            .get(0)
            .map_err(|e| DatabaseError::Query(format!("get_profile: {e}")))?;
        let updated_at: String = row
            .get(1)
            .map_err(|e| DatabaseError::Query(format!("get_profile: {e}")))?;
        let profile: UserProfile = serde_json::from_str(&profile_json)
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;

        Ok(Some(ProfileSnapshot {
            profile,
            updated_at: parse_datetime(&updated_at),
        }))
    }

    async fn delete_profile(&self, user_id: &str) -> Result<bool, DatabaseError> {
        let count = self
            .conn()
            .execute("DELETE FROM profiles WHERE user_id = ?1", params![user_id])
            .await
            .map_err(|e| DatabaseError::Query(format!("delete_profile: {e}")))?;
        Ok(count > 0)
    }
}
