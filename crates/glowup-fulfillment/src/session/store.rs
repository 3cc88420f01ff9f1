//! On-disk authenticated browser identity.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SessionError;

const PROFILE_DIR: &str = "profile";
const MARKER_FILE: &str = "session.json";

/// Written once setup has seen a signed-in page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMarker {
    pub retailer: String,
    pub created_at: DateTime<Utc>,
}

/// A directory holding the Chrome profile plus a marker file.
///
/// The profile is what actually carries the login; the marker records that
/// setup completed, so "is there a session" never needs a browser.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Chrome `--user-data-dir` for every launch against this identity.
    pub fn profile_dir(&self) -> PathBuf {
        self.dir.join(PROFILE_DIR)
    }

    pub fn marker_path(&self) -> PathBuf {
        self.dir.join(MARKER_FILE)
    }

    pub fn exists(&self) -> bool {
        self.marker_path().is_file()
    }

    pub async fn ensure_dirs(&self) -> Result<(), SessionError> {
        tokio::fs::create_dir_all(self.profile_dir()).await?;
        Ok(())
    }

    pub async fn marker(&self) -> Result<Option<SessionMarker>, SessionError> {
        let path = self.marker_path();
        if !path.is_file() {
            return Ok(None);
        }
        let json = tokio::fs::read_to_string(&path).await?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Record a completed setup for `retailer`.
    pub async fn mark_ready(&self, retailer: &str) -> Result<SessionMarker, SessionError> {
        self.ensure_dirs().await?;
        let marker = SessionMarker {
            retailer: retailer.to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&marker)?;
        tokio::fs::write(self.marker_path(), json).await?;
        debug!("Session marker written to {}", self.marker_path().display());
        Ok(marker)
    }
}
