//! Artifact store ports.

use async_trait::async_trait;

use crate::domain::{ArtifactCredentials, ArtifactLocation};
use crate::error::ArtifactError;

/// Object storage holding packaged pipeline artifacts.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Download the whole package at `location` using job-scoped credentials.
    async fn fetch(
        &self,
        credentials: &ArtifactCredentials,
        location: &ArtifactLocation,
    ) -> Result<Vec<u8>, ArtifactError>;
}

/// Extracts single entries from a downloaded package.
pub trait PackageReader: Send + Sync {
    /// Return the bytes of `entry`, or [`ArtifactError::EntryNotFound`].
    fn read_entry(&self, package: &[u8], entry: &str) -> Result<Vec<u8>, ArtifactError>;
}
