//! Artifact reading scoped to one invocation.

use std::sync::Arc;

use tracing::debug;

use crate::domain::JobInvocation;
use crate::error::{ArtifactError, Error, Result};
use crate::port::{ArtifactStore, PackageReader};

/// A downloaded artifact package held in memory for the current invocation.
///
/// The package is fetched once and dropped with the reader; extracted
/// entries are never written anywhere.
pub struct ArtifactReader {
    name: String,
    package: Vec<u8>,
    packages: Arc<dyn PackageReader>,
}

impl ArtifactReader {
    /// Locate the input artifact called `name` and download it with the
    /// job's scoped credentials.
    pub async fn open(
        store: &dyn ArtifactStore,
        packages: Arc<dyn PackageReader>,
        job: &JobInvocation,
        name: &str,
    ) -> Result<Self> {
        let artifact = job.find_artifact(name)?;
        debug!(
            job_id = %job.id,
            artifact = %name,
            bucket = %artifact.location.bucket,
            key = %artifact.location.key,
            "Fetching artifact package"
        );
        let package = store.fetch(&job.credentials, &artifact.location).await?;
        Ok(Self {
            name: name.to_string(),
            package,
            packages,
        })
    }

    /// Name of the input artifact this reader was opened on.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw bytes of one entry.
    pub fn read(&self, entry: &str) -> Result<Vec<u8>> {
        Ok(self.packages.read_entry(&self.package, entry)?)
    }

    /// One entry decoded as UTF-8 text.
    pub fn read_text(&self, entry: &str) -> Result<String> {
        let bytes = self.read(entry)?;
        String::from_utf8(bytes).map_err(|_| {
            Error::from(ArtifactError::NotUtf8 {
                entry: entry.to_string(),
            })
        })
    }
}
