//! Service container for dependency injection
//!
//! Wires up the download service with its record lookup.

use std::path::Path;
use std::sync::Arc;

use crate::application::services::{DownloadService, FetchOptions};
use crate::config::Settings;
use crate::infrastructure::error::InfraResult;
use crate::infrastructure::memory::InMemoryLookup;
use crate::infrastructure::traits::{NotionClient, RecordLookup};

/// Container holding application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Record lookup used by every download
    pub lookup: Arc<dyn RecordLookup>,
}

impl ServiceContainer {
    /// Create a new service container talking to the remote API.
    pub fn new(settings: Settings) -> Self {
        let lookup = Arc::new(NotionClient::from_settings(&settings));
        Self::with_deps(settings, lookup)
    }

    /// Create a service container answering from a record map fixture.
    pub fn with_fixture(settings: Settings, fixture: &Path) -> InfraResult<Self> {
        let lookup = Arc::new(InMemoryLookup::from_file(fixture)?);
        Ok(Self::with_deps(settings, lookup))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, lookup: Arc<dyn RecordLookup>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, lookup }
    }

    pub fn download_service(&self) -> DownloadService {
        DownloadService::with_options(
            Arc::clone(&self.lookup),
            FetchOptions {
                max_depth: self.settings.max_depth,
            },
        )
    }
}
