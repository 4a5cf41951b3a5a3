//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{
    AssetService, ComponentService, SetupService, StoryInspector, StoryService,
};
use crate::config::Settings;
use crate::infrastructure::http::UreqTransport;
use crate::infrastructure::traits::{FileSystem, HttpTransport, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// HTTP transport abstraction
    pub http: Arc<dyn HttpTransport>,

    pub inspector: StoryInspector,
    pub components: ComponentService,
    pub stories: StoryService,
    pub assets: AssetService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let timeout = Duration::from_secs(settings.timeout_secs);
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(UreqTransport::new(timeout)),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        http: Arc<dyn HttpTransport>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            inspector: StoryInspector::new(settings.clone(), http.clone()),
            components: ComponentService::new(settings.clone(), http.clone()),
            stories: StoryService::new(settings.clone(), http.clone()),
            assets: AssetService::new(settings.clone(), fs.clone(), http.clone()),
            settings,
            fs,
            http,
        }
    }

    pub fn setup(&self) -> SetupService<'_> {
        SetupService::new(&self.components, &self.assets, &self.stories)
    }
}
