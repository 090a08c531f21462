//! Service container for dependency injection
//!
//! Wires up the catalog with its dependencies.

use std::sync::Arc;

use crate::application::Catalog;
use crate::config::Settings;
use crate::infrastructure::man::ManProvider;
use crate::infrastructure::traits::{
    CommandRunner, DocumentProvider, FileSystem, RealCommandRunner, RealFileSystem,
};

/// Container holding settings and the I/O implementations the catalog uses.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Document source
    pub provider: Arc<dyn DocumentProvider>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let cmd: Arc<dyn CommandRunner> = Arc::new(RealCommandRunner);
        let provider = Arc::new(ManProvider::new(cmd, fs.clone(), settings.man.clone()));
        Self::with_deps(settings, fs, provider)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        provider: Arc<dyn DocumentProvider>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
            provider,
        }
    }

    /// A fresh catalog; dropping it removes every page it rendered.
    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.provider.clone(), self.fs.clone(), &self.settings)
    }
}
