//! Service container for dependency injection
//!
//! Wires the declaration, head and render services to one set of settings.

use std::sync::Arc;

use crate::application::services::{DeclarationService, HeadService, LogNotifier, StaticRenderer};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    pub declarations: DeclarationService,
    pub head: HeadService,
    pub renderer: StaticRenderer,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with a custom filesystem (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let declarations = DeclarationService::new(Arc::clone(&fs));
        let head = HeadService::new(settings.marker_attribute.clone(), settings.insertion_order)
            .with_notifier(LogNotifier);
        let renderer = StaticRenderer::new(settings.marker_attribute.clone());

        Self {
            settings,
            fs,
            declarations,
            head,
            renderer,
        }
    }
}
