use crate::domain::{AppConfig, AppError, Language, LanguageCatalog};
use crate::ports::FeatureCatalog;

/// Application context holding dependencies for command execution.
pub struct AppContext<C: FeatureCatalog> {
    catalog: C,
    config: AppConfig,
}

impl<C: FeatureCatalog> AppContext<C> {
    /// Create a new application context.
    pub fn new(catalog: C, config: AppConfig) -> Self {
        Self { catalog, config }
    }

    /// Get a reference to the feature catalog.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Load the catalog of a single language.
    pub fn language_catalog(&self, language: Language) -> Result<LanguageCatalog, AppError> {
        self.catalog.catalog(language)
    }

    /// Get a reference to the loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
