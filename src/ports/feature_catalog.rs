//! Feature catalog port definition.

use crate::domain::{AppError, Language, LanguageCatalog};

/// Port for loading per-language feature catalogs.
pub trait FeatureCatalog {
    /// Load and validate the catalog for `language`.
    fn catalog(&self, language: Language) -> Result<LanguageCatalog, AppError>;
}
