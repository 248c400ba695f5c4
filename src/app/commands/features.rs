//! Catalog listing.

use crate::domain::{AppError, FeatureKey, Language, LanguageCatalog};
use crate::ports::FeatureCatalog;

/// Selection keyword expanding to every feature of the catalog.
pub const ALL_FEATURES: &str = "all";

/// One row of the feature listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSummary {
    pub language: Language,
    pub key: String,
    pub name: String,
    pub description: String,
    pub files: Vec<String>,
}

/// List the features of `language`, or of every language when `None`.
pub fn list_features(
    catalog: &impl FeatureCatalog,
    language: Option<Language>,
) -> Result<Vec<FeatureSummary>, AppError> {
    let languages = match language {
        Some(language) => vec![language],
        None => Language::ALL.to_vec(),
    };

    let mut summaries = Vec::new();
    for language in languages {
        let loaded = catalog.catalog(language)?;
        summaries.extend(loaded.features.into_iter().map(|feature| FeatureSummary {
            language,
            files: feature.expected_files().into_iter().map(String::from).collect(),
            key: feature.key,
            name: feature.name,
            description: feature.description,
        }));
    }
    Ok(summaries)
}

/// Validate requested feature keys against `catalog`, preserving order.
///
/// `all` expands to the whole catalog; duplicates are dropped.
pub fn resolve_features(
    catalog: &LanguageCatalog,
    requested: &[String],
) -> Result<Vec<FeatureKey>, AppError> {
    if requested.iter().any(|key| key.trim().eq_ignore_ascii_case(ALL_FEATURES)) {
        return catalog.feature_keys().into_iter().map(FeatureKey::new).collect();
    }

    let mut keys: Vec<FeatureKey> = Vec::with_capacity(requested.len());
    for raw in requested {
        let key = FeatureKey::new(raw.trim())?;
        catalog.feature(key.as_str())?;
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    if keys.is_empty() {
        return Err(AppError::config_error(format!(
            "No features selected. Available: {}",
            catalog.feature_keys().join(", ")
        )));
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::catalogs::EmbeddedFeatureCatalog;

    #[test]
    fn lists_single_language() {
        let summaries = list_features(&EmbeddedFeatureCatalog::new(), Some(Language::NestJs)).unwrap();
        assert!(summaries.iter().all(|summary| summary.language == Language::NestJs));
        let auth = summaries.iter().find(|summary| summary.key == "auth").unwrap();
        assert_eq!(auth.files, vec!["auth.module.ts", "auth.service.ts", "auth.controller.ts"]);
    }

    #[test]
    fn lists_all_languages_in_order() {
        let summaries = list_features(&EmbeddedFeatureCatalog::new(), None).unwrap();
        assert_eq!(summaries.first().map(|summary| summary.language), Some(Language::Django));
        assert_eq!(summaries.last().map(|summary| summary.language), Some(Language::NestJs));
    }

    fn keys(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn resolves_all_to_catalog_order() {
        let catalog = EmbeddedFeatureCatalog::new().catalog(Language::NextJs).unwrap();
        let resolved = resolve_features(&catalog, &keys(&["ALL"])).unwrap();
        let names: Vec<&str> = resolved.iter().map(|key| key.as_str()).collect();
        assert_eq!(names, catalog.feature_keys());
    }

    #[test]
    fn drops_duplicates_and_keeps_order() {
        let catalog = EmbeddedFeatureCatalog::new().catalog(Language::Django).unwrap();
        let resolved = resolve_features(&catalog, &keys(&["rbac", " mail ", "rbac"])).unwrap();
        let names: Vec<&str> = resolved.iter().map(|key| key.as_str()).collect();
        assert_eq!(names, vec!["rbac", "mail"]);
    }

    #[test]
    fn rejects_unknown_and_empty_selections() {
        let catalog = EmbeddedFeatureCatalog::new().catalog(Language::NestJs).unwrap();
        let err = resolve_features(&catalog, &keys(&["auth", "payments"])).unwrap_err();
        assert!(matches!(err, AppError::UnknownFeature { .. }));

        let err = resolve_features(&catalog, &[]).unwrap_err();
        assert!(err.to_string().contains("No features selected"));
    }
}
