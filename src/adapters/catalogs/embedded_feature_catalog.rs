use include_dir::{Dir, include_dir};

use crate::domain::{AppError, Language, LanguageCatalog};
use crate::ports::FeatureCatalog;

static CATALOG_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/src/assets/catalog");

/// Feature catalogs compiled into the binary, one YAML file per language.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedFeatureCatalog;

impl EmbeddedFeatureCatalog {
    pub fn new() -> Self {
        Self
    }
}

impl FeatureCatalog for EmbeddedFeatureCatalog {
    fn catalog(&self, language: Language) -> Result<LanguageCatalog, AppError> {
        let path = format!("{}.yml", language.as_str());
        let fail = |reason: String| AppError::Catalog { language: language.to_string(), reason };

        let file = CATALOG_DIR
            .get_file(&path)
            .ok_or_else(|| fail(format!("missing catalog asset '{}'", path)))?;
        let content = file
            .contents_utf8()
            .ok_or_else(|| fail(format!("catalog asset '{}' is not UTF-8", path)))?;

        let catalog: LanguageCatalog = serde_yaml::from_str(content)
            .map_err(|err| fail(format!("failed to parse '{}': {}", path, err)))?;

        if catalog.language != language {
            return Err(fail(format!(
                "'{}' declares language '{}'",
                path, catalog.language
            )));
        }
        catalog.validate()?;
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prompt::{PromptContext, build_batch_prompt};

    #[test]
    fn every_language_catalog_loads() {
        let store = EmbeddedFeatureCatalog::new();
        for language in Language::ALL {
            let catalog = store.catalog(language).unwrap();
            assert_eq!(catalog.language, language);
            assert!(!catalog.features.is_empty());
        }
    }

    #[test]
    fn django_catalog_has_original_apps() {
        let catalog = EmbeddedFeatureCatalog::new().catalog(Language::Django).unwrap();
        assert_eq!(
            catalog.feature_keys(),
            vec!["mail", "notification", "rbac", "upload", "error_handling", "logging"]
        );

        let mail = catalog.feature("mail").unwrap();
        assert_eq!(mail.slug, "mail_service");
        assert_eq!(mail.output_dir, "apps/mail_service");
        assert_eq!(
            mail.expected_files(),
            vec!["models.py", "admin.py", "views.py", "urls.py", "apps.py"]
        );
    }

    #[test]
    fn every_django_file_has_a_fallback() {
        let catalog = EmbeddedFeatureCatalog::new().catalog(Language::Django).unwrap();
        for feature in &catalog.features {
            for file in &feature.files {
                let fallback = file.fallback.as_deref().unwrap_or("");
                assert!(!fallback.trim().is_empty(), "{}/{} has no fallback", feature.key, file.name);
            }
        }
    }

    #[test]
    fn nextjs_button_expects_component_and_index() {
        let catalog = EmbeddedFeatureCatalog::new().catalog(Language::NextJs).unwrap();
        let button = catalog.feature("button").unwrap();
        assert_eq!(button.expected_files(), vec!["Button.tsx", "index.ts"]);
        assert_eq!(button.output_dir, "src/components/Button");
    }

    #[test]
    fn every_prompt_renders_in_strict_mode() {
        let store = EmbeddedFeatureCatalog::new();
        for language in Language::ALL {
            let catalog = store.catalog(language).unwrap();
            for feature in &catalog.features {
                let context = PromptContext::for_feature(feature, [(
                    &"project_name".to_string(),
                    &"demo".to_string(),
                )]);
                for batch in feature.batches(2) {
                    let prompt = build_batch_prompt(&catalog, feature, batch, &context)
                        .unwrap_or_else(|err| panic!("{}/{}: {}", language, feature.key, err));
                    assert!(prompt.user.contains("=== END FILE ==="));
                    assert!(!prompt.system.trim().is_empty());
                }
            }
        }
    }

    #[test]
    fn unknown_feature_lists_available_keys() {
        let catalog = EmbeddedFeatureCatalog::new().catalog(Language::NestJs).unwrap();
        let err = catalog.feature("payments").unwrap_err();
        assert!(err.to_string().contains("auth"));
    }
}
