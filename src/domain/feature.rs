//! Feature catalog domain models.
//!
//! A catalog describes, for one language, which features can be generated, the
//! files each feature expects back from the model, and the prompt text used to
//! request them.

use serde::{Deserialize, Serialize};

use super::{AppError, Language};

/// Catalog of generatable features for a single language.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageCatalog {
    pub language: Language,
    /// System message sent with every request for this language.
    pub system_prompt: String,
    /// Batch prompt template; rendered once per batch of files.
    pub prompt_template: String,
    pub features: Vec<FeatureSpec>,
}

/// A named unit of generated code mapped to an expected file set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureSpec {
    pub key: String,
    pub name: String,
    /// App, component, or module name used inside the generated code.
    pub slug: String,
    pub description: String,
    /// Directory, relative to the project root, receiving the files.
    pub output_dir: String,
    pub files: Vec<FileSpec>,
}

/// One file the model is asked to produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSpec {
    pub name: String,
    pub instructions: String,
    /// Minimal content used when the model never returns this file.
    #[serde(default)]
    pub fallback: Option<String>,
}

impl LanguageCatalog {
    pub fn feature(&self, key: &str) -> Result<&FeatureSpec, AppError> {
        self.features.iter().find(|feature| feature.key == key).ok_or_else(|| {
            AppError::UnknownFeature {
                language: self.language.to_string(),
                feature: key.to_string(),
                available: self.feature_keys().join(", "),
            }
        })
    }

    pub fn feature_keys(&self) -> Vec<&str> {
        self.features.iter().map(|feature| feature.key.as_str()).collect()
    }

    /// Check structural invariants the generator relies on.
    pub fn validate(&self) -> Result<(), AppError> {
        let fail = |reason: String| AppError::Catalog { language: self.language.to_string(), reason };

        if self.features.is_empty() {
            return Err(fail("catalog declares no features".to_string()));
        }
        for (index, feature) in self.features.iter().enumerate() {
            if self.features[..index].iter().any(|other| other.key == feature.key) {
                return Err(fail(format!("duplicate feature key '{}'", feature.key)));
            }
            if feature.files.is_empty() {
                return Err(fail(format!("feature '{}' expects no files", feature.key)));
            }
            for (file_index, file) in feature.files.iter().enumerate() {
                if file.name.trim().is_empty() {
                    return Err(fail(format!("feature '{}' has an unnamed file", feature.key)));
                }
                if feature.files[..file_index].iter().any(|other| other.name == file.name) {
                    return Err(fail(format!(
                        "feature '{}' lists '{}' twice",
                        feature.key, file.name
                    )));
                }
            }
        }
        Ok(())
    }
}

impl FeatureSpec {
    pub fn expected_files(&self) -> Vec<&str> {
        self.files.iter().map(|file| file.name.as_str()).collect()
    }

    /// Split the expected file set into request batches, preserving catalog order.
    pub fn batches(&self, files_per_request: usize) -> Vec<&[FileSpec]> {
        self.files.chunks(files_per_request.max(1)).collect()
    }
}
