//! Generation requests, results, and run reports.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{FeatureKey, Language, ProjectName};

/// Everything needed to generate one feature. Consumed once.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    language: Language,
    feature_key: FeatureKey,
    variables: BTreeMap<String, String>,
}

impl GenerationRequest {
    pub fn new(language: Language, feature_key: FeatureKey, project_name: &ProjectName) -> Self {
        let mut variables = BTreeMap::new();
        variables.insert("project_name".to_string(), project_name.to_string());
        Self { language, feature_key, variables }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn feature_key(&self) -> &FeatureKey {
        &self.feature_key
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }
}

/// Sanitized files for one feature plus any non-fatal warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResult {
    pub files: BTreeMap<String, String>,
    pub warnings: Vec<String>,
}

impl GenerationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file, refusing empty names or content.
    pub fn insert_file(&mut self, name: impl Into<String>, content: impl Into<String>) -> bool {
        let name = name.into();
        let content = content.into();
        if name.trim().is_empty() || content.trim().is_empty() {
            return false;
        }
        self.files.insert(name, content);
        true
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Absorb another batch's files and warnings.
    pub fn merge(&mut self, other: GenerationResult) {
        self.files.extend(other.files);
        self.warnings.extend(other.warnings);
    }
}

/// Per-feature status of a run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FeatureStatus {
    Succeeded { files: Vec<String>, warnings: Vec<String> },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureOutcome {
    pub feature: String,
    #[serde(flatten)]
    pub status: FeatureStatus,
}

impl FeatureOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, FeatureStatus::Succeeded { .. })
    }

    pub fn has_warnings(&self) -> bool {
        matches!(&self.status, FeatureStatus::Succeeded { warnings, .. } if !warnings.is_empty())
    }
}

/// Outcome of generating a list of features.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub project: String,
    pub language: Language,
    pub generated_at: DateTime<Utc>,
    pub outcomes: Vec<FeatureOutcome>,
}

impl GenerationReport {
    pub fn new(project: &ProjectName, language: Language) -> Self {
        Self {
            project: project.to_string(),
            language,
            generated_at: Utc::now(),
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: FeatureOutcome) {
        self.outcomes.push(outcome);
    }

    /// Features that succeeded without warnings.
    pub fn clean(&self) -> impl Iterator<Item = &FeatureOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.succeeded() && !outcome.has_warnings())
    }

    pub fn with_warnings(&self) -> impl Iterator<Item = &FeatureOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.has_warnings())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FeatureOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.succeeded())
    }

    /// True when features were attempted and none of them succeeded.
    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(|outcome| !outcome.succeeded())
    }
}
