//! API Facade for the application.
//!
//! This module exposes high-level functions that glue together context creation
//! and command execution.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::adapters::catalogs::EmbeddedFeatureCatalog;
use crate::adapters::completion_client::{
    HttpCompletionClient, RetryPolicy, RetryingCompletionClient,
};
use crate::adapters::filesystem::FilesystemProjectWriter;
use crate::app::AppContext;
use crate::app::commands::{features, generate, prompt};
use crate::app::config;
use crate::domain::{AppConfig, BatchPrompt, FeatureKey, ProjectName};

pub use crate::app::commands::features::{ALL_FEATURES, FeatureSummary};
pub use crate::app::commands::generate::RunEvent;
pub use crate::domain::{AppError, FeatureOutcome, FeatureStatus, GenerationReport, Language};

/// Inputs of a `new` project run, already collected from flags or prompts.
#[derive(Debug, Clone)]
pub struct NewProjectOptions {
    pub name: String,
    pub language: Language,
    /// Feature keys, or `all`.
    pub features: Vec<String>,
    /// Directory the project directory is created in.
    pub output_dir: PathBuf,
    /// Write into an existing project directory.
    pub force: bool,
}

impl NewProjectOptions {
    pub fn project_dir(&self) -> PathBuf {
        self.output_dir.join(&self.name)
    }
}

/// Create an `AppContext` backed by the embedded catalog and home config.
fn create_context() -> Result<AppContext<EmbeddedFeatureCatalog>, AppError> {
    let config = config::load_config()?;
    Ok(AppContext::new(EmbeddedFeatureCatalog::new(), config))
}

/// List catalog features, optionally for one language.
pub fn list_features(language: Option<&str>) -> Result<Vec<FeatureSummary>, AppError> {
    let language = language.map(str::parse::<Language>).transpose()?;
    features::list_features(&EmbeddedFeatureCatalog::new(), language)
}

/// Render the prompts `new` would send for one feature.
pub fn render_prompts(
    language: &str,
    feature: &str,
    project: &str,
) -> Result<Vec<BatchPrompt>, AppError> {
    let language: Language = language.parse()?;
    let feature = FeatureKey::new(feature)?;
    let project = ProjectName::new(project)?;

    let ctx = create_context()?;
    let catalog = ctx.language_catalog(language)?;
    prompt::render_prompts(
        &catalog,
        &feature,
        &project,
        ctx.config().generation.files_per_request,
    )
}

/// Generate a project in `options.output_dir/options.name`.
///
/// Run-level problems (configuration, API key, validation, existing
/// directory) are returned as errors before any remote call; per-feature
/// failures are recorded in the returned report.
pub fn generate_project(
    options: &NewProjectOptions,
    on_event: &mut dyn FnMut(RunEvent<'_>),
) -> Result<GenerationReport, AppError> {
    let cwd = std::env::current_dir()?;
    config::load_dotenv(&cwd, &config::config_dir()?)?;
    let ctx = create_context()?;
    generate_project_with(&ctx, options, on_event)
}

fn generate_project_with(
    ctx: &AppContext<EmbeddedFeatureCatalog>,
    options: &NewProjectOptions,
    on_event: &mut dyn FnMut(RunEvent<'_>),
) -> Result<GenerationReport, AppError> {
    let project = ProjectName::new(&options.name)?;
    let catalog = ctx.language_catalog(options.language)?;
    let feature_keys = features::resolve_features(&catalog, &options.features)?;

    let project_dir = options.project_dir();
    ensure_project_dir_available(&project_dir, options.force)?;

    let api_key = config::api_key()?;
    let client = build_client(api_key, ctx.config())?;
    let generator = generate::FeatureGenerator::new(&client, &catalog, ctx.config());
    let writer = FilesystemProjectWriter::new(project_dir);
    let control = generate::RunControl {
        feature_delay: Duration::from_millis(ctx.config().generation.feature_delay_ms),
        should_continue: &|| true,
    };

    tracing::info!(
        project = %project,
        language = %options.language,
        features = feature_keys.len(),
        "starting generation run"
    );
    Ok(generate::run_generation(&generator, &writer, &project, &feature_keys, &control, on_event))
}

fn build_client(
    api_key: String,
    config: &AppConfig,
) -> Result<RetryingCompletionClient, AppError> {
    let http = HttpCompletionClient::new(api_key, &config.api)?;
    Ok(RetryingCompletionClient::new(Box::new(http), RetryPolicy::from_config(&config.api)))
}

fn ensure_project_dir_available(project_dir: &Path, force: bool) -> Result<(), AppError> {
    if project_dir.exists() && !force {
        return Err(AppError::ProjectExists(project_dir.display().to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options(output_dir: &Path, features: &[&str]) -> NewProjectOptions {
        NewProjectOptions {
            name: "shop".to_string(),
            language: Language::Django,
            features: features.iter().map(|feature| feature.to_string()).collect(),
            output_dir: output_dir.to_path_buf(),
            force: false,
        }
    }

    fn context() -> AppContext<EmbeddedFeatureCatalog> {
        AppContext::new(EmbeddedFeatureCatalog::new(), AppConfig::default())
    }

    #[test]
    fn existing_project_dir_requires_force() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("shop")).unwrap();

        let err = generate_project_with(&context(), &options(dir.path(), &["mail"]), &mut |_| {})
            .unwrap_err();
        assert!(matches!(err, AppError::ProjectExists(_)));
    }

    #[test]
    fn validation_happens_before_any_call() {
        let dir = TempDir::new().unwrap();

        let mut bad_name = options(dir.path(), &["mail"]);
        bad_name.name = "1shop".to_string();
        let err = generate_project_with(&context(), &bad_name, &mut |_| {}).unwrap_err();
        assert!(matches!(err, AppError::InvalidProjectName(_)));

        let err = generate_project_with(&context(), &options(dir.path(), &["payments"]), &mut |_| {})
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownFeature { .. }));
        assert!(!dir.path().join("shop").exists());
    }

    #[test]
    fn list_features_rejects_unknown_language() {
        let err = list_features(Some("rails")).unwrap_err();
        assert!(matches!(err, AppError::InvalidLanguage(_)));
    }

    #[test]
    fn project_dir_joins_name() {
        let opts = options(Path::new("/tmp/out"), &["all"]);
        assert_eq!(opts.project_dir(), PathBuf::from("/tmp/out/shop"));
    }
}
