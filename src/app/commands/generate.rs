//! Feature generation: batch prompts, remote calls, sanitizing, and writing.

use std::thread;
use std::time::Duration;

use crate::domain::prompt::build_batch_prompt;
use crate::domain::sanitize::python::model_names;
use crate::domain::{
    AppConfig, AppError, BatchPrompt, FeatureKey, FeatureOutcome, FeatureSpec, FeatureStatus,
    GenerationReport, GenerationRequest, GenerationResult, Language, LanguageCatalog,
    ProjectName, PromptContext, SanitizedBatch, finalize_feature, sanitize_response,
};
use crate::ports::{CompletionClient, CompletionRequest, ProjectWriter};

/// Generates the files of one feature through a completion client.
pub struct FeatureGenerator<'a, C: CompletionClient + ?Sized> {
    client: &'a C,
    catalog: &'a LanguageCatalog,
    config: &'a AppConfig,
}

impl<'a, C: CompletionClient + ?Sized> FeatureGenerator<'a, C> {
    pub fn new(client: &'a C, catalog: &'a LanguageCatalog, config: &'a AppConfig) -> Self {
        Self { client, catalog, config }
    }

    pub fn catalog(&self) -> &LanguageCatalog {
        self.catalog
    }

    /// Produce the sanitized files for `request`.
    ///
    /// A remote failure that survives the client's retries, or a response with
    /// no file blocks, fails the whole feature.
    pub fn generate(&self, request: GenerationRequest) -> Result<GenerationResult, AppError> {
        let language = self.catalog.language;
        if request.language() != language {
            return Err(AppError::Catalog {
                language: language.to_string(),
                reason: format!("cannot generate {} features", request.language()),
            });
        }

        let feature = self.catalog.feature(request.feature_key().as_str())?;
        let mut context = PromptContext::for_feature(feature, request.variables());
        let mut result = GenerationResult::new();
        let mut models_known = false;

        for batch in feature.batches(self.config.generation.files_per_request) {
            let prompt = build_batch_prompt(self.catalog, feature, batch, &context)?;
            let sanitized = self.request_with_repair(feature, &prompt)?;
            result.merge(sanitized.result);

            if language == Language::Django
                && !models_known
                && let Some(models_code) = result.files.get("models.py")
            {
                let models = model_names(models_code);
                if !models.is_empty() {
                    tracing::debug!(feature = %feature.key, models = ?models, "discovered models");
                    context.set("known_models", models.join(", "));
                    models_known = true;
                }
            }
        }

        finalize_feature(language, feature, &mut result);
        Ok(result)
    }

    fn request_with_repair(
        &self,
        feature: &FeatureSpec,
        prompt: &BatchPrompt,
    ) -> Result<SanitizedBatch, AppError> {
        let first = self.request_batch(feature, prompt)?;
        if first.structural_issues == 0 || !self.config.generation.retry_malformed {
            return Ok(first);
        }

        tracing::info!(
            feature = %feature.key,
            files = ?prompt.files,
            issues = first.structural_issues,
            "structural issues found; requesting batch again"
        );
        match self.request_batch(feature, prompt) {
            Ok(retry) if retry.structural_issues < first.structural_issues => Ok(retry),
            Ok(_) => Ok(first),
            Err(err) => {
                tracing::warn!(feature = %feature.key, "repair request failed: {}", err);
                Ok(first)
            }
        }
    }

    fn request_batch(
        &self,
        feature: &FeatureSpec,
        prompt: &BatchPrompt,
    ) -> Result<SanitizedBatch, AppError> {
        let api = &self.config.api;
        let response = self.client.complete(CompletionRequest {
            model: api.model.clone(),
            system: prompt.system.clone(),
            prompt: prompt.user.clone(),
            temperature: api.temperature,
            max_tokens: api.max_tokens,
        })?;
        sanitize_response(&response.text, self.catalog.language, feature, &prompt.files)
    }
}

/// Progress notifications emitted by [`run_generation`].
#[derive(Debug)]
pub enum RunEvent<'a> {
    Started { feature: &'a FeatureKey, index: usize, total: usize },
    Finished(&'a FeatureOutcome),
}

/// Pacing and cancellation for a generation run.
pub struct RunControl<'a> {
    pub feature_delay: Duration,
    /// Checked before each feature; returning false stops the run.
    pub should_continue: &'a dyn Fn() -> bool,
}

/// Generate `features` one after another and write each successful feature.
///
/// One feature's failure never aborts the run; it is recorded in the report
/// and nothing is written for it.
pub fn run_generation<C, W>(
    generator: &FeatureGenerator<'_, C>,
    writer: &W,
    project: &ProjectName,
    features: &[FeatureKey],
    control: &RunControl<'_>,
    on_event: &mut dyn FnMut(RunEvent<'_>),
) -> GenerationReport
where
    C: CompletionClient + ?Sized,
    W: ProjectWriter + ?Sized,
{
    let catalog = generator.catalog();
    let mut report = GenerationReport::new(project, catalog.language);

    for (index, key) in features.iter().enumerate() {
        if !(control.should_continue)() {
            tracing::info!(remaining = features.len() - index, "generation run stopped");
            break;
        }
        if index > 0 && !control.feature_delay.is_zero() {
            thread::sleep(control.feature_delay);
        }

        on_event(RunEvent::Started { feature: key, index, total: features.len() });

        let request = GenerationRequest::new(catalog.language, key.clone(), project);
        let status = match generator
            .generate(request)
            .and_then(|result| write_feature(writer, catalog, key, result))
        {
            Ok(status) => status,
            Err(err) => {
                tracing::warn!(feature = %key, "feature failed: {}", err);
                FeatureStatus::Failed { error: err.to_string() }
            }
        };

        report.record(FeatureOutcome { feature: key.to_string(), status });
        if let Some(outcome) = report.outcomes.last() {
            on_event(RunEvent::Finished(outcome));
        }
    }

    report
}

/// Write a feature's files below its output directory, plus package markers.
fn write_feature<W: ProjectWriter + ?Sized>(
    writer: &W,
    catalog: &LanguageCatalog,
    key: &FeatureKey,
    result: GenerationResult,
) -> Result<FeatureStatus, AppError> {
    let feature = catalog.feature(key.as_str())?;
    let output_dir = feature.output_dir.trim_matches('/');
    let mut written = Vec::with_capacity(result.files.len());

    for (name, content) in &result.files {
        let path = format!("{}/{}", output_dir, name);
        writer.write_file(&path, content)?;
        written.push(path);
    }

    if let Some(marker) = catalog.language.package_marker() {
        let mut dir = String::new();
        for part in output_dir.split('/').filter(|part| !part.is_empty()) {
            if !dir.is_empty() {
                dir.push('/');
            }
            dir.push_str(part);
            let path = format!("{}/{}", dir, marker);
            if !writer.exists(&path) {
                writer.write_file(&path, "")?;
                written.push(path);
            }
        }
    }

    Ok(FeatureStatus::Succeeded { files: written, warnings: result.warnings })
}
