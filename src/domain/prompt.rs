//! Prompt assembly.
//!
//! Each batch prompt is the language's `prompt_template` rendered with the
//! request variables, the feature's catalog fields, and the per-file
//! instructions of the files in the batch.

use std::collections::HashMap;
use std::sync::OnceLock;

use minijinja::{Environment, UndefinedBehavior};

use super::sanitize::blocks::{FILE_END_MARKER, file_start_marker};
use super::{AppError, FeatureSpec, FileSpec, LanguageCatalog};

/// Placeholder listed when no Django models have been discovered yet.
pub const DEFAULT_KNOWN_MODELS: &str = "YourModel";

/// Runtime variables for prompt rendering.
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    pub variables: HashMap<String, String>,
}

impl PromptContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Context with every variable a feature's templates may reference.
    pub fn for_feature<'a>(
        feature: &FeatureSpec,
        request_vars: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> Self {
        let mut context = PromptContext::new()
            .with_var("feature_key", &feature.key)
            .with_var("feature_name", &feature.name)
            .with_var("slug", &feature.slug)
            .with_var("description", &feature.description)
            .with_var("app_class", app_config_class(&feature.slug))
            .with_var("known_models", DEFAULT_KNOWN_MODELS);
        for (name, value) in request_vars {
            context.set(name.clone(), value.clone());
        }
        context
    }
}

/// A rendered prompt for one batch of files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPrompt {
    pub system: String,
    pub user: String,
    pub files: Vec<String>,
}

/// Render the prompt requesting `batch` of `feature`'s files.
pub fn build_batch_prompt(
    catalog: &LanguageCatalog,
    feature: &FeatureSpec,
    batch: &[FileSpec],
    context: &PromptContext,
) -> Result<BatchPrompt, AppError> {
    let mut sections = Vec::with_capacity(batch.len());
    for file in batch {
        let instructions = render_template(
            &file.instructions,
            context,
            &format!("{}/{}/{}", catalog.language, feature.key, file.name),
        )?;
        sections.push(format!("## {}\n{}", file.name, instructions.trim_end()));
    }

    let files: Vec<String> = batch.iter().map(|file| file.name.clone()).collect();
    let mut batch_context = context.clone();
    batch_context.set("file_list", files.join(", "));
    batch_context.set("file_sections", sections.join("\n\n"));
    batch_context.set("format_instructions", format_instructions(&files));

    let user = render_template(
        &catalog.prompt_template,
        &batch_context,
        &format!("{} prompt_template", catalog.language),
    )?;
    let system = render_template(
        &catalog.system_prompt,
        &batch_context,
        &format!("{} system_prompt", catalog.language),
    )?;

    Ok(BatchPrompt { system, user, files })
}

/// The delimiter contract the sanitizer parses.
pub fn format_instructions(files: &[String]) -> String {
    let mut text = String::from(
        "Return every requested file using exactly this format, one block per file, \
         with no text outside the blocks:\n",
    );
    for name in files {
        text.push_str(&format!("{}\n<complete file content>\n{}\n", file_start_marker(name), FILE_END_MARKER));
    }
    text
}

/// Django AppConfig class name for an app (`mail_service` -> `MailServiceConfig`).
pub fn app_config_class(slug: &str) -> String {
    let mut name: String = slug
        .split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();
    name.push_str("Config");
    name
}

static ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Render a template string using strict Jinja-compatible semantics.
///
/// Only `{{ ... }}` interpolation is allowed. Control structures are rejected.
pub fn render_template(
    template: &str,
    context: &PromptContext,
    template_name: &str,
) -> Result<String, AppError> {
    if let Some(token) = disallowed_template_token(template) {
        return Err(AppError::TemplateRender {
            template: template_name.to_string(),
            reason: format!("template syntax '{}' is not allowed", token),
        });
    }

    let env = ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env
    });

    env.render_str(template, &context.variables).map_err(|err| AppError::TemplateRender {
        template: template_name.to_string(),
        reason: err.to_string(),
    })
}

fn disallowed_template_token(template: &str) -> Option<&'static str> {
    if template.contains("{%") {
        return Some("{%");
    }
    if template.contains("{#") {
        return Some("{#");
    }
    None
}
