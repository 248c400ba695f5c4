pub mod configuration;
pub mod error;
pub mod feature;
pub mod generation;
pub mod identifiers;
pub mod language;
pub mod prompt;
pub mod sanitize;

pub use configuration::{ApiConfig, AppConfig, GenerationConfig};
pub use error::AppError;
pub use feature::{FeatureSpec, FileSpec, LanguageCatalog};
pub use generation::{
    FeatureOutcome, FeatureStatus, GenerationReport, GenerationRequest, GenerationResult,
};
pub use identifiers::{FeatureKey, ProjectName};
pub use language::Language;
pub use prompt::{BatchPrompt, PromptContext, build_batch_prompt, render_template};
pub use sanitize::{SanitizedBatch, finalize_feature, sanitize_response};
