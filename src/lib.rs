//! initiatep: scaffold Django, Next.js, and NestJS features with LLM-generated code.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api::{
    FeatureSummary, NewProjectOptions, RunEvent, generate_project, list_features, render_prompts,
};
pub use domain::{AppError, GenerationReport, Language};
