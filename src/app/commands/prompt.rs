//! Render the batch prompts of a feature without calling the API.

use crate::domain::prompt::build_batch_prompt;
use crate::domain::{
    AppError, BatchPrompt, FeatureKey, GenerationRequest, LanguageCatalog, ProjectName,
    PromptContext,
};

pub fn render_prompts(
    catalog: &LanguageCatalog,
    feature_key: &FeatureKey,
    project: &ProjectName,
    files_per_request: usize,
) -> Result<Vec<BatchPrompt>, AppError> {
    let request = GenerationRequest::new(catalog.language, feature_key.clone(), project);
    let feature = catalog.feature(feature_key.as_str())?;
    let context = PromptContext::for_feature(feature, request.variables());

    feature
        .batches(files_per_request)
        .into_iter()
        .map(|batch| build_batch_prompt(catalog, feature, batch, &context))
        .collect()
}
