//! Output sanitizer: split a raw completion into files, apply deterministic
//! fix-ups, and flag structural problems as warnings.
//!
//! This is best-effort text repair. It cannot detect semantically invalid
//! code, only the structural symptoms checked below.

pub mod balance;
pub mod blocks;
pub mod python;
pub mod typescript;

use std::path::Path;

use super::{AppError, FeatureSpec, GenerationResult, Language};
use balance::check_balance;
use blocks::split_blocks;

/// Sanitized output of one batch response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedBatch {
    pub result: GenerationResult,
    /// Number of bracket imbalances found; drives the repair retry.
    pub structural_issues: usize,
}

/// Split `raw` into the files of `expected`, fixing and checking each.
///
/// Returned file names are always a subset of `expected`. A response with no
/// file blocks at all is a `MalformedResponse`.
pub fn sanitize_response(
    raw: &str,
    language: Language,
    feature: &FeatureSpec,
    expected: &[String],
) -> Result<SanitizedBatch, AppError> {
    let raw_blocks = split_blocks(raw);
    if raw_blocks.is_empty() {
        return Err(AppError::MalformedResponse {
            feature: feature.key.clone(),
            reason: "no file blocks found in response".to_string(),
        });
    }

    let mut batch = SanitizedBatch::default();

    for block in raw_blocks {
        if !expected.iter().any(|name| *name == block.name) {
            tracing::debug!(feature = %feature.key, file = %block.name, "dropping unexpected file block");
            batch.result.warn(format!("unexpected file '{}' ignored", block.name));
            continue;
        }
        if batch.result.files.contains_key(&block.name) {
            batch.result.warn(format!("{}: duplicate block ignored", block.name));
            continue;
        }
        if !block.terminated {
            batch.result.warn(format!("{}: unterminated file block", block.name));
        }
        if block.content.is_empty() {
            batch.result.warn(format!("{}: empty content dropped", block.name));
            continue;
        }

        let content = fix_file(language, &feature.slug, &block.name, &block.content, &mut batch);
        batch.result.insert_file(block.name, content);
    }

    Ok(batch)
}

fn fix_file(
    language: Language,
    slug: &str,
    name: &str,
    content: &str,
    batch: &mut SanitizedBatch,
) -> String {
    let extension = Path::new(name).extension().and_then(|ext| ext.to_str()).unwrap_or("");

    let fixed = match (language, extension) {
        (Language::Django, "py") => python::apply_fixups(name, slug, content),
        (Language::NextJs, "tsx" | "jsx") => {
            let fixed = typescript::ensure_use_client_directive(&typescript::ensure_react_import(
                content,
            ));
            if !typescript::has_default_export(&fixed) {
                batch.result.warn(format!("{}: missing export default", name));
            }
            fixed
        }
        (Language::NextJs | Language::NestJs, "ts") => {
            if !typescript::has_export(content) {
                batch.result.warn(format!("{}: missing export", name));
            }
            content.to_string()
        }
        _ => content.to_string(),
    };

    if fixed != content {
        tracing::debug!(file = %name, "applied fix-ups");
    }

    for imbalance in check_balance(&fixed) {
        batch.result.warn(format!("{}: {}", name, imbalance));
        batch.structural_issues += 1;
    }

    fixed
}

/// Fallback stubs and cross-file repair once every batch of a feature is in.
///
/// Stubs go in first so imports are aligned against the `models.py` that is
/// actually written.
pub fn finalize_feature(language: Language, feature: &FeatureSpec, result: &mut GenerationResult) {
    for file in &feature.files {
        if result.files.contains_key(&file.name) {
            continue;
        }
        match &file.fallback {
            Some(stub) if !stub.trim().is_empty() => {
                result.insert_file(file.name.clone(), stub.clone());
                result.warn(format!("{}: missing from response, wrote fallback stub", file.name));
            }
            _ => result.warn(format!("{}: missing from response", file.name)),
        }
    }

    if language != Language::Django {
        return;
    }
    let Some(models) = result.files.get("models.py").map(|code| python::model_fields(code)) else {
        return;
    };
    let names: Vec<String> = models.iter().map(|model| model.name.clone()).collect();

    for name in ["admin.py", "views.py"] {
        let Some(code) = result.files.get(name) else {
            continue;
        };
        let mut aligned = python::align_model_imports(code, &names);
        if name == "admin.py" {
            aligned = python::align_admin_registrations(&aligned, &models);
        }
        result.files.insert(name.to_string(), aligned);
    }
}
