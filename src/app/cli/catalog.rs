use crate::app::api;
use crate::domain::AppError;

pub(super) fn run_features(language: Option<String>) -> Result<(), AppError> {
    let summaries = api::list_features(language.as_deref())?;

    let mut current = None;
    for summary in &summaries {
        if current != Some(summary.language) {
            if current.is_some() {
                println!();
            }
            println!("{}:", summary.language.display_name());
            current = Some(summary.language);
        }
        println!("  {:<16} {}", summary.key, summary.description);
        println!("  {:<16} files: {}", "", summary.files.join(", "));
    }
    Ok(())
}

pub(super) fn run_prompt(language: &str, feature: &str, project: &str) -> Result<(), AppError> {
    let prompts = api::render_prompts(language, feature, project)?;
    let total = prompts.len();

    for (index, prompt) in prompts.iter().enumerate() {
        println!("--- Batch {}/{}: {} ---", index + 1, total, prompt.files.join(", "));
        println!("[system]");
        println!("{}", prompt.system.trim_end());
        println!("[user]");
        println!("{}", prompt.user.trim_end());
        println!();
    }
    Ok(())
}
