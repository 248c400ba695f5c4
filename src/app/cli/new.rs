use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use dialoguer::{Confirm, Error as DialoguerError, Input, MultiSelect, Select};

use super::{EXIT_ALL_FAILED, NewArgs};
use crate::app::api::{
    self, ALL_FEATURES, FeatureOutcome, FeatureStatus, GenerationReport, Language,
    NewProjectOptions, RunEvent,
};
use crate::domain::AppError;

pub(super) fn run_new(args: NewArgs) -> Result<i32, AppError> {
    let Some(options) = resolve_new_inputs(&args)? else {
        println!("Cancelled");
        return Ok(0);
    };

    if !args.yes && !confirm_generation(&options)? {
        println!("Cancelled");
        return Ok(0);
    }

    println!(
        "🚀 Generating {} project '{}' in {}",
        options.language.display_name(),
        options.name,
        options.project_dir().display()
    );

    let report = api::generate_project(&options, &mut print_progress)?;
    print_summary(&report);

    if let Some(path) = &args.report {
        write_report(&report, path)?;
        println!("📝 Report written to {}", path.display());
    }

    if report.all_failed() {
        return Ok(EXIT_ALL_FAILED);
    }
    print_next_steps(&options);
    Ok(0)
}

fn resolve_new_inputs(args: &NewArgs) -> Result<Option<NewProjectOptions>, AppError> {
    let name = match &args.name {
        Some(value) => value.clone(),
        None => match prompt_project_name()? {
            Some(value) => value,
            None => return Ok(None),
        },
    };

    let language = match &args.language {
        Some(value) => value.parse::<Language>()?,
        None => match prompt_language()? {
            Some(value) => value,
            None => return Ok(None),
        },
    };

    let features = if args.features.is_empty() {
        match prompt_features(language)? {
            Some(value) => value,
            None => return Ok(None),
        }
    } else {
        args.features.clone()
    };

    Ok(Some(NewProjectOptions {
        name,
        language,
        features,
        output_dir: args.output_dir.clone(),
        force: args.force,
    }))
}

fn prompt_project_name() -> Result<Option<String>, AppError> {
    match Input::new().with_prompt("Project name").interact_text() {
        Ok(value) => Ok(Some(value)),
        Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => Ok(None),
        Err(err) => Err(AppError::Interaction(format!("Failed to read project name: {}", err))),
    }
}

fn prompt_language() -> Result<Option<Language>, AppError> {
    let items: Vec<&str> = Language::ALL.iter().map(|language| language.display_name()).collect();
    let selection = Select::new()
        .with_prompt("Select language")
        .items(&items)
        .default(0)
        .interact_opt()
        .map_err(|err| AppError::Interaction(format!("Failed to select language: {}", err)))?;

    Ok(selection.map(|index| Language::ALL[index]))
}

fn prompt_features(language: Language) -> Result<Option<Vec<String>>, AppError> {
    let summaries = api::list_features(Some(language.as_str()))?;
    let mut items = vec![format!("{} (every feature)", ALL_FEATURES)];
    items.extend(summaries.iter().map(|summary| format!("{}: {}", summary.key, summary.name)));

    let selection = MultiSelect::new()
        .with_prompt("Select features (space to toggle)")
        .items(&items)
        .interact_opt()
        .map_err(|err| AppError::Interaction(format!("Failed to select features: {}", err)))?;

    let Some(indices) = selection else {
        return Ok(None);
    };
    if indices.contains(&0) {
        return Ok(Some(vec![ALL_FEATURES.to_string()]));
    }
    Ok(Some(indices.into_iter().map(|index| summaries[index - 1].key.clone()).collect()))
}

fn confirm_generation(options: &NewProjectOptions) -> Result<bool, AppError> {
    let prompt = format!(
        "Generate {} into {}?",
        options.features.join(", "),
        options.project_dir().display()
    );
    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(true)
        .interact_opt()
        .map_err(|err| AppError::Interaction(format!("Failed to confirm: {}", err)))?;
    Ok(confirmed.unwrap_or(false))
}

fn print_progress(event: RunEvent<'_>) {
    match event {
        RunEvent::Started { feature, index, total } => {
            println!("[{}/{}] Generating {}...", index + 1, total, feature);
        }
        RunEvent::Finished(outcome) => println!("  {}", outcome_line(outcome)),
    }
}

fn outcome_line(outcome: &FeatureOutcome) -> String {
    match &outcome.status {
        FeatureStatus::Succeeded { files, warnings } if warnings.is_empty() => {
            format!("✅ {} ({} file(s))", outcome.feature, files.len())
        }
        FeatureStatus::Succeeded { files, warnings } => format!(
            "⚠️  {} ({} file(s), {} warning(s))",
            outcome.feature,
            files.len(),
            warnings.len()
        ),
        FeatureStatus::Failed { error } => format!("❌ {}: {}", outcome.feature, error),
    }
}

fn print_summary(report: &GenerationReport) {
    let clean: Vec<&str> = report.clean().map(|outcome| outcome.feature.as_str()).collect();
    let warned: Vec<&FeatureOutcome> = report.with_warnings().collect();
    let failed: Vec<&FeatureOutcome> = report.failed().collect();

    println!();
    println!("Summary for '{}':", report.project);
    if !clean.is_empty() {
        println!("✅ Succeeded: {}", clean.join(", "));
    }
    if !warned.is_empty() {
        println!("⚠️  Succeeded with warnings:");
        for outcome in warned {
            if let FeatureStatus::Succeeded { warnings, .. } = &outcome.status {
                println!("  {}:", outcome.feature);
                for warning in warnings {
                    println!("    • {}", warning);
                }
            }
        }
    }
    if !failed.is_empty() {
        println!("❌ Failed:");
        for outcome in failed {
            if let FeatureStatus::Failed { error } = &outcome.status {
                println!("  • {}: {}", outcome.feature, error);
            }
        }
    }
}

fn print_next_steps(options: &NewProjectOptions) {
    println!();
    println!("Next steps:");
    println!("  cd {}", options.project_dir().display());
    for step in options.language.next_steps() {
        println!("  {}", step);
    }
}

fn write_report(report: &GenerationReport, path: &Path) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|err| AppError::config_error(format!("Failed to serialize report: {}", err)))?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    Ok(())
}
