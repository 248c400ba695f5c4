//! CLI Adapter.

mod catalog;
mod new;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::AppError;

/// Exit code when every selected feature failed.
const EXIT_ALL_FAILED: i32 = 2;

#[derive(Parser)]
#[command(name = "initiatep")]
#[command(version)]
#[command(
    about = "Scaffold Django, Next.js, and NestJS features with LLM-generated code",
    long_about = None
)]
struct Cli {
    /// Show debug diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new project (the default command)
    #[clap(visible_alias = "n")]
    New(NewArgs),
    /// List the features available per language
    #[clap(visible_alias = "ls")]
    Features {
        /// Only list features of this language
        #[arg(short, long)]
        language: Option<String>,
    },
    /// Print the prompts sent for a feature without calling the API
    #[clap(visible_alias = "p")]
    Prompt {
        /// Language: django, nextjs, or nestjs
        language: String,
        /// Feature key
        feature: String,
        /// Project name substituted into the prompt
        #[arg(long, default_value = "myproject")]
        project: String,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct NewArgs {
    /// Project name (also the directory name)
    name: Option<String>,
    /// Language: django, nextjs, or nestjs
    #[arg(short, long)]
    language: Option<String>,
    /// Comma-separated feature keys, or `all`
    #[arg(short, long, value_delimiter = ',')]
    features: Vec<String>,
    /// Directory the project is created in
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
    /// Write into an existing project directory
    #[arg(long)]
    force: bool,
    /// Write a JSON report of the run to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<i32, AppError> = match cli.command {
        Some(Commands::New(args)) => new::run_new(args),
        None => new::run_new(NewArgs { output_dir: PathBuf::from("."), ..NewArgs::default() }),
        Some(Commands::Features { language }) => catalog::run_features(language).map(|_| 0),
        Some(Commands::Prompt { language, feature, project }) => {
            catalog::run_prompt(&language, &feature, &project).map(|_| 0)
        }
    };

    match result {
        Ok(exit_code) => {
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
