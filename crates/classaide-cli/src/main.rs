//! classaide CLI: reading assessments and AI classroom tools from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "classaide",
    version,
    about = "Reading fluency assessment and AI teaching assistant for multi-grade classrooms"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one student's reading against the expected passage
    Assess {
        /// The passage the student was asked to read
        #[arg(long)]
        text: String,

        /// What the speech recognizer heard
        #[arg(long)]
        transcript: String,

        /// Student name shown in the output
        #[arg(long)]
        student: Option<String>,

        /// Language code or name (default: from config)
        #[arg(long)]
        language: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score every reading in a class roster
    Batch {
        /// Path to a roster .toml file or directory
        #[arg(long)]
        roster: PathBuf,

        /// Output directory (default: from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, all, none
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two class reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Fluency points a student may move before it counts
        #[arg(long, default_value = "5")]
        threshold: u8,

        /// Exit code 1 if regressions found
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate class roster TOML files
    Validate {
        /// Path to a roster file or directory
        #[arg(long)]
        roster: PathBuf,
    },

    /// Generate classroom material with the configured AI provider
    Generate {
        #[command(flatten)]
        provider: ProviderArgs,

        #[command(subcommand)]
        tool: commands::generate::Tool,
    },

    /// Translate text into another language
    Translate {
        /// Text to translate
        #[arg(long)]
        text: String,

        /// Target language code or name
        #[arg(long)]
        to: String,

        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// Browse community resources
    Resources {
        #[arg(long)]
        subject: Option<String>,

        #[arg(long)]
        language: Option<String>,

        #[arg(long)]
        grade: Option<String>,
    },

    /// List supported languages
    Languages {
        /// Show UI labels for this language
        #[arg(long)]
        ui: Option<String>,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example roster
    Init,
}

/// Provider selection shared by the AI-backed commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ProviderArgs {
    /// Provider name from the config (default: default_provider)
    #[arg(long, global = true)]
    provider: Option<String>,

    /// Model override
    #[arg(long, global = true)]
    model: Option<String>,

    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "classaide=info"
                    .parse()
                    .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into()),
            ),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Assess {
            text,
            transcript,
            student,
            language,
            format,
            config,
        } => commands::assess::execute(text, transcript, student, language, format, config),
        Commands::Batch {
            roster,
            output,
            format,
            config,
        } => commands::batch::execute(roster, output, format, config),
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_regression, format),
        Commands::Validate { roster } => commands::validate::execute(roster),
        Commands::Generate { provider, tool } => commands::generate::execute(provider, tool).await,
        Commands::Translate { text, to, provider } => {
            commands::translate::execute(text, to, provider).await
        }
        Commands::Resources {
            subject,
            language,
            grade,
        } => commands::resources::execute(subject, language, grade),
        Commands::Languages { ui } => commands::languages::execute(ui),
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
