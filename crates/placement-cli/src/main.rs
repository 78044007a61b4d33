//! placement CLI — question bank readiness and content tooling.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use placement_core::model::Id;
use placement_core::traits::{ListFilter, MediaKind};

mod commands;

use commands::list::ResourceKind;
use commands::readiness::SummarySource;

#[derive(Parser)]
#[command(
    name = "placement",
    version,
    about = "Placement-test content admin: question bank readiness and content tooling"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the content API and store the session
    Login {
        #[arg(long)]
        username: String,

        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Evaluate one question bank's exam readiness
    Readiness {
        /// Bank summary JSON saved from the API
        #[arg(long)]
        file: Option<PathBuf>,

        /// Fetch the bank of this unit
        #[arg(long)]
        unit: Option<Id>,

        /// Fetch the bank of this level
        #[arg(long)]
        level: Option<Id>,

        /// Level code used to pick thresholds (e.g. "B1")
        #[arg(long)]
        level_code: Option<String>,

        /// Threshold profile TOML; overrides the served thresholds
        #[arg(long)]
        thresholds: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Evaluate every level's (and optionally unit's) question bank
    Scan {
        /// Levels to scan (default: all)
        #[arg(long = "level")]
        levels: Vec<Id>,

        /// Also scan each level's units
        #[arg(long)]
        include_units: bool,

        /// Max concurrent requests (default: from config)
        #[arg(long)]
        parallelism: Option<usize>,

        /// Threshold profile TOML; overrides the served thresholds
        #[arg(long)]
        thresholds: Option<PathBuf>,

        /// Output directory (default: from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, all
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Compare two readiness reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Exit code 1 if any bank lost readiness
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate a threshold profile
    Validate {
        #[arg(long)]
        thresholds: PathBuf,
    },

    /// List a content collection
    List {
        #[arg(value_enum)]
        kind: ResourceKind,

        /// Only items of this test
        #[arg(long)]
        test: Option<Id>,

        /// Only items of this level
        #[arg(long)]
        level: Option<Id>,

        /// Only items of this unit
        #[arg(long)]
        unit: Option<Id>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Upload a media file to the CDN
    Upload {
        file: PathBuf,

        /// image, audio or video (default: from the file extension)
        #[arg(long)]
        kind: Option<MediaKind>,

        /// Title of the created item (default: file name)
        #[arg(long)]
        title: Option<String>,

        /// Attach the uploaded audio/video to this test
        #[arg(long)]
        test: Option<Id>,
    },

    /// Create starter config and threshold files
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("placement=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Login { username, password } => {
            commands::login::execute(username, password, config).await
        }
        Commands::Logout => commands::logout::execute(),
        Commands::Readiness {
            file,
            unit,
            level,
            level_code,
            thresholds,
            format,
        } => match SummarySource::from_args(file, unit, level) {
            Ok(source) => {
                commands::readiness::execute(source, level_code, thresholds, format, config).await
            }
            Err(e) => Err(e),
        },
        Commands::Scan {
            levels,
            include_units,
            parallelism,
            thresholds,
            output,
            format,
        } => {
            commands::scan::execute(
                levels,
                include_units,
                parallelism,
                thresholds,
                output,
                format,
                config,
            )
            .await
        }
        Commands::Compare {
            baseline,
            current,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, fail_on_regression, format),
        Commands::Validate { thresholds } => commands::validate::execute(thresholds),
        Commands::List {
            kind,
            test,
            level,
            unit,
            format,
        } => {
            let filter = ListFilter { test, level, unit };
            commands::list::execute(kind, filter, format, config).await
        }
        Commands::Upload {
            file,
            kind,
            title,
            test,
        } => commands::upload::execute(file, kind, title, test, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
