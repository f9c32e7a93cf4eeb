//! udfpack CLI - validate and package scripting-language UDFs.

mod compile;
mod package;
mod settings;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use udfpack_core::{FunctionLanguage, JobId};

#[derive(Parser)]
#[command(name = "udfpack")]
#[command(about = "Validate and package user-defined functions for job submission")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Root directory for staged sources and job packages
    #[arg(long, global = true)]
    work_dir: Option<PathBuf>,

    /// Interpreter executable used to load functions
    #[arg(long, global = true)]
    python_home: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the engine can load a function
    Compile {
        /// Qualified function name (e.g. `pkg.module.Func`)
        #[arg(long)]
        name: String,

        /// Path to the function source
        #[arg(long)]
        source: PathBuf,

        /// Source language
        #[arg(long, default_value = "python")]
        language: FunctionLanguage,

        /// Job the validation runs for. Only used in log output: staged
        /// files and the validation archive are not job-scoped.
        #[arg(long, default_value = "0")]
        job: JobId,
    },

    /// Package functions into a job archive
    Package {
        /// Job identifier that scopes the archive path
        /// (letters, digits, '.', '_' and '-')
        #[arg(long)]
        job: JobId,

        /// Function to package, as `<qualified-name>=<source-file>`
        #[arg(long = "udf", required = true)]
        udfs: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let settings = settings::resolve(
        cli.config.as_deref(),
        cli.work_dir,
        cli.python_home,
    )?;

    match cli.command {
        Commands::Compile {
            name,
            source,
            language,
            job,
        } => compile::execute(&settings, &name, &source, language, &job)?,

        Commands::Package { job, udfs } => package::execute(&settings, &job, &udfs)?,
    }

    Ok(())
}
