use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tailwind prefixer - rewrites utility classes to carry the configured prefix
#[derive(Parser, Debug)]
#[command(name = "tailwind-prefixer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prefix Tailwind classes in every eligible file under a directory
    Prefix(PrefixArgs),
    /// Build a class catalog from a compiled stylesheet
    Catalog(CatalogArgs),
    /// Prefix text read from stdin and write it to stdout
    Pipe(PipeArgs),
}

/// Arguments for the prefix command
#[derive(Parser, Debug, Clone)]
pub struct PrefixArgs {
    /// Project root containing the Tailwind configuration
    #[arg(value_name = "ROOT", help = "Root directory to rewrite in place")]
    pub root: PathBuf,

    /// Class catalog (JSON from the catalog command, or a compiled .css file)
    #[arg(
        short = 'c',
        long = "catalog",
        value_name = "PATH",
        env = "TAILWIND_PREFIXER_CATALOG",
        help = "Class catalog: JSON written by the catalog command, or a compiled stylesheet"
    )]
    pub catalog: PathBuf,

    /// Number of parallel threads to use
    #[arg(
        short = 'j',
        long = "jobs",
        value_name = "NUM",
        help = "Number of parallel threads to use (defaults to number of CPU cores)"
    )]
    pub jobs: Option<usize>,

    /// Verbose output
    #[arg(
        short = 'v',
        long = "verbose",
        default_value_t = false,
        help = "Enable verbose output"
    )]
    pub verbose: bool,

    /// Dry run (don't write files)
    #[arg(
        long = "dry-run",
        default_value_t = false,
        help = "Report what would change without writing any file"
    )]
    pub dry_run: bool,

    /// Report file path (JSON)
    #[arg(
        short = 'r',
        long = "report",
        value_name = "PATH",
        help = "Write a JSON report of every visited file"
    )]
    pub report: Option<PathBuf>,
}

/// Arguments for the catalog command
#[derive(Parser, Debug, Clone)]
pub struct CatalogArgs {
    /// Compiled stylesheet to scan
    #[arg(value_name = "STYLESHEET")]
    pub stylesheet: PathBuf,

    /// Output catalog path (JSON)
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Where to write the catalog (defaults to stdout)"
    )]
    pub output: Option<PathBuf>,
}

/// Arguments for the pipe command
#[derive(Parser, Debug, Clone)]
pub struct PipeArgs {
    /// Class catalog
    #[arg(
        short = 'c',
        long = "catalog",
        value_name = "PATH",
        env = "TAILWIND_PREFIXER_CATALOG",
        help = "Class catalog: JSON written by the catalog command, or a compiled stylesheet"
    )]
    pub catalog: PathBuf,

    /// Prefix to apply
    #[arg(short = 'p', long = "prefix", value_name = "PREFIX")]
    pub prefix: String,
}

impl PrefixArgs {
    /// Validate that the arguments are consistent
    pub fn validate(&self) -> Result<(), String> {
        if self.root.as_os_str().is_empty() {
            return Err("Root directory must not be empty".to_string());
        }

        if let Some(jobs) = self.jobs {
            if jobs == 0 {
                return Err("Number of jobs must be at least 1".to_string());
            }
        }

        if let Some(report) = &self.report {
            if report == &self.catalog {
                return Err("Report path must differ from the catalog path".to_string());
            }
        }

        Ok(())
    }
}
