pub mod args;
pub mod catalog;
pub mod class_processor;
pub mod config;
pub mod errors;
pub mod prefixer;
pub mod report;
pub mod walker;

pub use args::{CatalogArgs, Cli, Commands, PipeArgs, PrefixArgs};
pub use catalog::{build_catalog, extract_class_names, CatalogFile, ClassCatalog};
pub use class_processor::{ClassListRewriter, RewrittenList};
pub use config::TailwindConfig;
pub use errors::{PrefixerError, Result};
pub use prefixer::{prefix_text, Prefixer, Rewrite};
pub use report::{FileOutcome, FileReport, PrefixReport, ReportBuilder};

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Options for a prefixing run
#[derive(Debug, Clone)]
pub struct PrefixOptions {
    /// Worker threads; `None` uses the global rayon pool
    pub jobs: Option<usize>,
    /// Compute outcomes without writing any file
    pub dry_run: bool,
    /// Draw a progress bar on stderr
    pub progress: bool,
    /// Files above this size in bytes are skipped (default: 10MB)
    pub max_file_size: u64,
}

impl Default for PrefixOptions {
    fn default() -> Self {
        Self {
            jobs: None,
            dry_run: false,
            progress: false,
            max_file_size: 10 * 1024 * 1024,
        }
    }
}

impl From<&PrefixArgs> for PrefixOptions {
    fn from(args: &PrefixArgs) -> Self {
        Self {
            jobs: args.jobs,
            dry_run: args.dry_run,
            progress: !args.verbose,
            ..Self::default()
        }
    }
}

/// Prefix every eligible file under `root` with the prefix declared in the
/// project's Tailwind configuration.
///
/// The catalog is built beforehand and shared read-only by all workers.
/// Individual file failures are recorded in the report; only a bad root
/// directory fails the run.
pub async fn run(root: impl Into<PathBuf>, catalog: Arc<ClassCatalog>) -> Result<PrefixReport> {
    run_with_options(root, catalog, PrefixOptions::default()).await
}

/// [`run`] with explicit options
pub async fn run_with_options(
    root: impl Into<PathBuf>,
    catalog: Arc<ClassCatalog>,
    options: PrefixOptions,
) -> Result<PrefixReport> {
    let root = root.into();
    tokio::task::spawn_blocking(move || prefix_tree(&root, &catalog, &options)).await?
}

/// Blocking core of [`run`]
pub fn prefix_tree(
    root: &Path,
    catalog: &ClassCatalog,
    options: &PrefixOptions,
) -> Result<PrefixReport> {
    let root = resolve_root(root)?;
    let config = TailwindConfig::discover(&root);
    let prefixer = Prefixer::new(&config.prefix, catalog);

    tracing::info!(
        root = %root.display(),
        prefix = %config.prefix,
        catalog_size = catalog.len(),
        dry_run = options.dry_run,
        "starting Tailwind prefixing"
    );

    let walk = walker::collect_eligible_files(&root)?;
    tracing::info!(files = walk.files.len(), "found eligible files");

    let progress = progress_bar(walk.files.len(), options.progress);

    let outcomes = match options.jobs {
        Some(jobs) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
            pool.install(|| process_files(&walk.files, prefixer, options, &progress))
        }
        None => process_files(&walk.files, prefixer, options, &progress),
    };

    progress.finish_and_clear();

    let report = ReportBuilder::new(root, config.prefix.clone())
        .with_dry_run(options.dry_run)
        .with_catalog_size(catalog.len())
        .with_files(walk.failures)
        .with_files(outcomes)
        .build();

    let stats = &report.statistics;
    tracing::info!(
        scanned = stats.files_scanned,
        changed = stats.files_changed,
        skipped = stats.files_skipped,
        failed = stats.files_failed,
        classes = stats.classes_prefixed,
        "prefixing complete"
    );

    Ok(report)
}

/// Resolve `root` against the working directory and check it is a directory
pub fn resolve_root(root: &Path) -> Result<PathBuf> {
    let resolved = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()?.join(root)
    };

    let metadata = fs::metadata(&resolved).map_err(|e| PrefixerError::InvalidRoot {
        path: resolved.display().to_string(),
        message: e.to_string(),
    })?;

    if !metadata.is_dir() {
        return Err(PrefixerError::InvalidRoot {
            path: resolved.display().to_string(),
            message: "not a directory".to_string(),
        });
    }

    Ok(resolved)
}

fn process_files(
    files: &[PathBuf],
    prefixer: Prefixer<'_>,
    options: &PrefixOptions,
    progress: &ProgressBar,
) -> Vec<FileReport> {
    files
        .par_iter()
        .map(|path| {
            let outcome = process_file(path, prefixer, options);
            progress.inc(1);
            FileReport {
                path: path.clone(),
                outcome,
            }
        })
        .collect()
}

/// Read, prefix and write back one file. Errors are folded into the outcome.
pub fn process_file(path: &Path, prefixer: Prefixer<'_>, options: &PrefixOptions) -> FileOutcome {
    match try_process_file(path, prefixer, options) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to prefix file");
            FileOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}

fn try_process_file(
    path: &Path,
    prefixer: Prefixer<'_>,
    options: &PrefixOptions,
) -> Result<FileOutcome> {
    let read_error = |e: std::io::Error| PrefixerError::ReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let metadata = fs::metadata(path).map_err(read_error)?;
    if metadata.len() > options.max_file_size {
        let reason = format!(
            "file exceeds maximum size limit ({} bytes > {} bytes)",
            metadata.len(),
            options.max_file_size
        );
        tracing::warn!(path = %path.display(), "{reason}");
        return Ok(FileOutcome::Skipped { reason });
    }

    let content = fs::read_to_string(path).map_err(read_error)?;
    let rewrite = prefixer.rewrite(&content);

    if !rewrite.is_changed() {
        tracing::debug!(path = %path.display(), "nothing to prefix");
        return Ok(FileOutcome::Unchanged);
    }

    if !options.dry_run {
        write_atomic(path, &rewrite.text).map_err(|e| PrefixerError::OutputError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    }

    tracing::debug!(
        path = %path.display(),
        classes = rewrite.classes_prefixed,
        dry_run = options.dry_run,
        "prefixed classes"
    );

    Ok(FileOutcome::Changed {
        classes_prefixed: rewrite.classes_prefixed,
    })
}

/// Write file atomically by writing to a sibling temp file then renaming.
/// Permissions of an existing file are carried over.
fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    use std::io::Write;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = path.with_file_name(format!(".{file_name}.tailwind-prefixer.tmp"));
    let permissions = fs::metadata(path).ok().map(|m| m.permissions());

    let result = (|| {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        if let Some(permissions) = permissions {
            fs::set_permissions(&temp_path, permissions)?;
        }
        fs::rename(&temp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({msg})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    pb.set_message("Prefixing classes...");
    pb
}

/// Handle the prefix command: load the catalog, run, and write the report
pub async fn prefix(args: PrefixArgs) -> Result<PrefixReport> {
    args.validate().map_err(PrefixerError::InvalidInput)?;

    let catalog = ClassCatalog::load(&args.catalog)?;
    if catalog.is_empty() {
        tracing::warn!(path = %args.catalog.display(), "class catalog is empty, nothing will be prefixed");
    }

    let options = PrefixOptions::from(&args);
    let report = run_with_options(args.root.clone(), Arc::new(catalog), options).await?;

    if let Some(report_path) = &args.report {
        write_output(report_path, &report.to_pretty_json()?)?;
    }

    Ok(report)
}

/// Handle the catalog command: scan a stylesheet and emit the catalog
/// document to a file or stdout
pub async fn handle_catalog_command(args: CatalogArgs) -> Result<CatalogFile> {
    use tokio::io::{self, AsyncWriteExt};

    let stylesheet = fs::read_to_string(&args.stylesheet).map_err(|e| PrefixerError::ReadError {
        path: args.stylesheet.display().to_string(),
        message: e.to_string(),
    })?;

    let document = CatalogFile::from_stylesheet(
        &stylesheet,
        Some(args.stylesheet.display().to_string()),
    );
    let json = serde_json::to_string_pretty(&document)?;

    match &args.output {
        Some(output) => write_output(output, &json)?,
        None => {
            let mut stdout = io::stdout();
            stdout
                .write_all(json.as_bytes())
                .await
                .map_err(stdout_error)?;
            stdout.flush().await.map_err(stdout_error)?;
        }
    }

    tracing::info!(
        classes = document.stats.unique_count,
        candidates = document.stats.original_count,
        "built class catalog"
    );

    Ok(document)
}

/// Handle pipe command - read text from stdin, write prefixed text to stdout
pub async fn handle_pipe_command(args: PipeArgs) -> Result<()> {
    use tokio::io::{self, AsyncReadExt, AsyncWriteExt};

    let catalog = ClassCatalog::load(&args.catalog)?;

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .await
        .map_err(|e| PrefixerError::InputError(format!("Failed to read from stdin: {}", e)))?;

    let output = prefix_text(&args.prefix, &catalog, &input);

    let mut stdout = io::stdout();
    stdout
        .write_all(output.as_bytes())
        .await
        .map_err(stdout_error)?;
    stdout.flush().await.map_err(stdout_error)?;

    Ok(())
}

fn stdout_error(e: std::io::Error) -> PrefixerError {
    PrefixerError::OutputError {
        path: "stdout".to_string(),
        message: e.to_string(),
    }
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    let output_error = |e: std::io::Error| PrefixerError::OutputError {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(output_error)?;
    }

    write_atomic(path, content).map_err(output_error)
}
