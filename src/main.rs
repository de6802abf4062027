use anyhow::Context;
use clap::Parser;
use tailwind_prefixer::{handle_catalog_command, handle_pipe_command, prefix, Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let verbose = matches!(&cli.command, Commands::Prefix(args) if args.verbose);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { "warn" })),
        )
        .init();

    // Handle commands
    match cli.command {
        Commands::Prefix(args) => match prefix(args).await {
            Ok(report) => {
                let stats = &report.statistics;
                println!("Tailwind prefixing complete!");
                println!("  - Prefix: {:?}", report.metadata.prefix);
                println!("  - Scanned {} files", stats.files_scanned);
                println!(
                    "  - {} {} files ({} classes)",
                    if report.metadata.dry_run { "Would change" } else { "Changed" },
                    stats.files_changed,
                    stats.classes_prefixed
                );
                if stats.files_skipped > 0 {
                    println!("  - Skipped {} files", stats.files_skipped);
                }
                for failure in report.failures() {
                    eprintln!("  - Failed: {}", failure.path.display());
                }
                Ok(())
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Catalog(args) => {
            let output = args.output.clone();
            let document = handle_catalog_command(args)
                .await
                .context("Failed to build class catalog")?;
            if let Some(output) = output {
                println!(
                    "Wrote {} classes to {}",
                    document.stats.unique_count,
                    output.display()
                );
            }
            Ok(())
        }
        Commands::Pipe(args) => {
            handle_pipe_command(args).await?;
            Ok(())
        }
    }
}
