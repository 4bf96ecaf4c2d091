use clap::{Parser, Subcommand};
use simple_docs::{config, generate, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "simple-docs")]
#[command(about = "Static site generator for documentation sites")]
#[command(long_about = "\
Static site generator for documentation sites

Collections of markdown pages are listed, in navigation order, in a db.json
file. Pages are grouped into sidebar sections by category and linked to their
neighbours with previous/next pagination.

Content structure:

  content/
  ├── config.toml                  # Build config (optional)
  ├── config.json                  # Site title, menu, fileEditBaseUrl
  ├── sponsors.json                # Footer sponsors (optional)
  ├── releases.json                # Latest release in footer (optional)
  ├── assets/                      # Copied to output root
  └── docs/
      ├── db.json                  # [{ permalink, title, contentPath, category, draft }]
      ├── introduction.md
      └── routing.md

Entries marked draft are rendered but left out of the sidebar.

Run 'simple-docs gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Log progress at info level (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every collection into the output directory
    Build,
    /// Validate config, content and collections without building
    Check,
    /// Print the derived sections and pagination for one entry as JSON
    Inspect {
        /// Entry permalink, e.g. /docs/routing
        permalink: String,
        /// Collection to search (default: all, in config order)
        #[arg(long)]
        collection: Option<String>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build => {
            println!("==> Building {} → {}", cli.source.display(), cli.output.display());
            let report = generate::build(&cli.source, &cli.output)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let report = generate::check(&cli.source)?;
            output::print_check_output(&report, &cli.source);
            if !report.is_ok() {
                return Err(format!("{} entries have no content", report.missing.len()).into());
            }
            println!("==> Content is valid");
        }
        Command::Inspect {
            permalink,
            collection,
        } => {
            let site = generate::load_site(&cli.source)?;
            let inspection = generate::inspect(&site, &permalink, collection.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&inspection)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `RUST_LOG` wins when set; otherwise `info` with `--verbose`, `warn` without.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
