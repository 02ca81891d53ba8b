use anyhow::Result;
use clap::{Parser, Subcommand};
use folio::build::{check, watch_build};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(version, long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_INFO"), ")"))]
#[command(about = "Build a merged RSS feed for a personal blog and portfolio site.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the feed of a folio site.
    #[command(arg_required_else_help = true)]
    Build {
        /// The source directory of the folio site.
        source: String,
        /// The destination directory. Default dest dir is `build`.
        dest: Option<String>,
        /// Enable watching.
        #[arg(short, long)]
        watch: bool,
        /// Override the site url of `folio.toml`.
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Check that every content record makes it into the feed.
    #[command(arg_required_else_help = true)]
    Check {
        /// The source directory of the folio site.
        source: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match Cli::parse().command {
        Commands::Build {
            source,
            dest,
            watch,
            base_url,
        } => {
            let dest = dest.unwrap_or_else(|| "build".into());
            watch_build(source, dest, watch, base_url)?;
        }
        Commands::Check { source } => {
            let feed = check(source)?;
            if feed.skipped.is_empty() {
                println!("All {} records are in the feed.", feed.items.len());
            } else {
                println!("\nThe following records are left out of the feed:");
                feed.skipped.iter().for_each(|err| println!("- {err}"));
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
