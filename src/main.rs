//! CLI entry point for folio-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio-rs")]
#[command(version)]
#[command(about = "Markdown content backend for a portfolio blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the content index and write the durable cache
    #[command(alias = "i")]
    Index,

    /// Start the JSON API server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List site content
    List {
        /// Type of content to list (post, tag, slug)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Remove the durable cache
    Clean,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_rs=debug,info"
    } else {
        "folio_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let folio = folio_rs::Folio::new(&base_dir)?;

    match cli.command {
        Commands::Index => {
            folio_rs::commands::index::run(&folio)?;
        }

        Commands::Serve { port, ip } => {
            let service = folio.service();
            let stats = service.store().stats();
            tracing::info!(
                "serving {} posts from the {} cache",
                stats.total_posts,
                stats.tier
            );
            folio_rs::server::start(service, &ip, port).await?;
        }

        Commands::List { r#type } => {
            folio_rs::commands::list::run(&folio, &r#type)?;
        }

        Commands::Clean => {
            folio_rs::commands::clean::run(&folio)?;
            println!("Cleaned successfully!");
        }
    }

    Ok(())
}
