//! pricehistory-proxy - pricehistory.app scraper and HTTP front

use anyhow::Result;
use clap::{Parser, Subcommand};
use pricehistory_proxy::commands::ProductCommand;
use pricehistory_proxy::config::{Config, OutputFormat};
use pricehistory_proxy::server;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pricehistory-proxy",
    version,
    about = "Scrape pricehistory.app product pages and serve them as JSON"
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format for one-shot commands
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true)]
    proxy: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to listen on
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Resolve a product URL into its slug
    #[command(alias = "r")]
    Resolve {
        /// Product URL
        url: String,
    },

    /// Look up a product by slug
    #[command(alias = "p")]
    Product {
        /// pricehistory.app slug
        slug: String,
    },

    /// Resolve a product URL and look up the product
    #[command(alias = "l")]
    Lookup {
        /// Product URL
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            server::run_server(&config).await?;
        }

        Commands::Resolve { url } => {
            let slug = ProductCommand::new(config).resolve(&url).await?;
            println!("{}", slug);
        }

        Commands::Product { slug } => {
            let output = ProductCommand::new(config).execute(&slug).await?;
            println!("{}", output);
        }

        Commands::Lookup { url } => {
            let output = ProductCommand::new(config).lookup(&url).await?;
            println!("{}", output);
        }
    }

    Ok(())
}
