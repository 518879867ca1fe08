//! CLI entry point for devblog-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devblog_rs::content::PostQuery;

#[derive(Parser)]
#[command(name = "devblog-rs")]
#[command(version)]
#[command(about = "Content and newsletter backend for a personal tech blog", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
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
    /// List posts, newest first
    #[command(alias = "ls")]
    List {
        /// Only posts whose title or excerpt contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Only posts carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Show a single post
    Show {
        /// Post id, e.g. docker-basics
        id: String,

        /// Render the body as HTML
        #[arg(long)]
        html: bool,
    },

    /// List tags in use
    Tags,

    /// Subscribe an email address to the newsletter
    Subscribe {
        email: String,

        /// Send through this relay instead of calling the provider directly
        #[arg(short, long)]
        relay: Option<String>,
    },

    /// Check whether an email address is subscribed
    Status { email: String },

    /// Start the relay and content server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "devblog_rs=debug,info"
    } else {
        "devblog_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::List { search, tag } => {
            let site = devblog_rs::Site::new(&base_dir)?;
            devblog_rs::commands::list::run(&site, &PostQuery { search, tag }).await?;
        }

        Commands::Show { id, html } => {
            let site = devblog_rs::Site::new(&base_dir)?;
            devblog_rs::commands::show::run(&site, &id, html).await?;
        }

        Commands::Tags => {
            let site = devblog_rs::Site::new(&base_dir)?;
            devblog_rs::commands::tags::run(&site).await?;
        }

        Commands::Subscribe { email, relay } => {
            let site = devblog_rs::Site::new(&base_dir)?;
            devblog_rs::commands::subscribe::run(&site, &email, relay.as_deref()).await?;
        }

        Commands::Status { email } => {
            let site = devblog_rs::Site::new(&base_dir)?;
            devblog_rs::commands::subscribe::status(&site, &email).await?;
        }

        Commands::Server { port, ip } => {
            let site = devblog_rs::Site::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            devblog_rs::server::start(&site, &ip, port).await?;
        }

        Commands::Version => {
            println!("devblog-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
