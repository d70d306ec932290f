//! FeedSync CLI
//!
//! Terminal client for a FeedSync feed server.
//!
//! # Commands
//!
//! - `status` - Show or set your status
//! - `list` - Show one page of posts
//! - `new` - Create a post
//! - `edit` - Edit one of your posts
//! - `delete` - Delete one of your posts
//! - `browse` - Interactive browser

mod client;
mod commands;

use clap::{Parser, Subcommand};
use client::ReqwestClient;
use commands::feed::{self, PostFields};
use commands::render::OutputFormat;
use feedsync_engine::{FeedConfig, FeedSynchronizer, HttpTransport, PostId};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// FeedSync command-line feed client.
#[derive(Parser)]
#[command(name = "feedsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Feed server base URL
    #[arg(
        global = true,
        short,
        long,
        env = "FEEDSYNC_ENDPOINT",
        default_value = "http://localhost:8080"
    )]
    endpoint: String,

    /// Bearer token sent with every request
    #[arg(global = true, short, long, env = "FEEDSYNC_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(global = true, long, default_value = "30")]
    timeout: u64,

    /// Output format
    #[arg(global = true, short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show your status, or set it
    Status {
        /// New status text
        #[arg(short, long)]
        set: Option<String>,
    },

    /// Show one page of posts
    List {
        /// Page number
        #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
        page: i64,
    },

    /// Create a post
    New {
        /// Post title
        #[arg(long)]
        title: String,

        /// Post content
        #[arg(long)]
        content: String,

        /// Image file to attach
        #[arg(short, long)]
        image: Option<PathBuf>,
    },

    /// Edit a post
    Edit {
        /// Post id
        id: String,

        /// Page the post is on
        #[arg(short, long, default_value = "1")]
        page: i64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New content
        #[arg(long)]
        content: Option<String>,

        /// Replacement image file
        #[arg(short, long)]
        image: Option<PathBuf>,
    },

    /// Delete a post
    Delete {
        /// Post id
        id: String,

        /// Page to show afterwards
        #[arg(short, long, default_value = "1")]
        page: i64,
    },

    /// Browse the feed interactively
    Browse,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut config =
        FeedConfig::new(cli.endpoint).with_timeout(Duration::from_secs(cli.timeout));
    if let Some(token) = cli.token {
        config = config.with_token(token);
    }
    let client = ReqwestClient::new(config.timeout)?;
    let api = HttpTransport::new(config, client);

    let format = cli.format;
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Status { set } => feed::status(api, set, format, &mut out)?,
        Commands::List { page } => feed::list(api, page, format, &mut out)?,
        Commands::New {
            title,
            content,
            image,
        } => {
            let fields = PostFields {
                title: Some(title),
                content: Some(content),
                image: image.as_deref().map(commands::load_image).transpose()?,
            };
            feed::create(api, fields, format, &mut out)?;
        }
        Commands::Edit {
            id,
            page,
            title,
            content,
            image,
        } => {
            let fields = PostFields {
                title,
                content,
                image: image.as_deref().map(commands::load_image).transpose()?,
            };
            feed::edit(api, page, &PostId::new(id), fields, format, &mut out)?;
        }
        Commands::Delete { id, page } => {
            feed::delete(api, page, &PostId::new(id), format, &mut out)?;
        }
        Commands::Browse => {
            let mut sync = FeedSynchronizer::new(api);
            commands::browse::run(&mut sync, io::stdin().lock(), &mut out, format)?;
        }
    }

    Ok(())
}
