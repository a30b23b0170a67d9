//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Content engine for a personal portfolio site", long_about = None)]
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
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new entry
    New {
        /// Content category (project, blog, article, ...)
        category: String,

        /// Title of the new entry
        title: String,

        /// File name to use instead of one derived from the title
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// List entries, tags or photos
    #[command(alias = "ls")]
    List {
        /// Category to list, or `tags` / `gallery`; all categories when omitted
        category: Option<String>,
    },

    /// Show a single entry
    Show {
        category: String,
        slug: String,

        /// Print the full record as JSON instead of the HTML body
        #[arg(long)]
        json: bool,
    },

    /// Render a markdown file to HTML
    Render {
        file: PathBuf,

        /// Print front-matter and HTML as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build the public directory
    #[command(alias = "b")]
    Build {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Serve the feed API and the public directory
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Rebuild when content changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
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
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            folio::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New {
            category,
            title,
            slug,
        } => {
            let site = folio::Folio::new(&base_dir)?;
            let path = folio::commands::new::create_entry(&site, &category, &title, slug.as_deref())?;
            println!("Created: {:?}", path);
        }

        Commands::List { category } => {
            let site = folio::Folio::new(&base_dir)?;
            folio::commands::list::run(&site, category.as_deref())?;
        }

        Commands::Show {
            category,
            slug,
            json,
        } => {
            let site = folio::Folio::new(&base_dir)?;
            folio::commands::show::run(&site, &category, &slug, json)?;
        }

        Commands::Render { file, json } => {
            let site = folio::Folio::new(&base_dir)?;
            let file = if file.is_absolute() {
                file
            } else {
                base_dir.join(file)
            };
            folio::commands::render::run(&file, site.config.words_per_minute, json)?;
        }

        Commands::Build { watch } => {
            let site = folio::Folio::new(&base_dir)?;
            tracing::info!("Building {:?}...", site.public_dir);
            site.build()?;
            println!("Built successfully!");

            if watch {
                tokio::task::spawn_blocking(move || folio::commands::build::watch(&site))
                    .await??;
            }
        }

        Commands::Serve { port, ip, watch } => {
            let site = folio::Folio::new(&base_dir)?;

            // Build first so the static fallback has something to serve
            tracing::info!("Building {:?}...", site.public_dir);
            site.build()?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio::server::start(&site, &ip, port, watch).await?;
        }

        Commands::Clean => {
            let site = folio::Folio::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
