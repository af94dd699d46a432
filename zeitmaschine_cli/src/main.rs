use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use zeitmaschine_cli::auth::{self, DEFAULT_TOKEN_TTL_SECONDS, SessionStore};
use zeitmaschine_cli::config::{AppConfig, ConfigManager, get_config};
use zeitmaschine_cli::output::{self, OutputFormat};
use zeitmaschine_cli::terminal;
use zeitmaschine_core::{
    DEFAULT_RENDITION, Gallery, HttpGallery, ImageCache, ImageService, SqliteImageCache, cache_key,
};

#[derive(Parser)]
#[command(name = "zm")]
#[command(author, version, about = "zeitmaschine - browse and fetch photos from the gallery", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List image metadata, newest first
    List {
        /// Index of the first image to list
        #[arg(short, long, default_value_t = 0)]
        offset: usize,

        /// Keep loading pages until the gallery is exhausted
        #[arg(short, long, conflicts_with = "offset")]
        all: bool,

        /// Output format (defaults to text on a terminal, json otherwise)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Fetch one rendition of an image
    Fetch {
        /// Image name as listed by `zm list`
        name: String,

        /// Rendition to fetch
        #[arg(short, long, default_value = DEFAULT_RENDITION)]
        rendition: String,

        /// Write the image to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Inspect and maintain the local image cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Manage the login session
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum CacheCommand {
    /// Show number of cached images and their size
    Stats,

    /// Remove every cached image
    Clear,

    /// Remove one cached rendition
    Remove {
        name: String,

        #[arg(short, long, default_value = DEFAULT_RENDITION)]
        rendition: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Get a configuration value
    Get {
        /// Configuration key (e.g., gallery.endpoint)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., gallery.endpoint)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration values
    List,

    /// Print the configuration file location
    Path,
}

#[derive(Subcommand)]
enum AuthCommand {
    /// Store the ID token issued by the identity provider
    Login {
        /// ID token
        #[arg(short, long)]
        token: String,

        /// Token lifetime in seconds
        #[arg(short, long, default_value_t = DEFAULT_TOKEN_TTL_SECONDS)]
        expires_in: i64,
    },

    /// Forget the stored session
    Logout,

    /// Show authentication status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("zeitmaschine_core", log::LevelFilter::Debug)
            .filter_module("zeitmaschine_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match cli.command {
        Commands::List {
            offset,
            all,
            format,
        } => {
            let config = get_config()?;
            list_command(&config, offset, all, format).await?;
        }
        Commands::Fetch {
            name,
            rendition,
            output,
        } => {
            let config = get_config()?;
            fetch_command(&config, &name, &rendition, output).await?;
        }
        Commands::Cache { command } => {
            let config = get_config()?;
            cache_command(&config, command).await?;
        }
        Commands::Config { command } => {
            config_command(command)?;
        }
        Commands::Auth { command } => {
            auth_command(command)?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Build the image service, honoring the session guard and cache settings
async fn build_service(config: &AppConfig) -> Result<ImageService> {
    let token = auth::require_session(config, &SessionStore::new())?;

    let mut gallery =
        HttpGallery::new(&config.gallery).context("Invalid gallery configuration")?;
    if let Some(token) = token {
        gallery = gallery.with_bearer_token(token);
    }

    let cache_path = config.cache.database_path();
    log::debug!("Cache database: {cache_path:?}");

    let service = ImageService::connect_with(
        Arc::new(gallery),
        config.gallery.page_size,
        cache_path.as_deref(),
    )
    .await?;

    Ok(service)
}

async fn list_command(
    config: &AppConfig,
    offset: usize,
    all: bool,
    format: Option<OutputFormat>,
) -> Result<()> {
    let service = build_service(config).await?;

    let images = if all {
        let mut gallery = Gallery::new(Arc::new(service));
        gallery.load_all().await.context("Failed to load images")?;
        gallery.into_images()
    } else {
        service
            .get_images(offset)
            .await
            .context("Failed to load images")?
    };

    let format = format.unwrap_or(if terminal::is_interactive() {
        OutputFormat::Text
    } else {
        OutputFormat::Json
    });

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    output::write_images(&mut out, &images, if all { 0 } else { offset }, format)
}

async fn fetch_command(
    config: &AppConfig,
    name: &str,
    rendition: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    if output.is_none() && terminal::is_interactive() {
        anyhow::bail!("Refusing to write image data to a terminal, use --output <FILE>");
    }

    let service = build_service(config).await?;
    let blob = service
        .get_image(name, rendition)
        .await
        .with_context(|| format!("Failed to fetch {rendition} of '{name}'"))?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, &blob)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} {} ({})",
                "✓ Saved".green(),
                path.display(),
                output::format_bytes(blob.len() as u64)
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&blob)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

async fn cache_command(config: &AppConfig, command: CacheCommand) -> Result<()> {
    let Some(path) = config.cache.database_path() else {
        anyhow::bail!("Image cache is disabled (cache.enabled = false)");
    };

    let cache = SqliteImageCache::open(&path)
        .await
        .with_context(|| format!("Failed to open image cache at {}", path.display()))?;

    match command {
        CacheCommand::Stats => {
            let stats = cache.stats().await?;
            println!("{}", "Image Cache".bold());
            println!("  Location: {}", cache.path().display());
            println!("  Entries:  {}", stats.entry_count);
            println!("  Size:     {}", output::format_bytes(stats.total_bytes));
        }
        CacheCommand::Clear => {
            let removed = cache.clear().await?;
            println!("{} Removed {removed} cached images", "✓".green());
        }
        CacheCommand::Remove { name, rendition } => {
            let key = cache_key(&name, &rendition);
            if cache.remove(&key).await? {
                println!("{} Removed '{key}'", "✓".green());
            } else {
                println!("'{key}' is not cached");
            }
        }
    }

    cache.close().await;
    Ok(())
}

fn config_command(command: ConfigCommand) -> Result<()> {
    let mut config_manager = ConfigManager::new();

    match command {
        ConfigCommand::Init { force } => {
            config_manager.init(force)?;
            println!(
                "{} Wrote {}",
                "✓".green(),
                config_manager.get_config_path().display()
            );
            println!("Set the gallery endpoints next:");
            println!("  zm config set gallery.endpoint <SEARCH_URL>");
            println!("  zm config set gallery.base_url <IMAGE_BASE_URL>");
        }
        ConfigCommand::Get { key } => {
            let value = config_manager.get(&key)?;
            println!("{value}");
        }
        ConfigCommand::Set { key, value } => {
            config_manager.set(&key, &value)?;
            println!("{} Set {key} = {value}", "✓".green());
        }
        ConfigCommand::List => {
            for (key, value) in config_manager.list()? {
                println!("{} = {}", key.cyan(), value);
            }
        }
        ConfigCommand::Path => {
            println!("{}", config_manager.get_config_path().display());
        }
    }

    Ok(())
}

fn auth_command(command: AuthCommand) -> Result<()> {
    let store = SessionStore::new();

    match command {
        AuthCommand::Login { token, expires_in } => {
            let session = auth::login(&store, &token, expires_in)?;
            println!(
                "{} Logged in until {}",
                "✓".green(),
                session.token_expiry.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
        AuthCommand::Logout => {
            if auth::logout(&store)? {
                println!("{} Logged out", "✓".green());
            } else {
                println!("No active session");
            }
        }
        AuthCommand::Status => {
            auth::status(&store)?;
        }
    }

    Ok(())
}
