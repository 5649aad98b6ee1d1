use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use pokedex::cache::LocalCache;
use pokedex::catalog::{normalize_name, ItemRef, RemoteCatalogClient};
use pokedex::config::Config;
use pokedex::favorites::{filter_by_query, resolve_favorites, FavoritesStore};
use pokedex::filter::{TypeFilter, TypeFilterCoordinator};
use pokedex::loader::{LoadOutcome, LoaderSnapshot, PaginatedListLoader};
use pokedex::logging::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "pokedex", version, about = "Browse the Pokédex from the terminal")]
struct Cli {
    /// Config file (defaults to the platform config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the API base URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List entries page by page.
    List {
        /// Only show members of this type.
        #[arg(long = "type")]
        type_name: Option<String>,
        /// Number of pages to load.
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        pages: u64,
        /// Reload from the first page instead of continuing.
        #[arg(long)]
        refresh: bool,
    },
    /// Show one entry by name or id.
    Detail { target: String },
    /// List browsable types.
    Types,
    /// Manage favorites.
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },
}

#[derive(Debug, Subcommand)]
enum FavoritesAction {
    /// Show favorites.
    List {
        /// Case-insensitive name filter.
        #[arg(long)]
        query: Option<String>,
    },
    Add {
        #[arg(value_parser = parse_favorite_name)]
        name: String,
    },
    Remove {
        #[arg(value_parser = parse_favorite_name)]
        name: String,
    },
    Toggle {
        #[arg(value_parser = parse_favorite_name)]
        name: String,
    },
}

/// Favorites are keyed by the upstream's lowercase names.
fn parse_favorite_name(raw: &str) -> Result<String, String> {
    let name = normalize_name(raw);
    if name.is_empty() {
        return Err("name must not be empty".to_string());
    }
    Ok(name)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
        config.validate()?;
    }

    let client = Arc::new(
        RemoteCatalogClient::new(&config.api).context("Failed to build catalog client")?,
    );
    let cache = LocalCache::new(config.cache.resolved_dir());

    match cli.command {
        Command::List {
            type_name,
            pages,
            refresh,
        } => {
            let loader = Arc::new(
                PaginatedListLoader::new(Arc::clone(&client), cache.clone())
                    .with_page_size(config.list.page_size),
            );
            let coordinator = TypeFilterCoordinator::new(Arc::clone(&loader));
            let favorites = FavoritesStore::open(cache).await;

            let mut outcome = match type_name {
                Some(name) => coordinator.select(TypeFilter::Type(name)).await,
                None if refresh => Some(loader.refresh().await),
                None => Some(loader.load_more().await),
            };
            for _ in 1..pages {
                if !matches!(outcome, Some(LoadOutcome::Loaded { exhausted: false, .. })) {
                    break;
                }
                outcome = Some(loader.load_more().await);
            }

            print_list(&client, &favorites, &loader.snapshot());
        }
        Command::Detail { target } => {
            let favorites = FavoritesStore::open(cache).await;
            let detail = client.detail(&ItemRef::parse(&target)).await?;

            let marker = if favorites.contains(&detail.name) { " ★" } else { "" };
            println!("#{} {}{}", detail.id, detail.name, marker);
            println!("types: {}", detail.types.join(", "));
            for stat in &detail.stats {
                println!("  {:<16} {:>4}", stat.name, stat.value);
            }
            println!("artwork: {}", client.artwork_url(detail.id));
        }
        Command::Types => {
            for name in client.type_names().await? {
                println!("{}", name);
            }
        }
        Command::Favorites { action } => {
            let favorites = FavoritesStore::open(cache).await;
            match action.unwrap_or(FavoritesAction::List { query: None }) {
                FavoritesAction::List { query } => {
                    let entries = resolve_favorites(client.as_ref(), &favorites.names()).await;
                    let entries = filter_by_query(&entries, query.as_deref().unwrap_or(""));
                    if entries.is_empty() {
                        println!("No favorites.");
                    }
                    for entry in entries {
                        println!("{:>5}  {}  {}", entry.id, entry.name, client.artwork_url(entry.id));
                    }
                }
                FavoritesAction::Add { name } => {
                    favorites.add(&name).await;
                    println!("{} added to favorites", name);
                }
                FavoritesAction::Remove { name } => {
                    if favorites.remove(&name).await {
                        println!("{} removed from favorites", name);
                    } else {
                        println!("{} was not a favorite", name);
                    }
                }
                FavoritesAction::Toggle { name } => {
                    if favorites.toggle(&name).await {
                        println!("{} added to favorites", name);
                    } else {
                        println!("{} removed from favorites", name);
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_list(client: &RemoteCatalogClient, favorites: &FavoritesStore, snapshot: &LoaderSnapshot) {
    for item in &snapshot.items {
        let marker = if favorites.contains(&item.name) { "★" } else { " " };
        match item.id() {
            Some(id) => println!("{:>5} {} {}  {}", id, marker, item.name, client.artwork_url(id)),
            None => println!("{:>5} {} {}", "?", marker, item.name),
        }
    }

    if let Some(error) = &snapshot.error {
        eprintln!(
            "Failed to load more ({}); showing {} cached/loaded entries",
            error.message,
            snapshot.items.len()
        );
    }
    if snapshot.has_more() {
        println!("-- more available (next offset {}) --", snapshot.cursor);
    }
}
