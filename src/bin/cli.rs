// Bookshelf - Book search and favorites core
// Copyright (C) 2025 Bookshelf contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


use anyhow::{bail, Context, Result};
use bookshelf_core::api::{CatalogConfig, GoogleBooksClient};
use bookshelf_core::library::{
    Book, Category, CategoryStrategy, ColorTheme, DisplayMode, FeaturedSource, LibraryConfig,
    LibraryController, Page, SearchOutcome,
};
use bookshelf_core::storage::{Database, SqliteStore};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "bookshelf-cli")]
#[command(about = "Bookshelf CLI - search books and manage favorites", long_about = None)]
struct Cli {
    /// Preferences database (defaults to the platform data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Category handling with an empty term: static | query
    #[arg(long, global = true, default_value = "static")]
    strategy: CategoryStrategy,

    /// Featured list source: builtin | catalog
    #[arg(long, global = true, default_value = "builtin")]
    featured: FeaturedSource,

    /// Catalog endpoint override
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Search {
        /// Search terms
        term: Vec<String>,
        /// Category id or label (all, fiction, nonfiction, scifi, mystery, history)
        #[arg(short, long, default_value = "all")]
        category: Category,
    },
    /// Show the featured list, optionally narrowed to a category
    Featured {
        #[arg(short, long, default_value = "all")]
        category: Category,
    },
    /// List categories
    Categories,
    /// List favorites
    Favorites,
    /// Toggle the favorite status of a search result
    Favorite {
        /// Search terms used to find the book
        term: Vec<String>,
        /// 1-based position in the results
        #[arg(short, long, default_value_t = 1)]
        pick: usize,
    },
    /// Remove a favorite by book id
    Unfavorite { id: String },
    /// Show or change the display mode (light, dark, toggle)
    Mode { value: Option<String> },
    /// Show or change the color theme
    Theme { value: Option<ColorTheme> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let db_path = cli.db.clone().unwrap_or_else(Database::get_default_path);
    let db = Database::new(&db_path)
        .await
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

    let mut catalog_config = CatalogConfig::builder();
    if let Some(ref endpoint) = cli.endpoint {
        catalog_config = catalog_config.base_url(endpoint.clone());
    }
    let catalog = GoogleBooksClient::with_config(catalog_config.build()?)
        .context("Failed to build catalog client")?;

    let config = LibraryConfig::builder()
        .category_strategy(cli.strategy)
        .featured_source(cli.featured)
        .build();
    let controller = LibraryController::new(Arc::new(catalog), Arc::new(SqliteStore::new(&db)), config);
    controller.initialize().await;

    match cli.command {
        Commands::Search { term, category } => {
            let outcome = search(&controller, &term.join(" "), category).await;
            report(&controller, outcome).await?;
        }
        Commands::Featured { category } => {
            let outcome = controller.select_category(category).await;
            report(&controller, outcome).await?;
        }
        Commands::Categories => {
            for category in Category::ALL {
                println!("{:<12} {}", category.id(), category.label());
            }
        }
        Commands::Favorites => {
            let favorites = controller.visible_books(Page::Favorites).await;
            if favorites.is_empty() {
                println!("No favorites yet.");
            }
            print_books(&favorites);
        }
        Commands::Favorite { term, pick } => {
            let outcome = search(&controller, &term.join(" "), Category::All).await;
            report_failure(&controller, outcome).await?;

            let books = controller.displayed_books().await;
            let Some(book) = pick.checked_sub(1).and_then(|i| books.get(i)) else {
                bail!("No result at position {} ({} results)", pick, books.len());
            };
            if controller.toggle_favorite(book).await {
                println!("★ Added \"{}\" to favorites", book.title);
            } else {
                println!("☆ Removed \"{}\" from favorites", book.title);
            }
        }
        Commands::Unfavorite { id } => {
            if controller.remove_favorite(&id).await {
                println!("Removed {}", id);
            } else {
                bail!("{} is not a favorite", id);
            }
        }
        Commands::Mode { value } => {
            let mode = match value.as_deref() {
                None => controller.snapshot().await.display_mode,
                Some("toggle") => controller.toggle_display_mode().await,
                Some(other) => {
                    let mode: DisplayMode = other.parse()?;
                    controller.set_display_mode(mode).await;
                    mode
                }
            };
            println!("Display mode: {}", if mode.is_dark() { "dark" } else { "light" });
        }
        Commands::Theme { value } => {
            let theme = match value {
                Some(theme) => {
                    controller.set_color_theme(theme).await;
                    theme
                }
                None => controller.snapshot().await.color_theme,
            };
            println!("Color theme: {}", theme.display_name());
        }
    }

    db.close().await;
    Ok(())
}

async fn search(controller: &LibraryController, term: &str, category: Category) -> SearchOutcome {
    controller.set_search_term(term).await;
    if category.is_default() {
        controller.submit_search().await
    } else {
        controller.select_category(category).await
    }
}

async fn report_failure(controller: &LibraryController, outcome: SearchOutcome) -> Result<()> {
    if let SearchOutcome::Failed(kind) = outcome {
        let detail = controller
            .last_error()
            .await
            .map(|e| format!("{} ({})", e.message, e.detail))
            .unwrap_or_default();
        bail!("{} failure: {}", kind, detail);
    }
    Ok(())
}

async fn report(controller: &LibraryController, outcome: SearchOutcome) -> Result<()> {
    report_failure(controller, outcome).await?;

    let state = controller.snapshot().await;
    println!("{}", state.results_heading());
    if let Some(message) = state.empty_state_message() {
        println!("{}", message);
    }
    print_books(&state.displayed_books);
    Ok(())
}

fn print_books(books: &[Book]) {
    for (i, book) in books.iter().enumerate() {
        let rating = book
            .display_rating()
            .map(|r| format!(" ★{:.1}", r))
            .unwrap_or_default();
        println!(
            "{:>3}. {} - {} ({}){}",
            i + 1,
            book.title,
            book.authors_display(),
            book.published_year,
            rating
        );
        println!("     [{}] {} | {}", book.id, book.primary_category(), book.excerpt(100));
    }
}
