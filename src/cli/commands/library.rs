//! Local library commands: adding, editing, listing, import/export and statistics.

use chrono::Datelike;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::catalog::OpenLibraryClient;
use crate::config::Config;
use crate::enrichment::{EnrichmentConfig, EnrichmentService};
use crate::error::{Error, ResultExt};
use crate::library::stats::{self, MonthlyCount, ReadDate, Statistics};
use crate::library::{BookStore, StoreError, import};
use crate::model::{LocalBook, StoredBook};

use super::{open_store, print_book, print_json};

/// Shelf for books added without one
const DEFAULT_SHELF: &str = "read";

/// Book fields that `add` and `edit` accept
#[derive(Args, Debug, Clone, Default)]
pub struct BookFields {
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub isbn: Option<String>,
    #[arg(long)]
    pub publisher: Option<String>,
    #[arg(long)]
    pub pages: Option<u32>,
    /// read, to-read, currently-reading, ...
    #[arg(long)]
    pub shelf: Option<String>,
    /// YYYY, YYYY/MM or YYYY/MM/DD
    #[arg(long)]
    pub date_read: Option<String>,
    #[arg(long)]
    pub date_added: Option<String>,
    /// 1-5 stars
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub rating: Option<u8>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl BookFields {
    /// Copy every given field onto `book`. An empty string clears the field.
    fn apply(&self, book: &mut LocalBook) {
        let text = |value: &String| Some(value.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(author) = &self.author {
            book.author = text(author);
        }
        if let Some(isbn) = &self.isbn {
            book.isbn = text(isbn);
        }
        if let Some(publisher) = &self.publisher {
            book.publisher = text(publisher);
        }
        if let Some(pages) = self.pages {
            book.pages = Some(pages).filter(|&p| p > 0);
        }
        if let Some(shelf) = &self.shelf {
            book.shelf = text(shelf);
        }
        if let Some(date) = &self.date_read {
            book.date_read = text(date);
        }
        if let Some(date) = &self.date_added {
            book.date_added = text(date);
        }
        if let Some(rating) = self.rating {
            book.rating = Some(rating);
        }
        if let Some(notes) = &self.notes {
            book.notes = text(notes);
        }
    }
}

/// Add a book, optionally enriching it from the catalog first
pub fn cmd_add(
    rt: &Runtime,
    config: &Config,
    title: &str,
    fields: &BookFields,
    enrich: bool,
) -> anyhow::Result<()> {
    let book = new_book(title, fields)?;

    rt.block_on(async {
        let book = if enrich {
            let service = EnrichmentService::with_config(
                OpenLibraryClient::new(&config.catalog)?,
                EnrichmentConfig {
                    search_limit: config.catalog.search_limit,
                    ..Default::default()
                },
            );
            let outcome = service.enrich_with_sources(book).await?;
            if !outcome.is_enriched() {
                println!("✗ Nothing found in the catalog; adding as entered");
            }
            outcome.book
        } else {
            book
        };

        let store = open_store(config).await?;
        let id = store.put(None, book.clone()).await?;
        println!("✓ Added book {}\n", id);
        print_book(&book);
        Ok::<_, anyhow::Error>(())
    })
}

/// Change fields of a stored book
pub fn cmd_edit(
    rt: &Runtime,
    config: &Config,
    id: i64,
    title: Option<&str>,
    fields: &BookFields,
) -> anyhow::Result<()> {
    rt.block_on(async {
        let store = open_store(config).await?;
        let book = edit_book(&store, id, title, fields).await?;
        println!("✓ Updated book {}\n", id);
        print_book(&book);
        Ok::<_, anyhow::Error>(())
    })
}

/// List books, optionally narrowed by year, month and shelf
pub fn cmd_list(
    rt: &Runtime,
    config: &Config,
    year: Option<i32>,
    month: Option<u32>,
    shelf: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    rt.block_on(async {
        let store = open_store(config).await?;
        let books = filtered_books(&store, year, month, shelf).await?;
        let total = store.count().await?;

        if json {
            return print_json(&books);
        }

        if books.is_empty() {
            println!("No books found.");
            return Ok(());
        }

        for stored in &books {
            let book = &stored.book;
            let authors = book.display_authors();
            let by = if authors.is_empty() {
                String::new()
            } else {
                format!(" by {}", authors)
            };
            let read = book
                .date_read
                .as_deref()
                .map(|d| format!(" [{}]", d))
                .unwrap_or_default();
            println!("{:>5}  {}{}{}", stored.id, book.title, by, read);
        }
        if books.len() == total {
            println!("\n{} book(s)", total);
        } else {
            println!("\n{} of {} book(s)", books.len(), total);
        }
        Ok::<_, anyhow::Error>(())
    })
}

/// Delete a book by id
pub fn cmd_remove(rt: &Runtime, config: &Config, id: i64) -> anyhow::Result<()> {
    rt.block_on(async {
        let store = open_store(config).await?;
        if store.remove(id).await? {
            println!("✓ Removed book {}", id);
        } else {
            println!("✗ No book with id {}", id);
        }
        Ok::<_, anyhow::Error>(())
    })
}

/// Replace the library with the books in a JSON file
pub fn cmd_import(rt: &Runtime, config: &Config, path: &PathBuf, enrich: bool) -> anyhow::Result<()> {
    let books = import::load_books(path, &config.catalog.covers_url).with_context(format!("reading {:?}", path))?;
    println!("Read {} book(s) from {:?}", books.len(), path);

    rt.block_on(async {
        let books = if enrich {
            let service = EnrichmentService::with_config(
                OpenLibraryClient::new(&config.catalog)?,
                EnrichmentConfig {
                    search_limit: config.catalog.search_limit,
                    ..Default::default()
                },
            );
            println!("Enriching from the catalog...");
            enrich_all(&service, books).await
        } else {
            books
        };

        let store = open_store(config).await?;
        let count = store.replace_all(books).await?;
        println!("✓ Imported {} book(s)", count);
        Ok::<_, anyhow::Error>(())
    })
}

/// Write every book to a JSON file
pub fn cmd_export(rt: &Runtime, config: &Config, path: &PathBuf) -> anyhow::Result<()> {
    rt.block_on(async {
        let store = open_store(config).await?;
        let books: Vec<LocalBook> = store.all().await?.into_iter().map(|s| s.book).collect();
        import::save_books(path, &books)?;
        println!("✓ Exported {} book(s) to {:?}", books.len(), path);
        Ok::<_, anyhow::Error>(())
    })
}

/// Show statistics for a year, optionally setting its goal first
pub fn cmd_stats(
    rt: &Runtime,
    config: &Config,
    year: Option<i32>,
    goal: Option<u32>,
    json: bool,
) -> anyhow::Result<()> {
    rt.block_on(async {
        let store = open_store(config).await?;
        let report = stats_report(&store, year, goal).await?;

        if json {
            return print_json(&report);
        }

        let s = &report.statistics;
        println!("Reading statistics for {}\n", s.year);
        println!("  Books read:      {}", s.total_books);
        println!("  Pages read:      {}", s.total_pages);
        println!("  Books per month: {:.1}", s.average_per_month);
        if let (Some(target), Some(progress)) = (report.goal, report.goal_progress) {
            let mark = if progress >= 100.0 { "✓" } else { " " };
            println!(
                "{} Goal:            {}/{} ({:.0}%)",
                mark, s.total_books, target, progress
            );
        }

        println!();
        for month in &report.monthly {
            println!(
                "  {:<10} {:>3} {}",
                month.month_name,
                month.count,
                "#".repeat(month.count)
            );
        }

        if report.years.len() > 1 {
            let years: Vec<String> = report.years.iter().map(i32::to_string).collect();
            println!("\nYears with reads: {}", years.join(", "));
        }
        Ok::<_, anyhow::Error>(())
    })
}

/// Everything the stats command shows
#[derive(Debug, Serialize)]
struct StatsReport {
    statistics: Statistics,
    monthly: Vec<MonthlyCount>,
    goal: Option<u32>,
    goal_progress: Option<f64>,
    /// Years with reads, newest first
    years: Vec<i32>,
}

/// A new book from command-line input; shelf defaults to "read".
fn new_book(title: &str, fields: &BookFields) -> Result<LocalBook, Error> {
    let mut book = LocalBook::new(title.trim());
    fields.apply(&mut book);
    if book.shelf.is_none() {
        book.shelf = Some(DEFAULT_SHELF.to_string());
    }
    validate(&book)?;
    Ok(book)
}

/// Apply edits to a stored book and write it back.
async fn edit_book(
    store: &dyn BookStore,
    id: i64,
    title: Option<&str>,
    fields: &BookFields,
) -> Result<LocalBook, Error> {
    let mut book = store
        .get(id)
        .await?
        .ok_or(StoreError::NotFound(id))?
        .book;

    if let Some(title) = title {
        book.title = title.trim().to_string();
    }
    fields.apply(&mut book);
    validate(&book)?;

    store.put(Some(id), book.clone()).await?;
    Ok(book)
}

fn validate(book: &LocalBook) -> Result<(), Error> {
    if book.title.trim().is_empty() {
        return Err(Error::invalid_input("title is required"));
    }
    if let Some(date) = &book.date_read {
        ReadDate::parse(date)
            .map_err(|e| Error::invalid_input(format!("date read {:?}: {}", date, e)))?;
    }
    Ok(())
}

async fn filtered_books(
    store: &dyn BookStore,
    year: Option<i32>,
    month: Option<u32>,
    shelf: Option<&str>,
) -> Result<Vec<StoredBook>, StoreError> {
    let mut books = store.all().await?;
    if let Some(year) = year {
        books = stats::filter_by_year(&books, year);
    }
    if let Some(month) = month {
        books = stats::filter_by_month(&books, month);
    }
    if let Some(shelf) = shelf {
        books = stats::filter_by_shelf(&books, shelf);
    }
    Ok(books)
}

async fn stats_report(
    store: &dyn BookStore,
    year: Option<i32>,
    new_goal: Option<u32>,
) -> Result<StatsReport, StoreError> {
    let books = store.all().await?;
    let years = stats::available_years(&books);
    let year = year
        .or_else(|| years.first().copied())
        .unwrap_or_else(|| chrono::Local::now().year());

    if let Some(target) = new_goal {
        store.set_goal(year, target).await?;
        tracing::info!(year, target, "Reading goal set");
    }

    let read = stats::filter_by_year(&books, year);
    let goal = store.goal(year).await?;

    Ok(StatsReport {
        statistics: stats::calculate_statistics(&read, year),
        monthly: stats::monthly_breakdown(&read),
        goal,
        goal_progress: goal.map(|target| stats::goal_progress(read.len(), target)),
        years,
    })
}

/// Enrich a batch, keeping the original of any book the engine rejects.
async fn enrich_all<C: crate::catalog::CatalogApi>(
    service: &EnrichmentService<C>,
    books: Vec<LocalBook>,
) -> Vec<LocalBook> {
    let results = service.enrich_many(books.clone()).await;

    let mut enriched_count = 0;
    let books: Vec<LocalBook> = books
        .into_iter()
        .zip(results)
        .map(|(original, result)| match result {
            Ok(outcome) => {
                if outcome.is_enriched() {
                    enriched_count += 1;
                }
                outcome.book
            }
            Err(e) => {
                tracing::warn!("Skipping enrichment of '{}': {}", original.title, e);
                original
            }
        })
        .collect();

    println!("✓ Enriched {}/{} book(s)", enriched_count, books.len());
    books
}
