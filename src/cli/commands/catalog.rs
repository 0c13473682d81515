//! Open Library search, lookup and enrichment commands.

use tokio::runtime::Runtime;

use crate::catalog::{self, CoverKey, CoverSize, IdType, OpenLibraryClient};
use crate::config::Config;
use crate::enrichment::{EnrichmentConfig, EnrichmentService, EnrichmentSource};
use crate::error::Error;
use crate::library::BookStore;
use crate::model::LocalBook;

use super::{open_store, print_book, print_json, print_status};

/// Search works by title
pub fn cmd_search(
    rt: &Runtime,
    config: &Config,
    title: &str,
    limit: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let client = OpenLibraryClient::new(&config.catalog)?;
    let limit = limit.unwrap_or(config.catalog.search_limit);
    let results = rt.block_on(client.search_by_title(title, limit))?;

    if json {
        return print_json(&results);
    }

    if results.is_empty() {
        println!("✗ No books found for \"{}\"", title);
        return Ok(());
    }

    println!("Found {} result(s) for \"{}\":\n", results.len(), title);
    for (i, book) in results.iter().enumerate() {
        let year = book
            .first_publish_year
            .map(|y| format!(" ({})", y))
            .unwrap_or_default();
        println!("{:>2}. {}{}", i + 1, book.title, year);
        if !book.authors.is_empty() {
            println!("    by {}", book.authors.join(", "));
        }
        println!("    {} · {} edition(s)", book.work_key, book.edition_count);
        if let Some(isbn) = book.isbns.first() {
            println!("    ISBN {}", isbn);
        }
    }
    Ok(())
}

/// Search authors by name
pub fn cmd_authors(rt: &Runtime, config: &Config, name: &str, json: bool) -> anyhow::Result<()> {
    let client = OpenLibraryClient::new(&config.catalog)?;
    let results = rt.block_on(client.search_authors_by_name(name))?;

    if json {
        return print_json(&results);
    }

    if results.is_empty() {
        println!("✗ No authors found for \"{}\"", name);
        return Ok(());
    }

    for author in &results {
        let lifespan = match (&author.birth_date, &author.death_date) {
            (Some(born), Some(died)) => format!(" ({} - {})", born, died),
            (Some(born), None) => format!(" (b. {})", born),
            _ => String::new(),
        };
        println!("{}  {}{}", author.key, author.name, lifespan);
        if let Some(work) = &author.top_work {
            println!("    {} work(s), best known for {}", author.work_count, work);
        }
    }
    Ok(())
}

/// Look up one edition by identifier
pub fn cmd_lookup(
    rt: &Runtime,
    config: &Config,
    id_type: IdType,
    value: &str,
    json: bool,
) -> anyhow::Result<()> {
    let client = OpenLibraryClient::new(&config.catalog)?;

    match rt.block_on(client.get_book_by_identifier(id_type, value))? {
        Some(detail) if json => print_json(&detail),
        Some(detail) => {
            println!("✓ {}:{}\n", id_type, value);
            println!("  Title:      {}", detail.title.as_deref().unwrap_or("(untitled)"));
            if !detail.authors.is_empty() {
                println!("  Authors:    {}", detail.authors.join(", "));
            }
            if !detail.publishers.is_empty() {
                println!("  Publishers: {}", detail.publishers.join(", "));
            }
            if let Some(date) = &detail.publish_date {
                println!("  Published:  {}", date);
            }
            if let Some(pages) = detail.number_of_pages {
                println!("  Pages:      {}", pages);
            }
            if let Some(url) = &detail.info_url {
                println!("  More:       {}", url);
            }
            Ok(())
        }
        None => {
            println!("✗ No edition found for {}:{}", id_type, value);
            Ok(())
        }
    }
}

/// Show an author record
pub fn cmd_author(rt: &Runtime, config: &Config, key: &str, json: bool) -> anyhow::Result<()> {
    let key = checked_author_key(key)?;
    let client = OpenLibraryClient::new(&config.catalog)?;

    let Some(author) = rt.block_on(client.get_author_detail(key))? else {
        println!("✗ No author found with key {}", key);
        return Ok(());
    };

    if json {
        return print_json(&author);
    }

    println!("{}", author.name.as_deref().unwrap_or(key));
    if let Some(born) = &author.birth_date {
        println!("  Born: {}", born);
    }
    if let Some(died) = &author.death_date {
        println!("  Died: {}", died);
    }
    if !author.alternate_names.is_empty() {
        println!("  Also known as: {}", author.alternate_names.join(", "));
    }
    if let Some(bio) = &author.bio {
        println!("\n{}\n", bio);
    }
    if !author.photos.is_empty() {
        println!("  Photo: {}", client.author_photo_url(key));
    }
    for link in &author.links {
        println!("  {}: {}", link.title.as_deref().unwrap_or("Link"), link.url);
    }
    Ok(())
}

/// Print a cover image URL (no request is made)
pub fn cmd_cover(config: &Config, key: CoverKey, value: &str, size: CoverSize) -> anyhow::Result<()> {
    let client = OpenLibraryClient::new(&config.catalog)?;
    println!("{}", client.cover_image_url(key, value.trim(), size));
    Ok(())
}

/// Print an author photo URL (no request is made)
pub fn cmd_photo(config: &Config, key: &str) -> anyhow::Result<()> {
    let key = checked_author_key(key)?;
    println!(
        "{}",
        catalog::covers::author_photo_url(&config.catalog.covers_url, key)
    );
    Ok(())
}

/// Enrich a book from the catalog, optionally saving it
pub fn cmd_enrich(
    rt: &Runtime,
    config: &Config,
    book: LocalBook,
    save: bool,
    json: bool,
) -> anyhow::Result<()> {
    let service = EnrichmentService::with_config(
        OpenLibraryClient::new(&config.catalog)?,
        EnrichmentConfig {
            search_limit: config.catalog.search_limit,
            ..Default::default()
        },
    );

    rt.block_on(async {
        let outcome = service.enrich_with_sources(book).await?;

        if json {
            print_json(&outcome.book)?;
        } else {
            if outcome.is_enriched() {
                let steps: Vec<&str> = outcome
                    .sources
                    .iter()
                    .map(|s| match s {
                        EnrichmentSource::TitleSearch => "title search",
                        EnrichmentSource::IdentifierLookup => "ISBN lookup",
                    })
                    .collect();
                println!("✓ Enriched from {}\n", steps.join(" + "));
            } else {
                println!("✗ Nothing found in the catalog; book unchanged\n");
            }
            print_book(&outcome.book);
        }

        if save {
            let store = open_store(config).await?;
            let id = store.put(None, outcome.book).await?;
            print_status(json, &format!("\n✓ Saved to library (id {})", id))?;
        }
        Ok::<_, anyhow::Error>(())
    })
}

fn checked_author_key(key: &str) -> anyhow::Result<&str> {
    let key = key.trim();
    if catalog::is_valid_author_key(key) {
        Ok(key)
    } else {
        Err(Error::invalid_input(format!(
            "'{}' is not an author key (expected something like OL23919A)",
            key
        ))
        .into())
    }
}
