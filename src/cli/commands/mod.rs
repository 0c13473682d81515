//! CLI command definitions and dispatch.
//!
//! Each group of subcommands lives in its own submodule:
//! - `catalog`: Open Library search, lookups, cover URLs and enrichment
//! - `library`: The local collection (add/edit, list, import/export, statistics)
//! - `chat`: The reading assistant
//! - `settings`: Reading and writing the config file

mod catalog;
mod chat;
mod library;
mod settings;

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::catalog::{CoverKey, CoverSize, IdType};
use crate::config::{self, ChatProviderKind, Config};
use crate::db::SqliteBookStore;
use crate::model::LocalBook;

pub use catalog::{
    cmd_author, cmd_authors, cmd_cover, cmd_enrich, cmd_lookup, cmd_photo, cmd_search,
};
pub use chat::cmd_ask;
pub use library::{
    BookFields, cmd_add, cmd_edit, cmd_export, cmd_import, cmd_list, cmd_remove, cmd_stats,
};
pub use settings::{ConfigAction, cmd_config};

/// Reading Tracker CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: reading-tracker/config.toml in the OS config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Library database file (overrides the config)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Search the catalog by title
    Search {
        title: String,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Search the catalog for authors
    Authors {
        name: String,
        #[arg(long)]
        json: bool,
    },
    /// Look up one edition by identifier
    Lookup {
        /// isbn, lccn, oclc or olid
        id_type: IdType,
        value: String,
        #[arg(long)]
        json: bool,
    },
    /// Show an author record (key like OL23919A)
    Author {
        key: String,
        #[arg(long)]
        json: bool,
    },
    /// Print a cover image URL
    Cover {
        /// ISBN, OCLC, LCCN, OLID or ID
        key_type: CoverKey,
        value: String,
        /// S, M or L
        #[arg(short, long, default_value = "L")]
        size: CoverSize,
    },
    /// Print an author photo URL
    Photo {
        /// Author key like OL23919A
        key: String,
    },
    /// Fill in a book from the catalog, keeping what you supply
    Enrich {
        title: String,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        isbn: Option<String>,
        #[arg(long)]
        publisher: Option<String>,
        /// Add the enriched book to the library
        #[arg(long)]
        save: bool,
        #[arg(long)]
        json: bool,
    },
    /// Add a book to the library
    Add {
        title: String,
        #[command(flatten)]
        fields: BookFields,
        /// Fill in missing details from the catalog first
        #[arg(long)]
        enrich: bool,
    },
    /// Change fields of a stored book (an empty value clears a field)
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: BookFields,
    },
    /// List books in the library
    List {
        /// Only books read in this year
        #[arg(long)]
        year: Option<i32>,
        /// Only books read in this month (1-12)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        /// Only books on this shelf (read, to-read, ...)
        #[arg(long)]
        shelf: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Remove a book from the library
    Remove { id: i64 },
    /// Replace the library with books from a JSON file
    Import {
        path: PathBuf,
        /// Enrich each book from the catalog before saving
        #[arg(long)]
        enrich: bool,
    },
    /// Write the library to a JSON file
    Export { path: PathBuf },
    /// Reading statistics for a year
    Stats {
        /// Year (default: most recent year with reads)
        #[arg(long)]
        year: Option<i32>,
        /// Set the book goal for the year
        #[arg(long)]
        goal: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    /// Ask the reading assistant
    Ask {
        /// Your question or request
        #[arg(required = true, trailing_var_arg = true)]
        message: Vec<String>,
        /// Chat provider (overrides the config)
        #[arg(long)]
        provider: Option<ChatProviderKind>,
        /// API key (or set READING_TRACKER_API_KEY)
        #[arg(long, env = "READING_TRACKER_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        /// Add a suggested book to the library
        #[arg(long)]
        save: bool,
    },
    /// Show or change the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let file_config = match &cli.config {
        Some(path) => config::load_from(path),
        None => config::load(),
    };
    let mut config = file_config.clone();
    if let Some(db) = &cli.db {
        config.library.database_path = Some(db.clone());
    }

    match &cli.command {
        Commands::Search { title, limit, json } => {
            cmd_search(&rt, &config, title, *limit, *json)
        }
        Commands::Authors { name, json } => cmd_authors(&rt, &config, name, *json),
        Commands::Lookup {
            id_type,
            value,
            json,
        } => cmd_lookup(&rt, &config, *id_type, value, *json),
        Commands::Author { key, json } => cmd_author(&rt, &config, key, *json),
        Commands::Cover {
            key_type,
            value,
            size,
        } => cmd_cover(&config, *key_type, value, *size),
        Commands::Photo { key } => cmd_photo(&config, key),
        Commands::Enrich {
            title,
            author,
            isbn,
            publisher,
            save,
            json,
        } => {
            let book = LocalBook {
                author: author.clone(),
                isbn: isbn.clone(),
                publisher: publisher.clone(),
                ..LocalBook::new(title.as_str())
            };
            cmd_enrich(&rt, &config, book, *save, *json)
        }
        Commands::Add {
            title,
            fields,
            enrich,
        } => cmd_add(&rt, &config, title, fields, *enrich),
        Commands::Edit { id, title, fields } => {
            cmd_edit(&rt, &config, *id, title.as_deref(), fields)
        }
        Commands::List {
            year,
            month,
            shelf,
            json,
        } => cmd_list(&rt, &config, *year, *month, shelf.as_deref(), *json),
        Commands::Remove { id } => cmd_remove(&rt, &config, *id),
        Commands::Import { path, enrich } => cmd_import(&rt, &config, path, *enrich),
        Commands::Export { path } => cmd_export(&rt, &config, path),
        Commands::Stats { year, goal, json } => cmd_stats(&rt, &config, *year, *goal, *json),
        Commands::Ask {
            message,
            provider,
            api_key,
            save,
        } => {
            if let Some(provider) = provider {
                config.chat.provider = *provider;
            }
            if api_key.is_some() {
                config.chat.api_key = api_key.clone();
            }
            cmd_ask(&rt, &config, &message.join(" "), *save)
        }
        // Edits apply to the file as written, without the --db override
        Commands::Config { action } => cmd_config(file_config, cli.config.as_deref(), action),
    }
}

/// Open the configured library database.
async fn open_store(config: &Config) -> anyhow::Result<SqliteBookStore> {
    let path = config.library.resolved_database_path();
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir)?;
    }
    Ok(SqliteBookStore::open(&config.library.database_url()).await?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a status line, on stderr when stdout carries JSON.
fn print_status(json: bool, message: &str) -> anyhow::Result<()> {
    write_status(&mut std::io::stdout(), &mut std::io::stderr(), json, message)?;
    Ok(())
}

fn write_status(
    out: &mut impl std::io::Write,
    err: &mut impl std::io::Write,
    json: bool,
    message: &str,
) -> std::io::Result<()> {
    if json {
        writeln!(err, "{}", message)
    } else {
        writeln!(out, "{}", message)
    }
}

/// Print the interesting fields of a book, one per line.
fn print_book(book: &LocalBook) {
    println!("  Title:      {}", book.title);
    let authors = book.display_authors();
    if !authors.is_empty() {
        println!("  Author:     {}", authors);
    }
    let fields = [
        ("ISBN", book.isbn.clone()),
        ("Publisher", book.publisher.clone()),
        ("Published", book.publish_date.clone()),
        ("First pub.", book.first_publish_year.map(|y| y.to_string())),
        ("Pages", book.page_count().map(|p| p.to_string())),
        ("Editions", book.edition_count.map(|c| c.to_string())),
        ("Work", book.work_key.clone()),
        ("Edition", book.edition_key.clone()),
        ("Shelf", book.shelf.clone()),
        ("Read", book.date_read.clone()),
        ("Cover", book.cover_url.clone()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("  {:<11} {}", format!("{}:", label), value);
        }
    }
    if !book.subjects.is_empty() {
        println!("  Subjects:   {}", book.subjects.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_stays_off_json_stdout() {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        write_status(&mut out, &mut err, true, "✓ Saved to library (id 7)").unwrap();
        assert!(out.is_empty());
        assert_eq!(String::from_utf8(err).unwrap(), "✓ Saved to library (id 7)\n");

        let (mut out, mut err) = (Vec::new(), Vec::new());
        write_status(&mut out, &mut err, false, "done").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "done\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_parse_add_and_edit() {
        let cli = Cli::try_parse_from([
            "reading-tracker",
            "add",
            "Dune",
            "--author",
            "Frank Herbert",
            "--pages",
            "535",
            "--rating",
            "5",
            "--enrich",
        ])
        .unwrap();
        let Commands::Add {
            title,
            fields,
            enrich,
        } = cli.command
        else {
            panic!("expected add");
        };
        assert_eq!(title, "Dune");
        assert_eq!(fields.author.as_deref(), Some("Frank Herbert"));
        assert_eq!(fields.pages, Some(535));
        assert!(enrich);

        let cli =
            Cli::try_parse_from(["reading-tracker", "edit", "3", "--isbn", ""]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Edit { id: 3, ref fields, .. } if fields.isbn.as_deref() == Some("")
        ));

        assert!(Cli::try_parse_from(["reading-tracker", "add", "X", "--rating", "9"]).is_err());
        assert!(Cli::try_parse_from(["reading-tracker", "list", "--month", "13"]).is_err());
    }

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::try_parse_from([
            "reading-tracker",
            "--config",
            "/tmp/rt.toml",
            "config",
            "set",
            "chat.provider",
            "ollama",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/rt.toml")));
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Set { ref key, ref value }
            } if key == "chat.provider" && value == "ollama"
        ));
    }
}
