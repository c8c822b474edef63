//! Command-line front end for the species logbook.
//!
//! `list` and `show` render the catalog once; `browse` reads one input per
//! line from stdin and re-renders after each, the way the web view re-filters
//! on every keystroke or category click. Logs go to stderr so stdout stays
//! pipeable.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use microcosm_log::config::{Config, init_tracing};
use microcosm_log::render::{render_detail, render_logbook, render_not_found};
use microcosm_log::{
    CatalogStore, CategoryRegistry, CategorySelector, LogbookView, SpeciesId, assemble_catalog,
    load_catalog, write_catalog,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "logbook",
    about = "Browse the Microcosm Log species catalog",
    version
)]
struct Cli {
    /// Species catalog file (overrides MICROCOSM_CATALOG and the data root)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the logbook filtered by category and search text
    List {
        /// Category id, or `all`
        #[arg(long, default_value = "all")]
        category: String,

        /// Case-insensitive text matched against name, scientific name and description
        #[arg(long, default_value = "")]
        query: String,

        /// Output matching records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one species by id
    Show {
        id: String,

        /// Output the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the filterable categories in display order
    Categories,

    /// Filter interactively: `:category <id>`, `:clear`, `:show <id>`, `:quit`;
    /// any other line becomes the search text
    Browse,

    /// Build a catalog file from `<dir>/<slug>/entry.json` entries
    Assemble {
        /// Directory of species entries
        data_dir: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Exit status for `show` when the id does not resolve.
const NOT_FOUND: u8 = 2;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::load();
    init_tracing(&config);

    let registry = CategoryRegistry::shipped();
    match cli.command {
        Commands::Categories => print_categories(&registry)?,
        Commands::Assemble { data_dir, out } => assemble(&data_dir, out.as_deref())?,
        Commands::List {
            category,
            query,
            json,
        } => {
            let store = load_catalog(&config, cli.catalog.as_deref(), &registry)?;
            list(&store, &registry, &category, &query, json)?
        }
        Commands::Show { id, json } => {
            let store = load_catalog(&config, cli.catalog.as_deref(), &registry)?;
            return show(&store, &id, json);
        }
        Commands::Browse => {
            let store = load_catalog(&config, cli.catalog.as_deref(), &registry)?;
            let stdin = io::stdin();
            browse(&store, &registry, stdin.lock(), io::stdout().lock())?
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_categories(registry: &CategoryRegistry) -> Result<()> {
    for def in registry.iter() {
        println!("{:<16} {:<16} {}", def.id, def.name, def.description);
    }
    Ok(())
}

fn list(
    store: &CatalogStore,
    registry: &CategoryRegistry,
    category: &str,
    query: &str,
    json: bool,
) -> Result<()> {
    let mut view = LogbookView::new(store, registry);
    view.set_category(CategorySelector::parse(category))?;
    view.set_query(query);

    if json {
        let records = view.filtered();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    print!("{}", render_logbook(&view));
    Ok(())
}

fn show(store: &CatalogStore, id: &str, json: bool) -> Result<ExitCode> {
    let Some(record) = store.find_by_id(&SpeciesId(id.to_string())) else {
        if json {
            bail!("species '{id}' not found");
        }
        print!("{}", render_not_found(id));
        return Ok(ExitCode::from(NOT_FOUND));
    };
    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        print!("{}", render_detail(record));
    }
    Ok(ExitCode::SUCCESS)
}

fn browse(
    store: &CatalogStore,
    registry: &CategoryRegistry,
    input: impl BufRead,
    mut out: impl Write,
) -> Result<()> {
    let mut view = LogbookView::new(store, registry);
    write!(out, "{}", render_logbook(&view))?;

    for line in input.lines() {
        let line = line.context("reading stdin")?;
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix(':') {
            let (command, arg) = rest
                .split_once(char::is_whitespace)
                .map(|(c, a)| (c, a.trim()))
                .unwrap_or((rest, ""));
            match command {
                "q" | "quit" => break,
                "clear" => view.clear_filters(),
                "c" | "category" => {
                    if let Err(err) = view.set_category(CategorySelector::parse(arg)) {
                        writeln!(out, "{err}")?;
                        continue;
                    }
                }
                "show" => {
                    match store.find_by_id(&SpeciesId(arg.to_string())) {
                        Some(record) => write!(out, "{}", render_detail(record))?,
                        None => write!(out, "{}", render_not_found(arg))?,
                    }
                    continue;
                }
                other => {
                    writeln!(out, "unknown command ':{other}'")?;
                    continue;
                }
            }
        } else {
            view.set_query(line.as_str());
        }

        let snapshot = view.snapshot();
        debug!(revision = snapshot.revision, matches = snapshot.ids.len(), "filtered");
        if view.publish(snapshot) {
            write!(out, "{}", render_logbook(&view))?;
        }
    }
    Ok(())
}

fn assemble(data_dir: &Path, out: Option<&Path>) -> Result<()> {
    let records = assemble_catalog(data_dir)?;
    match out {
        Some(path) => write_catalog(path, &records),
        None => {
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }
    }
}
