//! csv-table command line tool
//!
//! Reads and edits a CSV file row by row through a `FileTable`

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use csv_table::{Document, FileTable, Row, Table, TableConfig};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "csv-table")]
#[command(about = "Inspect and edit CSV files row by row")]
struct Args {
    /// CSV file to operate on (overrides the config's path)
    #[arg(short = 'f', long, required_unless_present = "config")]
    file: Option<PathBuf>,

    /// TOML config providing `path` and `max_cached`
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Flush threshold for cached rows plus pending deletions
    #[arg(short = 'm', long)]
    max_cached: Option<usize>,

    /// Field separator: ';', ',', '|' or 'tab'
    #[arg(short = 's', long, default_value = ";", value_parser = parse_separator)]
    separator: char,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the whole table
    Cat {
        /// Print rows as JSON arrays of unescaped values
        #[arg(long)]
        json: bool,
    },
    /// Print one row, or one cell of it
    Get { row: u64, column: Option<usize> },
    /// Set one cell, growing the table as needed
    Set {
        row: u64,
        column: usize,
        value: String,
    },
    /// Append a row of values
    Append { values: Vec<String> },
    /// Append every row of another CSV file
    Import { source: PathBuf },
    /// Erase one row
    Erase { row: u64 },
    /// Remove trailing empty cells and rows
    Strip,
    /// Print table statistics as JSON
    Stats,
}

#[derive(Serialize, Debug)]
struct Stats {
    path: PathBuf,
    rows: u64,
    max_row_length: usize,
    cells: usize,
}

/// Parse a field separator from CLI string
fn parse_separator(s: &str) -> Result<char, String> {
    match s {
        ";" => Ok(';'),
        "," => Ok(','),
        "|" => Ok('|'),
        "tab" | "\\t" | "\t" => Ok('\t'),
        _ => Err(format!(
            "Invalid separator '{}'. Valid options: ';', ',', '|', tab",
            s
        )),
    }
}

fn resolve_config(args: &Args) -> anyhow::Result<TableConfig> {
    let mut config = match (&args.config, &args.file) {
        (Some(path), _) => TableConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        (None, Some(file)) => TableConfig::new(file),
        (None, None) => bail!("either --file or --config must be given"),
    };

    if let Some(file) = &args.file {
        config.path = file.clone();
    }
    if let Some(max_cached) = args.max_cached {
        config.max_cached = max_cached;
    }
    Ok(config)
}

fn cell_texts<const SEP: char>(row: &Row<SEP>) -> Vec<String> {
    row.iter()
        .take(row.min_size())
        .map(|cell| cell.text().into_owned())
        .collect()
}

fn run<const SEP: char>(config: &TableConfig, command: Command) -> anyhow::Result<()> {
    let mut table: FileTable<SEP> = config
        .open()
        .with_context(|| format!("opening {}", config.path.display()))?;
    debug!("Running {:?} on {:?}", command, config.path);

    match command {
        Command::Cat { json } => {
            if json {
                for row in table.iter() {
                    println!("{}", serde_json::to_string(&cell_texts(&row?))?);
                }
            } else {
                let document = table.to_document()?;
                if !document.is_empty() {
                    println!("{}", document);
                }
            }
        }
        Command::Get { row, column } => {
            let found = table.read_row(row)?;
            match column {
                Some(column) => println!("{}", found.cell(column)?.text()),
                None => println!("{}", found),
            }
        }
        Command::Set { row, column, value } => {
            table.at(row)?.at(column).set(value);
            table.flush()?;
            info!("Set row {} column {}", row, column);
        }
        Command::Append { values } => {
            table.push_row(Row::from_values(values))?;
            table.flush()?;
        }
        Command::Import { source } => {
            let text = std::fs::read_to_string(&source)
                .with_context(|| format!("reading {}", source.display()))?;
            let document = Document::<SEP>::parse(&text)?;
            table.append_rows(&document)?;
            table.flush()?;
            info!("Imported {} rows from {:?}", document.len(), source);
        }
        Command::Erase { row } => {
            table.remove_row(row)?;
            table.flush()?;
        }
        Command::Strip => {
            let mut document = table.to_document()?;
            document.strip();
            table.assign(&document)?;
            table.flush()?;
        }
        Command::Stats => {
            let document = table.to_document()?;
            let stats = Stats {
                path: config.path.clone(),
                rows: table.len(),
                max_row_length: document.max_row_length(),
                cells: document.num_elements(),
            };
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so table output stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    match args.separator {
        ';' => run::<';'>(&config, args.command),
        ',' => run::<','>(&config, args.command),
        '|' => run::<'|'>(&config, args.command),
        '\t' => run::<'\t'>(&config, args.command),
        other => bail!("unsupported separator {:?}", other),
    }
}
