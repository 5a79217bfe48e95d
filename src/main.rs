//! invent-ui - command-line front end for the inventory UI layer
//!
//! Exposes the headless UI operations for scripting and inspection.
//!
//! # Usage
//!
//! ```bash
//! invent-ui status 3 5                       # Classify stock (Low Stock)
//! invent-ui format currency 1234.5           # $1,234.50
//! invent-ui format date 2024-01-05T15:07:00Z --no-time
//! invent-ui export items.json -o items.csv   # Export a table as CSV
//! invent-ui export items.json --search bolt  # Export only matching rows
//! invent-ui chart stock-status -d 10,3,1     # Print a chart config
//! invent-ui storage set theme '"dark"'       # Write to the file store
//! invent-ui config                           # Show effective configuration
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use invent_ui::app::Page;
use invent_ui::app::handlers::{DialogSink, DirectorySink, ExportRows, export_table_to_csv};
use invent_ui::app::table::Table;
use invent_ui::core::charts::{self, MemorySurface};
use invent_ui::core::format::{format_currency, format_date, format_number};
use invent_ui::core::stock::stock_badge;
use invent_ui::core::storage::{FileStore, Storage};
use invent_ui::{config, utils};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Canvas id used when rendering charts without a page
const CLI_CANVAS: &str = "cli-canvas";

#[derive(Parser)]
#[command(name = "invent-ui")]
#[command(about = "Inventory UI utilities - formatting, export, charts and storage", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an item's stock level
    Status {
        /// Units currently in stock
        #[arg(allow_negative_numbers = true)]
        current: i64,
        /// Reorder level of the item
        #[arg(allow_negative_numbers = true)]
        reorder: i64,
    },
    /// Format a value for display
    Format {
        #[arg(value_enum)]
        kind: FormatKind,
        value: String,
        /// Dates only: omit the time of day
        #[arg(long)]
        no_time: bool,
    },
    /// Export a table (JSON: {id, header, rows: [{cells, category}]}) as CSV
    Export {
        /// Path to the table JSON file
        table: PathBuf,
        /// Output file (default: configured name in the download directory)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Export only rows left visible by --search
        #[arg(long)]
        visible_only: bool,
        /// Filter rows before exporting; implies --visible-only
        #[arg(short, long, value_name = "QUERY")]
        search: Option<String>,
        /// Choose the destination with the native save dialog
        #[arg(long, conflicts_with = "output")]
        dialog: bool,
    },
    /// Print the configuration of a chart
    Chart {
        #[arg(value_enum)]
        kind: ChartKind,
        /// Comma-separated labels
        #[arg(short, long, value_delimiter = ',')]
        labels: Vec<String>,
        /// Comma-separated values (stock-status: in,low,out)
        #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
        data: Vec<f64>,
        /// Second series (stock-movement: stock out)
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        secondary: Vec<f64>,
    },
    /// Read or modify the file-backed key-value store
    Storage {
        #[command(subcommand)]
        action: StorageAction,
    },
    /// Show the effective configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatKind {
    Currency,
    Number,
    Date,
}

#[derive(Clone, Copy, ValueEnum)]
enum ChartKind {
    StockMovement,
    Category,
    StockStatus,
    Supplier,
    TransactionTrend,
}

#[derive(Subcommand)]
enum StorageAction {
    /// Print the JSON value stored under KEY
    Get { key: String },
    /// Store VALUE (JSON, or a plain string) under KEY
    Set { key: String, value: String },
    /// Delete KEY
    Remove { key: String },
    /// Delete every key
    Clear,
}

fn main() -> ExitCode {
    let _ = utils::ensure_dirs();
    init_logging();
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to create Tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(handle_cli(cli.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Set up logging to file
    if let Some(mut log_path) = utils::get_state_dir() {
        log_path.push("invent-ui.log");
        if let Ok(file) = std::fs::File::create(log_path) {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .init();
            return;
        }
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn handle_cli(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Status { current, reorder } => {
            let badge = stock_badge(current, reorder);
            println!("{} ({})", badge.text, badge.class);
        }
        Commands::Format {
            kind,
            value,
            no_time,
        } => {
            let formatted = match kind {
                FormatKind::Currency => format_currency(value.trim().parse().ok()),
                FormatKind::Number => format_number(value.trim().parse().ok()),
                FormatKind::Date => format_date(&value, !no_time),
            };
            println!("{formatted}");
        }
        Commands::Export {
            table,
            output,
            visible_only,
            search,
            dialog,
        } => {
            let config = config::load_config().await;
            let json = tokio::fs::read_to_string(&table).await?;
            let table = Table::from_json(&json)?;
            let table_id = table.id.clone();

            let mut page = Page::new(config).with_table(table);
            if let Some(query) = &search {
                let visible = page.search_now(&table_id, query).unwrap_or(0);
                println!("{visible} row(s) match \"{query}\"");
            }
            let rows = if visible_only || search.is_some() {
                ExportRows::Visible
            } else {
                ExportRows::All
            };

            let result = if dialog {
                export_table_to_csv(&mut page, &mut DialogSink, &table_id, None, rows).await
            } else {
                let (mut sink, filename) = match &output {
                    Some(path) => {
                        let (dir, filename) = split_output(path);
                        (DirectorySink::new(dir), filename)
                    }
                    None => (
                        DirectorySink::downloads().unwrap_or_else(|| DirectorySink::new(".")),
                        None,
                    ),
                };
                export_table_to_csv(&mut page, &mut sink, &table_id, filename.as_deref(), rows)
                    .await
            };

            if let Some(notification) = page.notifications.latest() {
                println!("{}", notification.text);
            }
            match result {
                Ok(location) => println!("Saved to {location}"),
                Err(invent_ui::Error::Cancelled) => println!("Export cancelled"),
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Chart {
            kind,
            labels,
            data,
            secondary,
        } => {
            let mut surface = MemorySurface::new().with_canvas(CLI_CANVAS);
            let chart = match kind {
                ChartKind::StockMovement => {
                    charts::stock_movement_chart(&mut surface, CLI_CANVAS, &labels, &data, &secondary)
                }
                ChartKind::Category => {
                    charts::category_chart(&mut surface, CLI_CANVAS, &labels, &data)
                }
                ChartKind::StockStatus => {
                    let count = |i: usize| data.get(i).copied().unwrap_or(0.0).max(0.0) as u64;
                    charts::stock_status_chart(&mut surface, CLI_CANVAS, count(0), count(1), count(2))
                }
                ChartKind::Supplier => {
                    charts::supplier_chart(&mut surface, CLI_CANVAS, &labels, &data)
                }
                ChartKind::TransactionTrend => {
                    charts::transaction_trend_chart(&mut surface, CLI_CANVAS, &labels, &data)
                }
            };
            let chart = chart.ok_or("chart was not created")?;
            println!("{}", serde_json::to_string_pretty(&chart.to_json())?);
        }
        Commands::Storage { action } => {
            let config = config::load_config().await;
            let store = FileStore::in_data_dir(&config.storage_file)
                .ok_or("no data directory available for the store")?;
            let storage = Storage::new(store);

            match action {
                StorageAction::Get { key } => {
                    match storage.get_opt::<serde_json::Value>(&key) {
                        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                        None => println!("(not set)"),
                    }
                }
                StorageAction::Set { key, value } => {
                    let value = serde_json::from_str::<serde_json::Value>(&value)
                        .unwrap_or_else(|_| serde_json::Value::String(value));
                    if !storage.set(&key, &value) {
                        return Err(format!("failed to store {key}").into());
                    }
                }
                StorageAction::Remove { key } => {
                    if !storage.remove(&key) {
                        return Err(format!("failed to remove {key}").into());
                    }
                }
                StorageAction::Clear => {
                    if !storage.clear() {
                        return Err("failed to clear storage".into());
                    }
                }
            }
        }
        Commands::Config => {
            let config = config::load_config().await;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

/// Splits `-o FILE` into the sink directory and the download name
fn split_output(path: &Path) -> (PathBuf, Option<String>) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    (dir, filename)
}
