//! rowsize CLI - label-driven font sizing for Word tables
//!
//! Resizes the content cells of labeled table rows in `.docx` files, either
//! locally or as a Telegram bot.

mod bot;
mod telegram;

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use rowsize::{Document, RuleSet, Transformer};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Label-driven font sizing for tables in Word documents
#[derive(Parser)]
#[command(
    name = "rowsize",
    author = "iyulab",
    version,
    about = "Resize labeled table rows in Word documents",
    long_about = "rowsize - label-driven font sizing for tables in .docx files.\n\n\
                  Rows whose first cell reads Question, Option or Solution get their\n\
                  second cell resized (14pt, 12pt, 12pt by default)."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resize the labeled rows of a document
    Apply {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: modified_<name> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON rule file (label to points)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List table rows with their labels and content sizes
    Inspect {
        /// Input file path
        input: PathBuf,

        /// JSON rule file (label to points)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the active rule set as JSON
    Rules {
        /// JSON rule file (label to points)
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Run the Telegram bot
    Bot {
        /// Bot API token
        #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
        token: String,

        /// JSON rule file (label to points)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Long-poll timeout in seconds
        #[arg(long, default_value = "30")]
        poll_timeout: u64,

        /// Seconds to wait after a failed poll
        #[arg(long, default_value = "5")]
        retry_delay: u64,
    },

    /// Show version information
    Version,
}

/// One table row as shown by `inspect`.
#[derive(Debug, Serialize)]
struct RowInfo {
    table: usize,
    row: usize,
    label: Option<String>,
    rule: Option<f32>,
    sizes: Vec<Option<f32>>,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = match cli.command {
        Commands::Bot { .. } => "info",
        _ => "warn",
    };
    init_logging(default_filter, cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(default_filter: &str, verbose: bool) {
    let filter = if verbose { "debug" } else { default_filter };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Apply {
            input,
            output,
            rules,
            json,
        } => {
            let rules = load_rules(rules.as_deref())?;
            let output = output.unwrap_or_else(|| default_output_path(&input));

            let pb = create_spinner("Resizing table rows...");
            let report = rowsize::transform_file(&input, &output, &rules);
            pb.finish_and_clear();
            let report = report?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            println!(
                "{} Resized {} of {} rows in {} tables: {}",
                "✓".green().bold(),
                report.resized_rows,
                report.rows,
                report.tables,
                output.display()
            );
            for (label, count) in &report.by_label {
                println!("  {}: {}", label.bold(), count);
            }
            for skipped in &report.skipped {
                println!(
                    "{} Table {}, row {} ({}) has no content cell",
                    "!".yellow().bold(),
                    skipped.table + 1,
                    skipped.row + 1,
                    skipped.label
                );
            }
        }

        Commands::Inspect { input, rules, json } => {
            let rules = load_rules(rules.as_deref())?;
            let doc = Document::open(&input)?;
            let rows = inspect_rows(&doc, &rules);

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }

            println!("{}", "Document Tables".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Tables".bold(), doc.table_count());

            let mut current_table = None;
            for row in &rows {
                if current_table != Some(row.table) {
                    current_table = Some(row.table);
                    println!("\n{} {}", "Table".cyan().bold(), row.table + 1);
                }

                let label = row.label.as_deref().unwrap_or("-");
                let rule = match row.rule {
                    Some(points) => format!("→ {}pt", points).green().to_string(),
                    None => "no rule".dimmed().to_string(),
                };
                println!(
                    "  {:>3}  {:<16} {:<10} {}",
                    row.row + 1,
                    label,
                    rule,
                    format_sizes(&row.sizes)
                );
            }
        }

        Commands::Rules { rules } => {
            let rules = load_rules(rules.as_deref())?;
            println!("{}", rules.to_json()?);
        }

        Commands::Bot {
            token,
            rules,
            poll_timeout,
            retry_delay,
        } => {
            let rules = load_rules(rules.as_deref())?;
            let client = telegram::TelegramClient::new(token, Duration::from_secs(poll_timeout))?;
            let transformer = Arc::new(Transformer::new(rules));

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(async {
                bot::Bot::new(client, transformer)
                    .with_retry_delay(Duration::from_secs(retry_delay))
                    .run(async {
                        if let Err(e) = tokio::signal::ctrl_c().await {
                            tracing::error!(error = %e, "failed to listen for Ctrl-C");
                            std::future::pending::<()>().await;
                        }
                    })
                    .await;
            });
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn load_rules(path: Option<&Path>) -> rowsize::Result<RuleSet> {
    match path {
        Some(path) => RuleSet::load(path),
        None => Ok(RuleSet::default()),
    }
}

fn default_output_path(input: &Path) -> PathBuf {
    let name = input.file_name().and_then(|n| n.to_str());
    input.with_file_name(rowsize::modified_file_name(name))
}

fn inspect_rows(doc: &Document, rules: &RuleSet) -> Vec<RowInfo> {
    let mut rows = Vec::new();
    for (table_index, table) in doc.tables().enumerate() {
        for (row_index, row) in table.rows().enumerate() {
            let label = row.label();
            let rule = label
                .as_deref()
                .and_then(|l| rules.size_for(l))
                .map(|s| s.points());
            let sizes: Vec<Option<f32>> = row
                .cell(1)
                .map(|cell| {
                    cell.runs()
                        .iter()
                        .map(|run| run.font_size().map(|s| s.points()))
                        .collect()
                })
                .unwrap_or_default();

            rows.push(RowInfo {
                table: table_index,
                row: row_index,
                label,
                rule,
                sizes,
            });
        }
    }
    rows
}

fn format_sizes(sizes: &[Option<f32>]) -> String {
    if sizes.is_empty() {
        return "(no content cell)".dimmed().to_string();
    }
    sizes
        .iter()
        .map(|s| match s {
            Some(points) => format!("{}pt", points),
            None => "inherited".to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_version() {
    println!("{} {}", "rowsize".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Label-driven font sizing for tables in Word documents");
    println!();
    println!("Default rules: Question 14pt, Option 12pt, Solution 12pt");
    println!("Repository: https://github.com/iyulab/rowsize");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
