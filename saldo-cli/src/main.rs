use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use saldo_core::{MonthKey, Transaction, compute_ledger};
use saldo_ingest::{SheetData, SheetKind, read_sheet, write_skipped_report};
use saldo_reports::{build_reports, export_all};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "saldo", version, about = "Savings ledger reporting pipeline")]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value = "saldo.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default config file
    InitConfig,

    /// Ingest all sheets, run the ledger engine, and export every dataset
    Report,

    /// Print the denormalized savings ledger table
    Ledger {
        /// First month to include (YYYY-MM)
        #[arg(long)]
        from: Option<MonthKey>,

        /// Last month to include (YYYY-MM)
        #[arg(long)]
        to: Option<MonthKey>,
    },

    /// Print the monthly global metrics table
    Metrics {
        #[arg(long)]
        from: Option<MonthKey>,

        #[arg(long)]
        to: Option<MonthKey>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::InitConfig => config::init_config(&cli.config),
        Command::Report => run_report(&cli.config),
        Command::Ledger { from, to } => print_ledger(&cli.config, from, to),
        Command::Metrics { from, to } => print_metrics(&cli.config, from, to),
    }
}

/// Read one sheet through the config's per-sheet options. Expenses and
/// income are required; a missing savings sheet just yields an empty ledger.
fn load_sheet(cfg: &Config, kind: SheetKind, required: bool) -> Result<SheetData> {
    let path = cfg.sheet_path(kind);
    if !path.exists() {
        if required {
            bail!("{} sheet not found: {}", kind.name(), path.display());
        }
        warn!(sheet = kind.name(), path = %path.display(), "sheet not found, continuing without it");
        return Ok(SheetData::default());
    }

    read_sheet(path, kind, &cfg.ingest_options(kind))
        .with_context(|| format!("ingesting {} sheet", kind.name()))
}

fn run_report(config_path: &Path) -> Result<()> {
    let cfg = config::load_config(config_path)?;

    let expenses = load_sheet(&cfg, SheetKind::Expenses, true)?;
    let income = load_sheet(&cfg, SheetKind::Income, true)?;
    let savings = load_sheet(&cfg, SheetKind::Savings, false)?;

    let set = build_reports(
        &expenses.transactions,
        &income.transactions,
        &savings.transactions,
        &cfg.categories.labels,
    );

    export_all(&cfg.output.dir, &set)?;

    println!(
        "Ingested {} expense, {} income, {} savings transactions",
        expenses.transactions.len(),
        income.transactions.len(),
        savings.transactions.len()
    );
    println!(
        "Ledger: {} rows across {} months -> {}",
        set.ledger.rows.len(),
        set.ledger.metrics.len(),
        cfg.output.dir.display()
    );

    let mut skipped = Vec::new();
    skipped.extend(expenses.skipped);
    skipped.extend(income.skipped);
    skipped.extend(savings.skipped);
    skipped.extend(set.ledger.skipped.clone());
    if !skipped.is_empty() {
        write_skipped_report(&cfg.output.skipped_report, &skipped)?;
        println!(
            "Skipped {} rows during import; see {}",
            skipped.len(),
            cfg.output.skipped_report.display()
        );
    }

    Ok(())
}

fn in_range(txn: &Transaction, from: Option<MonthKey>, to: Option<MonthKey>) -> bool {
    let month = txn.month();
    from.is_none_or(|f| month >= f) && to.is_none_or(|t| month <= t)
}

fn load_savings_ledger(
    config_path: &Path,
    from: Option<MonthKey>,
    to: Option<MonthKey>,
) -> Result<saldo_core::LedgerReport> {
    let cfg = config::load_config(config_path)?;
    let savings = load_sheet(&cfg, SheetKind::Savings, true)?;

    let transactions: Vec<Transaction> = savings
        .transactions
        .into_iter()
        .filter(|t| in_range(t, from, to))
        .collect();

    Ok(compute_ledger(&transactions, &cfg.categories.labels))
}

fn print_ledger(config_path: &Path, from: Option<MonthKey>, to: Option<MonthKey>) -> Result<()> {
    let report = load_savings_ledger(config_path, from, to)?;
    if report.rows.is_empty() {
        println!("No savings activity in the selected range");
        return Ok(());
    }

    println!(
        "{:<8} {:<20} {:<11} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "month", "category", "type", "delta", "balance", "saved", "allocated", "spent"
    );
    for r in &report.rows {
        println!(
            "{:<8} {:<20} {:<11} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2}",
            r.month.to_string(),
            r.category,
            r.kind.to_string(),
            r.monthly_delta,
            r.running_balance,
            r.total_saved,
            r.total_allocated,
            r.total_spent
        );
    }
    Ok(())
}

fn print_metrics(config_path: &Path, from: Option<MonthKey>, to: Option<MonthKey>) -> Result<()> {
    let report = load_savings_ledger(config_path, from, to)?;
    if report.metrics.is_empty() {
        println!("No savings activity in the selected range");
        return Ok(());
    }

    println!(
        "{:<8} {:>12} {:>12} {:>12}",
        "month", "saved", "allocated", "spent"
    );
    for m in &report.metrics {
        println!(
            "{:<8} {:>12.2} {:>12.2} {:>12.2}",
            m.month.to_string(),
            m.total_saved,
            m.total_allocated,
            m.total_spent
        );
    }
    Ok(())
}
