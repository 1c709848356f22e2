use anyhow::{Context, Result};
use saldo_core::TypeLabels;
use saldo_ingest::{ColumnMap, IngestOptions, SheetKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub input: InputSection,
    pub categories: CategorySection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSection {
    pub expenses_csv: PathBuf,
    pub income_csv: PathBuf,
    /// Savings sheet is optional; the ledger is simply empty without it
    pub savings_csv: PathBuf,
    pub columns: ColumnMap,
    /// Localized savings-type tags rewritten during ingestion
    pub type_aliases: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySection {
    /// Accepted categories per sheet; an empty list accepts anything
    pub valid_expenses: Vec<String>,
    pub valid_income: Vec<String>,
    pub valid_savings: Vec<String>,
    /// Substitute for missing or unknown categories
    pub default_category: String,
    /// Category-type tag tables driving the classifier
    pub labels: TypeLabels,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    pub dir: PathBuf,
    pub skipped_report: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: InputSection {
                expenses_csv: PathBuf::from("input/expenses.csv"),
                income_csv: PathBuf::from("input/income.csv"),
                savings_csv: PathBuf::from("input/savings.csv"),
                columns: ColumnMap::default(),
                type_aliases: IngestOptions::default().type_aliases,
            },
            categories: CategorySection {
                valid_expenses: Vec::new(),
                valid_income: Vec::new(),
                valid_savings: Vec::new(),
                default_category: "Miscellaneous".to_string(),
                labels: TypeLabels::default(),
            },
            output: OutputSection {
                dir: PathBuf::from("output"),
                skipped_report: PathBuf::from("output/skipped_rows.json"),
            },
        }
    }
}

impl Config {
    pub fn sheet_path(&self, kind: SheetKind) -> &Path {
        match kind {
            SheetKind::Expenses => &self.input.expenses_csv,
            SheetKind::Income => &self.input.income_csv,
            SheetKind::Savings => &self.input.savings_csv,
        }
    }

    pub fn ingest_options(&self, kind: SheetKind) -> IngestOptions {
        let valid_categories = match kind {
            SheetKind::Expenses => self.categories.valid_expenses.clone(),
            SheetKind::Income => self.categories.valid_income.clone(),
            SheetKind::Savings => self.categories.valid_savings.clone(),
        };

        IngestOptions {
            columns: self.input.columns.clone(),
            valid_categories,
            default_category: self.categories.default_category.clone(),
            type_aliases: self.input.type_aliases.clone(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(path, &Config::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}
