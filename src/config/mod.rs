pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "topsis")]
#[command(about = "Rank alternatives in a CSV table with TOPSIS")]
pub struct CliConfig {
    /// Decision table: local path or http(s) URL
    #[arg(short, long)]
    pub input: String,

    /// Comma-separated positive weights, one per criterion (e.g. 1,1,2,1)
    #[arg(short, long)]
    pub weights: String,

    /// Comma-separated impacts, '+' benefit or '-' cost (e.g. +,+,-,+)
    #[arg(long, allow_hyphen_values = true)]
    pub impacts: String,

    /// Treat the first row as a header
    #[arg(long, conflicts_with = "no_header")]
    pub header: bool,

    /// Treat the first row as data
    #[arg(long)]
    pub no_header: bool,

    /// Input delimiter (defaults to tab for .tsv, comma otherwise)
    #[arg(long)]
    pub delimiter: Option<char>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "topsis_result")]
    pub output_name: String,

    /// Output formats: csv, tsv, json
    #[arg(long, value_delimiter = ',', default_value = "csv")]
    pub formats: Vec<String>,

    /// Decimal places for the score column
    #[arg(long)]
    pub precision: Option<usize>,

    /// Pack all outputs into this zip archive
    #[arg(long)]
    pub bundle: Option<String>,

    /// Print the ranked table after a successful run
    #[arg(long)]
    pub preview: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_location(&self) -> &str {
        &self.input
    }

    fn weights(&self) -> &str {
        &self.weights
    }

    fn impacts(&self) -> &str {
        &self.impacts
    }

    fn has_header(&self) -> Option<bool> {
        match (self.header, self.no_header) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }

    fn delimiter(&self) -> Option<u8> {
        self.delimiter.filter(char::is_ascii).map(|c| c as u8)
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_name(&self) -> &str {
        &self.output_name
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn precision(&self) -> Option<usize> {
        self.precision
    }

    fn bundle_name(&self) -> Option<&str> {
        self.bundle.as_deref()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        use crate::domain::model::{ImpactVector, WeightVector};
        use crate::utils::validation::*;

        validate_location("input", &self.input)?;
        WeightVector::parse(&self.weights)?;
        ImpactVector::parse(&self.impacts)?;

        validate_path("output_path", &self.output_path)?;
        validate_non_empty_string("output_name", &self.output_name)?;
        validate_output_formats("formats", &self.formats)?;

        if let Some(precision) = self.precision {
            validate_range("precision", precision, 0, 15)?;
        }
        if let Some(delimiter) = self.delimiter {
            validate_delimiter("delimiter", delimiter)?;
        }
        if let Some(bundle) = &self.bundle {
            validate_non_empty_string("bundle", bundle)?;
        }

        Ok(())
    }
}
