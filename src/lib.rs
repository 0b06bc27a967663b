pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{
    etl::{EtlEngine, RunOutcome},
    pipeline::TopsisPipeline,
    topsis::TopsisEngine,
};
pub use domain::model::{
    Alternative, DecisionTable, Impact, ImpactVector, Outcome, ScoredTable, WeightVector,
};
pub use utils::error::{Result, TopsisError};
