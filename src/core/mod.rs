pub mod etl;
pub mod pipeline;
pub mod topsis;

pub use crate::domain::model::{DecisionTable, ScoredTable, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
