use crate::domain::model::{DecisionTable, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// Filesystem path or http(s) URL of the decision table.
    fn input_location(&self) -> &str;
    fn weights(&self) -> &str;
    fn impacts(&self) -> &str;
    /// `None` detects the header from the first record.
    fn has_header(&self) -> Option<bool>;
    /// `None` picks tab for `.tsv` inputs and comma otherwise.
    fn delimiter(&self) -> Option<u8>;
    fn output_path(&self) -> &str;
    fn output_name(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn precision(&self) -> Option<usize>;
    fn bundle_name(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<DecisionTable>;
    async fn transform(&self, table: DecisionTable) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
