use crate::core::Pipeline;
use crate::domain::model::ScoredTable;
use crate::utils::error::Result;

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub output_path: String,
    pub scored: ScoredTable,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        tracing::info!("Starting TOPSIS run");

        let table = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} alternatives with {} criteria",
            table.len(),
            table.criteria_count()
        );

        let result = self.pipeline.transform(table).await?;
        if let Some((best, outcome)) = result.scored.best() {
            tracing::info!(
                "Scored {} alternatives, best: {} ({:.4})",
                result.scored.len(),
                best.id,
                outcome.closeness
            );
        }

        let scored = result.scored.clone();
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(RunOutcome {
            output_path,
            scored,
        })
    }
}
