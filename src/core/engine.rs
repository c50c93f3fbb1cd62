use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct MsesEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> MsesEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting MSES processing...");

        // Extract
        let data = self.pipeline.extract().await?;
        tracing::info!("Extracted {} points", data.table.len());

        // Transform
        let result = self.pipeline.transform(data).await?;
        tracing::info!(
            "Transformed into {} output file(s): {}",
            result.outputs.len(),
            result.summary.files.join(", ")
        );

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!(
            "Output saved to: {} ({:?})",
            output_path,
            started.elapsed()
        );

        Ok(output_path)
    }
}
