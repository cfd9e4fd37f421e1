use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("🚀 Building shopping list");

        // Extract
        let lines = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} ingredient lines", lines.len());

        // Transform
        let transformed = self.pipeline.transform(lines).await?;
        tracing::info!(
            "🔄 Aggregated {} lines into {} ingredients",
            transformed.source_lines,
            transformed.shopping_list.len()
        );

        // Load
        let output_path = self.pipeline.load(transformed).await?;
        tracing::info!("💾 Output saved to: {} ({:?})", output_path, started.elapsed());

        Ok(output_path)
    }
}
