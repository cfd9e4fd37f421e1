use crate::core::aggregate::aggregate_strict;
use crate::core::export::{to_csv, to_json};
use crate::core::render::{render, RenderOptions};
use crate::core::{ConfigProvider, LineSource, Pipeline, Storage, TransformResult};
use crate::domain::model::{AggregationResult, DocumentFormat, IngredientLine, OutputFormat};
use crate::utils::error::{BuylistError, Result};
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub struct ShoppingListPipeline<S: Storage, L: LineSource, C: ConfigProvider> {
    storage: S,
    source: L,
    config: C,
}

impl<S: Storage, L: LineSource, C: ConfigProvider> ShoppingListPipeline<S, L, C> {
    pub fn new(storage: S, source: L, config: C) -> Self {
        Self {
            storage,
            source,
            config,
        }
    }

    fn encode(&self, format: OutputFormat, list: &AggregationResult) -> Result<Vec<u8>> {
        let document_format = match format {
            OutputFormat::Csv => return to_csv(list),
            OutputFormat::Json => return to_json(list),
            OutputFormat::Text => DocumentFormat::Text,
            OutputFormat::Pdf => DocumentFormat::Pdf,
        };

        let options = RenderOptions {
            title: self.config.title().to_string(),
            layout: self.config.page_layout()?,
            format: document_format,
        };
        let document = render(list, &options)?;
        tracing::debug!(
            "Rendered {:?} document: {} page(s), {} bytes",
            document.format,
            document.page_count,
            document.bytes.len()
        );
        Ok(document.into_bytes())
    }

    fn output_file(&self, filename: &str) -> String {
        format!("{}/{}", self.config.output_path(), filename)
    }
}

/// Bundles the outputs into one zip. Entries carry a fixed timestamp.
fn build_archive(outputs: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default().last_modified_time(zip::DateTime::default());
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for (filename, bytes) in outputs {
        zip.start_file(filename.as_str(), options)?;
        zip.write_all(bytes)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[async_trait::async_trait]
impl<S: Storage, L: LineSource, C: ConfigProvider> Pipeline for ShoppingListPipeline<S, L, C> {
    async fn extract(&self) -> Result<Vec<IngredientLine>> {
        tracing::debug!("Fetching cart lines from {}", self.source.describe());
        self.source.fetch_lines().await
    }

    async fn transform(&self, data: Vec<IngredientLine>) -> Result<TransformResult> {
        let shopping_list = aggregate_strict(&data, self.config.unit_policy())?;

        if !shopping_list.conflicts().is_empty() {
            tracing::warn!(
                "⚠️ {} line(s) used a different unit than the first occurrence of their ingredient",
                shopping_list.conflicts().len()
            );
        }

        Ok(TransformResult {
            shopping_list,
            source_lines: data.len(),
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let formats = self.config.output_formats();
        if formats.is_empty() {
            return Err(BuylistError::ConfigError {
                message: "at least one output format is required".to_string(),
            });
        }

        let mut outputs = Vec::with_capacity(formats.len());
        for format in formats {
            let filename = format!("{}.{}", self.config.output_basename(), format.extension());
            let bytes = self.encode(format, &result.shopping_list)?;
            tracing::info!("📄 Prepared {} ({}, {} bytes)", filename, format.content_type(), bytes.len());
            outputs.push((filename, bytes));
        }

        if let Some(archive_name) = self.config.archive_filename() {
            let archive = build_archive(&outputs)?;
            tracing::debug!(
                "Writing archive {} ({} files, {} bytes)",
                archive_name,
                outputs.len(),
                archive.len()
            );
            self.storage.write_file(archive_name, &archive).await?;
            return Ok(self.output_file(archive_name));
        }

        for (filename, bytes) in &outputs {
            tracing::debug!("Writing {} ({} bytes)", filename, bytes.len());
            self.storage.write_file(filename, bytes).await?;
        }

        // formats 非空，outputs 至少有一筆
        Ok(self.output_file(&outputs[0].0))
    }
}
