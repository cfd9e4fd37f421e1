use crate::core::render::PageLayout;
use crate::domain::model::{IngredientLine, OutputFormat, TransformResult, UnitConflictPolicy};
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

/// Upstream collaborator delivering the cart's raw ingredient rows.
#[async_trait]
pub trait LineSource: Send + Sync {
    async fn fetch_lines(&self) -> Result<Vec<IngredientLine>>;

    fn describe(&self) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> Vec<OutputFormat>;
    fn output_basename(&self) -> &str;
    fn title(&self) -> &str;
    fn page_layout(&self) -> Result<PageLayout>;
    fn unit_policy(&self) -> UnitConflictPolicy;
    /// `Some(filename)` bundles every output into one zip archive.
    fn archive_filename(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<IngredientLine>>;
    async fn transform(&self, data: Vec<IngredientLine>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
