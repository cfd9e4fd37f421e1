use crate::adapters::{FileSource, HttpSource, LocalStorage};
use crate::config::SourceSpec;
use crate::core::{IngredientLine, LineSource};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The configured cart source, picked at startup from a [`SourceSpec`].
pub enum CartSource {
    File(FileSource<LocalStorage>),
    Api(HttpSource),
}

impl CartSource {
    /// Relative file paths resolve against the working directory.
    pub fn from_spec(spec: &SourceSpec) -> Result<Self> {
        match spec {
            SourceSpec::File { path } => {
                let storage = LocalStorage::new(".".to_string());
                Ok(CartSource::File(FileSource::new(storage, path.clone())?))
            }
            SourceSpec::Api {
                endpoint,
                token,
                timeout_seconds,
            } => Ok(CartSource::Api(HttpSource::new(
                endpoint.clone(),
                token.clone(),
                *timeout_seconds,
            )?)),
        }
    }
}

#[async_trait]
impl LineSource for CartSource {
    async fn fetch_lines(&self) -> Result<Vec<IngredientLine>> {
        match self {
            CartSource::File(source) => source.fetch_lines().await,
            CartSource::Api(source) => source.fetch_lines().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            CartSource::File(source) => source.describe(),
            CartSource::Api(source) => source.describe(),
        }
    }
}
