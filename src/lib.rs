pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{CartSource, FileSource, HttpSource, LocalStorage};
pub use config::{SourceSpec, TomlConfig};
pub use core::aggregate::{aggregate, aggregate_strict};
pub use core::render::{render, render_text, PageLayout, RenderOptions};
pub use core::{etl::EtlEngine, pipeline::ShoppingListPipeline};
pub use domain::model::{
    AggregatedEntry, AggregationResult, DocumentFormat, IngredientLine, OutputFormat,
    RenderedDocument, UnitConflictPolicy,
};
pub use utils::error::{BuylistError, Result};
