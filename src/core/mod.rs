pub mod aggregate;
pub mod etl;
pub mod export;
pub mod pipeline;
pub mod render;

pub use crate::domain::model::{IngredientLine, TransformResult};
pub use crate::domain::ports::{ConfigProvider, LineSource, Pipeline, Storage};
pub use crate::utils::error::Result;
