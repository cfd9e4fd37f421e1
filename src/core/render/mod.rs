pub mod layout;
pub mod pdf;

pub use layout::{paginate, Page, PageLayout, PlacedLine};

use crate::domain::model::{AggregationResult, DocumentFormat, RenderedDocument};
use crate::utils::error::Result;

pub const DEFAULT_TITLE: &str = "Ingredient list:";

/// Separates pages in the text format.
pub const PAGE_BREAK: &str = "\x0C\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub title: String,
    pub layout: PageLayout,
    pub format: DocumentFormat,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            layout: PageLayout::default(),
            format: DocumentFormat::Text,
        }
    }
}

fn encode_text(pages: &[Page]) -> Vec<u8> {
    let rendered: Vec<String> = pages
        .iter()
        .map(|page| {
            page.all_lines()
                .map(|line| format!("{}\n", line.text))
                .collect::<String>()
        })
        .collect();
    rendered.join(PAGE_BREAK).into_bytes()
}

/// Renders the shopping list into a paginated document.
pub fn render(result: &AggregationResult, options: &RenderOptions) -> Result<RenderedDocument> {
    let pages = paginate(result, &options.title, &options.layout)?;

    let bytes = match options.format {
        DocumentFormat::Text => encode_text(&pages),
        DocumentFormat::Pdf => pdf::encode(&pages, &options.layout)?,
    };

    Ok(RenderedDocument {
        bytes,
        page_count: pages.len(),
        format: options.format,
    })
}

/// Text document with the default title and A4 layout.
pub fn render_text(result: &AggregationResult) -> Result<RenderedDocument> {
    render(result, &RenderOptions::default())
}
