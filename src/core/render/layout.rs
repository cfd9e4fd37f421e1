use crate::domain::model::AggregationResult;
use crate::utils::error::{BuylistError, Result};
use serde::{Deserialize, Serialize};

/// Page geometry in points, measured downward from the top edge.
///
/// The title sits in a header band starting at `top_margin` on the first page.
/// Body lines start at `body_top` on every page and take `line_pitch` each; a
/// line is only placed if it ends above `page_height - bottom_margin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub page_width: u32,
    pub page_height: u32,
    pub left_margin: u32,
    pub top_margin: u32,
    pub body_top: u32,
    pub bottom_margin: u32,
    pub line_pitch: u32,
    pub font_size: u32,
    pub max_line_chars: usize,
}

impl Default for PageLayout {
    // A4 portrait
    fn default() -> Self {
        Self {
            page_width: 595,
            page_height: 842,
            left_margin: 50,
            top_margin: 40,
            body_top: 70,
            bottom_margin: 50,
            line_pitch: 15,
            font_size: 12,
            max_line_chars: 90,
        }
    }
}

impl PageLayout {
    /// Default layout with the page height adjusted so the body holds exactly `lines` lines.
    pub fn with_lines_per_page(lines: usize) -> Result<Self> {
        let base = Self::default();
        let page_height = u32::try_from(lines)
            .ok()
            .and_then(|lines| base.line_pitch.checked_mul(lines))
            .and_then(|body| body.checked_add(base.body_top))
            .and_then(|height| height.checked_add(base.bottom_margin))
            .ok_or_else(|| BuylistError::ConfigValidationError {
                field: "render.lines_per_page".to_string(),
                message: format!("{} lines do not fit on one page", lines),
            })?;
        Ok(Self { page_height, ..base })
    }

    fn body_limit(&self) -> u32 {
        self.page_height.saturating_sub(self.bottom_margin)
    }

    pub fn lines_per_page(&self) -> usize {
        if self.line_pitch == 0 {
            return 0;
        }
        (self.body_limit().saturating_sub(self.body_top) / self.line_pitch) as usize
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |field: &str, message: &str| BuylistError::ConfigValidationError {
            field: format!("render.layout.{}", field),
            message: message.to_string(),
        };

        if self.line_pitch == 0 {
            return Err(invalid("line_pitch", "line pitch must be positive"));
        }
        if self.font_size == 0 || self.font_size > self.line_pitch {
            return Err(invalid("font_size", "font size must be between 1 and the line pitch"));
        }
        // 標題區必須在內文之上
        let title_end = self.top_margin.checked_add(self.line_pitch);
        if title_end.map_or(true, |end| end > self.body_top) {
            return Err(invalid("body_top", "body must start below the title band"));
        }
        if self.lines_per_page() == 0 {
            return Err(invalid("page_height", "page is too short to hold a single line"));
        }
        if self.max_line_chars == 0 {
            return Err(invalid("max_line_chars", "line width must be positive"));
        }
        if self.left_margin >= self.page_width {
            return Err(invalid("left_margin", "left margin must be inside the page"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedLine {
    /// Top of the line slot, from the page's top edge.
    pub y: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub header: Option<PlacedLine>,
    pub lines: Vec<PlacedLine>,
}

impl Page {
    fn new(number: usize) -> Self {
        Self {
            number,
            header: None,
            lines: Vec::new(),
        }
    }

    pub fn all_lines(&self) -> impl Iterator<Item = &PlacedLine> {
        self.header.iter().chain(self.lines.iter())
    }
}

pub fn format_entry(index: usize, name: &str, amount: u64, unit: &str) -> String {
    format!("{}) {} - {}, {}", index, name, amount, unit)
}

fn check_width(line: usize, text: &str, layout: &PageLayout) -> Result<()> {
    let width = text.chars().count();
    if width > layout.max_line_chars {
        return Err(BuylistError::RenderingError {
            line,
            reason: format!(
                "line is {} characters wide, the page fits {}",
                width, layout.max_line_chars
            ),
        });
    }
    Ok(())
}

/// Places the title and one numbered line per entry onto pages.
///
/// Line 0 is the title; entries are numbered from 1 in errors and output.
pub fn paginate(result: &AggregationResult, title: &str, layout: &PageLayout) -> Result<Vec<Page>> {
    layout.validate()?;
    check_width(0, title, layout)?;

    let mut first = Page::new(1);
    first.header = Some(PlacedLine {
        y: layout.top_margin,
        text: title.to_string(),
    });

    let mut pages = vec![first];
    let mut y = layout.body_top;

    for (position, (name, entry)) in result.iter().enumerate() {
        let index = position + 1;
        let text = format_entry(index, name, entry.amount, &entry.unit);
        check_width(index, &text, layout)?;

        if y.saturating_add(layout.line_pitch) > layout.body_limit() {
            pages.push(Page::new(pages.len() + 1));
            y = layout.body_top;
        }

        if let Some(page) = pages.last_mut() {
            page.lines.push(PlacedLine { y, text });
        }
        y += layout.line_pitch;
    }

    tracing::debug!("Laid out {} entries on {} page(s)", result.len(), pages.len());
    Ok(pages)
}
