// 最小的 PDF 1.4 輸出：單一 Helvetica 字型，每個 layout page 對應一個 PDF page。
// 不寫入建立時間等中繼資料，同樣輸入會得到同樣的位元組。

use super::layout::{Page, PageLayout, PlacedLine};
use crate::utils::error::{BuylistError, Result};
use std::io::Write;

/// Escapes a line into a PDF literal string body (WinAnsi / Latin-1 bytes).
fn encode_literal(line: usize, text: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(ch as u8);
            }
            ' '..='~' | '\u{A0}'..='\u{FF}' => out.push(ch as u32 as u8),
            other => {
                return Err(BuylistError::RenderingError {
                    line,
                    reason: format!(
                        "character {:?} cannot be encoded with the built-in PDF font",
                        other
                    ),
                })
            }
        }
    }
    Ok(out)
}

fn content_stream(page: &Page, layout: &PageLayout, first_index: usize) -> Result<Vec<u8>> {
    let mut stream = Vec::new();
    writeln!(stream, "BT")?;
    writeln!(stream, "/F1 {} Tf", layout.font_size)?;

    let mut draw = |line_no: usize, placed: &PlacedLine| -> Result<()> {
        // PDF 座標原點在左下角，基線 = 行頂 + 字高
        let baseline = layout
            .page_height
            .saturating_sub(placed.y.saturating_add(layout.font_size));
        writeln!(stream, "1 0 0 1 {} {} Tm", layout.left_margin, baseline)?;
        stream.push(b'(');
        stream.extend_from_slice(&encode_literal(line_no, &placed.text)?);
        stream.extend_from_slice(b") Tj\n");
        Ok(())
    };

    if let Some(header) = &page.header {
        draw(0, header)?;
    }
    for (offset, placed) in page.lines.iter().enumerate() {
        draw(first_index + offset, placed)?;
    }

    writeln!(stream, "ET")?;
    Ok(stream)
}

struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        Self {
            buf: b"%PDF-1.4\n".to_vec(),
            offsets: Vec::new(),
        }
    }

    fn object(&mut self, body: &[u8]) -> Result<()> {
        let number = self.offsets.len() + 1;
        self.offsets.push(self.buf.len());
        writeln!(self.buf, "{} 0 obj", number)?;
        self.buf.extend_from_slice(body);
        self.buf.extend_from_slice(b"\nendobj\n");
        Ok(())
    }

    fn stream_object(&mut self, data: &[u8]) -> Result<()> {
        let mut body = Vec::with_capacity(data.len() + 48);
        writeln!(body, "<< /Length {} >>", data.len())?;
        body.extend_from_slice(b"stream\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"endstream");
        self.object(&body)
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        let xref_offset = self.buf.len();
        let size = self.offsets.len() + 1;
        writeln!(self.buf, "xref")?;
        writeln!(self.buf, "0 {}", size)?;
        self.buf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &self.offsets {
            writeln!(self.buf, "{:010} 00000 n ", offset)?;
        }
        writeln!(self.buf, "trailer")?;
        writeln!(self.buf, "<< /Size {} /Root 1 0 R >>", size)?;
        writeln!(self.buf, "startxref")?;
        writeln!(self.buf, "{}", xref_offset)?;
        self.buf.extend_from_slice(b"%%EOF\n");
        Ok(self.buf)
    }
}

/// Object layout: 1 catalog, 2 page tree, 3 font, then (page, content) pairs.
pub fn encode(pages: &[Page], layout: &PageLayout) -> Result<Vec<u8>> {
    let mut writer = PdfWriter::new();

    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", 4 + 2 * i))
        .collect();

    writer.object(b"<< /Type /Catalog /Pages 2 0 R >>")?;
    writer.object(
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        )
        .as_bytes(),
    )?;
    writer.object(
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    )?;

    let mut first_index = 1;
    for (i, page) in pages.iter().enumerate() {
        let content_ref = 5 + 2 * i;
        writer.object(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                layout.page_width, layout.page_height, content_ref
            )
            .as_bytes(),
        )?;
        writer.stream_object(&content_stream(page, layout, first_index)?)?;
        first_index += page.lines.len();
    }

    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_literal_escapes_parentheses() {
        assert_eq!(encode_literal(1, "1) Flour (fine)").unwrap(), b"1\\) Flour \\(fine\\)".to_vec());
        assert_eq!(encode_literal(1, "Crème").unwrap(), vec![b'C', b'r', 0xE8, b'm', b'e']);
    }

    #[test]
    fn test_encode_literal_rejects_unsupported_characters() {
        let err = encode_literal(4, "Мука").unwrap_err();
        assert!(matches!(err, BuylistError::RenderingError { line: 4, .. }));
    }

    #[test]
    fn test_line_near_page_bottom_clamps_baseline() {
        let layout = PageLayout::default();
        let page = Page {
            number: 1,
            header: None,
            lines: vec![PlacedLine {
                y: u32::MAX,
                text: "1) Salt - 5, g".to_string(),
            }],
        };

        let stream = String::from_utf8(content_stream(&page, &layout, 1).unwrap()).unwrap();
        assert!(stream.contains("1 0 0 1 50 0 Tm"));
    }

    #[test]
    fn test_xref_points_at_objects() {
        let layout = PageLayout::default();
        let page = Page {
            number: 1,
            header: Some(PlacedLine {
                y: layout.top_margin,
                text: "Ingredient list:".to_string(),
            }),
            lines: vec![],
        };
        let bytes = encode(&[page], &layout).unwrap();
        let text = String::from_utf8_lossy(&bytes);

        let startxref = text.rfind("startxref\n").unwrap();
        let xref_offset: usize = text[startxref + 10..].lines().next().unwrap().parse().unwrap();
        assert!(text[xref_offset..].starts_with("xref\n0 6\n"));

        let first_entry = &text[xref_offset + "xref\n0 6\n".len() + 20..][..10];
        let offset: usize = first_entry.parse().unwrap();
        assert!(text[offset..].starts_with("1 0 obj"));
    }
}
