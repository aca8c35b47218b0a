use printpdf::{BuiltinFont, Mm, PdfDocument, Pt};

use crate::error::{Result, VidbriefError};

// A4 in points, matching the layout of the original export:
// text starts at y=800, wraps to a new page below y=50.
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_LEFT_PT: f32 = 40.0;
const TOP_Y_PT: f32 = 800.0;
const BOTTOM_Y_PT: f32 = 50.0;
const LEADING_PT: f32 = 16.0;
const FONT_SIZE_PT: f32 = 11.0;
const MAX_LINE_CHARS: usize = 100;

/// Split summary text into pages of width-truncated lines.
///
/// Line order is never changed and no line is dropped; lines wider than
/// [`MAX_LINE_CHARS`] are truncated, not wrapped. Always yields at least
/// one (possibly empty) page.
pub fn paginate(text: &str) -> Vec<Vec<String>> {
    let lines_per_page = (((TOP_Y_PT - BOTTOM_Y_PT) / LEADING_PT) as usize) + 1;

    let mut pages: Vec<Vec<String>> = vec![Vec::new()];
    for line in text.lines() {
        if pages
            .last()
            .is_some_and(|page| page.len() >= lines_per_page)
        {
            pages.push(Vec::new());
        }
        let truncated: String = line.chars().take(MAX_LINE_CHARS).collect();
        if let Some(page) = pages.last_mut() {
            page.push(truncated);
        }
    }

    pages
}

/// Render line-delimited summary text as a downloadable PDF byte stream.
pub fn render_summary_pdf(text: &str) -> Result<Vec<u8>> {
    let pages = paginate(text);

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Video Summary",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| VidbriefError::PdfFailed {
            reason: e.to_string(),
        })?;

    for (page_idx, lines) in pages.iter().enumerate() {
        let layer = if page_idx == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            doc.get_page(page).get_layer(layer)
        };

        let mut y = TOP_Y_PT;
        for line in lines {
            if !line.is_empty() {
                layer.use_text(
                    line.clone(),
                    FONT_SIZE_PT,
                    Mm::from(Pt(MARGIN_LEFT_PT)),
                    Mm::from(Pt(y)),
                    &font,
                );
            }
            y -= LEADING_PT;
        }
    }

    doc.save_to_bytes().map_err(|e| VidbriefError::PdfFailed {
        reason: e.to_string(),
    })
}
