//! Study-note PDF rendering and PDF text extraction

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use studyhelper_common::{Result, StudyHelperError};
use tracing::{debug, info, warn};

/// Label used when the caller gives no note type
pub const DEFAULT_NOTE_TYPE: &str = "General Notes";

// US letter, 1 inch margins
const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 25.4;

const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 12.0;
const LEADING_PT: f32 = 16.0;

/// Characters per body line (Helvetica 12pt across 6.5in)
pub const WRAP_COLUMNS: usize = 80;

/// Body lines that fit between the margins
pub const LINES_PER_PAGE: usize = 40;

/// First page loses title, type line and a blank line
pub const FIRST_PAGE_LINES: usize = LINES_PER_PAGE - 3;

const LAYER_NAME: &str = "Layer 1";

fn pt_to_mm(pt: f32) -> f32 {
    pt * 25.4 / 72.0
}

/// Word-wrap `body`, keeping blank lines as paragraph breaks
pub fn wrap_text(body: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in body.lines() {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            // Hard-split words longer than a line
            while word.len() > columns {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                lines.push(word.drain(..columns).collect());
            }
            let word: String = word.into_iter().collect();
            if word.is_empty() {
                continue;
            }

            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > columns {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Split wrapped lines into pages
pub fn paginate(lines: Vec<String>) -> Vec<Vec<String>> {
    let mut pages = Vec::new();
    let mut iter = lines.into_iter();

    pages.push(iter.by_ref().take(FIRST_PAGE_LINES).collect::<Vec<_>>());
    loop {
        let page: Vec<String> = iter.by_ref().take(LINES_PER_PAGE).collect();
        if page.is_empty() {
            break;
        }
        pages.push(page);
    }

    pages
}

fn builtin_font(doc: &PdfDocumentReference, font: BuiltinFont) -> Result<IndirectFontRef> {
    doc.add_builtin_font(font)
        .map_err(|e| StudyHelperError::pdf(format!("Failed to load font: {}", e)))
}

/// Render study notes as a paginated US-letter PDF
pub fn render_study_notes(title: &str, body: &str, note_type: Option<&str>) -> Result<Vec<u8>> {
    let title = title.trim();
    if title.is_empty() {
        return Err(StudyHelperError::validation("Title must not be empty"));
    }
    if body.trim().is_empty() {
        return Err(StudyHelperError::validation("Content must not be empty"));
    }
    let note_type = note_type
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_NOTE_TYPE);

    let pages = paginate(wrap_text(body, WRAP_COLUMNS));
    info!("Rendering PDF '{}' - {} page(s)", title, pages.len());

    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
    let regular = builtin_font(&doc, BuiltinFont::Helvetica)?;
    let bold = builtin_font(&doc, BuiltinFont::HelveticaBold)?;
    let oblique = builtin_font(&doc, BuiltinFont::HelveticaOblique)?;

    let top = PAGE_HEIGHT_MM - MARGIN_MM;
    let leading = pt_to_mm(LEADING_PT);

    for (index, lines) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
            doc.get_page(page).get_layer(layer)
        };

        let mut y = top - leading;
        if index == 0 {
            layer.use_text(title, TITLE_SIZE, Mm(MARGIN_MM), Mm(y), &bold);
            y -= leading;
            layer.use_text(format!("Type: {}", note_type), BODY_SIZE, Mm(MARGIN_MM), Mm(y), &oblique);
            y -= leading * 2.0;
        }

        for line in lines {
            if !line.is_empty() {
                layer.use_text(line.as_str(), BODY_SIZE, Mm(MARGIN_MM), Mm(y), &regular);
            }
            y -= leading;
        }
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| StudyHelperError::pdf(format!("Failed to write PDF: {}", e)))?;

    debug!("PDF rendered - {} bytes", bytes.len());
    Ok(bytes)
}

/// Whether the bytes carry a PDF header near the start
fn looks_like_pdf(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    head.windows(5).any(|w| w == b"%PDF-")
}

/// Extract text from an uploaded PDF
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    if !looks_like_pdf(bytes) {
        return Err(StudyHelperError::validation("File is not a PDF document"));
    }

    // pdf-extract panics on some malformed documents instead of erroring
    let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| {
            warn!("PDF text extraction panicked on a malformed document");
            StudyHelperError::pdf("Failed to extract text from PDF: malformed document")
        })?
        .map_err(|e| StudyHelperError::pdf(format!("Failed to extract text from PDF: {}", e)))?;

    debug!("Extracted {} chars from PDF", text.len());
    Ok(text.trim().to_string())
}
