//! PDF document writer.
//!
//! Places layout commands on A4 pages and writes a minimal but valid PDF 1.4
//! file by hand. Uses the built-in Helvetica fonts with WinAnsi encoding, so
//! no external font files are required. Content streams are left
//! uncompressed.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::ExportError;
use crate::layout::{Align, DocumentStyle, FontWeight, LayoutCommand, TextLine};
use crate::metrics::text_width;

/// Document info dictionary entries.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub created_at: NaiveDateTime,
}

/// Lay out `commands` top to bottom, breaking onto new pages as needed, and
/// return the finished PDF bytes.
pub fn render_pdf(
    commands: &[LayoutCommand],
    style: &DocumentStyle,
    info: &DocumentInfo,
) -> Result<Vec<u8>, ExportError> {
    validate_style(style)?;

    let mut pages = Paginator::new(style);
    for command in commands {
        match command {
            LayoutCommand::Text(line) => pages.text(line)?,
            LayoutCommand::Space(height) => pages.space(*height),
        }
    }
    let pages = pages.finish();
    debug!("Rendered {} PDF page(s)", pages.len());

    Ok(PdfBuilder::new(style, info).build(&pages))
}

fn validate_style(style: &DocumentStyle) -> Result<(), ExportError> {
    if !(style.content_width() > 0.0) || !(style.content_height() > 0.0) {
        return Err(ExportError::Layout(format!(
            "page {}x{} leaves no room inside a {} pt inset",
            style.page_width,
            style.page_height,
            style.content_inset()
        )));
    }
    if !(style.line_height > 0.0) {
        return Err(ExportError::Layout(format!(
            "line height must be positive, got {}",
            style.line_height
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Tracks the vertical cursor, measured downward from the top of the
/// content box, and collects one content stream per page.
struct Paginator<'a> {
    style: &'a DocumentStyle,
    pages: Vec<Vec<u8>>,
    current: Vec<u8>,
    cursor: f32,
}

impl<'a> Paginator<'a> {
    fn new(style: &'a DocumentStyle) -> Self {
        Self {
            style,
            pages: Vec::new(),
            current: Vec::new(),
            cursor: 0.0,
        }
    }

    fn text(&mut self, line: &TextLine) -> Result<(), ExportError> {
        if !(line.size > 0.0) {
            return Err(ExportError::Layout(format!(
                "font size must be positive, got {} for {:?}",
                line.size, line.text
            )));
        }

        let leading = line.size * self.style.line_height;
        let width = self.style.content_width();
        for wrapped in wrap_text(&line.text, line.weight, line.size, width) {
            if self.cursor > 0.0 && self.cursor + leading > self.style.content_height() {
                self.break_page();
            }
            self.draw(&wrapped, line);
            self.cursor += leading;
        }
        self.cursor += line.margin_bottom;
        Ok(())
    }

    fn space(&mut self, height: f32) {
        self.cursor += height.max(0.0);
    }

    fn draw(&mut self, text: &str, line: &TextLine) {
        if text.is_empty() {
            return;
        }
        let inset = self.style.content_inset();
        let x = match line.align {
            Align::Left => inset,
            Align::Center => {
                let slack = self.style.content_width() - text_width(text, line.weight, line.size);
                inset + (slack / 2.0).max(0.0)
            }
        };
        let baseline = self.style.page_height - inset - self.cursor - line.size;
        let font = match line.weight {
            FontWeight::Bold => "F1",
            FontWeight::Regular => "F2",
        };

        let out = &mut self.current;
        out.extend_from_slice(b"BT\n");
        out.extend_from_slice(format!("/{font} {:.2} Tf\n", line.size).as_bytes());
        out.extend_from_slice(format!("{x:.2} {baseline:.2} Td\n").as_bytes());
        out.push(b'(');
        out.extend_from_slice(&pdf_string(text));
        out.extend_from_slice(b") Tj\nET\n");
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor = 0.0;
    }

    /// Always yields at least one page.
    fn finish(mut self) -> Vec<Vec<u8>> {
        if self.pages.is_empty() || !self.current.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

/// Greedy word wrap against `max_width`. Text that already fits is returned
/// untouched; words wider than a full line are split between characters.
fn wrap_text(text: &str, weight: FontWeight, size: f32, max_width: f32) -> Vec<String> {
    if text_width(text, weight, size) <= max_width {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width(&candidate, weight, size) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if text_width(word, weight, size) <= max_width {
            current = word.to_string();
        } else {
            for piece in split_long_word(word, weight, size, max_width) {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current = piece;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_long_word(word: &str, weight: FontWeight, size: f32, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for c in word.chars() {
        piece.push(c);
        if piece.chars().count() > 1 && text_width(&piece, weight, size) > max_width {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(c);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

// ---------------------------------------------------------------------------
// String encoding
// ---------------------------------------------------------------------------

/// Encode text as the body of a PDF literal string in WinAnsi, escaping the
/// string delimiters. Characters WinAnsi cannot represent become `?`.
fn pdf_string(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' | '(' | ')' => {
                out.push(b'\\');
                out.push(c as u8);
            }
            c if c.is_control() => out.push(b' '),
            c => out.push(win_ansi_byte(c)),
        }
    }
    out
}

fn win_ansi_byte(c: char) -> u8 {
    match c as u32 {
        code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
        _ => match c {
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            _ => b'?',
        },
    }
}

// ---------------------------------------------------------------------------
// File assembly
// ---------------------------------------------------------------------------

/// Object layout: 1 catalog, 2 page tree, 3-4 fonts, 5 info, then a
/// page object and its content stream for each page.
const FIRST_PAGE_OBJ: usize = 6;

struct PdfBuilder<'a> {
    style: &'a DocumentStyle,
    info: &'a DocumentInfo,
}

impl<'a> PdfBuilder<'a> {
    fn new(style: &'a DocumentStyle, info: &'a DocumentInfo) -> Self {
        Self { style, info }
    }

    fn build(&self, pages: &[Vec<u8>]) -> Vec<u8> {
        let mut pdf: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = Vec::new();

        pdf.extend_from_slice(b"%PDF-1.4\n");

        offsets.push(pdf.len());
        pdf.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

        let kids: Vec<String> = (0..pages.len())
            .map(|i| format!("{} 0 R", FIRST_PAGE_OBJ + 2 * i))
            .collect();
        offsets.push(pdf.len());
        pdf.extend_from_slice(
            format!(
                "2 0 obj\n<< /Type /Pages /Kids [{}] /Count {} >>\nendobj\n",
                kids.join(" "),
                pages.len()
            )
            .as_bytes(),
        );

        offsets.push(pdf.len());
        pdf.extend_from_slice(
            b"3 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>\nendobj\n",
        );

        offsets.push(pdf.len());
        pdf.extend_from_slice(
            b"4 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>\nendobj\n",
        );

        offsets.push(pdf.len());
        pdf.extend_from_slice(b"5 0 obj\n<< /Title (");
        pdf.extend_from_slice(&pdf_string(&self.info.title));
        pdf.extend_from_slice(
            format!(
                ") /Producer (Posture) /CreationDate (D:{}) >>\nendobj\n",
                self.info.created_at.format("%Y%m%d%H%M%S")
            )
            .as_bytes(),
        );

        for (i, content) in pages.iter().enumerate() {
            let page_obj = FIRST_PAGE_OBJ + 2 * i;
            let content_obj = page_obj + 1;

            offsets.push(pdf.len());
            pdf.extend_from_slice(
                format!(
                    "{page_obj} 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                     /Contents {content_obj} 0 R /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> >>\nendobj\n",
                    self.style.page_width, self.style.page_height
                )
                .as_bytes(),
            );

            offsets.push(pdf.len());
            pdf.extend_from_slice(
                format!("{content_obj} 0 obj\n<< /Length {} >>\nstream\n", content.len()).as_bytes(),
            );
            pdf.extend_from_slice(content);
            pdf.extend_from_slice(b"\nendstream\nendobj\n");
        }

        // Cross-reference table
        let xref_offset = pdf.len();
        let num_objects = offsets.len() + 1; // +1 for free entry
        pdf.extend_from_slice(format!("xref\n0 {num_objects}\n").as_bytes());
        pdf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &offsets {
            pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }

        pdf.extend_from_slice(
            format!("trailer\n<< /Size {num_objects} /Root 1 0 R /Info 5 0 R >>\n").as_bytes(),
        );
        pdf.extend_from_slice(format!("startxref\n{xref_offset}\n%%EOF\n").as_bytes());

        pdf
    }
}
