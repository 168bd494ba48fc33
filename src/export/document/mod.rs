//! Paginated PDF table export.
//!
//! The page is A4 landscape. Columns share the fixed content width equally, and every header or
//! body cell is cut from the right until it fits its column (minus the cell padding). Rows that
//! would cross the bottom break line start a new page.

mod font;
mod helvetica;
mod truetype;

use std::collections::BTreeMap;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, StringFormat, Stream};

use crate::error::SmartFilterResult;
use crate::types::DataSet;

pub use font::{FontSource, UnsupportedGlyphs};

use font::{Glyph, GlyphRun, PdfFont};

pub(crate) const PT_PER_MM: f32 = 72.0 / 25.4;

/// A4 landscape page width.
pub const PAGE_WIDTH_MM: f32 = 297.0;
/// A4 landscape page height.
pub const PAGE_HEIGHT_MM: f32 = 210.0;
/// Left/top/right page margin.
pub const MARGIN_MM: f32 = 10.0;
/// Width shared by the table columns.
pub const CONTENT_WIDTH_MM: f32 = 280.0;
/// Distance from the bottom edge at which a new page is started.
pub const PAGE_BREAK_MARGIN_MM: f32 = 20.0;
/// Height of a header or body row.
pub const ROW_HEIGHT_MM: f32 = 8.0;
/// Height of the title line.
pub const TITLE_HEIGHT_MM: f32 = 10.0;
/// Horizontal padding on each side of a cell's text.
pub const CELL_PADDING_MM: f32 = 1.0;

const LINE_WIDTH_MM: f32 = 0.2;
const FONT_RESOURCE: &str = "F1";

/// Text drawn instead of a table when the dataset has no rows.
pub const NO_DATA_TEXT: &str = "No Data Found";

/// Options controlling [`render_document`].
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOptions {
    /// Font to embed; falls back to Helvetica if it cannot be loaded.
    pub font: FontSource,
    /// Font size (pt) when the built-in face is used.
    pub builtin_font_size: f32,
    /// Font size (pt) when a TrueType font is embedded.
    pub embedded_font_size: f32,
    /// Policy for characters the font cannot encode.
    pub unsupported_glyphs: UnsupportedGlyphs,
    /// Draw the header row again at the top of every continuation page.
    pub repeat_header: bool,
    /// Flate-compress content streams.
    pub compress: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            font: FontSource::Builtin,
            builtin_font_size: 10.0,
            embedded_font_size: 12.0,
            unsupported_glyphs: UnsupportedGlyphs::default(),
            repeat_header: false,
            compress: true,
        }
    }
}

/// Cell text after encoding and truncation.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    /// Characters that will be drawn.
    pub text: String,
    /// Rendered width in millimetres.
    pub width_mm: f32,
}

/// Encodes and truncates cell text with the font a document would use.
#[derive(Debug, Clone)]
pub struct TextFitter {
    font: PdfFont,
    size_pt: f32,
    policy: UnsupportedGlyphs,
}

impl TextFitter {
    /// Resolve the font in `options` (with fallback) and pick the matching size.
    pub fn new(options: &DocumentOptions) -> Self {
        let font = PdfFont::resolve(&options.font);
        let size_pt = if font.is_embedded() {
            options.embedded_font_size
        } else {
            options.builtin_font_size
        };
        Self {
            font,
            size_pt,
            policy: options.unsupported_glyphs,
        }
    }

    /// `true` if a TrueType font is embedded, `false` for the built-in fallback.
    pub fn is_embedded(&self) -> bool {
        self.font.is_embedded()
    }

    /// Font size in points.
    pub fn font_size(&self) -> f32 {
        self.size_pt
    }

    /// Text bound for a column of `column_width_mm`.
    pub fn text_bound(column_width_mm: f32) -> f32 {
        column_width_mm - 2.0 * CELL_PADDING_MM
    }

    /// Encode `text` and cut it to fit a column of `column_width_mm`.
    pub fn fit(&self, text: &str, column_width_mm: f32) -> FittedText {
        let run = self.fit_run(text, column_width_mm);
        FittedText {
            text: run.text(),
            width_mm: run.width_mm(self.size_pt),
        }
    }

    fn encode(&self, text: &str) -> GlyphRun {
        self.font.encode(text, self.policy)
    }

    fn fit_run(&self, text: &str, column_width_mm: f32) -> GlyphRun {
        let mut run = self.encode(text);
        run.truncate_to(Self::text_bound(column_width_mm), self.size_pt);
        run
    }
}

/// Render `dataset` as a landscape A4 PDF with `title` above the table.
///
/// A dataset without rows produces a single page with the title and [`NO_DATA_TEXT`].
/// Characters the font cannot draw are handled by [`DocumentOptions::unsupported_glyphs`];
/// rendering never fails because of cell content.
pub fn render_document(
    dataset: &DataSet,
    title: &str,
    options: &DocumentOptions,
) -> SmartFilterResult<Vec<u8>> {
    let fitter = TextFitter::new(options);
    let mut page = PageWriter::new(&fitter);
    page.add_page();

    let title_run = fitter.encode(title);
    page.cell(
        MARGIN_MM,
        PAGE_WIDTH_MM - 2.0 * MARGIN_MM,
        TITLE_HEIGHT_MM,
        &title_run,
        false,
        Align::Left,
    );
    page.line_feed(TITLE_HEIGHT_MM);

    if dataset.is_empty() {
        let notice = fitter.encode(NO_DATA_TEXT);
        page.cell(
            MARGIN_MM,
            PAGE_WIDTH_MM - 2.0 * MARGIN_MM,
            TITLE_HEIGHT_MM,
            &notice,
            false,
            Align::Center,
        );
        page.line_feed(TITLE_HEIGHT_MM);
    } else {
        let column_count = dataset.column_count().max(1);
        let col_width = CONTENT_WIDTH_MM / column_count as f32;
        let header: Vec<GlyphRun> = dataset
            .schema
            .column_names()
            .map(|name| fitter.fit_run(name, col_width))
            .collect();

        page.row(&header, col_width);
        for row in &dataset.rows {
            if page.needs_break(ROW_HEIGHT_MM) {
                page.add_page();
                if options.repeat_header {
                    page.row(&header, col_width);
                }
            }
            let cells: Vec<GlyphRun> = row
                .iter()
                .map(|v| fitter.fit_run(v.display(), col_width))
                .collect();
            page.row(&cells, col_width);
        }
    }

    let page_count = page.pages.len();
    let bytes = page.finish(title, options.compress)?;
    tracing::debug!(
        title,
        rows = dataset.row_count(),
        pages = page_count,
        embedded_font = fitter.is_embedded(),
        bytes = bytes.len(),
        "document rendered"
    );
    Ok(bytes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

// Layout cursor in millimetres from the top-left corner; converted to PDF space on output.
struct PageWriter<'a> {
    fitter: &'a TextFitter,
    pages: Vec<Vec<Operation>>,
    y: f32,
    used: BTreeMap<u16, Glyph>,
}

impl<'a> PageWriter<'a> {
    fn new(fitter: &'a TextFitter) -> Self {
        Self {
            fitter,
            pages: Vec::new(),
            y: MARGIN_MM,
            used: BTreeMap::new(),
        }
    }

    fn add_page(&mut self) {
        self.pages
            .push(vec![Operation::new("w", vec![real(LINE_WIDTH_MM * PT_PER_MM)])]);
        self.y = MARGIN_MM;
    }

    fn needs_break(&self, height: f32) -> bool {
        self.y + height > PAGE_HEIGHT_MM - PAGE_BREAK_MARGIN_MM
    }

    fn line_feed(&mut self, height: f32) {
        self.y += height;
    }

    fn row(&mut self, cells: &[GlyphRun], col_width: f32) {
        let mut x = MARGIN_MM;
        for run in cells {
            self.cell(x, col_width, ROW_HEIGHT_MM, run, true, Align::Left);
            x += col_width;
        }
        self.line_feed(ROW_HEIGHT_MM);
    }

    fn cell(&mut self, x: f32, w: f32, h: f32, run: &GlyphRun, border: bool, align: Align) {
        let mut ops = Vec::new();
        if border {
            ops.push(Operation::new(
                "re",
                vec![
                    real(x * PT_PER_MM),
                    real((PAGE_HEIGHT_MM - self.y) * PT_PER_MM),
                    real(w * PT_PER_MM),
                    real(-h * PT_PER_MM),
                ],
            ));
            ops.push(Operation::new("S", vec![]));
        }

        if !run.is_empty() {
            let size = self.fitter.size_pt;
            let text_x = match align {
                Align::Left => x + CELL_PADDING_MM,
                Align::Center => x + (w - run.width_mm(size)) / 2.0,
            };
            // Baseline sits a little below the vertical centre of the cell.
            let baseline = self.y + 0.5 * h + 0.3 * size / PT_PER_MM;
            ops.push(Operation::new("BT", vec![]));
            ops.push(Operation::new(
                "Tf",
                vec![Object::Name(FONT_RESOURCE.as_bytes().to_vec()), real(size)],
            ));
            ops.push(Operation::new(
                "Td",
                vec![
                    real(text_x * PT_PER_MM),
                    real((PAGE_HEIGHT_MM - baseline) * PT_PER_MM),
                ],
            ));
            ops.push(Operation::new("Tj", vec![self.fitter.font.operand(run)]));
            ops.push(Operation::new("ET", vec![]));

            for g in run.glyphs() {
                self.used.entry(g.code).or_insert(*g);
            }
        }

        if let Some(page) = self.pages.last_mut() {
            page.extend(ops);
        }
    }

    fn finish(self, title: &str, compress: bool) -> SmartFilterResult<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = self.fitter.font.install(&mut doc, &self.used)?;
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { FONT_RESOURCE => font_id },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    real(PAGE_WIDTH_MM * PT_PER_MM),
                    real(PAGE_HEIGHT_MM * PT_PER_MM),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let producer = concat!("smart-filter ", env!("CARGO_PKG_VERSION"));
        let info_id = doc.add_object(dictionary! {
            "Title" => text_string(title),
            "Producer" => Object::string_literal(producer),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        if compress {
            doc.compress();
        }
        let mut out = Vec::new();
        doc.save_to(&mut out)?;
        Ok(out)
    }
}

fn real(v: f32) -> Object {
    Object::Real(v.into())
}

// PDF text strings: plain ASCII stays literal, anything else is UTF-16BE with a BOM.
fn text_string(s: &str) -> Object {
    if s.is_ascii() {
        Object::string_literal(s)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        bytes.extend(s.encode_utf16().flat_map(u16::to_be_bytes));
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}

#[cfg(test)]
mod tests {
    use super::{text_string, DocumentOptions, TextFitter, CONTENT_WIDTH_MM};
    use lopdf::{Object, StringFormat};

    #[test]
    fn fitted_text_respects_the_column_bound() {
        let fitter = TextFitter::new(&DocumentOptions::default());
        let col = CONTENT_WIDTH_MM / 12.0;
        for text in [
            "A fairly long customer name that will not fit",
            "ÄÖÜßäöüéèà ÄÖÜßäöüéèà ÄÖÜßäöüéèà",
            "ภาษาไทย ภาษาไทย ภาษาไทย ภาษาไทย ภาษาไทย",
            "漢字漢字漢字漢字漢字漢字漢字漢字漢字漢字",
            "",
        ] {
            let fitted = fitter.fit(text, col);
            assert!(
                fitted.width_mm <= TextFitter::text_bound(col),
                "{text:?} -> {fitted:?}"
            );
        }
    }

    #[test]
    fn short_text_is_not_truncated() {
        let fitter = TextFitter::new(&DocumentOptions::default());
        assert_eq!(fitter.fit("North", 40.0).text, "North");
    }

    #[test]
    fn narrow_columns_can_truncate_to_nothing() {
        let fitter = TextFitter::new(&DocumentOptions::default());
        let fitted = fitter.fit("Anything", 2.0);
        assert_eq!(fitted.text, "");
        assert_eq!(fitted.width_mm, 0.0);
    }

    #[test]
    fn builtin_font_uses_builtin_size() {
        let fitter = TextFitter::new(&DocumentOptions::default());
        assert!(!fitter.is_embedded());
        assert_eq!(fitter.font_size(), 10.0);
    }

    #[test]
    fn non_ascii_titles_are_utf16() {
        match text_string("Report") {
            Object::String(bytes, StringFormat::Literal) => assert_eq!(bytes, b"Report"),
            other => panic!("unexpected {other:?}"),
        }
        match text_string("รายงาน") {
            Object::String(bytes, StringFormat::Hexadecimal) => {
                assert_eq!(&bytes[..4], &[0xFE, 0xFF, 0x0E, 0x23]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
