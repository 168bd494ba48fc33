//! Font selection and the text encoding boundary.
//!
//! Every string drawn into the document is first turned into a [`GlyphRun`] by the active font.
//! Width measurement and truncation work on that run, and the run is what ends up in the
//! content stream, so the measured text and the emitted text cannot disagree.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use lopdf::{Document, Object, ObjectId, StringFormat};

use crate::error::SmartFilterResult;

use super::truetype::TrueTypeFont;
use super::{helvetica, PT_PER_MM};

/// Where the document font comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FontSource {
    /// The built-in Helvetica face (cp1252 repertoire only).
    #[default]
    Builtin,
    /// A TrueType file on disk, embedded into the document.
    TrueTypeFile(PathBuf),
    /// TrueType font bytes already in memory, embedded into the document.
    TrueTypeBytes(Arc<Vec<u8>>),
}

/// What to do with characters the active font cannot encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedGlyphs {
    /// Substitute this character. If the font cannot encode it either, the character is dropped.
    Replace(char),
    /// Leave the character out.
    Drop,
}

impl Default for UnsupportedGlyphs {
    fn default() -> Self {
        Self::Replace('?')
    }
}

/// One encoded character: font code, advance width in 1/1000 em, and the source character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Glyph {
    pub(crate) code: u16,
    pub(crate) width: u16,
    pub(crate) ch: char,
}

/// A string after it went through a font's encoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct GlyphRun {
    glyphs: Vec<Glyph>,
}

impl GlyphRun {
    pub(crate) fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Rendered width in millimetres at `size_pt`.
    pub(crate) fn width_mm(&self, size_pt: f32) -> f32 {
        let units: u64 = self.glyphs.iter().map(|g| u64::from(g.width)).sum();
        units as f32 * size_pt / 1000.0 / PT_PER_MM
    }

    /// Drop characters from the end until the run fits in `max_mm`.
    pub(crate) fn truncate_to(&mut self, max_mm: f32, size_pt: f32) {
        while !self.glyphs.is_empty() && self.width_mm(size_pt) > max_mm {
            self.glyphs.pop();
        }
    }

    /// The characters that will actually be drawn.
    pub(crate) fn text(&self) -> String {
        self.glyphs.iter().map(|g| g.ch).collect()
    }
}

/// The font a document is rendered with, after resolving a [`FontSource`].
#[derive(Debug, Clone)]
pub(crate) enum PdfFont {
    Helvetica,
    TrueType(Box<TrueTypeFont>),
}

impl PdfFont {
    /// Resolve `source`, falling back to Helvetica when a TrueType font cannot be loaded.
    pub(crate) fn resolve(source: &FontSource) -> Self {
        let loaded = match source {
            FontSource::Builtin => return Self::Helvetica,
            FontSource::TrueTypeFile(path) => std::fs::read(path)
                .map_err(Into::into)
                .and_then(TrueTypeFont::parse)
                .map_err(|e| (path.display().to_string(), e)),
            FontSource::TrueTypeBytes(bytes) => TrueTypeFont::parse(bytes.to_vec())
                .map_err(|e| ("<memory>".to_string(), e)),
        };
        match loaded {
            Ok(font) => {
                tracing::debug!(font = font.base_name(), "embedding truetype font");
                Self::TrueType(Box::new(font))
            }
            Err((origin, error)) => {
                tracing::warn!(%origin, %error, "font unavailable, falling back to Helvetica");
                Self::Helvetica
            }
        }
    }

    pub(crate) fn is_embedded(&self) -> bool {
        matches!(self, Self::TrueType(_))
    }

    fn glyph(&self, ch: char) -> Option<Glyph> {
        match self {
            Self::Helvetica => helvetica::glyph(ch),
            Self::TrueType(font) => font.glyph(ch),
        }
    }

    /// Encode `text`, applying `policy` to characters without a glyph. Control characters
    /// (tabs, line breaks) are drawn as spaces.
    pub(crate) fn encode(&self, text: &str, policy: UnsupportedGlyphs) -> GlyphRun {
        let mut glyphs = Vec::with_capacity(text.len());
        for ch in text.chars() {
            let ch = if ch.is_control() { ' ' } else { ch };
            if let Some(g) = self.glyph(ch) {
                glyphs.push(g);
                continue;
            }
            if let UnsupportedGlyphs::Replace(sub) = policy {
                if let Some(g) = self.glyph(sub) {
                    glyphs.push(g);
                }
            }
        }
        GlyphRun { glyphs }
    }

    /// The string operand for a `Tj` operator.
    pub(crate) fn operand(&self, run: &GlyphRun) -> Object {
        match self {
            Self::Helvetica => Object::String(
                run.glyphs.iter().map(|g| g.code as u8).collect(),
                StringFormat::Literal,
            ),
            Self::TrueType(_) => Object::String(
                run.glyphs.iter().flat_map(|g| g.code.to_be_bytes()).collect(),
                StringFormat::Hexadecimal,
            ),
        }
    }

    /// Add the font resources to `doc`; `used` lists every glyph drawn.
    pub(crate) fn install(
        &self,
        doc: &mut Document,
        used: &BTreeMap<u16, Glyph>,
    ) -> SmartFilterResult<ObjectId> {
        match self {
            Self::Helvetica => Ok(helvetica::install(doc)),
            Self::TrueType(font) => font.install(doc, used),
        }
    }
}
