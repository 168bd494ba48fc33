//! Embedded TrueType fonts (Type0 / CIDFontType2, Identity-H).
//!
//! Text is written as big-endian glyph ids, so anything the font has a glyph for can be shown,
//! including scripts outside cp1252. A ToUnicode map keeps the text extractable.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;

use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use ttf_parser::{name_id, Face};

use crate::error::{SmartFilterError, SmartFilterResult};

use super::font::Glyph;

const BFCHAR_CHUNK: usize = 100;

/// A parsed TrueType font: raw bytes for embedding plus the metrics the layout needs.
#[derive(Debug, Clone)]
pub(crate) struct TrueTypeFont {
    data: Vec<u8>,
    base_name: String,
    // char -> (glyph id, advance in 1/1000 em)
    cmap: HashMap<char, (u16, u16)>,
    ascent: i64,
    descent: i64,
    cap_height: i64,
    bbox: [i64; 4],
}

impl TrueTypeFont {
    pub(crate) fn parse(data: Vec<u8>) -> SmartFilterResult<Self> {
        let face = Face::parse(&data, 0)
            .map_err(|e| SmartFilterError::invalid(format!("unusable font: {e}")))?;
        let upem = i64::from(face.units_per_em().max(1));
        let scale = |v: i64| v * 1000 / upem;

        let mut cmap: HashMap<char, (u16, u16)> = HashMap::new();
        if let Some(table) = face.tables().cmap {
            for subtable in table.subtables {
                if !subtable.is_unicode() {
                    continue;
                }
                subtable.codepoints(|cp| {
                    let Some(ch) = char::from_u32(cp) else {
                        return;
                    };
                    if cmap.contains_key(&ch) {
                        return;
                    }
                    if let Some(gid) = subtable.glyph_index(cp) {
                        if gid.0 == 0 {
                            return;
                        }
                        let advance = face.glyph_hor_advance(gid).unwrap_or(0);
                        let width = scale(i64::from(advance)).clamp(0, i64::from(u16::MAX)) as u16;
                        cmap.insert(ch, (gid.0, width));
                    }
                });
            }
        }
        if cmap.is_empty() {
            return Err(SmartFilterError::invalid("font has no unicode character map"));
        }

        let base_name = face
            .names()
            .into_iter()
            .filter(|n| n.name_id == name_id::POST_SCRIPT_NAME)
            .find_map(|n| n.to_string())
            .map(|n| pdf_name(&n))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "EmbeddedFont".to_string());

        let bb = face.global_bounding_box();
        let ascent = scale(i64::from(face.ascender()));
        Ok(Self {
            base_name,
            ascent,
            descent: scale(i64::from(face.descender())),
            cap_height: face
                .capital_height()
                .map(|h| scale(i64::from(h)))
                .unwrap_or(ascent),
            bbox: [
                scale(i64::from(bb.x_min)),
                scale(i64::from(bb.y_min)),
                scale(i64::from(bb.x_max)),
                scale(i64::from(bb.y_max)),
            ],
            cmap,
            data,
        })
    }

    pub(crate) fn glyph(&self, ch: char) -> Option<Glyph> {
        self.cmap
            .get(&ch)
            .map(|&(code, width)| Glyph { code, width, ch })
    }

    pub(crate) fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Write the font program and its dictionaries; returns the Type0 font object id.
    pub(crate) fn install(
        &self,
        doc: &mut Document,
        used: &BTreeMap<u16, Glyph>,
    ) -> SmartFilterResult<ObjectId> {
        let font_file_id = doc.add_object(Stream::new(
            dictionary! { "Length1" => self.data.len() as i64 },
            self.data.clone(),
        ));

        let descriptor_id = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => Object::Name(self.base_name.as_bytes().to_vec()),
            "Flags" => 32,
            "FontBBox" => self.bbox.iter().map(|&v| Object::Integer(v)).collect::<Vec<_>>(),
            "ItalicAngle" => 0,
            "Ascent" => self.ascent,
            "Descent" => self.descent,
            "CapHeight" => self.cap_height,
            "StemV" => 80,
            "FontFile2" => font_file_id,
        });

        let mut widths: Vec<Object> = Vec::with_capacity(used.len() * 2);
        for (gid, glyph) in used {
            widths.push(Object::Integer(i64::from(*gid)));
            widths.push(Object::Array(vec![Object::Integer(i64::from(glyph.width))]));
        }

        let cid_font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => Object::Name(self.base_name.as_bytes().to_vec()),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0,
            },
            "FontDescriptor" => descriptor_id,
            "DW" => 1000,
            "W" => widths,
            "CIDToGIDMap" => "Identity",
        });

        let to_unicode_id = doc.add_object(Stream::new(
            dictionary! {},
            to_unicode_cmap(used).into_bytes(),
        ));

        Ok(doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => Object::Name(self.base_name.as_bytes().to_vec()),
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Reference(cid_font_id)],
            "ToUnicode" => to_unicode_id,
        }))
    }
}

fn pdf_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
        .collect()
}

fn to_unicode_cmap(used: &BTreeMap<u16, Glyph>) -> String {
    let mut out = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );

    let entries: Vec<(&u16, &Glyph)> = used.iter().collect();
    for chunk in entries.chunks(BFCHAR_CHUNK) {
        let _ = writeln!(out, "{} beginbfchar", chunk.len());
        for (gid, glyph) in chunk {
            let mut utf16 = [0u16; 2];
            let units = glyph.ch.encode_utf16(&mut utf16);
            let hex: String = units.iter().map(|u| format!("{u:04X}")).collect();
            let _ = writeln!(out, "<{gid:04X}> <{hex}>");
        }
        out.push_str("endbfchar\n");
    }

    out.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    out
}
