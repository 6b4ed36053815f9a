//! Adafruit GFX font headers: parsing, serialization and the registry
//! consulted by text items for bounds and drawing.

use crate::error::{Error, Result};
use crate::util::{parse_number, sanitize_identifier};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GfxGlyph {
    pub byte_offset: usize,
    pub width: i32,
    pub height: i32,
    pub x_advance: i32,
    pub delta_x: i32,
    pub delta_y: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GfxFont {
    pub name: String,
    pub bytes: Vec<u8>,
    pub glyphs: Vec<GfxGlyph>,
    pub ascii_start: i32,
    pub ascii_end: i32,
    pub y_advance: i32,
    /// Derived from the largest upward glyph offset; not part of the header.
    pub baseline: i32,
    /// Built-in fonts are available without being part of the exported file.
    #[serde(default)]
    pub is_builtin: bool,
}

impl GfxFont {
    pub fn glyph(&self, c: char) -> Option<&GfxGlyph> {
        let index = (c as i32).checked_sub(self.ascii_start)?;
        if index < 0 {
            return None;
        }
        self.glyphs.get(index as usize)
    }

    pub fn glyph_bit(&self, glyph: &GfxGlyph, x: i32, y: i32) -> bool {
        let i = (y * glyph.width + x) as usize;
        let byte_index = glyph.byte_offset + i / 8;
        let bit = 7 - (i % 8) as u32;
        self.bytes
            .get(byte_index)
            .is_some_and(|byte| byte & (1 << bit) != 0)
    }
}

static FONT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)GFXfont\s+(\w+).+(\s[0-9a-zA-Z]+,\s+[0-9a-zA-Z]+,\s+[0-9a-zA-Z]+)")
        .expect("valid font regex")
});
static BITMAPS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Bitmaps.*=\s+\{([^}]+)").expect("valid bitmaps regex"));
static GLYPH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\s*-?[a-zA-Z0-9]+\s*,?){6}\}").expect("valid glyph regex"));

/// Parse a GFX font header. The only fallible parse in the engine: input
/// without the structural markers is rejected as malformed.
pub fn parse_font(code: &str) -> Result<GfxFont> {
    let font = FONT_RE
        .captures(code)
        .ok_or(Error::MalformedFont("no GFXfont declaration found"))?;

    let name = font[1].to_owned();
    let mut character_info = font[2].split(',').map(parse_number);
    let ascii_start = character_info.next().unwrap_or(0.0) as i32;
    let ascii_end = character_info.next().unwrap_or(0.0) as i32;
    let y_advance = character_info.next().unwrap_or(0.0) as i32;

    let bytes: Vec<u8> = BITMAPS_RE
        .captures(code)
        .ok_or(Error::MalformedFont("no bitmaps found"))?[1]
        .split(',')
        .filter(|v| !v.trim().is_empty())
        .map(|v| parse_number(v) as u8)
        .collect();

    let mut baseline = 0;
    let glyphs: Vec<GfxGlyph> = GLYPH_RE
        .find_iter(code)
        .map(|m| {
            let mut numbers = m
                .as_str()
                .trim_matches(['{', '}'])
                .split(',')
                .map(parse_number);
            let mut next = || numbers.next().unwrap_or(0.0) as i32;
            let glyph = GfxGlyph {
                byte_offset: next().max(0) as usize,
                width: next(),
                height: next(),
                x_advance: next(),
                delta_x: next(),
                delta_y: next(),
            };
            baseline = baseline.max(-glyph.delta_y);
            glyph
        })
        .collect();

    if glyphs.is_empty() {
        return Err(Error::MalformedFont("no glyphs found"));
    }

    Ok(GfxFont {
        name,
        bytes,
        glyphs,
        ascii_start,
        ascii_end,
        y_advance,
        baseline,
        is_builtin: false,
    })
}

/// Serialize a font back into the GFX header form [`parse_font`] accepts.
pub fn serialize_font(font: &GfxFont) -> String {
    let name = sanitize_identifier(&font.name);
    let glyphs = font
        .glyphs
        .iter()
        .enumerate()
        .map(|(index, glyph)| {
            format!(
                "  {}",
                glyph_to_string(font.ascii_start + index as i32, glyph)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "const uint8_t {name}Bitmaps[] PROGMEM = {bitmaps};\n\n\
         const GFXglyph {name}Glyphs[] PROGMEM = {{\n{glyphs}\n}};\n\n\
         const GFXfont {name} PROGMEM = {{\n  (uint8_t *){name}Bitmaps,\n  (GFXglyph *){name}Glyphs,\n  {start}, {end}, {advance}\n}};\n",
        bitmaps = bytes_to_string(&font.bytes),
        start = font.ascii_start,
        end = font.ascii_end,
        advance = font.y_advance,
    )
}

fn glyph_to_string(char_code: i32, glyph: &GfxGlyph) -> String {
    let pad = |n: i32| format!("{n:>4}");
    let fields = [
        pad(glyph.byte_offset as i32),
        pad(glyph.width),
        pad(glyph.height),
        pad(glyph.x_advance),
        pad(glyph.delta_x),
        pad(glyph.delta_y),
    ]
    .join(", ");

    let info = match u32::try_from(char_code).ok().and_then(char::from_u32) {
        Some(c) if (0x20..=0x7e).contains(&char_code) => format!("'{c}'"),
        _ => "(non-printable)".to_owned(),
    };

    format!("{{ {fields} }}, // 0x{char_code:x} {info}")
}

fn bytes_to_string(bytes: &[u8]) -> String {
    // 12 hex literals fit nicely into an 80 character line.
    let rows = bytes
        .chunks(12)
        .map(|row| {
            let hex: Vec<String> = row.iter().map(|b| format!("0x{b:02x}")).collect();
            format!("  {}", hex.join(", "))
        })
        .collect::<Vec<_>>()
        .join(",\n");
    format!("{{\n{rows}\n}}")
}

/// Fonts keyed by name. Text items resolve against this at every draw and
/// bounds call; a missing font simply renders nothing.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FontRegistry {
    fonts: BTreeMap<String, GfxFont>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `code` and register the result under its declared name.
    pub fn add(&mut self, code: &str) -> Result<String> {
        let font = parse_font(code)?;
        let name = font.name.clone();
        self.fonts.insert(name.clone(), font);
        Ok(name)
    }

    pub fn insert(&mut self, font: GfxFont) {
        self.fonts.insert(font.name.clone(), font);
    }

    pub fn remove(&mut self, name: &str) -> Option<GfxFont> {
        self.fonts.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&GfxFont> {
        self.fonts.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GfxFont> {
        self.fonts.values()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}
