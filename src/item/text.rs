use super::{
    arg, parse_item_args, parse_item_settings, serialize_item_settings, Item, ItemContext, META_RE,
};
use crate::codegen::{CodeContext, CommentLevel};
use crate::geometry::{Bounds, Point, Size};
use crate::pixels::Color;
use crate::raster::PixelSink;
use crate::Id;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A text run rendered with a GFX font from the registry. The font is
/// resolved by name on every draw and bounds call; with no matching font the
/// text renders nothing and reports empty bounds.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub id: Id,
    pub name: String,
    pub is_hidden: bool,
    pub is_locked: bool,
    pub bounds: Bounds,
    pub position: Point,
    pub content: String,
    pub font: String,
    pub color: Color,
}

// The generated form is a multi-call sequence, so the whole block is
// bracketed by sentinel comments and the parts are matched separately.
static TEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^// text-start *{META_RE}(?P<commands>(?s:.+?))// text-end"
    ))
    .expect("valid text regex")
});
static CURSOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"display\.setCursor\((?P<args>[^)\n]+)\);").expect("valid cursor regex"));
static COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"display\.setTextColor\((?P<color>[^)\n]+)\);").expect("valid color regex")
});
static FONT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"display\.setFont\(&(?P<font>[^)\n]+)\);").expect("valid font regex"));
static PRINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"display\.print\((?P<content>"(?:[^"\\]|\\.)*")\);"#).expect("valid print regex")
});

impl Text {
    pub fn draw(&self, sink: &mut dyn PixelSink, ctx: &dyn ItemContext, offset: Point) {
        let Some(font) = ctx.font(&self.font) else {
            return;
        };

        let mut glyph_x = self.position.x + offset.x;
        let mut glyph_y = self.position.y + offset.y;
        for c in self.content.chars() {
            if c == '\n' {
                glyph_x = self.position.x + offset.x;
                glyph_y += font.y_advance;
                continue;
            }

            let Some(glyph) = font.glyph(c) else {
                continue;
            };

            for y in 0..glyph.height {
                for x in 0..glyph.width {
                    if font.glyph_bit(glyph, x, y) {
                        sink.set_pixel(
                            x + glyph_x + glyph.delta_x,
                            y + glyph_y + font.baseline + glyph.delta_y,
                            self.color,
                        );
                    }
                }
            }
            glyph_x += glyph.x_advance;
        }
    }

    pub fn bounds(&self, ctx: &dyn ItemContext) -> Bounds {
        let Some(font) = ctx.font(&self.font) else {
            return Bounds::empty();
        };

        let mut offset_x = 0;
        let mut offset_y = 0;
        let mut width = 0;
        for c in self.content.chars() {
            if c == '\n' {
                offset_x = 0;
                offset_y += font.y_advance;
                continue;
            }
            if let Some(glyph) = font.glyph(c) {
                offset_x += glyph.x_advance;
                width = width.max(offset_x);
            }
        }
        Bounds::new(self.position, Size::new(width, offset_y + font.y_advance))
    }

    pub fn to_code(&self, ctx: &mut CodeContext<'_>) -> String {
        let unique_name = ctx.unique_name(&self.name);
        let mut code = String::new();

        if ctx.options.comments == CommentLevel::All {
            let settings = serialize_item_settings(self.is_locked, self.is_hidden);
            if settings.is_empty() {
                code += &format!("// text-start {unique_name}\n");
            } else {
                code += &format!("// text-start {unique_name} {settings}\n");
            }
        }

        // serde_json handles quoting and escaping of the content literal.
        let content = serde_json::to_string(&self.content).unwrap_or_else(|_| "\"\"".to_owned());
        code += &format!(
            "display.setCursor({}, {});\ndisplay.setTextColor({});\ndisplay.setFont(&{});\ndisplay.print({content});",
            ctx.coord_x(self.position.x),
            ctx.coord_y(self.position.y),
            self.color,
            self.font
        );

        match ctx.options.comments {
            CommentLevel::All => code += "\n// text-end",
            CommentLevel::Names => code += &format!(" // {unique_name}"),
            CommentLevel::None => {}
        }
        code
    }

    pub fn from_code(code: &str) -> Option<(Item, usize)> {
        let captures = TEXT_RE.captures(code)?;
        let length = captures[0].len();

        let commands = &captures["commands"];
        let (is_locked, is_hidden) = parse_item_settings(
            captures.name("settings").map(|m| m.as_str()),
        );

        let position = CURSOR_RE
            .captures(commands)
            .map(|c| {
                let args = parse_item_args(&c["args"]);
                Point::new(arg(&args, 0), arg(&args, 1))
            })
            .unwrap_or(Point::ZERO);
        let color = COLOR_RE
            .captures(commands)
            .map(|c| parse_item_args(&c["color"]).first().copied().unwrap_or(0.0) as Color)
            .unwrap_or(0);
        let font = FONT_RE
            .captures(commands)
            .map(|c| c["font"].trim().to_owned())
            .unwrap_or_default();
        let content = PRINT_RE
            .captures(commands)
            .and_then(|c| serde_json::from_str::<String>(&c["content"]).ok())
            .unwrap_or_default();

        let item = Text {
            id: 0,
            name: captures
                .name("name")
                .map(|m| m.as_str().to_owned())
                .unwrap_or_default(),
            position,
            content,
            font,
            color,
            is_locked,
            is_hidden,
            bounds: Bounds::empty(),
        };

        Some((Item::Text(item), length))
    }
}
