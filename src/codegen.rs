//! Serializes the in-memory project to the generated source text. The
//! trailing comments are the only metadata channel, so anything the parser
//! must reconstruct (names, flags, frame sizes) travels through them.

use crate::font::serialize_font;
use crate::frame::Frame;
use crate::project::Project;
use crate::util::{indent_lines, sanitize_identifier};
use crate::Id;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How much metadata the trailing comments carry. Only `All` survives a
/// round trip with names and flags intact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentLevel {
    None,
    Names,
    #[default]
    All,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeOptions {
    pub comments: CommentLevel,
    /// Emit `x + <n>`/`y + <n>` coordinates and `int x, int y` routine
    /// parameters so frames can be drawn at a runtime origin.
    pub include_offset: bool,
}

/// Per-export state shared by every item serializer: the options, the
/// component registry for instance references and the name disambiguation
/// counters.
pub struct CodeContext<'a> {
    pub options: CodeOptions,
    components: &'a [Frame],
    name_counts: HashMap<String, u32>,
}

impl<'a> CodeContext<'a> {
    pub fn new(options: CodeOptions, components: &'a [Frame]) -> Self {
        Self {
            options,
            components,
            name_counts: HashMap::new(),
        }
    }

    pub fn component(&self, id: Id) -> Option<&Frame> {
        self.components.iter().find(|frame| frame.id == id)
    }

    /// Disambiguate a display name within one export: the first use stays
    /// as-is, repeats get `_1`, `_2`, ...
    pub fn unique_name(&mut self, name: &str) -> String {
        let count = self.name_counts.entry(name.to_owned()).or_insert(0);
        let unique = if *count > 0 {
            format!("{name}_{count}")
        } else {
            name.to_owned()
        };
        *count += 1;
        unique
    }

    pub(crate) fn coord_x(&self, value: i32) -> String {
        if self.options.include_offset {
            format!("x + {value}")
        } else {
            value.to_string()
        }
    }

    pub(crate) fn coord_y(&self, value: i32) -> String {
        if self.options.include_offset {
            format!("y + {value}")
        } else {
            value.to_string()
        }
    }

    /// The trailing statement comment for one item, per the verbosity
    /// setting. Flags are only included at the `All` level.
    pub(crate) fn comment(&self, unique_name: &str, settings: &str) -> String {
        match self.options.comments {
            CommentLevel::None => String::new(),
            CommentLevel::Names => format!(" // {unique_name}"),
            CommentLevel::All => {
                if settings.is_empty() {
                    format!(" // {unique_name}")
                } else {
                    format!(" // {unique_name} {settings}")
                }
            }
        }
    }
}

/// One frame or component as a drawing routine. Children are emitted in
/// reverse order because child 0 is topmost and must be drawn last.
pub fn frame_to_code(frame: &Frame, ctx: &mut CodeContext<'_>) -> String {
    let name = ctx.unique_name(&frame.name);
    let identifier = sanitize_identifier(&name);
    let kind = if frame.is_component { "Component" } else { "Frame" };
    let args = if ctx.options.include_offset { "int x, int y" } else { "" };

    // The size comment is structural, not verbosity-dependent: the parser
    // needs it to restore the frame dimensions.
    let mut code = format!(
        "void draw{kind}{identifier}({args}) {{ // {name} ({}x{})\n",
        frame.size.width, frame.size.height
    );
    for item in frame.children.iter().rev() {
        let statement = item.to_code(ctx);
        if statement.is_empty() {
            continue;
        }
        code += &indent_lines(&statement, "  ");
        code += "\n";
    }
    code += "};";
    code
}

/// The whole project: a banner, fonts, then components before frames so the
/// file reads in dependency order.
pub fn project_to_code(project: &Project, options: CodeOptions) -> String {
    let mut ctx = CodeContext::new(options, &project.components);
    let mut sections = vec![format!(
        "/**\n * Created with gfxui-core@{}: a graphics editor for Adafruit GFX displays.\n */",
        env!("CARGO_PKG_VERSION")
    )];

    for font in project.fonts.iter().filter(|font| !font.is_builtin) {
        sections.push(format!("// font-start\n{}// font-end", serialize_font(font)));
    }
    for component in &project.components {
        sections.push(frame_to_code(component, &mut ctx));
    }
    for frame in &project.frames {
        sections.push(frame_to_code(frame, &mut ctx));
    }

    let mut code = sections.join("\n\n");
    code.push('\n');
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Size};
    use crate::item::{Item, Rect};

    #[test]
    fn unique_names_append_a_counter() {
        let mut ctx = CodeContext::new(CodeOptions::default(), &[]);
        assert_eq!(ctx.unique_name("Rect"), "Rect");
        assert_eq!(ctx.unique_name("Rect"), "Rect_1");
        assert_eq!(ctx.unique_name("Rect"), "Rect_2");
        assert_eq!(ctx.unique_name("Line"), "Line");
    }

    #[test]
    fn frames_emit_children_in_reverse_order() {
        let mut frame = Frame::new(0, "Main".to_owned(), Size::new(128, 64));
        let rect = |name: &str, x: i32| {
            Item::Rect(Rect {
                name: name.to_owned(),
                position: Point::new(x, 0),
                size: Size::new(1, 1),
                ..Rect::default()
            })
        };
        frame.children.push(rect("Top", 0));
        frame.children.push(rect("Bottom", 1));

        let mut ctx = CodeContext::new(CodeOptions::default(), &[]);
        let code = frame_to_code(&frame, &mut ctx);
        assert!(code.starts_with("void drawFrameMain() { // Main (128x64)\n"));
        let bottom = code.find("Bottom").unwrap();
        let top = code.find("Top").unwrap();
        assert!(bottom < top, "bottom child must be drawn first");
        assert!(code.ends_with("};"));
    }

    #[test]
    fn offset_mode_adds_routine_parameters() {
        let frame = Frame::new(0, "My Frame".to_owned(), Size::new(32, 16));
        let options = CodeOptions { include_offset: true, ..CodeOptions::default() };
        let mut ctx = CodeContext::new(options, &[]);
        let code = frame_to_code(&frame, &mut ctx);
        assert!(code.starts_with("void drawFrameMy_Frame(int x, int y) { // My Frame (32x16)"));
    }
}
