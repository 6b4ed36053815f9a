use super::{
    arg, parse_item_args, parse_item_settings, serialize_item_settings, Item, ItemContext,
    COMMENT_RE, META_RE,
};
use crate::codegen::CodeContext;
use crate::geometry::{Bounds, Point};
use crate::raster::PixelSink;
use crate::util::sanitize_identifier;
use crate::Id;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A placement of a component at a translated position. The component is
/// resolved by id on every use, never cached, so component edits apply
/// retroactively and a deleted component leaves the instance inert.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub id: Id,
    pub name: String,
    pub is_hidden: bool,
    pub is_locked: bool,
    pub position: Point,
    pub component_id: Option<Id>,
    /// Captured from the generated call during parsing; the parser resolves
    /// it to `component_id` once the whole file has been scanned, since the
    /// component may appear later in the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
}

static INSTANCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^drawComponent(?P<component>\w+)\((?P<args>[^)\n]+)\);{COMMENT_RE}{META_RE}"
    ))
    .expect("valid instance regex")
});

impl Instance {
    pub fn draw(&self, sink: &mut dyn PixelSink, ctx: &dyn ItemContext, offset: Point) {
        let Some(component) = self.component_id.and_then(|id| ctx.component(id)) else {
            return;
        };
        for child in component.children.iter().rev() {
            child.draw(sink, ctx, self.position + offset);
        }
    }

    pub fn bounds(&self, ctx: &dyn ItemContext) -> Bounds {
        match self.component_id.and_then(|id| ctx.component(id)) {
            Some(component) => Bounds::new(self.position, component.size),
            None => Bounds::empty(),
        }
    }

    pub fn to_code(&self, ctx: &mut CodeContext<'_>) -> String {
        // Resolve the component before touching the name counters: an inert
        // instance emits nothing and must not consume a name slot.
        let Some(identifier) = self
            .component_id
            .and_then(|id| ctx.component(id))
            .map(|component| sanitize_identifier(&component.name))
        else {
            return String::new();
        };
        let unique_name = ctx.unique_name(&self.name);

        let mut code = format!(
            "drawComponent{identifier}({}, {});",
            ctx.coord_x(self.position.x),
            ctx.coord_y(self.position.y)
        );
        code += &ctx.comment(
            &unique_name,
            &serialize_item_settings(self.is_locked, self.is_hidden),
        );
        code
    }

    pub fn from_code(code: &str) -> Option<(Item, usize)> {
        let captures = INSTANCE_RE.captures(code)?;
        let length = captures[0].len();

        let args = parse_item_args(&captures["args"]);
        let (is_locked, is_hidden) = parse_item_settings(
            captures.name("settings").map(|m| m.as_str()),
        );

        let item = Instance {
            id: 0,
            name: captures
                .name("name")
                .map(|m| m.as_str().to_owned())
                .unwrap_or_default(),
            position: Point::new(arg(&args, 0), arg(&args, 1)),
            component_id: None,
            component_name: Some(captures["component"].to_owned()),
            is_locked,
            is_hidden,
        };

        Some((Item::Instance(item), length))
    }
}
