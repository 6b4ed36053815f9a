//! The owning root of the in-memory scene graph: frames, components and
//! fonts, plus id assignment. Ids are unique and monotonically assigned,
//! never reused within a session, which instance resolution and re-parsing
//! rely on.

use crate::codegen::{project_to_code, CodeOptions};
use crate::error::{Error, Result};
use crate::font::{FontRegistry, GfxFont};
use crate::frame::Frame;
use crate::geometry::Size;
use crate::item::{Item, ItemContext};
use crate::parser::parse_into;
use crate::util::capitalize_first_letter;
use crate::Id;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FRAME_SIZE: Size = Size { width: 128, height: 64 };

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub frames: Vec<Frame>,
    pub components: Vec<Frame>,
    pub fonts: FontRegistry,
    pub active_frame_id: Option<Id>,
    next_id: Id,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_id(&mut self) -> Id {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a frame; `name` and `size` fall back to `Frame<id>` and the
    /// default display size.
    pub fn add_frame(&mut self, name: Option<String>, size: Option<Size>) -> Id {
        let id = self.create_id();
        let name = name.unwrap_or_else(|| format!("Frame{id}"));
        let frame = Frame::new(id, name, size.unwrap_or(DEFAULT_FRAME_SIZE));
        self.frames.push(frame);
        id
    }

    pub fn add_component(&mut self, name: Option<String>, size: Option<Size>) -> Id {
        let id = self.create_id();
        let name = name.unwrap_or_else(|| format!("Component{id}"));
        let mut frame = Frame::new(id, name, size.unwrap_or(DEFAULT_FRAME_SIZE));
        frame.is_component = true;
        self.components.push(frame);
        id
    }

    pub fn remove_frame(&mut self, id: Id) -> Option<Frame> {
        if self.active_frame_id == Some(id) {
            self.active_frame_id = None;
        }
        if let Some(index) = self.frames.iter().position(|frame| frame.id == id) {
            return Some(self.frames.remove(index));
        }
        let index = self.components.iter().position(|frame| frame.id == id)?;
        Some(self.components.remove(index))
    }

    pub fn activate_frame(&mut self, id: Id) {
        if self.frame(id).is_some() {
            self.active_frame_id = Some(id);
        }
    }

    pub fn frame(&self, id: Id) -> Option<&Frame> {
        self.frames
            .iter()
            .chain(self.components.iter())
            .find(|frame| frame.id == id)
    }

    pub fn frame_mut(&mut self, id: Id) -> Option<&mut Frame> {
        self.frames
            .iter_mut()
            .chain(self.components.iter_mut())
            .find(|frame| frame.id == id)
    }

    pub fn active_frame(&self) -> Option<&Frame> {
        self.frame(self.active_frame_id?)
    }

    pub fn active_frame_mut(&mut self) -> Option<&mut Frame> {
        self.frame_mut(self.active_frame_id?)
    }

    /// Insert an item at the top of the active frame's z-order. Assigns a
    /// fresh id, keeps a parsed name and flags, defaults an empty name to the
    /// capitalized variant name and seeds the cached bounds.
    pub fn add_item(&mut self, mut item: Item) -> Result<Id> {
        if self.active_frame().is_none() {
            return Err(Error::NoActiveFrame);
        }

        let id = self.create_id();
        item.set_id(id);
        if item.name().is_empty() {
            item.set_name(capitalize_first_letter(item.kind()));
        }
        let bounds = item.bounds(self);
        item.set_cached_bounds(bounds);

        let frame = self.active_frame_mut().ok_or(Error::NoActiveFrame)?;
        frame.children.insert(0, item);
        Ok(id)
    }

    /// Detach an item from the active frame's tree.
    pub fn remove_item(&mut self, id: Id) -> Option<Item> {
        self.active_frame_mut()?.remove_item(id)
    }

    pub fn to_code(&self, options: CodeOptions) -> String {
        project_to_code(self, options)
    }

    /// Build a project from generated source. Permissive: unrecognized text
    /// is skipped, a foreign file yields a partial or empty project.
    pub fn from_code(code: &str) -> Self {
        let mut project = Self::new();
        project.load_code(code);
        project
    }

    pub fn load_code(&mut self, code: &str) {
        parse_into(self, code);
    }
}

impl ItemContext for Project {
    fn component(&self, id: Id) -> Option<&Frame> {
        self.components.iter().find(|frame| frame.id == id)
    }

    fn font(&self, name: &str) -> Option<&GfxFont> {
        self.fonts.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::item::Rect;

    #[test]
    fn add_item_requires_an_active_frame() {
        let mut project = Project::new();
        let result = project.add_item(Item::Rect(Rect::default()));
        assert!(matches!(result, Err(Error::NoActiveFrame)));
    }

    #[test]
    fn added_items_get_ids_names_and_bounds() {
        let mut project = Project::new();
        let frame_id = project.add_frame(None, None);
        project.activate_frame(frame_id);

        let id = project
            .add_item(Item::Rect(Rect {
                position: Point::new(2, 3),
                size: Size::new(4, 5),
                ..Rect::default()
            }))
            .unwrap();
        assert!(id > frame_id, "ids are monotonic");

        let frame = project.active_frame().unwrap();
        let item = &frame.children[0];
        assert_eq!(item.id(), id);
        assert_eq!(item.name(), "Rect");
        assert_eq!(item.cached_bounds().unwrap().top_left, Point::new(2, 3));
    }

    #[test]
    fn parsed_names_and_flags_survive_add() {
        let mut project = Project::new();
        let frame_id = project.add_frame(None, None);
        project.activate_frame(frame_id);

        project
            .add_item(Item::Rect(Rect {
                name: "Border".to_owned(),
                is_locked: true,
                ..Rect::default()
            }))
            .unwrap();
        let item = &project.active_frame().unwrap().children[0];
        assert_eq!(item.name(), "Border");
        assert!(item.is_locked());
    }

    #[test]
    fn new_items_go_on_top() {
        let mut project = Project::new();
        let frame_id = project.add_frame(None, None);
        project.activate_frame(frame_id);

        let first = project.add_item(Item::Rect(Rect::default())).unwrap();
        let second = project.add_item(Item::Rect(Rect::default())).unwrap();
        let frame = project.active_frame().unwrap();
        assert_eq!(frame.children[0].id(), second);
        assert_eq!(frame.children[1].id(), first);
    }
}
