use crate::geometry::{Bounds, Point, Size};
use crate::item::{Group, Item, ItemContext};
use crate::raster::PixelSink;
use crate::Id;
use serde::{Deserialize, Serialize};

/// A fixed-size canvas holding an ordered item tree. Child 0 is topmost.
/// A component is a frame flagged reusable; instances reference it by id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub id: Id,
    pub name: String,
    pub size: Size,
    /// Editor zoom. Transient; excluded from history snapshots.
    pub scale: f32,
    pub is_component: bool,
    /// Bumped on every history save, so callers can detect unsaved changes.
    pub version: u64,
    pub children: Vec<Item>,
}

impl Frame {
    pub fn new(id: Id, name: String, size: Size) -> Self {
        Self {
            id,
            name,
            size,
            scale: 5.0,
            is_component: false,
            version: 0,
            children: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(Point::ZERO, self.size)
    }

    pub fn draw(&self, sink: &mut dyn PixelSink, ctx: &dyn ItemContext) {
        for child in self.children.iter().rev() {
            child.draw(sink, ctx, Point::ZERO);
        }
    }

    /// Every item in the tree, depth first.
    pub fn items_flat(&self) -> Vec<&Item> {
        let mut result = Vec::new();
        let mut stack: Vec<&Item> = self.children.iter().collect();
        while let Some(item) = stack.pop() {
            result.push(item);
            if let Item::Group(group) = item {
                stack.extend(group.children.iter());
            }
        }
        result
    }

    pub fn find_item(&self, id: Id) -> Option<&Item> {
        fn walk(items: &[Item], id: Id) -> Option<&Item> {
            for item in items {
                if item.id() == id {
                    return Some(item);
                }
                if let Item::Group(group) = item {
                    if let Some(found) = walk(&group.children, id) {
                        return Some(found);
                    }
                }
            }
            None
        }
        walk(&self.children, id)
    }

    pub fn find_item_mut(&mut self, id: Id) -> Option<&mut Item> {
        fn walk(items: &mut [Item], id: Id) -> Option<&mut Item> {
            for item in items {
                if item.id() == id {
                    return Some(item);
                }
                if let Item::Group(group) = item {
                    if let Some(found) = walk(&mut group.children, id) {
                        return Some(found);
                    }
                }
            }
            None
        }
        walk(&mut self.children, id)
    }

    pub fn find_group_mut(&mut self, id: Id) -> Option<&mut Group> {
        match self.find_item_mut(id) {
            Some(Item::Group(group)) => Some(group),
            _ => None,
        }
    }

    /// Detach an item from wherever it sits in the tree. Groups own their
    /// children exclusively, so removal is an explicit tree walk.
    pub fn remove_item(&mut self, id: Id) -> Option<Item> {
        fn walk(items: &mut Vec<Item>, id: Id) -> Option<Item> {
            if let Some(index) = items.iter().position(|item| item.id() == id) {
                return Some(items.remove(index));
            }
            for item in items {
                if let Item::Group(group) = item {
                    if let Some(removed) = walk(&mut group.children, id) {
                        return Some(removed);
                    }
                }
            }
            None
        }
        walk(&mut self.children, id)
    }
}
