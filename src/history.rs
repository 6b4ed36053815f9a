//! Linear undo/redo as bounded per-frame snapshot stacks. Snapshots are deep
//! clones with no aliasing into the live tree, so restoring one can never be
//! corrupted by later edits.

use crate::frame::Frame;
use crate::geometry::Size;
use crate::item::Item;
use crate::Id;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

const MAX_STACK_SIZE: usize = 50;
const DEBOUNCE_DELAY: Duration = Duration::from_millis(250);

/// One recorded state of a frame. The zoom scale is transient and deliberately
/// not part of it; the version is, so undo also restores the "unsaved
/// changes" marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameState {
    pub name: String,
    pub size: Size,
    pub version: u64,
    pub children: Vec<Item>,
}

impl FrameState {
    fn capture(frame: &Frame) -> Self {
        Self {
            name: frame.name.clone(),
            size: frame.size,
            version: frame.version,
            children: frame.children.clone(),
        }
    }

    /// Restore into the live frame in place, so external references to the
    /// frame stay valid.
    fn restore(&self, frame: &mut Frame) {
        frame.name = self.name.clone();
        frame.size = self.size;
        frame.version = self.version;
        frame.children = self.children.clone();
    }
}

#[derive(Debug, Default)]
struct FrameHistory {
    index: usize,
    stack: Vec<FrameState>,
}

/// Poll-driven coalescing timer. A trigger inside the window reschedules the
/// deadline instead of queueing another firing.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// True once, when the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

/// Per-frame undo/redo stacks plus the debounced save channel. The engine is
/// synchronous; the host drives [`History::take_due_save`] from its loop and
/// performs the save it returns.
pub struct History {
    histories: HashMap<Id, FrameHistory>,
    debouncer: Debouncer,
    pending_save: Option<Id>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self {
            histories: HashMap::new(),
            debouncer: Debouncer::new(DEBOUNCE_DELAY),
            pending_save: None,
        }
    }

    /// Start tracking a frame, seeding the stack with its current state.
    pub fn track(&mut self, frame: &Frame) {
        self.histories.insert(
            frame.id,
            FrameHistory {
                index: 0,
                stack: vec![FrameState::capture(frame)],
            },
        );
    }

    pub fn untrack(&mut self, id: Id) {
        self.histories.remove(&id);
        if self.pending_save == Some(id) {
            self.pending_save = None;
            self.debouncer.cancel();
        }
    }

    pub fn is_tracked(&self, id: Id) -> bool {
        self.histories.contains_key(&id)
    }

    /// Record the frame's current state. Bumps the frame version, discards
    /// any redo future and caps the stack at its bound.
    pub fn save_state(&mut self, frame: &mut Frame) {
        let Some(history) = self.histories.get_mut(&frame.id) else {
            return;
        };

        frame.version += 1;

        // We undo-ed into the past and are starting a new future; the old
        // one is discarded.
        if history.index + 1 < history.stack.len() {
            history.stack.truncate(history.index + 1);
        }

        history.stack.push(FrameState::capture(frame));
        if history.stack.len() > MAX_STACK_SIZE {
            history.stack.remove(0);
        }
        history.index = history.stack.len() - 1;
    }

    /// Schedule a save for `frame_id`, coalescing rapid calls (a drag-move
    /// emits one entry, not one per mouse event).
    pub fn save_state_debounced(&mut self, frame_id: Id, now: Instant) {
        self.pending_save = Some(frame_id);
        self.debouncer.trigger(now);
    }

    /// The frame id whose debounced save is due, if any. The caller performs
    /// the actual [`History::save_state`].
    pub fn take_due_save(&mut self, now: Instant) -> Option<Id> {
        if self.debouncer.poll(now) {
            self.pending_save.take()
        } else {
            None
        }
    }

    pub fn can_undo(&self, id: Id) -> bool {
        self.histories
            .get(&id)
            .is_some_and(|history| history.index >= 1)
    }

    pub fn can_redo(&self, id: Id) -> bool {
        self.histories
            .get(&id)
            .is_some_and(|history| history.index + 1 < history.stack.len())
    }

    /// Step back one state. No-ops (returning false) at the bottom of the
    /// stack or for untracked frames.
    pub fn undo(&mut self, frame: &mut Frame) -> bool {
        let Some(history) = self.histories.get_mut(&frame.id) else {
            return false;
        };
        if history.index < 1 {
            return false;
        }
        history.index -= 1;
        history.stack[history.index].restore(frame);
        true
    }

    pub fn redo(&mut self, frame: &mut Frame) -> bool {
        let Some(history) = self.histories.get_mut(&frame.id) else {
            return false;
        };
        if history.index + 1 >= history.stack.len() {
            return false;
        }
        history.index += 1;
        history.stack[history.index].restore(frame);
        true
    }

    pub fn clear(&mut self) {
        self.histories.clear();
        self.pending_save = None;
        self.debouncer.cancel();
    }
}
