//! Pointer tracking with per-frame coalescing.

use matrix_grid_core::Point;

use crate::platform::{EventKind, Platform, TaskHandle};

/// Latest pointer coordinate plus the single pending frame request.
///
/// A new coordinate cancels the pending request and schedules a fresh one, so
/// a burst of input produces one update carrying the last position.
#[derive(Debug, Clone)]
pub struct InteractionTracker {
    pointer: Point,
    pending: Option<TaskHandle>,
}

impl InteractionTracker {
    pub fn new(initial: Point) -> Self {
        Self {
            pointer: initial,
            pending: None,
        }
    }

    /// Register pointer and touch listeners.
    pub fn subscribe<P: Platform>(platform: &mut P) {
        platform.listen(EventKind::PointerMove);
        platform.listen(EventKind::TouchMove);
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    pub fn pending_frame(&self) -> Option<TaskHandle> {
        self.pending
    }

    pub fn on_pointer_move<P: Platform>(&mut self, platform: &mut P, position: Point) {
        self.pointer = position;
        if let Some(previous) = self.pending.take() {
            platform.cancel_frame(previous);
        }
        self.pending = Some(platform.request_frame());
    }

    /// Only the first touch point is tracked; an empty list is ignored.
    pub fn on_touch_move<P: Platform>(&mut self, platform: &mut P, touches: &[Point]) {
        if let Some(&first) = touches.first() {
            self.on_pointer_move(platform, first);
        }
    }

    /// Claim the pointer for a fired frame callback.
    ///
    /// Returns `None` for handles that were superseded or never issued.
    pub fn take_frame(&mut self, handle: TaskHandle) -> Option<Point> {
        if self.pending == Some(handle) {
            self.pending = None;
            Some(self.pointer)
        } else {
            None
        }
    }
}
