//! Request-scoped ambient render state: the four context slots.
//!
//! A [`RenderContext`] belongs to one logical invocation chain (one top-level
//! request) and is shared across every nested render within it. Rendering
//! code reads the slots to learn what is currently being rendered and at what
//! capture level; only the capture pipeline rewrites them wholesale, through
//! the crate-internal save/clear/restore frame.

use crate::capture::CaptureContext;
use crate::level::CaptureLevel;
use crate::model::{Node, Page};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default, Clone)]
struct Slots {
    node: Option<Arc<Node>>,
    page: Option<Arc<Page>>,
    level: Option<CaptureLevel>,
    capture: Option<Arc<CaptureContext>>,
}

/// Ambient render state for one invocation chain.
///
/// Shared by `Arc` through the render call graph rather than held in
/// thread-local storage, so the slots stay visible when an invocation is
/// handed off to another worker mid-request.
#[derive(Default)]
pub struct RenderContext {
    slots: Mutex<Slots>,
}

impl RenderContext {
    pub fn new() -> Self {
        RenderContext::default()
    }

    fn slots(&self) -> MutexGuard<'_, Slots> {
        // Slot values are plain data; a panic mid-update cannot leave them
        // half-written, so a poisoned lock is still usable.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The node currently rendering, or `None` if none is present.
    pub fn current_node(&self) -> Option<Arc<Node>> {
        self.slots().node.clone()
    }

    /// Tracks the node currently rendering. Cleared and restored around each
    /// capture by the pipeline.
    pub fn set_current_node(&self, node: Option<Arc<Node>>) {
        self.slots().node = node;
    }

    /// The page currently rendering, or `None` if none is present.
    pub fn current_page(&self) -> Option<Arc<Page>> {
        self.slots().page.clone()
    }

    /// Tracks the page currently rendering. Cleared and restored around each
    /// capture by the pipeline.
    pub fn set_current_page(&self, page: Option<Arc<Page>>) {
        self.slots().page = page;
    }

    /// The current capture level, or [`CaptureLevel::Body`] if no capture is
    /// occurring.
    pub fn capture_level(&self) -> CaptureLevel {
        self.slots().level.unwrap_or_default()
    }

    /// The capture context of the innermost in-flight capture, or `None` if
    /// no capture is occurring. A renderer completes a capture by calling
    /// [`CaptureContext::set_captured_page`] on this exactly once.
    pub fn capture(&self) -> Option<Arc<CaptureContext>> {
        self.slots().capture.clone()
    }

    /// Enters a capture: snapshots all four slots, clears the node and page
    /// slots, and installs the requested level and a fresh capture context.
    /// The returned frame restores the snapshot when dropped, on every exit
    /// path.
    pub(crate) fn begin_capture(
        &self,
        level: CaptureLevel,
        capture: Arc<CaptureContext>,
    ) -> ContextFrame<'_> {
        let mut slots = self.slots();
        let saved = slots.clone();
        slots.node = None;
        slots.page = None;
        slots.level = Some(level);
        slots.capture = Some(capture);
        ContextFrame {
            context: self,
            saved: Some(saved),
        }
    }
}

/// Saved slot values for one capture; restores them on drop.
pub(crate) struct ContextFrame<'a> {
    context: &'a RenderContext,
    saved: Option<Slots>,
}

impl Drop for ContextFrame<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            *self.context.slots() = saved;
        }
    }
}
