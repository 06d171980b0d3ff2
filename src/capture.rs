//! The capture protocol: the single-assignment capture context and the
//! pipeline that obtains page models by isolated nested rendering.
//!
//! A capture re-renders a target page inside an isolated sub-invocation,
//! discards everything the render writes, and keeps only the structured
//! [`Page`] the render records in its [`CaptureContext`]. The caller's
//! ambient state is snapshotted before the nested render and restored on
//! every exit path, which is what lets captures nest to arbitrary depth.

use crate::error::{Error, Result};
use crate::invocation::Invocation;
use crate::level::CaptureLevel;
use crate::model::{Page, PagePath};
use log::{debug, trace};
use std::sync::{Arc, Mutex, PoisonError};

/// Single-assignment slot a nested render writes its resulting page into.
///
/// One context is created per nested render, written at most once during that
/// render, read once after it completes, then discarded. It is never reused
/// across renders and never shared between concurrently-active captures.
#[derive(Default)]
pub struct CaptureContext {
    captured: Mutex<Option<Arc<Page>>>,
}

impl CaptureContext {
    pub fn new() -> Self {
        CaptureContext::default()
    }

    /// Records the captured page. A page implementation must call this
    /// exactly once as part of completing its render; a second call on the
    /// same context is a programming error and fails with
    /// [`Error::DoubleCapture`] no matter whether the two pages are equal.
    pub fn set_captured_page(&self, page: Arc<Page>) -> Result<()> {
        let mut slot = self
            .captured
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(first) = slot.as_ref() {
            return Err(Error::DoubleCapture {
                first: first.page_ref().clone(),
                second: page.page_ref().clone(),
            });
        }
        *slot = Some(page);
        Ok(())
    }

    /// The recorded page, or `None` if the render has not (yet, or ever)
    /// completed successfully.
    pub fn captured_page(&self) -> Option<Arc<Page>> {
        self.captured
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// A concrete renderable resource that a logical path resolved to, such as a
/// template or handler location inside the local application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTarget {
    page_path: PagePath,
    resource_path: String,
}

impl DispatchTarget {
    pub fn new(page_path: PagePath, resource_path: impl Into<String>) -> Self {
        DispatchTarget {
            page_path,
            resource_path: resource_path.into(),
        }
    }

    /// The logical path the target was resolved from.
    pub fn page_path(&self) -> &PagePath {
        &self.page_path
    }

    /// Where in the local application the page renders from.
    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }
}

/// Resolves logical paths to renderable resources.
pub trait PageResolver: Send + Sync {
    /// `Ok(None)` means no page exists at `path`; `Err` means resolution
    /// itself failed.
    fn resolve(&self, path: &PagePath) -> Result<Option<DispatchTarget>>;
}

impl<F> PageResolver for F
where
    F: Fn(&PagePath) -> Result<Option<DispatchTarget>> + Send + Sync,
{
    fn resolve(&self, path: &PagePath) -> Result<Option<DispatchTarget>> {
        self(path)
    }
}

/// The rendering engine that actually produces page content.
///
/// `render` runs synchronously inside the isolated sub-invocation the
/// pipeline hands it. On successful completion it must record the finished
/// page on the active capture context (`invocation.context().capture()`)
/// exactly once. It may return [`Error::SkipPage`] to end the page early;
/// the pipeline catches that at the capture boundary. The pipeline passes
/// itself back in so that page implementations can capture further pages
/// while rendering.
pub trait PageRenderer: Send + Sync {
    fn render(
        &self,
        pipeline: &CapturePipeline,
        invocation: &Invocation,
        target: &DispatchTarget,
    ) -> Result<()>;
}

impl<F> PageRenderer for F
where
    F: Fn(&CapturePipeline, &Invocation, &DispatchTarget) -> Result<()> + Send + Sync,
{
    fn render(
        &self,
        pipeline: &CapturePipeline,
        invocation: &Invocation,
        target: &DispatchTarget,
    ) -> Result<()> {
        self(pipeline, invocation, target)
    }
}

/// Orchestrates captures: resolve, isolate, render, extract, restore.
pub struct CapturePipeline {
    resolver: Arc<dyn PageResolver>,
    renderer: Arc<dyn PageRenderer>,
}

impl CapturePipeline {
    pub fn new(resolver: Arc<dyn PageResolver>, renderer: Arc<dyn PageRenderer>) -> Self {
        CapturePipeline { resolver, renderer }
    }

    /// Captures the page at `path` by re-rendering it at the requested level.
    ///
    /// Returns `Ok(None)` if no page exists at `path`; in that case nothing
    /// is rendered and the ambient context is untouched. Otherwise the target
    /// is rendered synchronously inside an isolated sub-invocation (output
    /// discarded, method forced to `Get`) and the page it records is
    /// returned. All four ambient slots are restored to their pre-call values
    /// before this returns, whether it returns the page, an error, or
    /// propagates a renderer failure.
    pub fn capture(
        &self,
        invocation: &Invocation,
        path: &PagePath,
        level: CaptureLevel,
    ) -> Result<Option<Arc<Page>>> {
        let target = match self.resolver.resolve(path)? {
            Some(target) => target,
            None => {
                debug!("capture: no page at {path}");
                return Ok(None);
            }
        };
        trace!(
            "capture: {path} at {level:?} via {}",
            target.resource_path()
        );

        let capture = Arc::new(CaptureContext::new());
        let context = invocation.context();
        // The frame restores all four slots when it drops, on every exit
        // path below, including the error returns.
        let _frame = context.begin_capture(level, Arc::clone(&capture));

        let sub = invocation.isolated();
        match self.renderer.render(self, &sub, &target) {
            Ok(()) => {}
            // Scoped to the nested page only; the render may still have
            // recorded its page before skipping the rest.
            Err(Error::SkipPage) => trace!("capture: {path} ended early via skip"),
            Err(e) => return Err(e),
        }

        match capture.captured_page() {
            Some(page) => Ok(Some(page)),
            None => Err(Error::MissingCapture(path.clone())),
        }
    }
}
