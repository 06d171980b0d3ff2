//! Page repository surface layered over the capture pipeline.

use crate::capture::{CapturePipeline, PageRenderer, PageResolver};
use crate::error::Result;
use crate::invocation::Invocation;
use crate::level::CaptureLevel;
use crate::model::{Page, PagePath};
use std::sync::Arc;

/// Read access to the structured models of the pages in a repository.
pub trait PageRepository: Send + Sync {
    /// The page at `path`, or `None` if no page exists there.
    fn get_page(
        &self,
        invocation: &Invocation,
        path: &PagePath,
        level: CaptureLevel,
    ) -> Result<Option<Arc<Page>>>;

    /// Whether a page exists at `path`. The default implementation performs
    /// a metadata-level capture; implementations with a cheaper existence
    /// check should override it.
    fn exists(&self, invocation: &Invocation, path: &PagePath) -> Result<bool> {
        Ok(self
            .get_page(invocation, path, CaptureLevel::Page)?
            .is_some())
    }
}

/// Pages produced by the local rendering engine, obtained by capture via
/// local resource dispatch.
pub struct LocalPageRepository {
    pipeline: CapturePipeline,
}

impl LocalPageRepository {
    pub fn new(resolver: Arc<dyn PageResolver>, renderer: Arc<dyn PageRenderer>) -> Self {
        LocalPageRepository {
            pipeline: CapturePipeline::new(resolver, renderer),
        }
    }

    /// The underlying pipeline, for page implementations that capture
    /// further pages mid-render.
    pub fn pipeline(&self) -> &CapturePipeline {
        &self.pipeline
    }
}

impl PageRepository for LocalPageRepository {
    fn get_page(
        &self,
        invocation: &Invocation,
        path: &PagePath,
        level: CaptureLevel,
    ) -> Result<Option<Arc<Page>>> {
        self.pipeline.capture(invocation, path, level)
    }
}
