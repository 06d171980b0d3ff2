//! Error types for the capture pipeline

use crate::model::{PagePath, PageRef};
use thiserror::Error;

/// Result type alias for capture operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while capturing pages
#[derive(Error, Debug)]
pub enum Error {
    /// A nested render tried to record a second page on the same capture
    /// context. Programming error in the page implementation; raised at the
    /// point of the second attempt.
    #[error("cannot capture more than one page: first page={first}, second page={second}")]
    DoubleCapture { first: PageRef, second: PageRef },

    /// The nested render completed without ever recording a page
    #[error("page rendering completed without producing a page model: {0}")]
    MissingCapture(PagePath),

    /// Early-termination signal scoped to a single page render. Renderers
    /// raise it to stop the remainder of the page they are rendering; the
    /// capture boundary catches and discards it, so it never reaches the
    /// caller of `capture`.
    #[error("remainder of page skipped")]
    SkipPage,

    /// The rendering engine failed while rendering a page
    #[error("rendering failed: {0}")]
    Render(String),

    /// Path resolution itself failed (distinct from the path not resolving)
    #[error("failed to resolve path {path}: {reason}")]
    Resolve { path: PagePath, reason: String },

    /// Output sink error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
