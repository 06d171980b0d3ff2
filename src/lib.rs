//! Local page capture
//!
//! A page-rendering engine can recursively obtain the structured model
//! ([`Page`]) of another page reachable by logical path, as a side effect of
//! internally re-rendering that page. The capture protocol guarantees that:
//!
//! - the caller's in-progress render state (the four ambient context slots)
//!   is restored on every exit path, so a capture can never corrupt its
//!   caller, no matter how it ends;
//! - the nested render's emitted output is discarded inside an isolated
//!   sub-invocation; only the structured page model is kept;
//! - captures nest to arbitrary depth, strictly ordered and depth-first
//!   within one invocation chain.
//!
//! # Example
//!
//! ```
//! use pagecapture::{
//!     CaptureLevel, CapturePipeline, DispatchTarget, Invocation, Method, Page, PagePath, PageRef,
//! };
//! use std::sync::Arc;
//!
//! fn resolve(path: &PagePath) -> pagecapture::Result<Option<DispatchTarget>> {
//!     Ok(Some(DispatchTarget::new(path.clone(), format!("/pages{path}.xml"))))
//! }
//!
//! fn render(
//!     _pipeline: &CapturePipeline,
//!     invocation: &Invocation,
//!     target: &DispatchTarget,
//! ) -> pagecapture::Result<()> {
//!     let mut page = Page::new(PageRef::new(target.page_path().clone()));
//!     page.set_title("Example");
//!     if let Some(capture) = invocation.context().capture() {
//!         capture.set_captured_page(Arc::new(page))?;
//!     }
//!     Ok(())
//! }
//!
//! # fn main() -> pagecapture::Result<()> {
//! let pipeline = CapturePipeline::new(Arc::new(resolve), Arc::new(render));
//! let invocation = Invocation::new(Method::Get, std::io::sink());
//! let page = pipeline.capture(&invocation, &PagePath::new("/intro"), CaptureLevel::Body)?;
//! assert_eq!(page.unwrap().title(), Some("Example"));
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod context;
pub mod encode;
pub mod error;
pub mod invocation;
pub mod level;
pub mod model;
pub mod repository;

pub use capture::{CaptureContext, CapturePipeline, DispatchTarget, PageRenderer, PageResolver};
pub use context::RenderContext;
pub use error::{Error, Result};
pub use invocation::{Invocation, Method};
pub use level::CaptureLevel;
pub use model::{Node, Page, PagePath, PageRef};
pub use repository::{LocalPageRepository, PageRepository};
