//! Contract tests for the capture boundary: context restoration, the
//! single-assignment holder, skip suppression, and output isolation.

use pagecapture::{
    CaptureLevel, CapturePipeline, DispatchTarget, Error, Invocation, Method, Node, Page,
    PagePath, PageRef, PageRenderer, PageResolver, Result,
};
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

struct ResolveAll;

impl PageResolver for ResolveAll {
    fn resolve(&self, path: &PagePath) -> Result<Option<DispatchTarget>> {
        Ok(Some(DispatchTarget::new(
            path.clone(),
            format!("/WEB-INF/pages{path}.xml"),
        )))
    }
}

struct ResolveNone;

impl PageResolver for ResolveNone {
    fn resolve(&self, _path: &PagePath) -> Result<Option<DispatchTarget>> {
        Ok(None)
    }
}

#[derive(Clone, Copy)]
enum Mode {
    /// Record the page and return normally.
    Complete,
    /// Return normally without recording anything.
    Silent,
    /// Skip the rest of the page before recording anything.
    SkipBeforeCapture,
    /// Record the page, then skip the rest of it.
    SkipAfterCapture,
    /// Fail mid-render.
    Fail,
    /// Record the page twice.
    DoubleSet,
}

struct FixtureRenderer {
    mode: Mode,
    calls: Arc<AtomicUsize>,
}

impl FixtureRenderer {
    fn new(mode: Mode) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            FixtureRenderer {
                mode,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl PageRenderer for FixtureRenderer {
    fn render(
        &self,
        _pipeline: &CapturePipeline,
        invocation: &Invocation,
        target: &DispatchTarget,
    ) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Nested renders always run read-only.
        assert_eq!(invocation.method(), Method::Get);

        let ctx = invocation.context();
        let mut page = Page::new(PageRef::new(target.page_path().clone()));
        page.set_title(format!("Title of {}", target.page_path()));
        if ctx.capture_level() == CaptureLevel::Body {
            page.set_body(format!("<p>body of {}</p>", target.page_path()));
        }
        invocation.write_output(b"<html>nested output</html>")?;

        let capture = ctx.capture().expect("render runs inside a capture");
        match self.mode {
            Mode::Complete => capture.set_captured_page(Arc::new(page))?,
            Mode::Silent => {}
            Mode::SkipBeforeCapture => return Err(Error::SkipPage),
            Mode::SkipAfterCapture => {
                capture.set_captured_page(Arc::new(page))?;
                return Err(Error::SkipPage);
            }
            Mode::Fail => return Err(Error::Render("template blew up".into())),
            Mode::DoubleSet => {
                capture.set_captured_page(Arc::new(page.clone()))?;
                capture.set_captured_page(Arc::new(page))?;
            }
        }
        Ok(())
    }
}

/// Seeds the ambient slots the way a mid-render caller would see them.
fn seeded_invocation(
    method: Method,
    out: impl Write + Send + 'static,
) -> (Invocation, Arc<Node>, Arc<Page>) {
    let inv = Invocation::new(method, out);
    let node = Arc::new(Node::new("outer-node"));
    let page = Arc::new(Page::new(PageRef::new(PagePath::new("/outer"))));
    inv.context().set_current_node(Some(node.clone()));
    inv.context().set_current_page(Some(page.clone()));
    (inv, node, page)
}

fn assert_restored(inv: &Invocation, node: &Arc<Node>, page: &Arc<Page>) {
    assert!(Arc::ptr_eq(&inv.context().current_node().unwrap(), node));
    assert!(Arc::ptr_eq(&inv.context().current_page().unwrap(), page));
    assert_eq!(inv.context().capture_level(), CaptureLevel::Body);
    assert!(inv.context().capture().is_none());
}

fn pipeline(resolver: impl PageResolver + 'static, mode: Mode) -> (CapturePipeline, Arc<AtomicUsize>) {
    let (renderer, calls) = FixtureRenderer::new(mode);
    (
        CapturePipeline::new(Arc::new(resolver), Arc::new(renderer)),
        calls,
    )
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn into_string(self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn unresolved_path_returns_absent_without_rendering() {
    let (p, calls) = pipeline(ResolveNone, Mode::Complete);
    let (inv, node, page) = seeded_invocation(Method::Get, io::sink());
    let result = p
        .capture(&inv, &PagePath::new("/missing"), CaptureLevel::Body)
        .unwrap();
    assert!(result.is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_restored(&inv, &node, &page);
}

#[test]
fn successful_capture_returns_page_and_restores_context() {
    let (p, calls) = pipeline(ResolveAll, Mode::Complete);
    let (inv, node, page) = seeded_invocation(Method::Get, io::sink());
    let captured = p
        .capture(&inv, &PagePath::new("/x"), CaptureLevel::Body)
        .unwrap()
        .unwrap();
    assert_eq!(captured.page_ref().to_string(), "/x");
    assert_eq!(captured.title(), Some("Title of /x"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_restored(&inv, &node, &page);
}

#[test]
fn missing_capture_names_requested_path() {
    let (p, _) = pipeline(ResolveAll, Mode::Silent);
    let (inv, node, page) = seeded_invocation(Method::Get, io::sink());
    let err = p
        .capture(&inv, &PagePath::new("/silent"), CaptureLevel::Body)
        .unwrap_err();
    match &err {
        Error::MissingCapture(path) => assert_eq!(path.as_str(), "/silent"),
        other => panic!("expected MissingCapture, got {other:?}"),
    }
    assert!(err.to_string().contains("/silent"));
    assert_restored(&inv, &node, &page);
}

#[test]
fn skip_before_capture_is_treated_as_render_ended_early() {
    // The skip itself never reaches the caller; the empty holder does.
    let (p, _) = pipeline(ResolveAll, Mode::SkipBeforeCapture);
    let (inv, node, page) = seeded_invocation(Method::Get, io::sink());
    let err = p
        .capture(&inv, &PagePath::new("/skipped"), CaptureLevel::Body)
        .unwrap_err();
    assert!(matches!(err, Error::MissingCapture(_)));
    assert_restored(&inv, &node, &page);
}

#[test]
fn skip_after_capture_still_yields_the_page() {
    let (p, _) = pipeline(ResolveAll, Mode::SkipAfterCapture);
    let (inv, node, page) = seeded_invocation(Method::Get, io::sink());
    let captured = p
        .capture(&inv, &PagePath::new("/skipped"), CaptureLevel::Body)
        .unwrap()
        .unwrap();
    assert_eq!(captured.page_ref().to_string(), "/skipped");
    assert_restored(&inv, &node, &page);
}

#[test]
fn renderer_failure_propagates_after_restore() {
    let (p, _) = pipeline(ResolveAll, Mode::Fail);
    let (inv, node, page) = seeded_invocation(Method::Get, io::sink());
    let err = p
        .capture(&inv, &PagePath::new("/broken"), CaptureLevel::Body)
        .unwrap_err();
    assert!(matches!(err, Error::Render(_)));
    assert_restored(&inv, &node, &page);
}

#[test]
fn double_set_surfaces_double_capture() {
    let (p, _) = pipeline(ResolveAll, Mode::DoubleSet);
    let (inv, node, page) = seeded_invocation(Method::Get, io::sink());
    let err = p
        .capture(&inv, &PagePath::new("/twice"), CaptureLevel::Body)
        .unwrap_err();
    assert!(matches!(err, Error::DoubleCapture { .. }));
    assert_restored(&inv, &node, &page);
}

#[test]
fn nested_render_runs_as_get_with_discarded_output() {
    let buf = SharedBuf::default();
    let (p, _) = pipeline(ResolveAll, Mode::Complete);
    // Even a mutating enclosing request captures read-only; the fixture
    // renderer asserts the forced method.
    let (inv, node, page) = seeded_invocation(Method::Post, buf.clone());
    inv.write_output(b"<html>outer</html>").unwrap();
    p.capture(&inv, &PagePath::new("/x"), CaptureLevel::Body)
        .unwrap()
        .unwrap();
    assert_eq!(buf.into_string(), "<html>outer</html>");
    assert_restored(&inv, &node, &page);
}

#[test]
fn capture_level_is_threaded_to_the_renderer() {
    let (p, _) = pipeline(ResolveAll, Mode::Complete);
    let (inv, node, page) = seeded_invocation(Method::Get, io::sink());

    let meta = p
        .capture(&inv, &PagePath::new("/x"), CaptureLevel::Page)
        .unwrap()
        .unwrap();
    assert!(meta.body().is_none());
    assert_restored(&inv, &node, &page);

    let full = p
        .capture(&inv, &PagePath::new("/x"), CaptureLevel::Body)
        .unwrap()
        .unwrap();
    assert_eq!(full.body(), Some("<p>body of /x</p>"));
    assert_restored(&inv, &node, &page);
}

#[test]
fn resolver_failure_propagates_without_rendering() {
    struct FailingResolver;
    impl PageResolver for FailingResolver {
        fn resolve(&self, path: &PagePath) -> Result<Option<DispatchTarget>> {
            Err(Error::Resolve {
                path: path.clone(),
                reason: "resolver offline".into(),
            })
        }
    }
    let (p, calls) = pipeline(FailingResolver, Mode::Complete);
    let (inv, node, page) = seeded_invocation(Method::Get, io::sink());
    let err = p
        .capture(&inv, &PagePath::new("/x"), CaptureLevel::Body)
        .unwrap_err();
    assert!(matches!(err, Error::Resolve { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_restored(&inv, &node, &page);
}
