//! Invocation plumbing: request method, shared ambient context, output sink,
//! and the isolated sub-invocations nested captures render inside of.

use crate::context::RenderContext;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Request method of an invocation.
///
/// Captures always run their nested render as `Get` so that re-rendering a
/// page can never trigger write side effects, no matter what method the
/// enclosing request used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Whether the method is read-only.
    pub fn is_safe(self) -> bool {
        matches!(self, Method::Get)
    }
}

/// One render invocation: a method, the shared ambient [`RenderContext`] of
/// its invocation chain, and the output sink the renderer writes into.
///
/// `Invocation` is a cheap handle; cloning it yields a second handle onto the
/// same context and sink, which is how ambient state follows a render when it
/// is handed off to another worker mid-request.
#[derive(Clone)]
pub struct Invocation {
    method: Method,
    context: Arc<RenderContext>,
    out: Arc<Mutex<dyn Write + Send>>,
}

impl Invocation {
    /// A top-level invocation writing rendered output into `out`.
    pub fn new(method: Method, out: impl Write + Send + 'static) -> Self {
        Invocation {
            method,
            context: Arc::new(RenderContext::new()),
            out: Arc::new(Mutex::new(out)),
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// The ambient render context shared by every invocation in this chain.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Writes rendered output to this invocation's sink.
    pub fn write_output(&self, buf: &[u8]) -> io::Result<()> {
        self.out
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write_all(buf)
    }

    /// An isolated sub-invocation for a nested render: same ambient context,
    /// method forced to `Get`, and a sink that discards everything written to
    /// it. Output produced by the nested render never reaches the caller's
    /// sink.
    pub fn isolated(&self) -> Invocation {
        Invocation {
            method: Method::Get,
            context: Arc::clone(&self.context),
            out: Arc::new(Mutex::new(io::sink())),
        }
    }
}
