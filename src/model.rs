//! Page model types shared between the rendering engine and the capture pipeline.
//!
//! The capture pipeline treats `Page` and `Node` as opaque values: it never
//! inspects their contents beyond the page identity used in diagnostics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A logical path identifying a page within the repository, such as `/docs/index`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PagePath(String);

impl PagePath {
    pub fn new(path: impl Into<String>) -> Self {
        PagePath(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PagePath {
    fn from(path: &str) -> Self {
        PagePath(path.to_string())
    }
}

/// The identity of a page: the one piece of a `Page` the capture pipeline
/// reads, used for child references and error messages.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageRef {
    path: PagePath,
}

impl PageRef {
    pub fn new(path: PagePath) -> Self {
        PageRef { path }
    }

    pub fn path(&self) -> &PagePath {
        &self.path
    }
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.path, f)
    }
}

/// The structured model of a rendered page.
///
/// A page is built up by the rendering engine while the page renders; the
/// capture pipeline only carries the finished value back to the caller.
/// How complete the model is depends on the requested
/// [`CaptureLevel`](crate::CaptureLevel): a `Page`-level capture typically
/// leaves `body` unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    page_ref: PageRef,
    title: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    child_refs: Vec<PageRef>,
    body: Option<String>,
}

impl Page {
    pub fn new(page_ref: PageRef) -> Self {
        Page {
            page_ref,
            title: None,
            properties: BTreeMap::new(),
            child_refs: Vec::new(),
            body: None,
        }
    }

    pub fn page_ref(&self) -> &PageRef {
        &self.page_ref
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn property(&self, name: &str) -> Option<&serde_json::Value> {
        self.properties.get(name)
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.properties.insert(name.into(), value.into());
    }

    pub fn child_refs(&self) -> &[PageRef] {
        &self.child_refs
    }

    pub fn add_child_ref(&mut self, child: PageRef) {
        self.child_refs.push(child);
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = Some(body.into());
    }
}

/// One unit of render output, such as a fragment or element instance.
///
/// Owned by the rendering engine; the pipeline only tracks which node is
/// currently rendering as ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    id: String,
    label: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Node {
            id: id.into(),
            label: None,
        }
    }

    pub fn with_label(id: impl Into<String>, label: impl Into<String>) -> Self {
        Node {
            id: id.into(),
            label: Some(label.into()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
