//! Capture levels: how much of a target page a capture asks the renderer to build.

use serde::{Deserialize, Serialize};

/// Requested completeness of a nested render.
///
/// Levels are ordered by the amount of information they produce: `Body`
/// includes everything `Page` does. `Body` is the default and the most
/// expensive level. The capture pipeline only threads the level through to
/// the rendering engine; it never branches on it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CaptureLevel {
    /// Page metadata only (identity, title, child references).
    Page,
    /// The full page model including its rendered body.
    #[default]
    Body,
}
