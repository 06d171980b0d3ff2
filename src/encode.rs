//! XHTML text encoding helpers writing to an invocation's output sink.
//!
//! Convenience functions for page implementations that emit markup while
//! rendering. During a capture the invocation's sink discards everything, so
//! these are safe to call unconditionally.

use crate::invocation::Invocation;
use std::io;

/// Writes `text` to the invocation's output with XHTML text escaping
/// (`&`, `<`, `>`).
pub fn encode_text_in_xhtml(invocation: &Invocation, text: &str) -> io::Result<()> {
    let mut plain = 0;
    for (i, b) in text.bytes().enumerate() {
        let escape: &[u8] = match b {
            b'&' => b"&amp;",
            b'<' => b"&lt;",
            b'>' => b"&gt;",
            _ => continue,
        };
        invocation.write_output(&text.as_bytes()[plain..i])?;
        invocation.write_output(escape)?;
        plain = i + 1;
    }
    invocation.write_output(&text.as_bytes()[plain..])
}

/// Writes `text` to the invocation's output with XHTML attribute escaping
/// (`&`, `<`, `>`, `"`, `'`, and CR/LF as character references).
pub fn encode_text_in_xhtml_attribute(invocation: &Invocation, text: &str) -> io::Result<()> {
    let mut plain = 0;
    for (i, b) in text.bytes().enumerate() {
        let escape: &[u8] = match b {
            b'&' => b"&amp;",
            b'<' => b"&lt;",
            b'>' => b"&gt;",
            b'"' => b"&quot;",
            b'\'' => b"&#39;",
            b'\r' => b"&#xD;",
            b'\n' => b"&#xA;",
            _ => continue,
        };
        invocation.write_output(&text.as_bytes()[plain..i])?;
        invocation.write_output(escape)?;
        plain = i + 1;
    }
    invocation.write_output(&text.as_bytes()[plain..])
}
