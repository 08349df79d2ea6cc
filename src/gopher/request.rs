use std::borrow::Cow;
use std::fmt;

use bytes::Bytes;

/// Largest request read from a client. Longer selectors are truncated.
pub const MAX_REQUEST_LEN: usize = 64;

/// Prefix marking a request as an HTTP redirect directive.
pub const REDIRECT_PREFIX: &[u8] = b"URL:";

/// A client request with its line terminator removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    raw: Bytes,
}

/// What a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind<'a> {
    /// `URL:<target>`; holds the target bytes, verbatim.
    Redirect(&'a [u8]),
    /// A selector naming a file or directory under the root.
    Selector(&'a [u8]),
}

impl Request {
    /// Builds a request from bytes read off the wire.
    ///
    /// Input beyond [`MAX_REQUEST_LEN`] is dropped, then any trailing
    /// `\r`/`\n` bytes are stripped.
    pub fn parse(buf: &[u8]) -> Self {
        let buf = &buf[..buf.len().min(MAX_REQUEST_LEN)];
        Self {
            raw: Bytes::copy_from_slice(trim_terminator(buf)),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn kind(&self) -> RequestKind<'_> {
        match self.raw.strip_prefix(REDIRECT_PREFIX) {
            Some(target) => RequestKind::Redirect(target),
            None => RequestKind::Selector(&self.raw),
        }
    }

    /// The request text, with invalid UTF-8 replaced.
    pub fn to_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.raw)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for Request {
    fn from(s: &str) -> Self {
        Self::parse(s.as_bytes())
    }
}

/// Strips `\r\n`, `\n` or a lone `\r` (and runs of them) from the end.
pub fn trim_terminator(buf: &[u8]) -> &[u8] {
    let end = buf
        .iter()
        .rposition(|&b| b != b'\r' && b != b'\n')
        .map_or(0, |i| i + 1);
    &buf[..end]
}
