use bytes::{BufMut, Bytes, BytesMut};

use crate::gopher::request::Request;

/// Host field of error items.
pub const ERROR_HOST: &str = "error.host";

const TARGET_PLACEHOLDER: &str = "{url}";

const REDIRECT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta http-equiv="refresh" content="1; url={url}">
  <title>redirect</title>
</head>
<body>
  <p>
    <a href="{url}">{url}</a>
  </p>
</body>
</html>
"#;

/// Where a response body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// A regular file.
    File,
    /// A directory's `gophermap`.
    Menu,
    /// Item type `3` error for a missing resource.
    NotFound,
    /// HTML stub for a `URL:` request.
    Redirect,
}

/// Bytes sent back to a client, followed by connection close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    kind: ResponseKind,
    body: Bytes,
}

impl Response {
    pub fn new(kind: ResponseKind, body: impl Into<Bytes>) -> Self {
        Self {
            kind,
            body: body.into(),
        }
    }

    /// `3'<request>' does not exist (no handler found)\t\terror.host\t1\n`
    ///
    /// The request bytes are echoed as received, after terminator trimming.
    /// The line ends in a bare `\n`; interpolation turns it into `\r\n`.
    pub fn not_found(request: &Request) -> Self {
        let mut body = BytesMut::with_capacity(request.as_bytes().len() + 64);
        body.put_slice(b"3'");
        body.put_slice(request.as_bytes());
        body.put_slice(b"' does not exist (no handler found)\t\t");
        body.put_slice(ERROR_HOST.as_bytes());
        body.put_slice(b"\t1\n");

        Self::new(ResponseKind::NotFound, body.freeze())
    }

    /// HTML page that refreshes to `target` and links to it.
    ///
    /// `target` is inserted verbatim, without escaping.
    pub fn redirect(target: &[u8]) -> Self {
        let mut body = BytesMut::with_capacity(REDIRECT_TEMPLATE.len() + 3 * target.len());

        for (i, piece) in REDIRECT_TEMPLATE.split(TARGET_PLACEHOLDER).enumerate() {
            if i > 0 {
                body.put_slice(target);
            }
            body.put_slice(piece.as_bytes());
        }

        Self::new(ResponseKind::Redirect, body.freeze())
    }

    pub fn kind(&self) -> ResponseKind {
        self.kind
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.body
    }
}
