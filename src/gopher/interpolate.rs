//! Text interpolation.
//!
//! Textual bodies get `\host` and `\port` replaced with the advertised
//! hostname and port (unless strict), and every bare `\n` turned into
//! `\r\n`. The rewrite is a single pass over the input, so a substituted
//! value is never itself scanned for tokens.

pub const HOST_TOKEN: &[u8] = b"\\host";
pub const PORT_TOKEN: &[u8] = b"\\port";

/// Values substituted into textual responses.
#[derive(Debug, Clone, Copy)]
pub struct Interpolator<'a> {
    host: &'a str,
    port: u16,
    strict: bool,
}

impl<'a> Interpolator<'a> {
    pub fn new(host: &'a str, port: u16, strict: bool) -> Self {
        Self { host, port, strict }
    }

    pub fn interpolate(&self, text: &[u8]) -> Vec<u8> {
        interpolate(text, self.host, self.port, self.strict)
    }
}

/// Rewrites `text` for the wire.
///
/// Already-canonical `\r\n` pairs are left alone, which makes the function
/// idempotent once tokens have been substituted.
pub fn interpolate(text: &[u8], host: &str, port: u16, strict: bool) -> Vec<u8> {
    let port = port.to_string();
    let mut out = Vec::with_capacity(text.len() + text.len() / 16);
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];

        if !strict && rest.starts_with(HOST_TOKEN) {
            out.extend_from_slice(host.as_bytes());
            i += HOST_TOKEN.len();
            continue;
        }
        if !strict && rest.starts_with(PORT_TOKEN) {
            out.extend_from_slice(port.as_bytes());
            i += PORT_TOKEN.len();
            continue;
        }

        let b = text[i];
        if b == b'\n' && (i == 0 || text[i - 1] != b'\r') {
            out.extend_from_slice(b"\r\n");
        } else {
            out.push(b);
        }
        i += 1;
    }

    out
}
