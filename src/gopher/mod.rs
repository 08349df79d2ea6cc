//! Gopher request pipeline.
//!
//! A connection carries exactly one request: the client sends a selector
//! line, the server answers with raw bytes and closes.
//!
//! - **`connection`**: per-connection lifecycle (read, render, write, close)
//! - **`request`**: request bytes, terminator trimming, `URL:` detection
//! - **`render`**: turns a request into a response
//! - **`path`**: selector to path resolution, confined to the root
//! - **`sniff`**: text/binary classification of response bodies
//! - **`interpolate`**: `\host`/`\port` substitution and CRLF line endings
//! - **`response`**: response bodies, including not-found and redirect
//! - **`writer`**: writes a response to the client
//!
//! ```text
//!   listener ──accept──▶ blocklist ──ok──▶ Connection
//!                                             │ read ≤ 64 bytes
//!                                             ▼
//!                                          Renderer
//!                          ┌──────────────────┼──────────────────┐
//!                          ▼                  ▼                  ▼
//!                   URL: redirect      path::resolve     sniff ─▶ interpolate
//!                                             │
//!                                             ▼
//!                                   file | gophermap | not found
//! ```

pub mod connection;
pub mod interpolate;
pub mod path;
pub mod render;
pub mod request;
pub mod response;
pub mod sniff;
pub mod writer;
