//! gopherd - Gopher file server
//!
//! Serves files and `gophermap` menus from a root directory over the Gopher
//! protocol.

pub mod access;
pub mod cli;
pub mod config;
pub mod gopher;
pub mod logging;
pub mod server;
