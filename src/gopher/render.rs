//! Request rendering.
//!
//! Each request goes through the same short decision sequence; nothing is
//! kept between requests:
//!
//! 1. `URL:<target>` returns an HTML redirect stub, untouched by
//!    interpolation.
//! 2. The selector is resolved under the root, falling back to `/` on a
//!    traversal attempt.
//! 3. A directory serves its `gophermap`, a file serves its content. Any
//!    stat or read failure serves the not-found item.
//! 4. Textual bodies, the not-found item included, are interpolated.

use std::io;
use std::sync::Arc;

use tokio::fs;
use tracing::debug;

use crate::config::ServerConfig;
use crate::gopher::interpolate::Interpolator;
use crate::gopher::path::{self, ResolvedPath};
use crate::gopher::request::{Request, RequestKind};
use crate::gopher::response::{Response, ResponseKind};
use crate::gopher::sniff::{Classifier, MimeSniffer};

/// Name of the menu file served for a directory.
pub const GOPHERMAP: &str = "gophermap";

pub struct Renderer<C = MimeSniffer> {
    config: Arc<ServerConfig>,
    classifier: C,
}

impl Renderer<MimeSniffer> {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self::with_classifier(config, MimeSniffer)
    }
}

impl<C: Classifier> Renderer<C> {
    pub fn with_classifier(config: Arc<ServerConfig>, classifier: C) -> Self {
        Self { config, classifier }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub async fn render(&self, request: &Request) -> Response {
        let selector = match request.kind() {
            RequestKind::Redirect(target) => return Response::redirect(target),
            RequestKind::Selector(selector) => String::from_utf8_lossy(selector),
        };

        let resolved = path::resolve_or_root(self.config.root(), &selector);

        let response = match load(&resolved).await {
            Ok(response) => response,
            Err(e) => {
                debug!(
                    selector = %request,
                    path = %resolved.as_path().display(),
                    error = %e,
                    "no handler found"
                );
                Response::not_found(request)
            }
        };

        if self.classifier.classify(response.body()).is_textual() {
            let interpolator = Interpolator::new(
                self.config.host(),
                self.config.port(),
                self.config.strict(),
            );
            let body = interpolator.interpolate(response.body());
            Response::new(response.kind(), body)
        } else {
            response
        }
    }
}

async fn load(resolved: &ResolvedPath) -> io::Result<Response> {
    let path = resolved.as_path();
    let meta = fs::metadata(path).await?;

    if meta.is_dir() {
        let menu = fs::read(path.join(GOPHERMAP)).await?;
        Ok(Response::new(ResponseKind::Menu, menu))
    } else {
        let content = fs::read(path).await?;
        Ok(Response::new(ResponseKind::File, content))
    }
}
