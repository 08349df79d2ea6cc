//! Server configuration.
//!
//! Configuration is assembled in layers: built-in defaults, an optional YAML
//! file, then command-line flags. Each layer is a [`Settings`] value; layers
//! are combined with [`Settings::merge`] and turned into a validated,
//! immutable [`ServerConfig`] with [`Settings::into_config`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::access::Blocklist;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1";
pub const DEFAULT_LISTEN_PORT: u16 = 7000;
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_ROOT: &str = ".";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("root {path} is not accessible: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("root {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("failed to read blocklist {path}: {source}")]
    Blocklist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// One layer of configuration.
///
/// Every field is optional so that a later layer only overrides what it
/// actually sets.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub listen_addr: Option<String>,
    pub listen_port: Option<u16>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub root: Option<PathBuf>,
    pub strict: Option<bool>,
    pub blocklist: Vec<String>,
    pub blocklist_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub read_timeout_secs: Option<u64>,
    pub write_timeout_secs: Option<u64>,
    pub max_connections: Option<usize>,
}

impl Settings {
    pub fn from_yaml_str(path: &Path, content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads a YAML settings file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(path, &content)
    }

    /// Layers `over` on top of `self`. Scalars set in `over` win; inline
    /// blocklist entries are concatenated.
    pub fn merge(self, over: Settings) -> Settings {
        let mut blocklist = self.blocklist;
        blocklist.extend(over.blocklist);

        Settings {
            listen_addr: over.listen_addr.or(self.listen_addr),
            listen_port: over.listen_port.or(self.listen_port),
            host: over.host.or(self.host),
            port: over.port.or(self.port),
            root: over.root.or(self.root),
            strict: over.strict.or(self.strict),
            blocklist,
            blocklist_file: over.blocklist_file.or(self.blocklist_file),
            log_file: over.log_file.or(self.log_file),
            read_timeout_secs: over.read_timeout_secs.or(self.read_timeout_secs),
            write_timeout_secs: over.write_timeout_secs.or(self.write_timeout_secs),
            max_connections: over.max_connections.or(self.max_connections),
        }
    }

    /// Validates the merged settings and loads the blocklist file.
    pub fn into_config(self) -> Result<ServerConfig, ConfigError> {
        let mut blocklist = Blocklist::new(self.blocklist);
        if let Some(path) = &self.blocklist_file {
            let from_file = Blocklist::load(path).map_err(|source| ConfigError::Blocklist {
                path: path.clone(),
                source,
            })?;
            blocklist.extend(from_file);
        }

        let mut builder = ServerConfig::builder(
            self.root.unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT)),
        )
        .strict(self.strict.unwrap_or(false))
        .blocklist(blocklist);

        if let Some(addr) = self.listen_addr {
            builder = builder.listen_addr(addr);
        }
        if let Some(port) = self.listen_port {
            builder = builder.listen_port(port);
        }
        if let Some(host) = self.host {
            builder = builder.host(host);
        }
        if let Some(port) = self.port {
            builder = builder.port(port);
        }
        if let Some(secs) = self.read_timeout_secs {
            builder = builder.read_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = self.write_timeout_secs {
            builder = builder.write_timeout(Duration::from_secs(secs));
        }
        if let Some(max) = self.max_connections {
            builder = builder.max_connections(max);
        }

        builder.build()
    }
}

/// Validated server configuration, read-only once built.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    listen_addr: String,
    listen_port: u16,
    host: String,
    port: u16,
    root: PathBuf,
    strict: bool,
    blocklist: Blocklist,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
    max_connections: Option<usize>,
}

impl ServerConfig {
    pub fn builder(root: impl Into<PathBuf>) -> ServerConfigBuilder {
        ServerConfigBuilder::new(root)
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    pub fn listen_port(&self) -> u16 {
        self.listen_port
    }

    /// `address:port` string suitable for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.listen_addr, self.listen_port)
    }

    /// Hostname substituted for `\host`.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port substituted for `\port`.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Canonical absolute root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn blocklist(&self) -> &Blocklist {
        &self.blocklist
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout
    }

    pub fn max_connections(&self) -> Option<usize> {
        self.max_connections
    }
}

/// Builder for [`ServerConfig`].
///
/// The advertised port defaults to the listen port when not set.
pub struct ServerConfigBuilder {
    listen_addr: String,
    listen_port: u16,
    host: String,
    port: Option<u16>,
    root: PathBuf,
    strict: bool,
    blocklist: Blocklist,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
    max_connections: Option<usize>,
}

impl ServerConfigBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            listen_port: DEFAULT_LISTEN_PORT,
            host: DEFAULT_HOST.to_string(),
            port: None,
            root: root.into(),
            strict: false,
            blocklist: Blocklist::default(),
            read_timeout: None,
            write_timeout: None,
            max_connections: None,
        }
    }

    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = addr.into();
        self
    }

    pub fn listen_port(mut self, port: u16) -> Self {
        self.listen_port = port;
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn blocklist(mut self, blocklist: Blocklist) -> Self {
        self.blocklist = blocklist;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }

    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = Some(max);
        self
    }

    /// Canonicalizes the root and checks that it is a directory.
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let root = fs::canonicalize(&self.root).map_err(|source| ConfigError::Root {
            path: self.root.clone(),
            source,
        })?;

        let meta = fs::metadata(&root).map_err(|source| ConfigError::Root {
            path: root.clone(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(ConfigError::NotADirectory(root));
        }

        Ok(ServerConfig {
            listen_addr: self.listen_addr,
            listen_port: self.listen_port,
            host: self.host,
            port: self.port.unwrap_or(self.listen_port),
            root,
            strict: self.strict,
            blocklist: self.blocklist,
            read_timeout: self.read_timeout,
            write_timeout: self.write_timeout,
            max_connections: self.max_connections,
        })
    }
}
