//! Command-line interface.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::{ConfigError, Settings};

/// Gopher file server.
#[derive(Debug, Parser)]
#[command(name = "gopherd", version, about, disable_help_flag = true)]
pub struct Cli {
    /// Address to listen on, optionally with a port (`<address>:<port>`)
    #[arg(value_name = "ADDRESS[:PORT]", value_parser = parse_listen)]
    pub listen: Option<ListenSpec>,

    /// Hostname to use for interpolation
    #[arg(short = 'h', long)]
    pub host: Option<String>,

    /// TCP port to use for interpolation
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Directory to use as root
    #[arg(short = 'r', long)]
    pub root: Option<PathBuf>,

    /// Do not perform interpolation (host, port)
    #[arg(short = 's', long)]
    pub strict: bool,

    /// File containing blocked address prefixes, one per line
    #[arg(short = 'b', long = "block", value_name = "FILE")]
    pub blocklist_file: Option<PathBuf>,

    /// File to append logs to (default is stdout)
    #[arg(short = 'l', long = "log", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// YAML configuration file; flags override its values
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seconds to wait for a request before dropping the client
    #[arg(long, value_name = "SECS")]
    pub read_timeout: Option<u64>,

    /// Seconds to wait for a response write before dropping the client
    #[arg(long, value_name = "SECS")]
    pub write_timeout: Option<u64>,

    /// Maximum number of connections served at once (default unbounded)
    #[arg(long, value_name = "N")]
    pub max_connections: Option<usize>,

    /// Print this help message
    #[arg(short = '?', long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

/// Positional listen argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenSpec {
    pub addr: String,
    pub port: Option<u16>,
}

fn parse_listen(s: &str) -> Result<ListenSpec, String> {
    match s.split_once(':') {
        Some((addr, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| format!("port must be a number, got {port:?}"))?;
            Ok(ListenSpec {
                addr: addr.to_string(),
                port: Some(port),
            })
        }
        None => Ok(ListenSpec {
            addr: s.to_string(),
            port: None,
        }),
    }
}

impl Cli {
    /// Settings given on the command line only.
    pub fn to_settings(&self) -> Settings {
        let (listen_addr, listen_port) = match &self.listen {
            Some(spec) => (Some(spec.addr.clone()), spec.port),
            None => (None, None),
        };

        Settings {
            listen_addr,
            listen_port,
            host: self.host.clone(),
            port: self.port,
            root: self.root.clone(),
            strict: self.strict.then_some(true),
            blocklist: Vec::new(),
            blocklist_file: self.blocklist_file.clone(),
            log_file: self.log_file.clone(),
            read_timeout_secs: self.read_timeout,
            write_timeout_secs: self.write_timeout,
            max_connections: self.max_connections,
        }
    }

    /// Config file settings (if any) overridden by command-line settings.
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let base = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        Ok(base.merge(self.to_settings()))
    }
}
