//! Configuration management for crumbs

use std::path::PathBuf;
use std::time::Duration;

/// Header carrying the access key when none is configured.
pub const DEFAULT_KEY_HEADER: &str = "spec";

/// Where captures are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Collector endpoint returning a JSON array of captures
    Remote(String),
    /// Local JSON file; `-` reads stdin
    File(PathBuf),
}

/// Collector access configuration
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub source: Option<Source>,
    /// Opaque access key, forwarded verbatim
    pub key: Option<String>,
    pub key_header: String,
    pub user_agent: Option<String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub verify_certs: bool,
}

/// Output configuration
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub file: Option<PathBuf>,
    pub verbose: bool,
    pub silent: bool,
}

/// What to show once captures are loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// All profiles with their captures
    List {
        profile: Option<String>,
        collapsed: bool,
    },
    /// Profile names and capture counts
    Profiles,
    /// Import-schema cookies of one capture
    Cookies { id: String },
    /// Local storage of one capture
    LocalStorage { id: String },
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub view: View,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: SourceConfig {
                source: None,
                key: None,
                key_header: DEFAULT_KEY_HEADER.to_string(),
                user_agent: Some(format!("crumbs/{}", crate::VERSION)),
                timeout: Duration::from_secs(60),
                connect_timeout: Duration::from_secs(10),
                verify_certs: true,
            },
            output: OutputConfig {
                file: None,
                verbose: false,
                silent: false,
            },
            view: View::List {
                profile: None,
                collapsed: false,
            },
        }
    }
}
