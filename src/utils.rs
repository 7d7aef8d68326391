//! Utility functions and helpers

use crate::error::{CrumbsError, Result};
use std::path::{Path, PathBuf};
use url::Url;


/// URL validation and parsing utilities
pub struct UrlUtils;

impl UrlUtils {
    /// Validate and normalize URL
    pub fn validate_url(input: &str) -> Result<Url> {
        // Add http:// if no scheme is provided
        let url_str = if input.contains("://") {
            input.to_string()
        } else {
            format!("http://{}", input)
        };

        Url::parse(&url_str)
            .map_err(|e| CrumbsError::InvalidUrl(format!("Invalid URL '{}': {}", input, e)))
    }
}

/// File system utilities
pub struct FileUtils;

impl FileUtils {
    /// Expand tilde (~) in file paths
    pub fn expand_path(path: &str) -> Result<PathBuf> {
        let rest = match path.strip_prefix('~') {
            Some(rest) => rest.trim_start_matches(['/', '\\']),
            None => return Ok(PathBuf::from(path)),
        };

        dirs::home_dir()
            .map(|home| home.join(rest))
            .ok_or_else(|| CrumbsError::Config("Cannot determine home directory".to_string()))
    }

    /// Check if file exists and is readable
    pub fn check_file_readable(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(CrumbsError::FileNotFound(format!(
                "File not found: {:?}",
                path
            )));
        }

        if !path.is_file() {
            return Err(CrumbsError::Config(format!(
                "Path is not a file: {:?}",
                path
            )));
        }

        std::fs::File::open(path).map_err(|e| {
            CrumbsError::PermissionDenied(format!("Cannot read file {:?}: {}", path, e))
        })?;

        Ok(())
    }
}

/// String utilities
pub struct StringUtils;

impl StringUtils {
    /// Parse timeout values (supports suffixes like 's', 'm', 'h')
    pub fn parse_timeout(input: &str) -> Result<std::time::Duration> {
        if let Ok(seconds) = input.parse::<u64>() {
            return Ok(std::time::Duration::from_secs(seconds));
        }

        let (number_part, suffix) = if let Some(stripped) = input.strip_suffix('s') {
            (stripped, 1)
        } else if let Some(stripped) = input.strip_suffix('m') {
            (stripped, 60)
        } else if let Some(stripped) = input.strip_suffix('h') {
            (stripped, 3600)
        } else {
            return Err(CrumbsError::Config(format!(
                "Invalid timeout format: '{}'. Use number with optional suffix (s/m/h)",
                input
            )));
        };

        let number: u64 = number_part.parse().map_err(|_| {
            CrumbsError::Config(format!("Invalid timeout number: '{}'", number_part))
        })?;

        let seconds = number.checked_mul(suffix).ok_or_else(|| {
            CrumbsError::Config(format!("Timeout out of range: '{}'", input))
        })?;

        Ok(std::time::Duration::from_secs(seconds))
    }

    /// Display form of a local storage value: strings bare, the rest as JSON
    pub fn display_value(value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
