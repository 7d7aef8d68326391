//! Output formatting and display utilities

use crate::config::OutputConfig;
use crate::error::Result;
use crate::profile::{record_ref, Profile};
use crate::record::NormalizedRecord;
use crate::utils::StringUtils;
use chrono::Local;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;


/// Output writer that handles file vs stdout
pub struct OutputWriter {
    config: OutputConfig,
}

impl OutputWriter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Write content to configured output
    pub fn write(&self, content: &str) -> Result<()> {
        if let Some(file_path) = &self.config.file {
            self.write_to_file(content, file_path)
        } else {
            self.write_to_stdout(content)
        }
    }

    /// Write verbose information (if enabled)
    pub fn write_verbose(&self, message: &str) {
        if self.config.verbose && !self.config.silent {
            eprintln!("* {}", message);
        }
    }

    /// Write error message
    pub fn write_error(&self, message: &str) {
        if !self.config.silent {
            eprintln!("crumbs: error: {}", message);
        }
    }

    fn write_to_file(&self, content: &str, file_path: &Path) -> Result<()> {
        let mut file = File::create(file_path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_to_stdout(&self, content: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Text view of every profile; `collapsed` shows capture headers only.
pub fn render_profiles(profiles: &[Profile], collapsed: bool) -> String {
    if profiles.is_empty() {
        return "No cookies found\n".to_string();
    }

    let mut out = String::new();
    for (i, profile) in profiles.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "[{}] {}", profile.name, capture_count(profile.len()));
        for (index, record) in profile.records.iter().enumerate() {
            let reference = match &record.id {
                Some(id) => format!("id: {}", id),
                None => format!("ref: {}", record_ref(profile, index)),
            };
            render_record(&mut out, record, &reference, collapsed);
        }
    }
    out
}

/// One line per profile with its capture count.
pub fn render_profile_summary(profiles: &[Profile]) -> String {
    if profiles.is_empty() {
        return "No cookies found\n".to_string();
    }
    profiles
        .iter()
        .map(|profile| format!("{}\t{}\n", profile.name, profile.len()))
        .collect()
}

fn render_record(out: &mut String, record: &NormalizedRecord, reference: &str, collapsed: bool) {
    let _ = writeln!(out, "  {}  ({})", record.url, reference);
    let _ = writeln!(out, "    Updated: {}", updated_label(record));
    if collapsed {
        return;
    }

    out.push_str("    Cookies:\n");
    if record.cookies.is_empty() {
        out.push_str("      No cookies found\n");
    }
    for (name, value) in &record.cookies {
        let _ = writeln!(out, "      {}: {}", name, value);
    }

    out.push_str("    Local Storage Data:\n");
    if record.local_data.is_empty() {
        out.push_str("      No local storage data found\n");
    }
    for (key, value) in &record.local_data {
        let _ = writeln!(out, "      {}: {}", key, StringUtils::display_value(value));
    }
}

fn updated_label(record: &NormalizedRecord) -> String {
    match (&record.updated_at, &record.updated_at_raw) {
        (Some(at), _) => at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
        (None, Some(raw)) => raw.clone(),
        (None, None) => "unknown".to_string(),
    }
}

fn capture_count(n: usize) -> String {
    if n == 1 {
        "1 capture".to_string()
    } else {
        format!("{} captures", n)
    }
}
