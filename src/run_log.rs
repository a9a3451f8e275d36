use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde_json::Value;
use tracing::debug;

use crate::util::{log_timestamp_string, write_json_pretty};

/// Placeholder for the modality and scan date of subject-level entries.
pub const NULL_FIELD: &str = "NULL";

#[derive(Debug, Clone, Copy)]
pub struct LogScope<'a> {
    pub progname: &'a str,
    pub keyname: &'a str,
    pub modality: &'a str,
    pub scan_date: &'a str,
}

impl LogScope<'_> {
    fn key(&self, key: &str) -> String {
        format!(
            "{}|{}|{}|{}|{}",
            self.progname, self.keyname, self.modality, self.scan_date, key
        )
    }
}

#[derive(Debug)]
pub struct RunLog {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl RunLog {
    /// Starts a fresh `{}` log when `erase` is set or no log exists yet.
    pub fn open(path: &Path, erase: bool) -> Result<Self> {
        if erase || !path.exists() {
            let log = Self {
                path: path.to_path_buf(),
                entries: BTreeMap::new(),
            };
            log.save()?;
            debug!(path = %path.display(), "run log created");
            return Ok(log);
        }

        let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let entries = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    #[cfg(test)]
    pub fn get(&self, scope: &LogScope<'_>, key: &str) -> Option<&str> {
        self.entries.get(&scope.key(key)).and_then(Value::as_str)
    }

    pub fn log_message(&mut self, scope: &LogScope<'_>, key: &str, message: &str) {
        self.entries
            .insert(scope.key(key), Value::String(message.to_string()));
    }

    pub fn log_start(&mut self, scope: &LogScope<'_>, at: DateTime<Local>) {
        self.log_message(scope, "start_timestamp", &log_timestamp_string(at));
    }

    pub fn log_stop(&mut self, scope: &LogScope<'_>, at: DateTime<Local>) {
        self.log_message(scope, "stop_timestamp", &log_timestamp_string(at));
    }

    pub fn save(&self) -> Result<()> {
        write_json_pretty(&self.path, &self.entries)
    }
}
