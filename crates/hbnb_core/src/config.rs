//! Runtime configuration for the core store and logging.
//!
//! # Invariants
//! - Defaults reproduce the classic behavior: `file.json` in the working
//!   directory and no file logging.
//! - Logging is only started when a log directory is configured.

use crate::logging::{default_log_level, init_logging};
use std::path::PathBuf;

/// Durable file used when no path is configured.
pub const DEFAULT_FILE_PATH: &str = "file.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Location of the durable JSON file.
    pub file_path: PathBuf,
    /// `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from(DEFAULT_FILE_PATH),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    pub fn with_file_path(mut self, file_path: impl Into<PathBuf>) -> Self {
        self.file_path = file_path.into();
        self
    }

    pub fn with_log_level(mut self, log_level: impl Into<String>) -> Self {
        self.log_level = log_level.into();
        self
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(log_dir.into());
        self
    }

    /// Starts file logging when a directory is configured.
    ///
    /// Returns `Ok(false)` when logging is disabled.
    ///
    /// # Errors
    /// - Same conditions as [`init_logging`], plus a non UTF-8 directory.
    pub fn start_logging(&self) -> Result<bool, String> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(false);
        };
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| format!("log_dir `{}` is not valid UTF-8", log_dir.display()))?;
        init_logging(&self.log_level, log_dir)?;
        Ok(true)
    }
}
