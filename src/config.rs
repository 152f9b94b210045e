//! Configuration for dirsync runs
//!
//! The configuration follows a priority chain:
//! 1. Built-in defaults (Config::default())
//! 2. Config file (--config PATH, or ~/.config/dirsync/config.toml)
//! 3. CLI flags (highest priority)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::compare::TimePolicy;
use crate::error::SyncError;

/// Answer given to every question without asking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AutoAnswer {
	/// Prompt the operator (default)
	#[default]
	Ask,
	Yes,
	No,
}

/// Behavioral switches of a run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
	/// Delete from the source what the target already has, instead of updating the target
	pub clean: bool,

	/// Stat through symbolic links instead of treating them as entries of their own
	pub follow_symlinks: bool,

	/// Compare contents even when size and modification time match
	pub strict: bool,

	/// Consider files equal regardless of modification time
	pub ignore_time: bool,

	pub auto_answer: AutoAnswer,

	/// Log filter used when RUST_LOG is not set
	pub log_level: String,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			clean: false,
			follow_symlinks: false,
			strict: false,
			ignore_time: false,
			auto_answer: AutoAnswer::Ask,
			log_level: "warn".to_string(),
		}
	}
}

impl Config {
	/// Load a config file: JSON5 for .json/.json5, TOML otherwise
	pub fn load(path: &Path) -> Result<Config, SyncError> {
		let contents = fs::read_to_string(path).map_err(|e| SyncError::io(path, e))?;
		let is_json = matches!(
			path.extension().and_then(|e| e.to_str()),
			Some("json") | Some("json5")
		);
		let parsed = if is_json {
			json5::from_str(&contents).map_err(|e| e.to_string())
		} else {
			toml::from_str(&contents).map_err(|e| e.to_string())
		};
		parsed.map_err(|message| SyncError::ConfigParse { path: path.to_path_buf(), message })
	}

	/// Explicit file if given, else the default location when it exists, else defaults
	pub fn discover(explicit: Option<&Path>) -> Result<Config, SyncError> {
		if let Some(path) = explicit {
			return Config::load(path);
		}
		match default_config_path() {
			Some(path) if path.is_file() => Config::load(&path),
			_ => Ok(Config::default()),
		}
	}

	pub fn validate(&self) -> Result<(), SyncError> {
		if self.strict && self.ignore_time {
			return Err(SyncError::invalid_config(
				"strict content comparison and ignoring timestamps are mutually exclusive",
			));
		}
		Ok(())
	}

	pub fn time_policy(&self) -> TimePolicy {
		TimePolicy { ignore_time: self.ignore_time, trust_time: !self.strict }
	}
}

/// $XDG_CONFIG_HOME/dirsync/config.toml, or ~/.config/dirsync/config.toml
pub fn default_config_path() -> Option<PathBuf> {
	if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
		if !dir.is_empty() {
			return Some(PathBuf::from(dir).join("dirsync").join("config.toml"));
		}
	}
	std::env::var("HOME")
		.ok()
		.map(|home| PathBuf::from(home).join(".config").join("dirsync").join("config.toml"))
}


// vim: ts=4
