//! Error types for dirsync operations

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Main error type for reconciliation runs
#[derive(Debug)]
pub enum SyncError {
	/// A filesystem primitive failed on a path
	Io { path: PathBuf, source: io::Error },

	/// Invalid configuration or command line
	InvalidConfig { message: String },

	/// Config file could not be parsed
	ConfigParse { path: PathBuf, message: String },

	/// Operation aborted by the operator (Quit)
	Aborted,
}

impl SyncError {
	pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
		SyncError::Io { path: path.into(), source }
	}

	pub fn invalid_config(message: impl Into<String>) -> Self {
		SyncError::InvalidConfig { message: message.into() }
	}

	/// True for the operator-requested cancellation
	pub fn is_aborted(&self) -> bool {
		matches!(self, SyncError::Aborted)
	}
}

impl fmt::Display for SyncError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SyncError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
			SyncError::InvalidConfig { message } => {
				write!(f, "Invalid configuration: {}", message)
			}
			SyncError::ConfigParse { path, message } => {
				write!(f, "Cannot parse {}: {}", path.display(), message)
			}
			SyncError::Aborted => write!(f, "Operation aborted by user"),
		}
	}
}

impl Error for SyncError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			SyncError::Io { source, .. } => Some(source),
			_ => None,
		}
	}
}


// vim: ts=4
