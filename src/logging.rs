//! Logging prelude module for convenient access to tracing macros.
//!
//! Diagnostics go to stderr so they never interleave with the report
//! stream and prompts on stdout.
//!
//! # Usage
//!
//! ```ignore
//! use crate::logging::*;
//!
//! debug!("Entering {}", dir.display());
//! warn!("Failed to update {}: {}", subject, err);
//! ```

pub use tracing::{debug, error, info, trace, warn};

/// Initialize the tracing subscriber with environment filter support.
///
/// `RUST_LOG` wins when set; otherwise `default_level` (the configured
/// `logLevel`, "warn" unless changed) is used:
///
/// ```bash
/// RUST_LOG=debug dirsync src dst
/// RUST_LOG=dirsync::permission=debug dirsync src dst
/// ```
pub fn init_tracing(default_level: &str) {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
		)
		.with_writer(std::io::stderr)
		.init();
}

// vim: ts=4
