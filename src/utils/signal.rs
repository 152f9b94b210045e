//! Interrupt handling

use tracing::{debug, warn};

/// Resolves on the first Ctrl-C. If no handler can be installed, never
/// resolves, so the run simply goes on without interrupt support.
pub async fn wait_for_interrupt() {
	match tokio::signal::ctrl_c().await {
		Ok(()) => debug!("Received SIGINT, cancelling"),
		Err(e) => {
			warn!("Failed to setup SIGINT handler: {}. Interrupt will not be handled.", e);
			std::future::pending::<()>().await;
		}
	}
}

// vim: ts=4
