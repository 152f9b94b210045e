//! # dirsync - Interactive One-Way Directory Reconciliation
//!
//! dirsync walks a source and a target directory tree side by side,
//! classifies every difference (new, disappeared, changed, identical) and
//! applies the matching correction to the target once the operator agrees.
//! In clean mode it instead removes from the source whatever the target
//! already holds.
//!
//! Answers can be remembered for the rest of the run ("AllYes") or for the
//! current directory subtree ("YesInDir"), so large trees need few prompts.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dirsync::{Config, LocalFilesystem, Session, StdinChooser};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut chooser = StdinChooser;
//!     let mut stdout = std::io::stdout();
//!     let summary = Session::new(
//!         "./photos",
//!         "/backup/photos",
//!         Config::default(),
//!         &LocalFilesystem,
//!         &mut chooser,
//!         &mut stdout,
//!     )
//!     .run()?;
//!     println!("{} actions performed", summary.performed);
//!     Ok(())
//! }
//! ```

pub mod action;
pub mod compare;
pub mod config;
pub mod console;
pub mod diff;
pub mod error;
pub mod filesystem;
pub mod logging;
pub mod permission;
pub mod prompt;
pub mod session;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use action::{Action, ActionCatalog, Category, Effect};
pub use config::{AutoAnswer, Config};
pub use error::SyncError;
pub use filesystem::{Filesystem, LocalFilesystem};
pub use permission::{Decision, PermissionStore, Scope};
pub use prompt::{Chooser, StdinChooser};
pub use session::Session;
pub use types::{EntryKind, EntrySnapshot, SyncSummary};

// vim: ts=4
