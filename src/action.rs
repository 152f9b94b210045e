//! Change categories and the actions they map to
//!
//! Every path pair is classified into a [`Category`]. The [`ActionCatalog`]
//! built once per run maps each category to exactly one [`Action`], whose
//! [`Effect`] depends on the run mode (normal or clean).

use std::fmt;

use crate::config::Config;

/// Classification of a path pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
	/// Directory only in source
	NewDir,
	/// Directory only in target
	OldDir,
	/// Regular file only in source
	NewFile,
	/// Symlink only in source
	NewLink,
	/// File or symlink only in target
	OldFile,
	/// Same content and time (or same link target)
	Duplicate,
	/// Same content, different modification time
	ChangedTimestamp,
	/// Content differs but cannot be shown (large or binary)
	ChangedUnknown,
	/// Content differs as shown by a line diff
	ChangedKnown,
	/// Symlink points elsewhere
	ChangedLink,
}

impl Category {
	pub const ALL: [Category; 10] = [
		Category::NewDir,
		Category::OldDir,
		Category::NewFile,
		Category::NewLink,
		Category::OldFile,
		Category::Duplicate,
		Category::ChangedTimestamp,
		Category::ChangedUnknown,
		Category::ChangedKnown,
		Category::ChangedLink,
	];
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Category::NewDir => "new-dir",
			Category::OldDir => "old-dir",
			Category::NewFile => "new-file",
			Category::NewLink => "new-link",
			Category::OldFile => "old-file",
			Category::Duplicate => "duplicate",
			Category::ChangedTimestamp => "changed-timestamp",
			Category::ChangedUnknown => "changed-unknown",
			Category::ChangedKnown => "changed-known",
			Category::ChangedLink => "changed-link",
		};
		write!(f, "{}", name)
	}
}

/// Filesystem mutation carried out once an action is authorized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
	/// Create the target directory, then descend
	CreateDir,
	/// Descend, then remove the target directory (best effort)
	RemoveDir,
	/// Copy source timestamps onto the target
	CopyTimestamp,
	/// Copy source content, then timestamps
	CopyFile,
	/// Recreate the source symlink in the target
	CopyLink,
	RemoveTargetFile,
	RemoveSourceFile,
	/// Descend, then remove the source directory (best effort)
	RemoveSourceDir,
	/// Disabled: never prompts, never mutates
	Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
	pub category: Category,
	/// Why the path is flagged, e.g. "is new"
	pub reason: &'static str,
	/// What would be done, e.g. "create"; None when the action is disabled
	pub treatment: Option<&'static str>,
	pub effect: Effect,
}

impl Action {
	fn new(
		category: Category,
		reason: &'static str,
		treatment: &'static str,
		effect: Effect,
	) -> Self {
		Action { category, reason, treatment: Some(treatment), effect }
	}

	fn ignore(category: Category, reason: &'static str) -> Self {
		Action { category, reason, treatment: None, effect: Effect::Ignore }
	}

	pub fn is_ignore(&self) -> bool {
		self.treatment.is_none()
	}

	/// "<subject> <reason>, <treatment>", or without treatment when disabled
	pub fn describe(&self, subject: &str) -> String {
		match self.treatment {
			Some(treatment) => format!("{} {}, {}", subject, self.reason, treatment),
			None => format!("{} {}", subject, self.reason),
		}
	}
}

/// One action per category for the lifetime of a run
#[derive(Debug, Clone)]
pub struct ActionCatalog {
	actions: Vec<Action>,
}

impl ActionCatalog {
	pub fn new(config: &Config) -> Self {
		use Category::*;
		use Effect::*;

		let mut actions = if !config.clean {
			vec![
				Action::new(NewDir, "is new", "create", CreateDir),
				Action::new(OldDir, "has disappeared", "descend & remove", RemoveDir),
				Action::new(NewFile, "is new", "create", CopyFile),
				Action::new(NewLink, "is new", "link", CopyLink),
				Action::new(OldFile, "has disappeared", "remove", RemoveTargetFile),
				Action::ignore(Duplicate, "has not changed"),
				Action::new(ChangedTimestamp, "has different time", "touch", CopyTimestamp),
				Action::new(ChangedUnknown, "has changed somehow", "overwrite", CopyFile),
				Action::new(ChangedKnown, "has changed as shown", "overwrite", CopyFile),
				Action::new(ChangedLink, "has changed as shown", "relink", CopyLink),
			]
		} else {
			vec![
				Action::new(NewDir, "is new", "descend", RemoveSourceDir),
				Action::ignore(OldDir, "has disappeared"),
				Action::new(NewFile, "is new", "remove", RemoveSourceFile),
				Action::new(NewLink, "is new", "remove", RemoveSourceFile),
				Action::ignore(OldFile, "has disappeared"),
				Action::new(Duplicate, "has not changed", "remove", RemoveSourceFile),
				Action::new(ChangedTimestamp, "has different time", "remove", RemoveSourceFile),
				Action::new(ChangedUnknown, "has changed somehow", "remove", RemoveSourceFile),
				Action::new(ChangedKnown, "has changed as shown", "remove", RemoveSourceFile),
				Action::new(ChangedLink, "has changed as shown", "remove", RemoveSourceFile),
			]
		};

		if config.ignore_time {
			for action in actions.iter_mut().filter(|a| a.category == ChangedTimestamp) {
				*action = Action::ignore(ChangedTimestamp, "has different time");
			}
		}

		actions.sort_by_key(|a| a.category);
		ActionCatalog { actions }
	}

	pub fn get(&self, category: Category) -> &Action {
		// sorted and complete: index == discriminant
		&self.actions[category as usize]
	}
}


// vim: ts=4
