//! Tree walk, pair comparison and action dispatch
//!
//! A [`Session`] walks the source and target trees depth first, in sorted
//! basename order. Every path pair is classified into a [`Category`], the
//! catalog maps the category to an [`Action`], and the action is carried out
//! once the permission protocol (recorded decision or operator answer)
//! grants it.
//!
//! Failures of individual mutations are reported and counted; the walk goes
//! on. Only an operator "Quit" (or a failing prompt) ends the run early.

use chrono::{Local, TimeZone};
use std::collections::{BTreeSet, HashSet};
use std::ffi::{OsStr, OsString};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use crate::logging::*;

use crate::action::{Action, ActionCatalog, Category, Effect};
use crate::compare::{classify_files, FilePair};
use crate::config::{AutoAnswer, Config};
use crate::console::Console;
use crate::error::SyncError;
use crate::filesystem::Filesystem;
use crate::permission::{Decision, PermissionStore, Scope};
use crate::prompt::{choices, Choice, Chooser};
use crate::types::{EntryKind, EntrySnapshot, SyncSummary};

/// The same relative path on both sides, with its current snapshots
struct EntryPair {
	subject: PathBuf,
	/// Subject as shown to the operator
	label: String,
	path_a: PathBuf,
	path_b: PathBuf,
	a: Option<EntrySnapshot>,
	b: Option<EntrySnapshot>,
}

pub struct Session<'a> {
	source: PathBuf,
	target: PathBuf,
	/// Common subdirectory to start from, empty for the roots
	start: PathBuf,
	config: Config,
	catalog: ActionCatalog,
	fs: &'a dyn Filesystem,
	chooser: &'a mut dyn Chooser,
	console: Console<'a>,
	summary: SyncSummary,
}

impl<'a> Session<'a> {
	pub fn new(
		source: impl Into<PathBuf>,
		target: impl Into<PathBuf>,
		config: Config,
		fs: &'a dyn Filesystem,
		chooser: &'a mut dyn Chooser,
		out: &'a mut dyn Write,
	) -> Self {
		let catalog = ActionCatalog::new(&config);
		Session {
			source: source.into(),
			target: target.into(),
			start: PathBuf::new(),
			config,
			catalog,
			fs,
			chooser,
			console: Console::new(out),
			summary: SyncSummary::default(),
		}
	}

	/// Only reconcile `subdir`, relative to both roots
	pub fn start_at(mut self, subdir: impl Into<PathBuf>) -> Self {
		self.start = subdir.into();
		self
	}

	/// Walk both trees. Returns [`SyncError::Aborted`] when the operator quits;
	/// mutations done so far stay in place.
	pub fn run(mut self) -> Result<SyncSummary, SyncError> {
		let mut root = PermissionStore::new_root();
		let preset = match self.config.auto_answer {
			AutoAnswer::Ask => None,
			AutoAnswer::Yes => Some(Decision::Granted),
			AutoAnswer::No => Some(Decision::Denied),
		};
		if let Some(decision) = preset {
			for category in Category::ALL {
				root.record(category, decision, Scope::Root);
			}
		}

		let start = self.start.clone();
		let result = self.walk(&start, &mut root);
		self.console.leave();

		let summary = self.summary.clone();
		info!(
			"Finished: {} performed, {} declined, {} skipped, {} failed, {} prompts",
			summary.performed, summary.declined, summary.skipped, summary.failed, summary.prompts
		);
		result.map(|()| summary)
	}

	fn walk(&mut self, subdir: &Path, scope: &mut PermissionStore) -> Result<(), SyncError> {
		let dir_a = self.source.join(subdir);
		let dir_b = self.target.join(subdir);
		debug!("Entering {}", subdir.display());

		// A side whose "only on the other side" directory action is disabled
		// contributes nothing worth listing
		let names_a = if self.catalog.get(Category::NewDir).is_ignore() {
			Vec::new()
		} else {
			self.fs.list_names(&dir_a).unwrap_or_default()
		};
		let names_b = if self.catalog.get(Category::OldDir).is_ignore() {
			Vec::new()
		} else {
			self.fs.list_names(&dir_b).unwrap_or_default()
		};
		let names: BTreeSet<OsString> = names_a.into_iter().chain(names_b).collect();

		let follow = self.config.follow_symlinks;
		let mut aliases: HashSet<OsString> = HashSet::new();
		for name in &names {
			if aliases.contains(name) {
				continue;
			}
			let mut pair = self.entry_pair(subdir.join(name));
			self.compare(&mut pair, scope)?;

			for alias in case_variants(name) {
				let same_a = pair.a.as_ref().is_some_and(|a| {
					self.fs.stat(&dir_a.join(&alias), follow).is_some_and(|s| s.same_object(a))
				});
				let same_b = pair.b.as_ref().is_some_and(|b| {
					self.fs.stat(&dir_b.join(&alias), follow).is_some_and(|s| s.same_object(b))
				});
				if same_a || same_b {
					trace!("{} is an alias of {}", alias.to_string_lossy(), pair.label);
					aliases.insert(alias);
				}
			}
		}
		Ok(())
	}

	fn entry_pair(&self, subject: PathBuf) -> EntryPair {
		let path_a = self.source.join(&subject);
		let path_b = self.target.join(&subject);
		let follow = self.config.follow_symlinks;
		EntryPair {
			label: subject.to_string_lossy().into_owned(),
			a: self.fs.stat(&path_a, follow),
			b: self.fs.stat(&path_b, follow),
			subject,
			path_a,
			path_b,
		}
	}

	fn restat_a(&self, pair: &mut EntryPair) {
		pair.a = self.fs.stat(&pair.path_a, self.config.follow_symlinks);
	}

	fn restat_b(&self, pair: &mut EntryPair) {
		pair.b = self.fs.stat(&pair.path_b, self.config.follow_symlinks);
	}

	fn compare(&mut self, pair: &mut EntryPair, scope: &mut PermissionStore) -> Result<(), SyncError> {
		let kind_a = pair.a.as_ref().map(|s| s.kind);
		let kind_b = pair.b.as_ref().map(|s| s.kind);

		match (kind_a, kind_b) {
			// Vanished since listing
			(None, None) => Ok(()),
			(None, Some(EntryKind::Dir)) => {
				// "no" to removing files in here means the directory cannot go either
				let old_file = self.catalog.get(Category::OldFile);
				if old_file.is_ignore() || scope.query(Category::OldFile) != Some(Decision::Denied) {
					self.perform_if_can(Category::OldDir, pair, scope)
				} else {
					Ok(())
				}
			}
			(None, Some(_)) => self.perform_if_can(Category::OldFile, pair, scope),
			(Some(EntryKind::Dir), None) => self.perform_if_can(Category::NewDir, pair, scope),
			(Some(EntryKind::File), None) => self.perform_if_can(Category::NewFile, pair, scope),
			(Some(EntryKind::SymLink), None) => self.perform_if_can(Category::NewLink, pair, scope),
			(Some(kind), None) => {
				self.skip(&format!("{} skipped - is {} in source", pair.label, kind));
				Ok(())
			}
			(Some(EntryKind::Dir), Some(EntryKind::Dir)) => {
				self.descend(&pair.subject, scope)?;
				self.common_dir_done(pair);
				Ok(())
			}
			(Some(EntryKind::File), Some(EntryKind::File)) => self.compare_files(pair, scope),
			(Some(EntryKind::SymLink), Some(EntryKind::SymLink)) => self.compare_links(pair, scope),
			(Some(kind_a), Some(kind_b)) => {
				self.skip(&format!(
					"{} skipped - is {} in source and {} in target!",
					pair.label, kind_a, kind_b
				));
				Ok(())
			}
		}
	}

	fn compare_files(
		&mut self,
		pair: &mut EntryPair,
		scope: &mut PermissionStore,
	) -> Result<(), SyncError> {
		let (Some(a), Some(b)) = (&pair.a, &pair.b) else {
			return Ok(());
		};
		let file_pair = FilePair {
			subject: &pair.label,
			path_a: &pair.path_a,
			path_b: &pair.path_b,
			a,
			b,
		};
		let classified =
			classify_files(self.fs, &mut self.console, self.config.time_policy(), &file_pair);
		let Some(category) = classified else {
			self.summary.skipped += 1;
			return Ok(());
		};

		if matches!(category, Category::ChangedUnknown | Category::ChangedTimestamp) {
			let lines = format!("{}\n{}", file_line(a, &self.source), file_line(b, &self.target));
			self.console.report(&lines);
		}
		self.perform_if_can(category, pair, scope)
	}

	fn compare_links(
		&mut self,
		pair: &mut EntryPair,
		scope: &mut PermissionStore,
	) -> Result<(), SyncError> {
		let target_a = pair.a.as_ref().and_then(|s| s.target.clone());
		let target_b = pair.b.as_ref().and_then(|s| s.target.clone());
		if target_a == target_b {
			return self.perform_if_can(Category::Duplicate, pair, scope);
		}

		let shown =
			|t: &Option<PathBuf>| t.as_ref().map(|p| p.display().to_string()).unwrap_or_default();
		self.console.report(&format!(
			"{} has changed as follows:\n- {}\n+ {}",
			pair.label,
			shown(&target_a),
			shown(&target_b)
		));
		self.perform_if_can(Category::ChangedLink, pair, scope)
	}

	fn descend(&mut self, subject: &Path, scope: &PermissionStore) -> Result<(), SyncError> {
		let mut child = scope.child();
		self.walk(subject, &mut child)
	}

	/// Called once a directory present on both sides has been walked
	fn common_dir_done(&mut self, pair: &mut EntryPair) {
		if self.config.clean {
			// Succeeds only if everything inside went away
			let _ = self.fs.remove_dir(&pair.path_a);
			self.restat_a(pair);
		}
	}

	fn skip(&mut self, message: &str) {
		self.summary.skipped += 1;
		self.console.report(message);
	}

	fn perform_if_can(
		&mut self,
		category: Category,
		pair: &mut EntryPair,
		scope: &mut PermissionStore,
	) -> Result<(), SyncError> {
		let action = *self.catalog.get(category);
		if self.authorize(&action, &pair.label, scope)? {
			if self.perform(&action, pair, scope)? {
				self.summary.performed += 1;
			}
			Ok(())
		} else {
			self.summary.declined += 1;
			Ok(())
		}
	}

	/// Decide whether `action` may run on `subject`, asking the operator when
	/// nothing has been recorded for its category
	fn authorize(
		&mut self,
		action: &Action,
		subject: &str,
		scope: &mut PermissionStore,
	) -> Result<bool, SyncError> {
		if action.is_ignore() {
			trace!("{} {} (disabled)", subject, action.reason);
			self.console.progress(&action.describe(subject));
			return Ok(false);
		}

		if let Some(decision) = scope.query(action.category) {
			if decision.is_granted() || self.config.auto_answer == AutoAnswer::No {
				self.console.report(&action.describe(subject));
			}
			return Ok(decision.is_granted());
		}

		let prompt = format!("{}? [{}] ", action.describe(subject), choices(!scope.is_root()));
		loop {
			self.console.leave();
			self.summary.prompts += 1;
			let answer = self.chooser.ask(&prompt).map_err(|e| SyncError::io("<stdin>", e))?;
			match Choice::parse(&answer) {
				Choice::Once(decision) => return Ok(decision.is_granted()),
				Choice::Remember(decision, remember_in) => {
					scope.record(action.category, decision, remember_in);
					return Ok(decision.is_granted());
				}
				Choice::Quit => return Err(SyncError::Aborted),
				Choice::Unknown => self.console.report("Pardon?"),
			}
		}
	}

	/// Carry out an authorized action. Ok(false) when its mutation failed.
	fn perform(
		&mut self,
		action: &Action,
		pair: &mut EntryPair,
		scope: &mut PermissionStore,
	) -> Result<bool, SyncError> {
		let fs = self.fs;
		let done = match action.effect {
			Effect::Ignore => false,
			Effect::CreateDir => {
				let made = fs.make_dir(&pair.path_b);
				self.restat_b(pair);
				let done = self.check(pair, made);
				if done {
					self.descend(&pair.subject, scope)?;
				}
				done
			}
			Effect::RemoveDir => {
				self.descend(&pair.subject, scope)?;
				// Anything declined inside keeps the directory alive
				let _ = fs.remove_dir(&pair.path_b);
				self.restat_b(pair);
				true
			}
			Effect::CopyTimestamp => {
				let touched = match &pair.a {
					Some(a) => fs.set_times(&pair.path_b, a.atime, a.mtime),
					None => Ok(()),
				};
				self.restat_b(pair);
				self.check(pair, touched)
			}
			Effect::CopyFile => {
				let copied = fs.copy_file(&pair.path_a, &pair.path_b).and_then(|()| match &pair.a {
					Some(a) => fs.set_times(&pair.path_b, a.atime, a.mtime),
					None => Ok(()),
				});
				self.restat_b(pair);
				self.check(pair, copied)
			}
			Effect::CopyLink => {
				let linked = fs.read_link(&pair.path_a).and_then(|target| {
					fs.remove_if_exists(&pair.path_b)?;
					fs.create_symlink(&target, &pair.path_b)
				});
				self.restat_b(pair);
				self.check(pair, linked)
			}
			Effect::RemoveTargetFile => {
				let removed = fs.remove_file(&pair.path_b);
				self.restat_b(pair);
				self.check(pair, removed)
			}
			Effect::RemoveSourceFile => {
				let removed = fs.remove_file(&pair.path_a);
				self.restat_a(pair);
				self.check(pair, removed)
			}
			Effect::RemoveSourceDir => {
				self.descend(&pair.subject, scope)?;
				let _ = fs.remove_dir(&pair.path_a);
				self.restat_a(pair);
				true
			}
		};
		Ok(done)
	}

	/// Report a failed mutation; true when it succeeded
	fn check(&mut self, pair: &EntryPair, result: io::Result<()>) -> bool {
		match result {
			Ok(()) => true,
			Err(e) => {
				warn!("Failed to update {}: {}", pair.label, e);
				self.summary.failed += 1;
				self.console.report(&format!("{}: {}", pair.label, e));
				false
			}
		}
	}
}

/// Upper and lower case spellings of `name` that differ from it
fn case_variants(name: &OsStr) -> Vec<OsString> {
	let Some(name) = name.to_str() else {
		return Vec::new();
	};
	let mut variants: Vec<OsString> = Vec::new();
	for variant in [name.to_uppercase(), name.to_lowercase()] {
		if variant != name && !variants.iter().any(|v| v == variant.as_str()) {
			variants.push(variant.into());
		}
	}
	variants
}

/// "<size> <mtime> <root>", the way a changed file is shown for each side
fn file_line(snapshot: &EntrySnapshot, root: &Path) -> String {
	let secs = snapshot.mtime_secs();
	let when = match Local.timestamp_opt(secs, 0).earliest() {
		Some(t) => t.format("%a %b %e %H:%M:%S %Y").to_string(),
		None => secs.to_string(),
	};
	format!("{:>10} {} {}", snapshot.size, when, root.display())
}

#[cfg(test)]
mod tests {
	use super::*;
	use filetime::FileTime;

	#[test]
	fn test_case_variants() {
		assert_eq!(case_variants(OsStr::new("Readme")), vec!["README", "readme"]);
		assert_eq!(case_variants(OsStr::new("readme")), vec!["README"]);
		assert!(case_variants(OsStr::new("1234")).is_empty());
	}

	#[test]
	fn test_file_line_layout() {
		let snapshot = EntrySnapshot {
			kind: EntryKind::File,
			size: 42,
			mtime: FileTime::from_unix_time(0, 0),
			atime: FileTime::from_unix_time(0, 0),
			target: None,
			id: None,
		};
		let line = file_line(&snapshot, Path::new("/src"));
		assert!(line.starts_with("        42 "));
		assert!(line.ends_with(" /src"));
		// ctime layout: weekday month day time year
		assert_eq!(line.split_whitespace().count(), 7);
	}
}

// vim: ts=4
