use filetime::FileTime;
use std::fmt;
use std::fs;
use std::path;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EntryKind {
	File,
	Dir,
	SymLink,
	Other,
}

impl EntryKind {
	pub fn from_file_type(ft: fs::FileType) -> Self {
		if ft.is_symlink() {
			EntryKind::SymLink
		} else if ft.is_dir() {
			EntryKind::Dir
		} else if ft.is_file() {
			EntryKind::File
		} else {
			EntryKind::Other
		}
	}
}

impl fmt::Display for EntryKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			EntryKind::File => write!(f, "file"),
			EntryKind::Dir => write!(f, "directory"),
			EntryKind::SymLink => write!(f, "link"),
			EntryKind::Other => write!(f, "special file"),
		}
	}
}

/// Identity of the underlying filesystem object (device + inode)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FileId {
	pub device: u64,
	pub inode: u64,
}

/// State of one path at the time it was stat'ed. Never updated in place:
/// after a mutation the owner takes a fresh one.
#[derive(Clone, PartialEq, Debug)]
pub struct EntrySnapshot {
	pub kind: EntryKind,
	pub size: u64,
	pub mtime: FileTime,
	pub atime: FileTime,
	pub target: Option<path::PathBuf>,
	pub id: Option<FileId>,
}

impl EntrySnapshot {
	pub fn from_metadata(meta: &fs::Metadata, target: Option<path::PathBuf>) -> Self {
		EntrySnapshot {
			kind: EntryKind::from_file_type(meta.file_type()),
			size: meta.len(),
			mtime: FileTime::from_last_modification_time(meta),
			atime: FileTime::from_last_access_time(meta),
			target,
			id: file_id(meta),
		}
	}

	/// Whole-second modification time
	pub fn mtime_secs(&self) -> i64 {
		self.mtime.unix_seconds()
	}

	/// Both snapshots describe the same filesystem object
	pub fn same_object(&self, other: &EntrySnapshot) -> bool {
		match (self.id, other.id) {
			(Some(a), Some(b)) => a == b,
			_ => false,
		}
	}
}

#[cfg(unix)]
fn file_id(meta: &fs::Metadata) -> Option<FileId> {
	use std::os::unix::fs::MetadataExt;
	Some(FileId { device: meta.dev(), inode: meta.ino() })
}

#[cfg(not(unix))]
fn file_id(_meta: &fs::Metadata) -> Option<FileId> {
	None
}

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
	/// Operator prompts issued
	pub prompts: usize,
	/// Authorized actions whose filesystem mutation succeeded
	pub performed: usize,
	/// Actions refused (by answer, recorded decision or because disabled)
	pub declined: usize,
	/// Paths reported and skipped (kind mismatch, unreadable content)
	pub skipped: usize,
	/// Authorized actions whose filesystem mutation failed
	pub failed: usize,
}


// vim: ts=4
