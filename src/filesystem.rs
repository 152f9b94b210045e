//! Filesystem primitives the reconciliation core calls through

use filetime::FileTime;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::types::{EntryKind, EntrySnapshot};

/// Raw filesystem operations. Every path is absolute (root joined with subject).
pub trait Filesystem {
	/// Snapshot of `path`, or None when it does not exist (or cannot be stat'ed)
	fn stat(&self, path: &Path, follow_links: bool) -> Option<EntrySnapshot>;

	/// Basenames in a directory, or None when `path` is not a readable directory
	fn list_names(&self, path: &Path) -> Option<Vec<OsString>>;

	fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

	fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read>>;

	fn copy_file(&self, src: &Path, dst: &Path) -> io::Result<()>;

	fn set_times(&self, path: &Path, atime: FileTime, mtime: FileTime) -> io::Result<()>;

	fn make_dir(&self, path: &Path) -> io::Result<()>;

	/// Non-recursive; fails when the directory is not empty
	fn remove_dir(&self, path: &Path) -> io::Result<()>;

	fn remove_file(&self, path: &Path) -> io::Result<()>;

	fn create_symlink(&self, target: &Path, link: &Path) -> io::Result<()>;

	/// Remove a file or link, succeeding when nothing is there
	fn remove_if_exists(&self, path: &Path) -> io::Result<()> {
		match self.remove_file(path) {
			Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
			other => other,
		}
	}
}

/// The real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFilesystem;

impl Filesystem for LocalFilesystem {
	fn stat(&self, path: &Path, follow_links: bool) -> Option<EntrySnapshot> {
		let meta =
			if follow_links { fs::metadata(path) } else { fs::symlink_metadata(path) }.ok()?;
		let target = if EntryKind::from_file_type(meta.file_type()) == EntryKind::SymLink {
			fs::read_link(path).ok()
		} else {
			None
		};
		Some(EntrySnapshot::from_metadata(&meta, target))
	}

	fn list_names(&self, path: &Path) -> Option<Vec<OsString>> {
		let entries = fs::read_dir(path).ok()?;
		Some(entries.filter_map(|e| e.ok()).map(|e| e.file_name()).collect())
	}

	fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
		fs::read_link(path)
	}

	fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read>> {
		Ok(Box::new(fs::File::open(path)?))
	}

	fn copy_file(&self, src: &Path, dst: &Path) -> io::Result<()> {
		fs::copy(src, dst).map(|_| ())
	}

	fn set_times(&self, path: &Path, atime: FileTime, mtime: FileTime) -> io::Result<()> {
		filetime::set_file_times(path, atime, mtime)
	}

	fn make_dir(&self, path: &Path) -> io::Result<()> {
		fs::create_dir(path)
	}

	fn remove_dir(&self, path: &Path) -> io::Result<()> {
		fs::remove_dir(path)
	}

	fn remove_file(&self, path: &Path) -> io::Result<()> {
		fs::remove_file(path)
	}

	#[cfg(unix)]
	fn create_symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
		std::os::unix::fs::symlink(target, link)
	}

	#[cfg(not(unix))]
	fn create_symlink(&self, _target: &Path, _link: &Path) -> io::Result<()> {
		Err(io::Error::new(io::ErrorKind::Unsupported, "symbolic links are not supported"))
	}
}


// vim: ts=4
