//! Content comparison of two regular files
//!
//! Decides whether a file pair is a duplicate, differs only in modification
//! time, or differs in content (shown as a line diff when both sides are
//! small text files, otherwise just flagged).

use std::io::{self, Read};
use std::path::Path;
use tracing::warn;

use crate::action::Category;
use crate::console::Console;
use crate::diff::diff_lines;
use crate::filesystem::Filesystem;
use crate::types::EntrySnapshot;

/// Files larger than one block are compared block by block, never diffed
pub const BLOCK_SIZE: u64 = 0x10000;

/// Countdown steps shown while comparing large files
const PROGRESS_STEPS: u64 = 10;

/// Modification time differences (seconds) still counted as equal:
/// whole-second rounding and one or two hour daylight saving shifts
const TOLERATED_SKEWS: [i64; 8] = [0, 1, 3599, 3600, 3601, 7199, 7200, 7201];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimePolicy {
	/// Treat all modification times as equal
	pub ignore_time: bool,
	/// Equal size and time means equal content, without reading it
	pub trust_time: bool,
}

pub fn equal_time(a: &EntrySnapshot, b: &EntrySnapshot, ignore_time: bool) -> bool {
	ignore_time || TOLERATED_SKEWS.contains(&(b.mtime_secs() - a.mtime_secs()).abs())
}

/// Anything outside printable ASCII, tab, newline, form feed and carriage return
pub fn is_binary(bytes: &[u8]) -> bool {
	bytes.iter().any(|&c| c > 126 || (c < 32 && !matches!(c, b'\t' | b'\n' | b'\x0c' | b'\r')))
}

/// Paths and snapshots of a regular file present on both sides
pub struct FilePair<'p> {
	pub subject: &'p str,
	pub path_a: &'p Path,
	pub path_b: &'p Path,
	pub a: &'p EntrySnapshot,
	pub b: &'p EntrySnapshot,
}

/// Classify a file pair. None when the content could not be read; the
/// failure has been reported and nothing should be done about the pair.
pub fn classify_files(
	fs: &dyn Filesystem,
	console: &mut Console,
	policy: TimePolicy,
	pair: &FilePair,
) -> Option<Category> {
	let same_time = equal_time(pair.a, pair.b, policy.ignore_time);
	let unchanged = if same_time { Category::Duplicate } else { Category::ChangedTimestamp };

	let max_size = pair.a.size.max(pair.b.size);
	if max_size == 0 {
		return Some(unchanged);
	}
	if pair.a.size == pair.b.size && policy.trust_time && same_time {
		return Some(Category::Duplicate);
	}

	let blocks = (max_size + BLOCK_SIZE - 1) / BLOCK_SIZE;
	if blocks > 1 {
		if pair.a.size != pair.b.size {
			return Some(Category::ChangedUnknown);
		}
		return compare_blocks(fs, console, pair, blocks).map(|equal| {
			if equal {
				unchanged
			} else {
				Category::ChangedUnknown
			}
		});
	}

	let content_a = read_content(fs, console, pair.subject, pair.path_a)?;
	let content_b = read_content(fs, console, pair.subject, pair.path_b)?;
	if content_a == content_b {
		return Some(unchanged);
	}

	let (text_a, text_b) = match (as_text(&content_a), as_text(&content_b)) {
		(Some(a), Some(b)) => (a, b),
		(None, None) => {
			console.report(&format!(
				"{} different but won't detail because both versions are binary",
				pair.subject
			));
			return Some(Category::ChangedUnknown);
		}
		(None, Some(_)) => {
			console.report(&format!(
				"{} different but won't detail because source version is binary",
				pair.subject
			));
			return Some(Category::ChangedUnknown);
		}
		(Some(_), None) => {
			console.report(&format!(
				"{} different but won't detail because target version is binary",
				pair.subject
			));
			return Some(Category::ChangedUnknown);
		}
	};

	// Diffing may take a while, give a clue
	console.progress(&format!("{} ", pair.subject));
	let lines_a: Vec<&str> = text_a.split_inclusive('\n').collect();
	let lines_b: Vec<&str> = text_b.split_inclusive('\n').collect();
	let shown: Vec<String> =
		diff_lines(&lines_a, &lines_b).iter().map(|l| l.annotated()).collect();
	console.end_progress(&format!(" - difference:\n{}", shown.join("\n")));
	Some(Category::ChangedKnown)
}

fn as_text(bytes: &[u8]) -> Option<&str> {
	if is_binary(bytes) {
		return None;
	}
	std::str::from_utf8(bytes).ok()
}

fn read_content(
	fs: &dyn Filesystem,
	console: &mut Console,
	subject: &str,
	path: &Path,
) -> Option<Vec<u8>> {
	let result = fs.open_read(path).and_then(|mut reader| {
		let mut content = Vec::new();
		reader.read_to_end(&mut content)?;
		Ok(content)
	});
	match result {
		Ok(content) => Some(content),
		Err(e) => {
			warn!("Cannot read {}: {}", path.display(), e);
			console.report(&format!("{}: {}", subject, e));
			None
		}
	}
}

/// Some(true) when both files hold the same bytes. Caller guarantees equal sizes.
fn compare_blocks(
	fs: &dyn Filesystem,
	console: &mut Console,
	pair: &FilePair,
	blocks: u64,
) -> Option<bool> {
	let mut reader_a = open_or_report(fs, console, pair.subject, pair.path_a)?;
	let mut reader_b = open_or_report(fs, console, pair.subject, pair.path_b)?;

	console.progress(&format!("{} ", pair.subject));
	let mut buf_a = vec![0u8; BLOCK_SIZE as usize];
	let mut buf_b = vec![0u8; BLOCK_SIZE as usize];
	let mut progress = 0;
	for block in 0..blocks {
		let mut update = false;
		while block * PROGRESS_STEPS >= progress * blocks {
			progress += 1;
			update = true;
		}
		if update {
			if let Some(digit) = char::from_digit((PROGRESS_STEPS - progress) as u32, 10) {
				console.tick(digit);
			}
		}

		let read_a = read_block(&mut reader_a, &mut buf_a);
		let read_b = read_block(&mut reader_b, &mut buf_b);
		let equal = match (read_a, read_b) {
			(Ok(n_a), Ok(n_b)) => n_a == n_b && buf_a[..n_a] == buf_b[..n_b],
			(Err(e), _) | (_, Err(e)) => {
				warn!("Read failure while comparing {}: {}", pair.subject, e);
				console.report(&format!("{}: {}", pair.subject, e));
				false
			}
		};
		if !equal {
			console.report(&format!(
				"{} different but won't detail because files are too big",
				pair.subject
			));
			return Some(false);
		}
	}
	Some(true)
}

fn open_or_report(
	fs: &dyn Filesystem,
	console: &mut Console,
	subject: &str,
	path: &Path,
) -> Option<Box<dyn Read>> {
	match fs.open_read(path) {
		Ok(reader) => Some(reader),
		Err(e) => {
			warn!("Cannot open {}: {}", path.display(), e);
			console.report(&format!("{}: {}", subject, e));
			None
		}
	}
}

/// Fill `buf` as far as the stream allows; returns the byte count
fn read_block(reader: &mut dyn Read, buf: &mut [u8]) -> io::Result<usize> {
	let mut filled = 0;
	while filled < buf.len() {
		match reader.read(&mut buf[filled..]) {
			Ok(0) => break,
			Ok(n) => filled += n,
			Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
			Err(e) => return Err(e),
		}
	}
	Ok(filled)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::filesystem::LocalFilesystem;
	use filetime::FileTime;
	use std::fs;
	use std::path::PathBuf;
	use tempfile::TempDir;

	fn snapshot(path: &Path) -> EntrySnapshot {
		LocalFilesystem.stat(path, false).unwrap()
	}

	fn write(dir: &TempDir, name: &str, content: &[u8], mtime: i64) -> PathBuf {
		let path = dir.path().join(name);
		fs::write(&path, content).unwrap();
		let t = FileTime::from_unix_time(mtime, 0);
		filetime::set_file_times(&path, t, t).unwrap();
		path
	}

	fn classify(
		content_a: &[u8],
		mtime_a: i64,
		content_b: &[u8],
		mtime_b: i64,
		policy: TimePolicy,
	) -> (Option<Category>, String) {
		let dir = TempDir::new().unwrap();
		let path_a = write(&dir, "a", content_a, mtime_a);
		let path_b = write(&dir, "b", content_b, mtime_b);
		let (a, b) = (snapshot(&path_a), snapshot(&path_b));
		let pair = FilePair { subject: "phile", path_a: &path_a, path_b: &path_b, a: &a, b: &b };

		let mut out = Vec::new();
		let category = {
			let mut console = Console::new(&mut out);
			classify_files(&LocalFilesystem, &mut console, policy, &pair)
		};
		(category, String::from_utf8(out).unwrap())
	}

	const TRUST: TimePolicy = TimePolicy { ignore_time: false, trust_time: true };
	const STRICT: TimePolicy = TimePolicy { ignore_time: false, trust_time: false };

	#[test]
	fn test_is_binary() {
		assert!(!is_binary(b"plain text\twith tab\r\n\x0c"));
		assert!(is_binary(b"nul\0byte"));
		assert!(is_binary("caf\u{e9}".as_bytes()));
		assert!(is_binary(b"\x7f"));
	}

	#[test]
	fn test_time_tolerance() {
		for (skew, expected) in
			[(0, true), (1, true), (2, false), (3600, true), (3602, false), (7201, true), (5, false)]
		{
			let (category, _) = classify(b"same\n", 1_000_000, b"same\n", 1_000_000 + skew, STRICT);
			let want = if expected { Category::Duplicate } else { Category::ChangedTimestamp };
			assert_eq!(category, Some(want), "skew {}", skew);
		}
	}

	#[test]
	fn test_negative_skew_tolerated() {
		let (category, _) = classify(b"x\n", 1_003_600, b"x\n", 1_000_000, STRICT);
		assert_eq!(category, Some(Category::Duplicate));
	}

	#[test]
	fn test_trusted_time_skips_content() {
		let (category, out) = classify(b"lhs contents\n", 1_000, b"rhs contents\n", 4_600, TRUST);
		assert_eq!(category, Some(Category::Duplicate));
		assert_eq!(out, "");
	}

	#[test]
	fn test_empty_files() {
		let (category, _) = classify(b"", 1_000, b"", 1_005, TRUST);
		assert_eq!(category, Some(Category::ChangedTimestamp));
		let ignore = TimePolicy { ignore_time: true, trust_time: true };
		let (category, _) = classify(b"", 1_000, b"", 1_005, ignore);
		assert_eq!(category, Some(Category::Duplicate));
	}

	#[test]
	fn test_text_difference_is_diffed() {
		let (category, out) = classify(b"lhs contents\n", 1_000, b"rhs contents\n", 1_000, STRICT);
		assert_eq!(category, Some(Category::ChangedKnown));
		assert_eq!(out, "\rphile  - difference:\n- lhs contents\n+ rhs contents\n");
	}

	#[test]
	fn test_same_content_different_time_is_timestamp_only() {
		let (category, out) = classify(b"x\n", 1_000, b"x\n", 1_005, TRUST);
		assert_eq!(category, Some(Category::ChangedTimestamp));
		assert_eq!(out, "");
	}

	#[test]
	fn test_binary_difference_not_detailed() {
		let (category, out) = classify(b"\0\x01", 1_000, b"text\n", 1_000, STRICT);
		assert_eq!(category, Some(Category::ChangedUnknown));
		assert_eq!(out, "phile different but won't detail because source version is binary\n");

		let (category, out) = classify(b"\0\x01", 1_000, b"\0\x02", 1_000, STRICT);
		assert_eq!(category, Some(Category::ChangedUnknown));
		assert!(out.contains("both versions are binary"));
	}

	#[test]
	fn test_large_files_of_different_size() {
		let big = vec![b'a'; BLOCK_SIZE as usize + 1];
		let (category, out) = classify(&big, 1_000, b"a", 1_000, STRICT);
		assert_eq!(category, Some(Category::ChangedUnknown));
		assert_eq!(out, "");
	}

	#[test]
	fn test_large_files_compared_blockwise() {
		let big = vec![b'a'; 3 * BLOCK_SIZE as usize];
		let (category, _) = classify(&big, 1_000, &big, 1_000, STRICT);
		assert_eq!(category, Some(Category::Duplicate));

		let mut other = big.clone();
		other[2 * BLOCK_SIZE as usize + 7] = b'b';
		let (category, out) = classify(&big, 1_000, &other, 1_000, STRICT);
		assert_eq!(category, Some(Category::ChangedUnknown));
		assert!(out.ends_with("phile different but won't detail because files are too big\n"));
	}

	#[cfg(unix)]
	#[test]
	fn test_unreadable_file_yields_nothing() {
		let dir = TempDir::new().unwrap();
		let path_a = write(&dir, "a", b"one\n", 1_000);
		let (a, b) = (snapshot(&path_a), snapshot(&path_a));
		let missing = dir.path().join("gone");
		let pair = FilePair { subject: "phile", path_a: &path_a, path_b: &missing, a: &a, b: &b };

		let mut out = Vec::new();
		let category = {
			let mut console = Console::new(&mut out);
			classify_files(&LocalFilesystem, &mut console, STRICT, &pair)
		};
		assert_eq!(category, None);
		assert!(String::from_utf8(out).unwrap().starts_with("phile: "));
	}
}

// vim: ts=4
