//! Report stream shown to the operator
//!
//! Two kinds of output share one stream: persistent lines, and a single
//! transient status line that is overwritten in place and wiped before the
//! next persistent line or prompt.

use std::io::Write;

/// Longest transient line, in characters
pub const PROGRESS_WIDTH: usize = 79;

pub struct Console<'a> {
	out: &'a mut dyn Write,
	/// Width of the transient line currently on screen (0 = none)
	transient: usize,
}

impl<'a> Console<'a> {
	pub fn new(out: &'a mut dyn Write) -> Self {
		Console { out, transient: 0 }
	}

	/// Persistent, newline-terminated line; wipes any transient line first
	pub fn report(&mut self, text: &str) {
		self.leave();
		let _ = writeln!(self.out, "{}", text);
		let _ = self.out.flush();
	}

	/// Replace the transient line with `text`, truncated to [`PROGRESS_WIDTH`]
	pub fn progress(&mut self, text: &str) {
		let text: String = text.chars().take(PROGRESS_WIDTH).collect();
		let len = text.chars().count();
		let fill = self.transient.saturating_sub(len);
		let _ = write!(self.out, "\r{}{}{}", text, " ".repeat(fill), "\x08".repeat(fill));
		let _ = self.out.flush();
		self.transient = len;
	}

	/// Show a single character at the cursor without advancing it
	pub fn tick(&mut self, c: char) {
		let _ = write!(self.out, "{}\x08", c);
		let _ = self.out.flush();
	}

	/// Turn the transient line into a persistent one by appending `suffix`
	pub fn end_progress(&mut self, suffix: &str) {
		if self.transient > 0 {
			let _ = writeln!(self.out, "{}", suffix);
			let _ = self.out.flush();
			self.transient = 0;
		}
	}

	/// Wipe the transient line, if any
	pub fn leave(&mut self) {
		if self.transient > 0 {
			let blank = " ".repeat(self.transient);
			let _ = write!(self.out, "\r{}\r", blank);
			let _ = self.out.flush();
			self.transient = 0;
		}
	}
}


// vim: ts=4
