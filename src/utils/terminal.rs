//! Terminal cleanup

use std::io::{self, Write};

/// Wipe whatever transient status is on the current stdout line
pub fn clear_transient_line() {
	let mut stdout = io::stdout();
	let _ = write!(stdout, "{}", CLEAR_LINE);
	let _ = stdout.flush();
}

/// Carriage return, then erase to end of line
const CLEAR_LINE: &str = "\r\x1B[K";


// vim: ts=4
