//! Operator interaction

use std::io::{self, BufRead, Write};

use crate::permission::{Decision, Scope};

/// Asks the operator a question and returns the raw answer line
pub trait Chooser {
	fn ask(&mut self, prompt: &str) -> io::Result<String>;
}

/// Prompts on stdout and reads answers from stdin
#[derive(Debug, Default)]
pub struct StdinChooser;

impl Chooser for StdinChooser {
	fn ask(&mut self, prompt: &str) -> io::Result<String> {
		let mut stdout = io::stdout();
		write!(stdout, "{}", prompt)?;
		stdout.flush()?;

		let mut line = String::new();
		// EOF leaves the line empty, which reads as "no"
		io::stdin().lock().read_line(&mut line)?;
		Ok(line.trim_end_matches(['\r', '\n']).to_string())
	}
}

/// Interpretation of an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
	/// Answer for this occurrence only
	Once(Decision),
	/// Answer and remember it in the given scope
	Remember(Decision, Scope),
	Quit,
	/// Not understood, ask again
	Unknown,
}

impl Choice {
	/// Only the first character counts; an empty answer means "no"
	pub fn parse(answer: &str) -> Self {
		match answer.chars().next() {
			None | Some('n') => Choice::Once(Decision::Denied),
			Some('y') => Choice::Once(Decision::Granted),
			Some('N') => Choice::Remember(Decision::Denied, Scope::Local),
			Some('Y') => Choice::Remember(Decision::Granted, Scope::Local),
			Some('Z') => Choice::Remember(Decision::Denied, Scope::Root),
			Some('A') => Choice::Remember(Decision::Granted, Scope::Root),
			Some('Q') => Choice::Quit,
			Some(_) => Choice::Unknown,
		}
	}
}

/// Choice list offered in the prompt; the in-directory pair only below the root scope
pub fn choices(local_scope: bool) -> &'static str {
	if local_scope {
		"yes no YesInDir NoInDir AllYes ZeroYes Quit"
	} else {
		"yes no AllYes ZeroYes Quit"
	}
}


// vim: ts=4
