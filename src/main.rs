use clap::{Arg, ArgAction, ArgMatches, Command};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use dirsync::logging::{self, info};
use dirsync::utils::{clear_transient_line, wait_for_interrupt};
use dirsync::{AutoAnswer, Config, LocalFilesystem, Session, StdinChooser};

/// Exit status for unusable arguments or configuration
const EXIT_USAGE: u8 = 2;
/// Exit status after an interrupt: 128 + SIGINT(2)
const EXIT_INTERRUPTED: i32 = 130;

fn cli() -> Command {
	Command::new("dirsync")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Interactive one-way directory synchronization")
		.arg(Arg::new("source").required(true).value_parser(clap::value_parser!(PathBuf)))
		.arg(Arg::new("target").required(true).value_parser(clap::value_parser!(PathBuf)))
		.arg(
			Arg::new("subdir")
				.help("Common subdirectory to start from")
				.value_parser(clap::value_parser!(PathBuf)),
		)
		.arg(
			Arg::new("clean")
				.short('c')
				.long("clean")
				.action(ArgAction::SetTrue)
				.help("Remove from source what target already has, instead of updating target"),
		)
		.arg(
			Arg::new("reverse")
				.short('r')
				.long("reverse")
				.action(ArgAction::SetTrue)
				.help("Swap source and target"),
		)
		.arg(
			Arg::new("strict")
				.short('s')
				.long("strict")
				.action(ArgAction::SetTrue)
				.conflicts_with("ignore-time")
				.help("Compare contents even if size and time match"),
		)
		.arg(
			Arg::new("ignore-time")
				.short('i')
				.long("ignore-time")
				.action(ArgAction::SetTrue)
				.help("Ignore modification times"),
		)
		.arg(
			Arg::new("follow-symlinks")
				.short('L')
				.long("follow-symlinks")
				.action(ArgAction::SetTrue)
				.help("Follow symbolic links"),
		)
		.arg(
			Arg::new("yes")
				.short('y')
				.long("yes")
				.action(ArgAction::SetTrue)
				.conflicts_with("no")
				.help("Answer yes to everything"),
		)
		.arg(
			Arg::new("no")
				.short('n')
				.long("no")
				.action(ArgAction::SetTrue)
				.help("Answer no to everything, only report"),
		)
		.arg(
			Arg::new("config")
				.long("config")
				.value_name("PATH")
				.value_parser(clap::value_parser!(PathBuf))
				.help("Configuration file (TOML, or JSON5 for .json/.json5)"),
		)
}

/// CLI flags override the file; an absent flag keeps the file's value
fn apply_flags(config: &mut Config, matches: &ArgMatches) {
	config.clean |= matches.get_flag("clean");
	config.strict |= matches.get_flag("strict");
	config.ignore_time |= matches.get_flag("ignore-time");
	config.follow_symlinks |= matches.get_flag("follow-symlinks");
	if matches.get_flag("yes") {
		config.auto_answer = AutoAnswer::Yes;
	} else if matches.get_flag("no") {
		config.auto_answer = AutoAnswer::No;
	}
}

fn usage_error(message: impl std::fmt::Display) -> ExitCode {
	eprintln!("dirsync: {}", message);
	ExitCode::from(EXIT_USAGE)
}

#[tokio::main]
async fn main() -> ExitCode {
	let matches = cli().get_matches();

	let config_path = matches.get_one::<PathBuf>("config");
	let mut config = match Config::discover(config_path.map(PathBuf::as_path)) {
		Ok(config) => config,
		Err(e) => return usage_error(e),
	};
	apply_flags(&mut config, &matches);
	logging::init_tracing(&config.log_level);
	if let Err(e) = config.validate() {
		return usage_error(e);
	}

	let (Some(source), Some(target)) =
		(matches.get_one::<PathBuf>("source"), matches.get_one::<PathBuf>("target"))
	else {
		return usage_error("source and target directories are required");
	};
	let (source, target) = if matches.get_flag("reverse") {
		(target.clone(), source.clone())
	} else {
		(source.clone(), target.clone())
	};
	for dir in [&source, &target] {
		if !dir.is_dir() {
			return usage_error(format!("{} is not a directory", dir.display()));
		}
	}
	let subdir = matches.get_one::<PathBuf>("subdir").cloned().unwrap_or_default();

	let task = tokio::task::spawn_blocking(move || {
		let mut chooser = StdinChooser;
		let mut stdout = io::stdout();
		Session::new(source, target, config, &LocalFilesystem, &mut chooser, &mut stdout)
			.start_at(subdir)
			.run()
	});

	tokio::select! {
		joined = task => match joined {
			Ok(Ok(summary)) => {
				info!("{} prompts answered", summary.prompts);
				ExitCode::SUCCESS
			}
			Ok(Err(e)) if e.is_aborted() => ExitCode::FAILURE,
			Ok(Err(e)) => {
				eprintln!("dirsync: {}", e);
				ExitCode::FAILURE
			}
			Err(e) => {
				eprintln!("dirsync: {}", e);
				ExitCode::FAILURE
			}
		},
		_ = wait_for_interrupt() => {
			clear_transient_line();
			println!("cancelled");
			// The walk may be blocked on stdin; do not wait for it
			std::process::exit(EXIT_INTERRUPTED);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_cli_definition() {
		cli().debug_assert();
	}

	#[test]
	fn test_flags_override_file_values() {
		let matches = cli().get_matches_from(["dirsync", "-c", "-n", "a", "b"]);
		let mut config = Config { follow_symlinks: true, ..Config::default() };
		apply_flags(&mut config, &matches);
		assert!(config.clean);
		assert!(config.follow_symlinks);
		assert_eq!(config.auto_answer, AutoAnswer::No);
	}

	#[test]
	fn test_conflicting_flags_rejected() {
		let err = cli().try_get_matches_from(["dirsync", "-y", "-n", "a", "b"]).unwrap_err();
		assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
		assert!(cli().try_get_matches_from(["dirsync", "-s", "-i", "a", "b"]).is_err());
	}

	#[test]
	fn test_subdir_is_optional() {
		let matches = cli().get_matches_from(["dirsync", "a", "b", "sub"]);
		assert_eq!(matches.get_one::<PathBuf>("subdir"), Some(&PathBuf::from("sub")));
	}
}

// vim: ts=4
