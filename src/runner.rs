/*
 * Copyright (c) 2025 Raphael Amorim
 *
 * This file is part of envcraft, which is licensed
 * under GNU General Public License v3.0.
 */

//! Loads a dotenv file into the process environment and runs a child
//! command with it.
//!
//! Variables that already exist in the ambient environment always win: a
//! dotenv file only fills in what is missing.

use crate::error::{Error, Result};
use crate::parser::{self, EnvMap};
use std::collections::HashSet;
use std::env;
use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// Returns the entries of `env_map` whose keys are not in `ambient`, sorted
/// by key.
pub fn missing_vars(env_map: EnvMap, ambient: &HashSet<OsString>) -> Vec<(String, String)> {
    let mut missing: Vec<(String, String)> = env_map
        .into_iter()
        .filter(|(key, _)| !ambient.contains(&OsString::from(key)))
        .collect();
    missing.sort();
    missing
}

/// Sets every variable from `env_map` that the current process does not
/// already have. Returns the keys that were set.
pub fn load_env(env_map: EnvMap) -> Vec<String> {
    let ambient: HashSet<OsString> = env::vars_os().map(|(key, _)| key).collect();
    let total = env_map.len();

    let mut loaded = Vec::new();
    for (key, value) in missing_vars(env_map, &ambient) {
        // SAFETY: called before any child is spawned, while the launcher is
        // single-threaded.
        unsafe {
            env::set_var(&key, value);
        }
        loaded.push(key);
    }

    tracing::debug!(
        loaded = loaded.len(),
        kept = total - loaded.len(),
        "merged dotenv variables into the environment"
    );
    loaded
}

/// Spawns `argv` with inherited stdio and waits for it to exit.
pub fn launch(argv: &[String]) -> Result<i32> {
    let Some((program, args)) = argv.split_first() else {
        return Err(usage());
    };

    let child_err = |source: io::Error| Error::ChildExec {
        program: program.clone(),
        source,
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(child_err)?;

    tracing::info!(%program, pid = child.id(), "spawned child");

    // The terminal delivers Ctrl-C to the whole foreground group. Let the
    // child decide what to do with it and keep waiting for its status.
    let status = {
        let _signals = ignore_terminal_signals();
        child.wait().map_err(child_err)?
    };

    let code = exit_code(status);
    tracing::info!(%program, code, "child exited");
    Ok(code)
}

/// Loads `file` into the environment and runs `argv`. Nothing is loaded if
/// the file fails to parse.
pub fn run(file: &Path, argv: &[String]) -> Result<i32> {
    if argv.is_empty() {
        return Err(usage());
    }

    let env_map = parser::parse_file(file)?;
    load_env(env_map);
    launch(argv)
}

fn usage() -> Error {
    Error::InvalidArguments("usage: envcraft run [-f .env] -- <command> [args...]".to_string())
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => 1,
    }
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

#[cfg(unix)]
fn ignore_terminal_signals() -> impl Drop {
    // SAFETY: installing SIG_IGN has no handler code to race with; the
    // previous dispositions are restored when the guard drops.
    let previous = unsafe {
        (
            libc::signal(libc::SIGINT, libc::SIG_IGN),
            libc::signal(libc::SIGQUIT, libc::SIG_IGN),
        )
    };

    scopeguard::guard(previous, |(int, quit)| unsafe {
        libc::signal(libc::SIGINT, int);
        libc::signal(libc::SIGQUIT, quit);
    })
}

#[cfg(not(unix))]
fn ignore_terminal_signals() -> impl Drop {
    scopeguard::guard((), |_| {})
}
