/*
 * Copyright (c) 2025 Raphael Amorim
 *
 * This file is part of envcraft, which is licensed
 * under GNU General Public License v3.0.
 */

//! Commands and the file plumbing around the edit engine.

use crate::editor::Edit;
use crate::error::Result;
use crate::lines::LineStore;
use std::path::{Path, PathBuf};

/// A single invocation of the tool. Built once from the command line and
/// consumed by [`Command::execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        key: String,
        value: String,
        file: PathBuf,
        line: usize,
        create: bool,
    },
    Update {
        key: String,
        value: String,
        file: PathBuf,
    },
    Delete {
        key: String,
        file: PathBuf,
    },
    Comment {
        text: String,
        file: PathBuf,
        line: usize,
    },
    Run {
        file: PathBuf,
        argv: Vec<String>,
    },
}

/// What a successful command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Added,
    Updated,
    Deleted,
    Commented,
    /// The child started by `run` exited with this status.
    Exited(i32),
}

impl Outcome {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Outcome::Added => Some("✅ Successfully added."),
            Outcome::Updated => Some("✅ Successfully updated."),
            Outcome::Deleted => Some("✅ Successfully deleted."),
            Outcome::Commented => Some("✅ Comment added."),
            Outcome::Exited(_) => None,
        }
    }
}

impl Command {
    pub fn file(&self) -> &Path {
        match self {
            Command::Add { file, .. }
            | Command::Update { file, .. }
            | Command::Delete { file, .. }
            | Command::Comment { file, .. }
            | Command::Run { file, .. } => file,
        }
    }

    /// Message printed when no record matched.
    pub fn soft_message(&self) -> &'static str {
        match self {
            Command::Delete { .. } => "No matching key found. No deletion performed.",
            _ => "No matching key found. No update performed.",
        }
    }

    pub fn execute(&self) -> Result<Outcome> {
        match self {
            Command::Add {
                key,
                value,
                file,
                line,
                create,
            } => apply_edit(
                file,
                Edit::Add {
                    key: key.clone(),
                    value: value.clone(),
                    line: *line,
                },
                *create,
            )
            .map(|_| Outcome::Added),
            Command::Update { key, value, file } => apply_edit(
                file,
                Edit::Update {
                    key: key.clone(),
                    value: value.clone(),
                },
                false,
            )
            .map(|_| Outcome::Updated),
            Command::Delete { key, file } => {
                apply_edit(file, Edit::Delete { key: key.clone() }, false)
                    .map(|_| Outcome::Deleted)
            }
            Command::Comment { text, file, line } => apply_edit(
                file,
                Edit::Comment {
                    text: text.clone(),
                    line: *line,
                },
                false,
            )
            .map(|_| Outcome::Commented),
            Command::Run { file, argv } => run(file, argv),
        }
    }
}

/// Reads the file, applies `edit` and writes the result back. Nothing is
/// written when the edit fails.
pub fn apply_edit(path: &Path, edit: Edit, create: bool) -> Result<LineStore> {
    let store = LineStore::read_or_empty(path, create)?;
    let store = edit.apply(store)?;
    store.write(path, create)?;

    tracing::info!(path = %path.display(), ?edit, "edit applied");
    Ok(store)
}

#[cfg(feature = "runner")]
fn run(file: &Path, argv: &[String]) -> Result<Outcome> {
    crate::runner::run(file, argv).map(Outcome::Exited)
}

#[cfg(not(feature = "runner"))]
fn run(_file: &Path, _argv: &[String]) -> Result<Outcome> {
    Err(crate::error::Error::InvalidArguments(
        "run is not available in this build".to_string(),
    ))
}
