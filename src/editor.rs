/*
 * Copyright (c) 2025 Raphael Amorim
 *
 * This file is part of envcraft, which is licensed
 * under GNU General Public License v3.0.
 */

//! Line-level edits of a dotenv file.
//!
//! Every edit is a pure transformation of a [`LineStore`]. Records are always
//! written as `KEY="VALUE"`, and an edit never leaves a terminated line
//! anywhere but the end of the file unless it was there before.

use crate::error::{Error, Result};
use crate::lines::{Line, LineStore};
use crate::quote;

/// One of the four mutations of a line store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Insert a new record at a 1-based line, or append when `line` is 0.
    Add {
        key: String,
        value: String,
        line: usize,
    },
    /// Rewrite the first record with a matching key.
    Update { key: String, value: String },
    /// Remove the first record with a matching key.
    Delete { key: String },
    /// Insert `# text` at a 1-based line, or append when `line` is 0.
    Comment { text: String, line: usize },
}

impl Edit {
    pub fn apply(&self, store: LineStore) -> Result<LineStore> {
        match self {
            Edit::Add { key, value, line } => add(store, key, value, *line),
            Edit::Update { key, value } => update(store, key, value),
            Edit::Delete { key } => delete(store, key),
            Edit::Comment { text, line } => comment(store, text, *line),
        }
    }
}

/// Inserts an already rendered line.
///
/// `at == 0` appends. An index past the end pads the file with blank lines
/// so the new line lands exactly on line `at`. The inserted line carries a
/// newline unless it becomes the last line of the file.
pub fn insert(mut store: LineStore, at: usize, rendered: &str) -> LineStore {
    let len = store.len();

    if at == 0 {
        if store.is_empty_or_blank() {
            return LineStore::from_lines(vec![Line::unterminated(rendered)]);
        }
        store.ensure_terminator();
        store.lines_mut().push(Line::unterminated(rendered));
        return store;
    }

    if at <= len {
        if single_empty_line(&store) {
            return LineStore::from_lines(vec![Line::unterminated(rendered)]);
        }
        store.lines_mut().insert(at - 1, Line::terminated(rendered));
        return store;
    }

    store.ensure_terminator();
    let lines = store.lines_mut();
    lines.extend(std::iter::repeat_n(Line::terminated(""), at - len - 1));
    lines.push(Line::unterminated(rendered));
    store
}

fn single_empty_line(store: &LineStore) -> bool {
    matches!(store.lines(), [only] if only.text.is_empty() && !only.terminated)
}

/// Fails with [`Error::DuplicateKey`] if a live record already uses `key`.
/// Commented-out records do not count.
pub fn check_duplicate(store: &LineStore, key: &str) -> Result<()> {
    let duplicate = store
        .iter()
        .filter_map(Line::record_key)
        .filter(|existing| !existing.starts_with('#'))
        .any(|existing| existing == key);

    if duplicate {
        return Err(Error::DuplicateKey(key.to_string()));
    }
    Ok(())
}

pub fn add(store: LineStore, key: &str, value: &str, at: usize) -> Result<LineStore> {
    validate_key(key)?;
    check_duplicate(&store, key)?;
    tracing::debug!(%key, line = at, "inserting record");
    Ok(insert(store, at, &quote::record(key, value)))
}

pub fn comment(store: LineStore, text: &str, at: usize) -> Result<LineStore> {
    if text.contains('\n') {
        return Err(Error::InvalidArguments(
            "comment text must be a single line".to_string(),
        ));
    }
    tracing::debug!(line = at, "inserting comment");
    Ok(insert(store, at, &format!("# {text}")))
}

fn position_of(store: &LineStore, key: &str) -> Option<usize> {
    store
        .iter()
        .position(|line| line.record_key() == Some(key))
}

// Deletion also matches a bare `KEY` line with no `=`.
fn deletable_position_of(store: &LineStore, key: &str) -> Option<usize> {
    store.iter().position(|line| line.leading_key() == key)
}

pub fn update(mut store: LineStore, key: &str, value: &str) -> Result<LineStore> {
    validate_key(key)?;
    if store.is_empty() {
        return Err(Error::EmptyFile);
    }

    let idx = position_of(&store, key).ok_or_else(|| Error::NoUpdated(key.to_string()))?;
    tracing::debug!(%key, line = idx + 1, "rewriting record");
    store.lines_mut()[idx].text = quote::record(key, value);
    Ok(store)
}

pub fn delete(mut store: LineStore, key: &str) -> Result<LineStore> {
    validate_key(key)?;
    if store.is_empty() {
        return Err(Error::EmptyFile);
    }

    let idx = deletable_position_of(&store, key)
        .ok_or_else(|| Error::NoUpdated(key.to_string()))?;
    tracing::debug!(%key, line = idx + 1, "removing record");

    let lines = store.lines_mut();
    lines.remove(idx);
    if let Some(last) = lines.last_mut() {
        last.terminated = false;
    }
    Ok(store)
}

/// Keys written by the editor must read back as the same key.
fn validate_key(key: &str) -> Result<()> {
    let reason = if key.trim().is_empty() {
        "key must not be empty"
    } else if key.trim() != key {
        "key must not have surrounding whitespace"
    } else if key.contains('=') || key.contains('\n') {
        "key must not contain '=' or a newline"
    } else if key.starts_with('#') {
        "key must not start with '#'"
    } else {
        return Ok(());
    };
    Err(Error::InvalidArguments(reason.to_string()))
}
