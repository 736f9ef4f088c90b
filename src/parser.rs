/*
 * Copyright (c) 2025 Raphael Amorim
 *
 * This file is part of envcraft, which is licensed
 * under GNU General Public License v3.0.
 */

//! Dotenv parser.
//!
//! Lines are fed one at a time into a small state machine. Outside of a
//! quoted value every non-blank, non-comment line must be a `KEY=VALUE`
//! record (optionally prefixed by `export`). A value whose first character is
//! `"`, `'` or a backtick is complete when the line ends with that quote, or
//! when only an inline comment follows its last occurrence. Otherwise it
//! continues over the following lines until one ends with that quote.
//!
//! Values are taken verbatim: there is no `${VAR}` interpolation and no
//! escape expansion, so `\n` inside a value stays a backslash and an `n`.

use crate::error::{Error, Result};
use crate::lines::LineStore;
use std::collections::HashMap;
use std::path::Path;

/// Decoded variables, keyed by name. Later records overwrite earlier ones.
pub type EnvMap = HashMap<String, String>;

/// A `KEY=VALUE` record decoded from one or more physical lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub value: String,
    /// The record was written as `export KEY=VALUE`.
    pub exported: bool,
    /// 1-based physical line the record starts on.
    pub line: usize,
}

fn is_quote(ch: char) -> bool {
    matches!(ch, '"' | '\'' | '`')
}

#[derive(Debug)]
enum State {
    /// Between records. `open` is set while the last record was unquoted and
    /// a bare continuation line may still extend it.
    Outside { open: bool },
    /// Inside a multi-line quoted value.
    Quoted {
        quote: char,
        record: Record,
        opening: String,
    },
}

/// Incremental dotenv parser.
#[derive(Debug)]
pub struct Parser {
    state: State,
    records: Vec<Record>,
    line: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            state: State::Outside { open: false },
            records: Vec::new(),
            line: 0,
        }
    }

    /// Feeds the next physical line, without its `\n`.
    pub fn feed_line(&mut self, text: &str) -> Result<()> {
        self.line += 1;

        let state = std::mem::replace(&mut self.state, State::Outside { open: false });
        self.state = match state {
            State::Outside { open } => self.outside(text, open)?,
            State::Quoted {
                quote,
                mut record,
                opening,
            } => {
                let trimmed = text.trim_end();
                record.value.push('\n');

                if trimmed.ends_with(quote) {
                    record.value.push_str(&trimmed[..trimmed.len() - quote.len_utf8()]);
                    record.value = record.value.trim_matches(quote).to_string();
                    tracing::trace!(line = self.line, key = %record.key, "closed multi-line value");
                    self.records.push(record);
                    State::Outside { open: false }
                } else {
                    record.value.push_str(text);
                    State::Quoted {
                        quote,
                        record,
                        opening,
                    }
                }
            }
        };

        Ok(())
    }

    fn outside(&mut self, text: &str, open: bool) -> Result<State> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(State::Outside { open: false });
        }

        let Some((lhs, rhs)) = text.split_once('=') else {
            // A bare line directly after an unquoted record continues it.
            return match self.records.last_mut() {
                Some(record) if open => {
                    record.value.push('\n');
                    record.value.push_str(trimmed);
                    tracing::trace!(line = self.line, key = %record.key, "continued unquoted value");
                    Ok(State::Outside { open: true })
                }
                _ => Err(Error::InvalidLine {
                    line: self.line,
                    text: text.to_string(),
                }),
            };
        };

        let (key, exported) = parse_key(lhs);
        if key.is_empty() {
            return Err(Error::InvalidLine {
                line: self.line,
                text: text.to_string(),
            });
        }

        let mut record = Record {
            key: key.to_string(),
            value: String::new(),
            exported,
            line: self.line,
        };

        let rhs = rhs.trim();
        match rhs.chars().next() {
            Some(quote) if is_quote(quote) => {
                let body = &rhs[quote.len_utf8()..];
                if closes_on_line(body, quote) {
                    record.value = decode_quoted(rhs, quote).ok_or_else(|| {
                        Error::InvalidQuotedValue {
                            line: self.line,
                            text: text.to_string(),
                        }
                    })?;
                    tracing::trace!(line = self.line, key = %record.key, "quoted value");
                    self.records.push(record);
                    Ok(State::Outside { open: false })
                } else {
                    tracing::trace!(line = self.line, key = %record.key, %quote, "opened multi-line value");
                    record.value = body.to_string();
                    Ok(State::Quoted {
                        quote,
                        record,
                        opening: text.to_string(),
                    })
                }
            }
            _ => {
                record.value = decode_unquoted(rhs).to_string();
                tracing::trace!(line = self.line, key = %record.key, "unquoted value");
                self.records.push(record);
                Ok(State::Outside { open: true })
            }
        }
    }

    /// Ends the input. Fails if a quoted value was never closed.
    pub fn finish(self) -> Result<Vec<Record>> {
        match self.state {
            State::Quoted {
                record, opening, ..
            } => Err(Error::InvalidQuotedValue {
                line: record.line,
                text: opening,
            }),
            State::Outside { .. } => Ok(self.records),
        }
    }
}

/// Strips an `export` prefix followed by whitespace, then trims the key.
fn parse_key(lhs: &str) -> (&str, bool) {
    let lhs = lhs.trim_start();
    match lhs.strip_prefix("export") {
        Some(rest) if rest.starts_with(char::is_whitespace) => (rest.trim(), true),
        _ => (lhs.trim(), false),
    }
}

/// A quoted value is complete on its first line when the text after the
/// opening quote ends with the quote, or when its last quote is followed
/// only by an inline comment.
fn closes_on_line(body: &str, quote: char) -> bool {
    if body.ends_with(quote) {
        return true;
    }
    match body.rfind(quote) {
        Some(idx) => body[idx + quote.len_utf8()..]
            .trim_start()
            .starts_with('#'),
        None => false,
    }
}

/// Takes the text between the opening quote and the last occurrence of the
/// same quote, dropping any further quote characters at either end.
fn decode_quoted(rhs: &str, quote: char) -> Option<String> {
    let open = quote.len_utf8();
    let last = rhs.rfind(quote).filter(|&idx| idx >= open)?;
    Some(rhs[open..last].trim_matches(quote).to_string())
}

/// A `#` preceded by whitespace starts an inline comment; any other `#` is
/// part of the value.
fn decode_unquoted(rhs: &str) -> &str {
    match rhs.find('#') {
        Some(idx) => {
            let prefix = &rhs[..idx];
            if prefix.chars().next_back().is_some_and(char::is_whitespace) {
                prefix.trim()
            } else {
                rhs
            }
        }
        None => rhs,
    }
}

/// Parses every record of an already split file.
pub fn parse_records(store: &LineStore) -> Result<Vec<Record>> {
    let mut parser = Parser::new();
    for line in store {
        parser.feed_line(&line.text)?;
    }
    parser.finish()
}

/// Parses dotenv text into a variable map.
pub fn parse_str(text: &str) -> Result<EnvMap> {
    let records = parse_records(&LineStore::parse(text))?;
    Ok(into_env_map(records))
}

/// Reads and parses the dotenv file at `path`.
pub fn parse_file(path: &Path) -> Result<EnvMap> {
    let store = LineStore::read(path)?;
    let records = parse_records(&store)?;
    tracing::debug!(path = %path.display(), records = records.len(), "parsed dotenv file");
    Ok(into_env_map(records))
}

pub fn into_env_map(records: Vec<Record>) -> EnvMap {
    records
        .into_iter()
        .map(|record| (record.key, record.value))
        .collect()
}
