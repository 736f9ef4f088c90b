/*
 * Copyright (c) 2025 Raphael Amorim
 *
 * This file is part of envcraft, which is licensed
 * under GNU General Public License v3.0.
 */

//! Physical lines of a dotenv file.
//!
//! A [`LineStore`] keeps every line of a file in order together with whether
//! it was terminated by `\n`. Only the last line may lack the terminator, so
//! writing the store back reproduces the original bytes exactly.

use crate::error::{Error, Result};
use std::fmt;
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

/// A single physical line without its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub terminated: bool,
}

impl Line {
    pub fn new(text: impl Into<String>, terminated: bool) -> Self {
        Self {
            text: text.into(),
            terminated,
        }
    }

    /// A line followed by `\n`.
    pub fn terminated(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    /// A final line with no `\n` after it.
    pub fn unterminated(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    /// The trimmed text before the first `=`, if the line has one.
    pub fn record_key(&self) -> Option<&str> {
        self.text.split_once('=').map(|(key, _)| key.trim())
    }

    /// The trimmed text before the first `=`, or the whole trimmed line.
    pub fn leading_key(&self) -> &str {
        self.record_key().unwrap_or_else(|| self.text.trim())
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)?;
        if self.terminated {
            f.write_str("\n")?;
        }
        Ok(())
    }
}

/// Ordered lines of a file. For every index but the last, the line is
/// terminated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineStore {
    lines: Vec<Line>,
}

impl LineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    /// Splits text on `\n`. An empty input yields a single empty line, and a
    /// trailing `\n` does not produce an extra empty line.
    pub fn parse(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut rest = text;

        while let Some(pos) = rest.find('\n') {
            lines.push(Line::terminated(&rest[..pos]));
            rest = &rest[pos + 1..];
        }

        if !rest.is_empty() || lines.is_empty() {
            lines.push(Line::unterminated(rest));
        }

        Self { lines }
    }

    /// Reads and splits the file at `path`.
    pub fn read(path: &Path) -> Result<Self> {
        let mut file = fs::File::open(path).map_err(|source| Error::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let mut text = String::new();
        file.read_to_string(&mut text)
            .map_err(|source| Error::FileRead {
                path: path.to_path_buf(),
                source,
            })?;

        let store = Self::parse(&text);
        tracing::debug!(path = %path.display(), lines = store.len(), "read line store");
        Ok(store)
    }

    /// Like [`LineStore::read`], but a missing file yields an empty store
    /// when `create` is set.
    pub fn read_or_empty(path: &Path, create: bool) -> Result<Self> {
        match Self::read(path) {
            Err(Error::FileOpen { source, .. })
                if create && source.kind() == io::ErrorKind::NotFound =>
            {
                tracing::debug!(path = %path.display(), "file missing, starting from an empty store");
                Ok(Self::new())
            }
            other => other,
        }
    }

    /// Truncates the file at `path` and writes every line back.
    pub fn write(&self, path: &Path, create: bool) -> Result<()> {
        let write_err = |source: io::Error| Error::FileWrite {
            path: path.to_path_buf(),
            source,
        };

        let file = fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(create)
            .open(path)
            .map_err(write_err)?;

        let mut writer = BufWriter::new(file);
        for line in &self.lines {
            write!(writer, "{line}").map_err(write_err)?;
        }
        writer.flush().map_err(write_err)?;

        tracing::debug!(path = %path.display(), lines = self.len(), "wrote line store");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// No lines at all, or a single empty unterminated line.
    pub fn is_empty_or_blank(&self) -> bool {
        match self.lines.as_slice() {
            [] => true,
            [only] => only.text.is_empty() && !only.terminated,
            _ => false,
        }
    }

    pub fn ends_without_newline(&self) -> bool {
        self.lines.last().is_some_and(|line| !line.terminated)
    }

    /// Terminates the last line if it is not already.
    pub fn ensure_terminator(&mut self) {
        if let Some(last) = self.lines.last_mut() {
            last.terminated = true;
        }
    }

    /// Only the final line may be unterminated.
    pub fn is_well_formed(&self) -> bool {
        let count = self.lines.len();
        self.lines
            .iter()
            .take(count.saturating_sub(1))
            .all(|line| line.terminated)
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }

    pub(crate) fn lines_mut(&mut self) -> &mut Vec<Line> {
        &mut self.lines
    }

}

impl fmt::Display for LineStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            write!(f, "{line}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a LineStore {
    type Item = &'a Line;
    type IntoIter = std::slice::Iter<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_parse_keeps_terminators() {
        let store = LineStore::parse("FOO=bar\nBAR=baz");
        assert_eq!(
            store.lines(),
            &[Line::terminated("FOO=bar"), Line::unterminated("BAR=baz")]
        );
        assert!(store.ends_without_newline());
    }

    #[test]
    fn test_parse_trailing_newline() {
        let store = LineStore::parse("FOO=bar\n");
        assert_eq!(store.lines(), &[Line::terminated("FOO=bar")]);
        assert!(!store.ends_without_newline());
    }

    #[test]
    fn test_parse_empty_text() {
        let store = LineStore::parse("");
        assert_eq!(store.lines(), &[Line::unterminated("")]);
        assert!(store.is_empty_or_blank());
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let store = LineStore::parse("\n\nFOO=bar");
        assert_eq!(store.len(), 3);
        assert!(!store.is_empty_or_blank());
        assert_eq!(store.to_string(), "\n\nFOO=bar");
    }

    #[test]
    fn test_carriage_return_is_ordinary() {
        let store = LineStore::parse("FOO=bar\r\nBAR=baz\r\n");
        assert_eq!(store.lines()[0].text, "FOO=bar\r");
        assert_eq!(store.to_string(), "FOO=bar\r\nBAR=baz\r\n");
    }

    #[test]
    fn test_ensure_terminator() {
        let mut store = LineStore::parse("FOO=bar");
        store.ensure_terminator();
        assert_eq!(store.to_string(), "FOO=bar\n");

        let mut empty = LineStore::new();
        empty.ensure_terminator();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_record_key() {
        assert_eq!(Line::terminated(" FOO = \"bar\"").record_key(), Some("FOO"));
        assert_eq!(Line::terminated("A=b=c").record_key(), Some("A"));
        assert_eq!(Line::terminated("# comment").record_key(), None);
        assert_eq!(Line::terminated("  FOO ").leading_key(), "FOO");
        assert_eq!(Line::terminated("FOO = bar").leading_key(), "FOO");
    }

    #[test]
    fn test_read_write_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "FOO=\"bar\"\n# note\nBAR=\"baz\"").unwrap();

        let store = LineStore::read(&path).unwrap();
        assert_eq!(store.len(), 3);

        store.write(&path, false).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "FOO=\"bar\"\n# note\nBAR=\"baz\""
        );
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.env");

        assert!(matches!(
            LineStore::read(&path),
            Err(Error::FileOpen { .. })
        ));
        assert!(matches!(
            LineStore::read_or_empty(&path, false),
            Err(Error::FileOpen { .. })
        ));
        assert!(LineStore::read_or_empty(&path, true).unwrap().is_empty());
    }

    #[test]
    fn test_write_without_create_fails_on_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.env");
        let store = LineStore::parse("FOO=\"bar\"");

        assert!(matches!(
            store.write(&path, false),
            Err(Error::FileWrite { .. })
        ));
        store.write(&path, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "FOO=\"bar\"");
    }
}
