/*
 * Copyright (c) 2025 Raphael Amorim
 *
 * This file is part of envcraft, which is licensed
 * under GNU General Public License v3.0.
 */

use std::io;
use std::path::PathBuf;

/// Errors produced while reading, editing or running a dotenv file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("error opening file {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error reading file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error writing to file {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("invalid line {line}: {text:?}")]
    InvalidLine { line: usize, text: String },

    #[error("invalid quoted value on line {line}: {text:?}")]
    InvalidQuotedValue { line: usize, text: String },

    #[error("key {0} already exists")]
    DuplicateKey(String),

    /// No record matched the requested key. Reported as informational.
    #[error("no lines updated: key {0} not found")]
    NoUpdated(String),

    #[error("no lines read from file")]
    EmptyFile,

    #[error("failed to execute {program}: {source}")]
    ChildExec {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Soft errors are reported on stdout and still exit with status 0.
    pub fn is_soft(&self) -> bool {
        matches!(self, Error::NoUpdated(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
