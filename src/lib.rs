/*
 * Copyright (c) 2025 Raphael Amorim
 *
 * This file is part of envcraft, which is licensed
 * under GNU General Public License v3.0.
 */

pub mod cli;
pub mod commands;
pub mod editor;
pub mod error;
pub mod lines;
pub mod parser;
pub mod quote;

#[cfg(feature = "runner")]
pub mod runner;

pub use commands::{Command, Outcome};
pub use error::{Error, Result};
pub use lines::{Line, LineStore};
pub use parser::{EnvMap, Record};
