/*
 * Copyright (c) 2025 Raphael Amorim
 *
 * This file is part of envcraft, which is licensed
 * under GNU General Public License v3.0.
 */

use crate::commands::Command;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tracing::Level;

#[derive(clap::Parser, Debug)]
#[command(
    name = "envcraft",
    about = "Edit dotenv files and run commands with their variables",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Add a new KEY="VALUE" record
    Add(AddArgs),
    /// Rewrite the first record with KEY
    Update(UpdateArgs),
    /// Remove the first record with KEY
    Delete(DeleteArgs),
    /// Insert a "# TEXT" comment line
    Comment(CommentArgs),
    /// Load a dotenv file and run a command with its variables
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    pub key: String,
    pub value: String,
    /// Path to the .env file
    #[arg(short = 'f', long = "file")]
    pub file: PathBuf,
    /// 1-based line to insert at (0 appends)
    #[arg(short = 'l', long = "line", default_value_t = 0)]
    pub line: usize,
    /// Create the file if it does not exist
    #[arg(short = 'c', long = "create")]
    pub create: bool,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub key: String,
    pub value: String,
    /// Path to the .env file
    #[arg(short = 'f', long = "file")]
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub key: String,
    /// Path to the .env file
    #[arg(short = 'f', long = "file")]
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct CommentArgs {
    pub text: String,
    /// Path to the .env file
    #[arg(short = 'f', long = "file")]
    pub file: PathBuf,
    /// 1-based line to insert at (0 appends)
    #[arg(short = 'l', long = "line", default_value_t = 0)]
    pub line: usize,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the .env file
    #[arg(short = 'f', long = "file", default_value = ".env")]
    pub file: PathBuf,
    /// Command to run, after `--`
    #[arg(last = true, required = true, value_name = "CMD")]
    pub argv: Vec<String>,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    pub fn into_command(self) -> Command {
        match self.command {
            CliCommand::Add(args) => Command::Add {
                key: args.key,
                value: args.value,
                file: args.file,
                line: args.line,
                create: args.create,
            },
            CliCommand::Update(args) => Command::Update {
                key: args.key,
                value: args.value,
                file: args.file,
            },
            CliCommand::Delete(args) => Command::Delete {
                key: args.key,
                file: args.file,
            },
            CliCommand::Comment(args) => Command::Comment {
                text: args.text,
                file: args.file,
                line: args.line,
            },
            CliCommand::Run(args) => Command::Run {
                file: args.file,
                argv: args.argv,
            },
        }
    }
}
