/*
 * Copyright (c) 2025 Raphael Amorim
 *
 * This file is part of envcraft, which is licensed
 * under GNU General Public License v3.0.
 */

use clap::Parser;
use clap::error::ErrorKind;
use envcraft::cli::Cli;
use envcraft::{Command, Outcome};
use std::io;
use std::process;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            process::exit(code);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let command = cli.into_command();
    process::exit(dispatch(&command));
}

fn dispatch(command: &Command) -> i32 {
    match command.execute() {
        Ok(Outcome::Exited(code)) => code,
        Ok(outcome) => {
            if let Some(message) = outcome.message() {
                println!("{message}");
            }
            0
        }
        Err(e) if e.is_soft() => {
            tracing::info!(file = %command.file().display(), "{e}");
            println!("{}", command.soft_message());
            0
        }
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}
