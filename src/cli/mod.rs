//! CLI argument parsing
//!
//! The surface is positional only: argv[1] is the project root and every
//! later token is a command. No token is read as a flag or as `--`, and none
//! has to be valid UTF-8.

use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;
use thiserror::Error;

use crate::executor::RunSession;
use crate::models::{ExecutionContext, WorkUnit};

/// Run artisan commands concurrently and report every outcome.
///
/// Describes the surface for usage rendering; argv itself is split by
/// position in `Invocation::parse_from`.
#[derive(Parser, Debug)]
#[command(name = "artisan-fanout")]
#[command(author = "hephaex@gmail.com")]
#[command(version = "0.1.0")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Args {
    /// Project root every command runs in
    #[arg(value_name = "PATH TO PROJECT ROOT")]
    pub root: PathBuf,

    /// Commands to run, each passed as a single argument
    #[arg(value_name = "COMMAND", required = true, num_args = 1..)]
    pub commands: Vec<OsString>,
}

/// One-line usage text rendered from `Args`
pub fn usage_line() -> String {
    Args::command()
        .render_usage()
        .to_string()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Too few arguments
#[derive(Error, Debug, PartialEq, Eq)]
#[error("{}", usage_line())]
pub struct UsageError;

/// A validated invocation: a root plus at least one command
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub root: PathBuf,
    pub commands: Vec<OsString>,
}

impl Invocation {
    /// Split a full argv, program name first, by position
    pub fn parse_from<I, T>(argv: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut tokens = argv.into_iter().map(Into::into).skip(1);

        let root = tokens.next().ok_or(UsageError)?;
        let commands: Vec<OsString> = tokens.collect();
        if commands.is_empty() {
            return Err(UsageError);
        }

        Ok(Self {
            root: PathBuf::from(root),
            commands,
        })
    }

    pub fn into_session(self) -> RunSession {
        RunSession::new(
            ExecutionContext::new(self.root),
            self.commands.into_iter().map(WorkUnit::from).collect(),
        )
    }
}
