//! artisan-fanout - run a batch of artisan commands concurrently
//!
//! Every command is launched at once in the given project root. When all of
//! them have finished, one line per command is printed to stdout, in
//! completion order.
//!
//! ## Usage
//!
//! ```bash
//! artisan-fanout /srv/app migrate cache:clear route:cache
//! ```
//!
//! Successful commands print `Output of '<cmd>': <output>`, failed ones
//! `Error running '<cmd>': <error>`. The exit code is 0 once the run
//! completes, however many commands failed, and 1 on a usage error.
//!
//! ## Environment
//!
//! - `ARTISAN_FANOUT_CONFIG`  YAML or JSON config file
//! - `ARTISAN_FANOUT_PROGRAM` executable to run instead of `php`
//! - `ARTISAN_FANOUT_LOG`     log level for stderr diagnostics

use anyhow::Result;
use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;

mod cli;
mod config;
mod executor;
mod models;
mod runner;
mod utils;

use cli::Invocation;
use config::{AppConfig, EnvConfig};
use runner::{CommandRunner, ProcessRunner};
use utils::logger::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let code = run(
        std::env::args_os(),
        build_runner,
        &mut stdout.lock(),
        &mut stderr.lock(),
    )
    .await?;

    Ok(ExitCode::from(code))
}

/// Resolve configuration, start logging and build the process runner
fn build_runner() -> Result<Arc<dyn CommandRunner>> {
    let env = EnvConfig::load();
    let config = AppConfig::resolve(&env)?;

    // Initialize logging
    init_logger(LogLevel::parse(&config.log_level).unwrap_or_default());

    if env.has_any() {
        debug!("Environment overrides: {:?}", env);
    }
    debug!("Runner: {} {:?}", config.runner.program, config.runner.args);

    Ok(Arc::new(ProcessRunner::from_config(&config.runner)))
}

/// Parse `argv`, run the session and write results to `out`.
///
/// The runner is only built once argv is known to be usable. Returns the
/// process exit code; per-command failures are reported in `out` and do not
/// change it.
async fn run<I, F, O, E>(argv: I, make_runner: F, out: &mut O, err: &mut E) -> Result<u8>
where
    I: IntoIterator<Item = OsString>,
    F: FnOnce() -> Result<Arc<dyn CommandRunner>>,
    O: Write,
    E: Write,
{
    let invocation = match Invocation::parse_from(argv) {
        Ok(invocation) => invocation,
        Err(usage) => {
            writeln!(err, "{usage}")?;
            return Ok(1);
        }
    };

    let runner = make_runner()?;
    invocation.into_session().run(runner, out).await?;
    Ok(0)
}
