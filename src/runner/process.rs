//! Real process runner
//!
//! Spawns `<program> [args...] <unit>` in the execution root and captures
//! everything the child writes to stdout and stderr, interleaved as written.

#![allow(dead_code)]

use async_trait::async_trait;
use os_pipe::PipeReader;
use std::io::{self, Read};
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, Command};
use tracing::debug;

use super::{CommandRunner, InvocationError};
use crate::config::RunnerConfig;
use crate::models::{ExecutionContext, WorkUnit};

/// Runner that spawns one external process per invocation
#[derive(Clone, Debug)]
pub struct ProcessRunner {
    program: String,
    base_args: Vec<String>,
}

impl ProcessRunner {
    /// Create a runner for `program` with no leading arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
        }
    }

    /// Add an argument placed before the work unit
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.base_args.push(arg.into());
        self
    }

    pub fn from_config(config: &RunnerConfig) -> Self {
        Self {
            program: config.program.clone(),
            base_args: config.args.clone(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Spawn the child with stdout and stderr sharing one pipe, so the
    /// captured text keeps the order the child wrote it in.
    fn spawn_combined(
        &self,
        ctx: &ExecutionContext,
        unit: &WorkUnit,
    ) -> io::Result<(Child, PipeReader)> {
        let (reader, writer) = os_pipe::pipe()?;
        let writer_clone = writer.try_clone()?;

        // The builder holds copies of the write end; it must be dropped
        // before reading, or EOF never arrives.
        let mut command = Command::new(&self.program);
        command
            .args(&self.base_args)
            .arg(unit.as_os_str())
            .current_dir(ctx.root())
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(writer_clone);
        let child = command.spawn()?;
        drop(command);

        Ok((child, reader))
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::from_config(&RunnerConfig::default())
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn invoke(
        &self,
        ctx: &ExecutionContext,
        unit: &WorkUnit,
    ) -> Result<String, InvocationError> {
        debug!(
            "Spawning {} {:?} {:?} in {}",
            self.program,
            self.base_args,
            unit.as_os_str(),
            ctx
        );

        // The unit is a single argv entry; no shell sees it.
        let (mut child, mut reader) =
            self.spawn_combined(ctx, unit).map_err(|source| InvocationError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let read = tokio::task::spawn_blocking(move || {
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf).map(|_| buf)
        });
        let (read, status) = tokio::join!(read, child.wait());

        let collect_failed = |source: io::Error| InvocationError::Collect {
            program: self.program.clone(),
            source,
        };
        let status = status.map_err(collect_failed)?;
        let bytes = read
            .map_err(|e| collect_failed(io::Error::other(e)))?
            .map_err(collect_failed)?;
        let combined = String::from_utf8_lossy(&bytes).into_owned();

        if status.success() {
            Ok(combined)
        } else {
            debug!("'{}' exited with {}: {}", unit, status, combined);
            Err(InvocationError::NonZeroExit {
                code: status.code(),
                signal: exit_signal(&status),
                output: combined,
            })
        }
    }
}

#[cfg(unix)]
fn exit_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &ExitStatus) -> Option<i32> {
    None
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_default_runs_php_artisan() {
        let runner = ProcessRunner::default();
        assert_eq!(runner.program(), "php");
        assert_eq!(runner.base_args, vec!["artisan".to_string()]);
    }

    #[tokio::test]
    async fn test_unit_is_single_argument_in_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let runner = ProcessRunner::new("sh")
            .arg("-c")
            .arg("printf '%s|' \"$0\"; pwd");
        let ctx = ExecutionContext::new(&root);

        let output = assert_ok!(runner.invoke(&ctx, &WorkUnit::from("a b; echo x")).await);
        assert_eq!(output, format!("a b; echo x|{}\n", root.display()));
    }

    #[tokio::test]
    async fn test_stderr_is_captured() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ProcessRunner::new("sh").arg("-c").arg("echo out; echo err >&2");
        let ctx = ExecutionContext::new(dir.path());

        let output = assert_ok!(runner.invoke(&ctx, &WorkUnit::from("unused")).await);
        assert_eq!(output, "out\nerr\n");
    }

    #[tokio::test]
    async fn test_streams_keep_write_order() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ProcessRunner::new("sh")
            .arg("-c")
            .arg("echo 1; echo 2 >&2; echo 3; echo 4 >&2");
        let ctx = ExecutionContext::new(dir.path());

        let output = assert_ok!(runner.invoke(&ctx, &WorkUnit::from("unused")).await);
        assert_eq!(output, "1\n2\n3\n4\n");
    }

    #[tokio::test]
    async fn test_failure_keeps_combined_output() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ProcessRunner::new("sh")
            .arg("-c")
            .arg("echo partial; echo broken >&2; exit 1");
        let ctx = ExecutionContext::new(dir.path());

        let err = assert_err!(runner.invoke(&ctx, &WorkUnit::from("x")).await);
        assert_eq!(err.to_string(), "exit status 1");
        match err {
            InvocationError::NonZeroExit { output, .. } => {
                assert_eq!(output, "partial\nbroken\n");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_killed_process_reports_signal() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ProcessRunner::new("sh").arg("-c").arg("kill -9 $$");
        let ctx = ExecutionContext::new(dir.path());

        let err = assert_err!(runner.invoke(&ctx, &WorkUnit::from("queue:work")).await);
        match &err {
            InvocationError::NonZeroExit { code, signal, .. } => {
                assert_eq!(*code, None);
                assert_eq!(*signal, Some(9));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.to_string(), "signal: 9");
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_non_utf8_unit_and_root_pass_through() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join(OsStr::from_bytes(b"app-\xfe"));
        std::fs::create_dir(&root).unwrap();

        // Print the byte length of $0 so the check does not depend on decoding.
        let runner = ProcessRunner::new("sh")
            .arg("-c")
            .arg("printf '%s' \"${#0}\"; [ -d \"$PWD\" ] || exit 9");
        let ctx = ExecutionContext::new(&root);
        let unit = WorkUnit::from(OsStr::from_bytes(b"caf\xff").to_os_string());

        let output = assert_ok!(runner.invoke(&ctx, &unit).await);
        assert_eq!(output, "4");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ProcessRunner::new("sh").arg("-c").arg("echo nope; exit 3");
        let ctx = ExecutionContext::new(dir.path());

        let err = assert_err!(runner.invoke(&ctx, &WorkUnit::from("x")).await);
        match err {
            InvocationError::NonZeroExit { code, output, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(output, "nope\n");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ProcessRunner::new("definitely-not-a-real-program-4821");
        let ctx = ExecutionContext::new(dir.path());

        let err = assert_err!(runner.invoke(&ctx, &WorkUnit::from("list")).await);
        assert!(matches!(err, InvocationError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_missing_root_is_failure() {
        let runner = ProcessRunner::new("true");
        let ctx = ExecutionContext::new("/nonexistent/artisan-fanout/root");

        assert_err!(runner.invoke(&ctx, &WorkUnit::from("list")).await);
    }
}
