//! Work unit and execution context models

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// One independently invoked command, identified by its name.
///
/// The raw argument is passed to the runner untouched, even when it is not
/// valid UTF-8. Two units with the same text are still two units.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WorkUnit(OsString);

impl WorkUnit {
    pub fn new(command: impl Into<OsString>) -> Self {
        Self(command.into())
    }

    pub fn as_os_str(&self) -> &OsStr {
        &self.0
    }
}

/// Lossy for non-UTF-8 units
impl fmt::Display for WorkUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_string_lossy())
    }
}

impl From<&str> for WorkUnit {
    fn from(command: &str) -> Self {
        Self::new(command)
    }
}

impl From<String> for WorkUnit {
    fn from(command: String) -> Self {
        Self(command.into())
    }
}

impl From<OsString> for WorkUnit {
    fn from(command: OsString) -> Self {
        Self(command)
    }
}

/// Root directory shared read-only by every invocation of a run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionContext {
    root: PathBuf,
}

impl ExecutionContext {
    /// Create a context rooted at `root`. Existence is not checked here;
    /// a missing directory surfaces as an invocation failure.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root.display())
    }
}
