use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use itertools::Itertools;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Compile,
    Run,
    Query,
    Test,
    Clean,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Compile,
        Action::Run,
        Action::Query,
        Action::Test,
        Action::Clean,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Compile => "compile",
            Action::Run => "run",
            Action::Query => "query",
            Action::Test => "test",
            Action::Clean => "clean",
        }
    }

    /// Actions that rewrite build artifacts in the working directory.
    pub fn mutates_workspace(&self) -> bool {
        matches!(self, Action::Compile | Action::Test | Action::Clean)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    Captured,
    Inherited,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub output: OutputMode,
}

impl CommandSpec {
    pub fn new<P, I, S>(program: P, args: I, working_dir: impl Into<PathBuf>) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: working_dir.into(),
            output: OutputMode::Captured,
        }
    }

    pub fn inherit_output(self) -> Self {
        Self {
            output: OutputMode::Inherited,
            ..self
        }
    }

    pub fn captures_output(&self) -> bool {
        self.output == OutputMode::Captured
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = std::iter::once(&self.program).chain(&self.args).join(" ");
        f.write_str(&line)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryParameters {
    pub symbols: String,
    pub start_timestamp: String,
    pub end_timestamp: String,
    pub fields: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResponsePayload {
    pub output: String,
    pub elapsed_ms: Option<f64>,
}

impl ResponsePayload {
    /// Joins stdout and stderr, separated by a blank line when stderr has content.
    pub fn from_result(result: &ExecutionResult, with_timing: bool) -> Self {
        let mut output = result.stdout.clone();
        if !result.stderr.is_empty() {
            output.push_str("\n\n");
            output.push_str(&result.stderr);
        }

        Self {
            output,
            elapsed_ms: with_timing.then(|| elapsed_ms(result.duration)),
        }
    }
}

fn elapsed_ms(duration: Duration) -> f64 {
    (duration.as_secs_f64() * 1000.0 * 100.0).round() / 100.0
}
