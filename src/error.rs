use std::path::PathBuf;

use crate::process::ProcessError;

/// Exit statuses of the interpreter and of its forked children.
pub mod status {
    pub const SUCCESS: i32 = 0;
    pub const SCRIPT_OPEN_FAILED: i32 = 1;
    pub const READ_FAILED: i32 = 2;
    pub const FORK_FAILED: i32 = 3;
    pub const REDIRECT_OPEN_FAILED: i32 = 4;
    pub const REDIRECT_DUP_FAILED: i32 = 5;
    pub const EXEC_FAILED: i32 = 6;
    pub const WAIT_FAILED: i32 = 7;
    pub const USAGE: i32 = 64;
}

/// Errors that end the session.
#[derive(Debug)]
pub enum ShellError {
    Readline(rustyline::error::ReadlineError),
    Read(std::io::Error),
    ScriptOpen { path: PathBuf, source: std::io::Error },
    Process(ProcessError),
    FlagError(String),
}

impl ShellError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ShellError::Readline(_) | ShellError::Read(_) => status::READ_FAILED,
            ShellError::ScriptOpen { .. } => status::SCRIPT_OPEN_FAILED,
            ShellError::Process(e) => e.exit_code().unwrap_or(status::FORK_FAILED),
            ShellError::FlagError(_) => status::USAGE,
        }
    }
}

impl From<rustyline::error::ReadlineError> for ShellError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        ShellError::Readline(err)
    }
}

impl From<ProcessError> for ShellError {
    fn from(err: ProcessError) -> Self {
        ShellError::Process(err)
    }
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellError::Readline(e) => write!(f, "cannot read input: {}", e),
            ShellError::Read(e) => write!(f, "cannot read input: {}", e),
            ShellError::ScriptOpen { path, source } => {
                write!(f, "cannot open {}: {}", path.display(), source)
            }
            ShellError::Process(e) => write!(f, "{}", e),
            ShellError::FlagError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ShellError {}
