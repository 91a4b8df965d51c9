use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io;
use std::path::PathBuf;

mod cd;
mod exit;
mod setenv;

pub use cd::CdCommand;
pub use exit::ExitCommand;
pub use setenv::SetenvCommand;

use crate::command::Command;
use crate::core::env::Ambient;
use crate::error::ShellError;
use crate::process::{Launcher, ProcessExecutor};

/// What the session should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug)]
pub enum BuiltinError {
    HomeUnset,
    DirectoryChangeFailed { path: PathBuf, source: io::Error },
    MissingOperand,
    UnsetFailed { name: String, source: io::Error },
    SetFailed { name: String, source: io::Error },
}

impl fmt::Display for BuiltinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuiltinError::HomeUnset => write!(f, "HOME not set"),
            BuiltinError::DirectoryChangeFailed { path, source } => {
                write!(f, "{}: {}", path.display(), source)
            }
            BuiltinError::MissingOperand => write!(f, "missing operand"),
            BuiltinError::UnsetFailed { name, source } => {
                write!(f, "cannot unset {}: {}", name, source)
            }
            BuiltinError::SetFailed { name, source } => write!(f, "cannot set {}: {}", name, source),
        }
    }
}

impl std::error::Error for BuiltinError {}

pub trait Builtin {
    fn execute<A: Ambient>(&self, ctx: &mut A, args: &[OsString]) -> Result<Flow, BuiltinError>;
}

#[derive(Clone, Debug)]
enum BuiltinType {
    Cd(CdCommand),
    Setenv(SetenvCommand),
    Exit(ExitCommand),
}

impl Builtin for BuiltinType {
    fn execute<A: Ambient>(&self, ctx: &mut A, args: &[OsString]) -> Result<Flow, BuiltinError> {
        match self {
            BuiltinType::Cd(cmd) => cmd.execute(ctx, args),
            BuiltinType::Setenv(cmd) => cmd.execute(ctx, args),
            BuiltinType::Exit(cmd) => cmd.execute(ctx, args),
        }
    }
}

/// Routes a parsed command to a built-in or to the process launcher.
#[derive(Clone, Debug)]
pub struct Dispatcher<L = ProcessExecutor> {
    builtins: BTreeMap<&'static str, BuiltinType>,
    launcher: L,
}

impl Default for Dispatcher<ProcessExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher<ProcessExecutor> {
    pub fn new() -> Self {
        Self::with_launcher(ProcessExecutor::new())
    }
}

impl<L: Launcher> Dispatcher<L> {
    pub fn with_launcher(launcher: L) -> Self {
        let mut builtins = BTreeMap::new();
        builtins.insert("cd", BuiltinType::Cd(CdCommand::new()));
        builtins.insert("setenv", BuiltinType::Setenv(SetenvCommand::new()));
        builtins.insert("exit", BuiltinType::Exit(ExitCommand::new()));
        Self { builtins, launcher }
    }

    /// Built-in names are ASCII, so a name that is not UTF-8 is never one.
    fn lookup(&self, name: &OsStr) -> Option<(&'static str, &BuiltinType)> {
        let name = name.to_str()?;
        self.builtins.get_key_value(name).map(|(k, v)| (*k, v))
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Runs one command. Only fatal process errors come back as `Err`;
    /// everything else is reported here and the session carries on.
    pub fn dispatch<A: Ambient>(&self, ctx: &mut A, command: &Command) -> Result<Flow, ShellError> {
        let Some(name) = command.name() else {
            return Ok(Flow::Continue);
        };
        let args = &command.arguments[1..];

        if let Some((name, builtin)) = self.lookup(name) {
            log::debug!("builtin {} {:?}", name, args);
            return Ok(builtin.execute(ctx, args).unwrap_or_else(|e| {
                eprintln!("minish: {}: {}", name, e);
                Flow::Continue
            }));
        }

        log::debug!("external {:?}", command.arguments);
        match self.launcher.launch(command) {
            Ok(outcome) => {
                if let Some(report) = outcome.report() {
                    eprintln!("{}", report);
                }
                Ok(Flow::Continue)
            }
            Err(e) if e.is_fatal() => Err(e.into()),
            Err(e) => {
                eprintln!("minish: {}", e);
                Ok(Flow::Continue)
            }
        }
    }
}
