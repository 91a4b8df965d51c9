use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;

use libc::c_char;

use super::redirect::Redirect;
use super::{last_errno, spawn, ChildError, ProcessError, ProcessOutcome};
use crate::command::Command;

/// Runs a non-built-in command to completion.
pub trait Launcher {
    fn launch(&self, command: &Command) -> Result<ProcessOutcome, ProcessError>;
}

#[derive(Clone, Debug, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Launcher for ProcessExecutor {
    fn launch(&self, command: &Command) -> Result<ProcessOutcome, ProcessError> {
        let prepared = PreparedCommand::new(command)?;
        let argv = prepared.argv();

        let child = spawn::spawn(|| prepared.exec(&argv))?;
        log::debug!("{} running as pid {}", prepared.program(), child.pid());
        child.wait()
    }
}

/// Everything the child needs, converted before `fork`.
struct PreparedCommand {
    args: Vec<CString>,
    redirects: Vec<Redirect>,
}

impl PreparedCommand {
    fn new(command: &Command) -> Result<Self, ProcessError> {
        let args = command
            .arguments
            .iter()
            .map(|arg| {
                CString::new(arg.as_bytes())
                    .map_err(|_| ProcessError::InvalidArgument(arg.to_string_lossy().into_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if args.is_empty() {
            return Err(ProcessError::InvalidArgument(String::new()));
        }

        let mut redirects = Vec::with_capacity(2);
        if let Some(path) = &command.input_redirect {
            redirects.push(Redirect::input(path)?);
        }
        if let Some(path) = &command.output_redirect {
            redirects.push(Redirect::output(path)?);
        }

        Ok(Self { args, redirects })
    }

    fn program(&self) -> String {
        self.args[0].to_string_lossy().into_owned()
    }

    /// Null-terminated pointer array borrowing `self.args`.
    fn argv(&self) -> Vec<*const c_char> {
        self.args
            .iter()
            .map(|arg| arg.as_ptr())
            .chain(std::iter::once(std::ptr::null()))
            .collect()
    }

    /// Child side: apply redirections, then replace the image. Returns only on failure.
    fn exec(&self, argv: &[*const c_char]) -> ChildError<'_> {
        for redirect in &self.redirects {
            if let Err(e) = redirect.apply() {
                return e;
            }
        }

        // SAFETY: `argv` is null-terminated and points into `self.args`,
        // which outlives this call.
        unsafe { libc::execvp(self.args[0].as_ptr(), argv.as_ptr()) };
        ChildError::Exec {
            program: &self.args[0],
            errno: last_errno(),
        }
    }
}
