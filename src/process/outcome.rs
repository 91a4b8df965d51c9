use std::ffi::CStr;
use std::fmt;

use libc::c_int;

/// A signal number, printed the way `strsignal(3)` names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal(pub c_int);

impl Signal {
    /// Symbolic constant name, e.g. `SIGINT`.
    pub fn name(self) -> Option<&'static str> {
        signal_hook::low_level::signal_name(self.0)
    }

    /// Human readable description, e.g. `Interrupt`.
    pub fn description(self) -> String {
        // SAFETY: strsignal returns either null or a NUL-terminated string
        // that stays valid until the next call; it is copied out immediately.
        let text = unsafe {
            let ptr = libc::strsignal(self.0);
            if ptr.is_null() {
                None
            } else {
                Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
            }
        };
        text.unwrap_or_else(|| format!("Unknown signal {}", self.0))
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// How a waited-for child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    ExitedNormally(i32),
    ExitedWithError(i32),
    Terminated(Signal),
}

impl ProcessOutcome {
    /// Classifies a raw status as filled in by `waitpid`.
    pub fn from_wait_status(status: c_int) -> Self {
        if libc::WIFSIGNALED(status) {
            return ProcessOutcome::Terminated(Signal(libc::WTERMSIG(status)));
        }
        match libc::WEXITSTATUS(status) {
            0 => ProcessOutcome::ExitedNormally(0),
            code => ProcessOutcome::ExitedWithError(code),
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, ProcessOutcome::ExitedNormally(_))
    }

    /// The line reported to the user, or `None` for a clean exit.
    pub fn report(&self) -> Option<String> {
        match self {
            ProcessOutcome::ExitedNormally(_) => None,
            ProcessOutcome::ExitedWithError(code) => Some(format!("Command returned {}", code)),
            ProcessOutcome::Terminated(signal) => Some(format!("Command killed: {}", signal)),
        }
    }
}
