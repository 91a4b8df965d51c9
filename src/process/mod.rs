use std::ffi::CStr;
use std::fmt;
use std::io;

use libc::c_int;

pub mod executor;
pub mod outcome;
pub mod redirect;
pub mod signal;
pub mod spawn;

pub use executor::{Launcher, ProcessExecutor};
pub use outcome::{ProcessOutcome, Signal};

use crate::error::status;

/// Parent-side failures around running an external command.
#[derive(Debug)]
pub enum ProcessError {
    InvalidArgument(String),
    Fork(io::Error),
    Wait(io::Error),
}

impl ProcessError {
    /// Fork and wait failures end the interpreter; the rest are reported and skipped.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProcessError::Fork(_) | ProcessError::Wait(_))
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ProcessError::InvalidArgument(_) => None,
            ProcessError::Fork(_) => Some(status::FORK_FAILED),
            ProcessError::Wait(_) => Some(status::WAIT_FAILED),
        }
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::InvalidArgument(arg) => {
                write!(f, "argument contains a NUL byte: {:?}", arg)
            }
            ProcessError::Fork(e) => write!(f, "cannot create process: {}", e),
            ProcessError::Wait(e) => write!(f, "cannot wait for child: {}", e),
        }
    }
}

impl std::error::Error for ProcessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProcessError::InvalidArgument(_) => None,
            ProcessError::Fork(e) | ProcessError::Wait(e) => Some(e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Input,
    Output,
}

impl Stream {
    pub fn as_str(self) -> &'static str {
        match self {
            Stream::Input => "input",
            Stream::Output => "output",
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures inside the forked child before (or instead of) `execvp`.
///
/// These never reach the parent as values. The child prints them and leaves
/// with [`ChildError::exit_code`], which is all the parent ever sees. They
/// borrow what the parent prepared before `fork`, so building and printing
/// one never allocates.
#[derive(Debug)]
pub enum ChildError<'a> {
    Open {
        stream: Stream,
        path: &'a CStr,
        errno: c_int,
    },
    Duplicate {
        stream: Stream,
        path: &'a CStr,
        errno: c_int,
    },
    Exec {
        program: &'a CStr,
        errno: c_int,
    },
    Panicked,
}

impl ChildError<'_> {
    pub fn exit_code(&self) -> i32 {
        match self {
            ChildError::Open { .. } => status::REDIRECT_OPEN_FAILED,
            ChildError::Duplicate { .. } => status::REDIRECT_DUP_FAILED,
            ChildError::Exec { .. } | ChildError::Panicked => status::EXEC_FAILED,
        }
    }

    /// Hands the message to `emit` piece by piece.
    pub fn describe(&self, emit: &mut dyn FnMut(&[u8])) {
        let mut reason = [0u8; 128];
        match self {
            ChildError::Open {
                stream,
                path,
                errno,
            } => {
                emit(b"cannot open ");
                emit(path.to_bytes());
                emit(b" for ");
                emit(stream.as_str().as_bytes());
                emit(b": ");
                emit(strerror(*errno, &mut reason));
            }
            ChildError::Duplicate {
                stream,
                path,
                errno,
            } => {
                emit(b"cannot redirect ");
                emit(stream.as_str().as_bytes());
                emit(b" to ");
                emit(path.to_bytes());
                emit(b": ");
                emit(strerror(*errno, &mut reason));
            }
            ChildError::Exec { program, errno } => {
                emit(program.to_bytes());
                emit(b": ");
                emit(strerror(*errno, &mut reason));
            }
            ChildError::Panicked => emit(b"child setup panicked before exec"),
        }
    }
}

/// The calling thread's `errno`.
pub fn last_errno() -> c_int {
    io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

/// `strerror_r` into the caller's buffer.
fn strerror(errno: c_int, buf: &mut [u8]) -> &[u8] {
    // SAFETY: `buf` is writable for its full length, and strerror_r
    // NUL-terminates within that length when it succeeds.
    let rc = unsafe { libc::strerror_r(errno, buf.as_mut_ptr().cast(), buf.len()) };
    if rc != 0 {
        return b"unknown error";
    }
    let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    &buf[..len]
}
