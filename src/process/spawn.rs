use std::io;
use std::panic::{self, AssertUnwindSafe};

use libc::{c_int, pid_t};

use super::signal::SignalGuard;
use super::{ChildError, ProcessError, ProcessOutcome};

/// A forked child the parent has not waited on yet.
#[derive(Debug)]
#[must_use = "an unwaited child becomes a zombie"]
pub struct ChildHandle {
    pid: pid_t,
}

/// Forks, runs `child_setup` in the child, and hands the parent a handle.
///
/// `child_setup` is expected to replace the program image. If it returns, the
/// returned error is written to stderr and the child leaves via `_exit` with
/// the error's status, so control never comes back to the caller's code in the
/// child. A panic in the child is treated the same way.
///
/// Nothing on the child's side allocates unless `child_setup` panics: the
/// parent may have other threads, and one of them could hold the allocator
/// lock at the moment of `fork`.
pub fn spawn<'a, F>(child_setup: F) -> Result<ChildHandle, ProcessError>
where
    F: FnOnce() -> ChildError<'a>,
{
    // SAFETY: the child only runs `child_setup` (raw syscalls ending in
    // execvp) and then `_exit`; it never returns into the caller.
    match unsafe { libc::fork() } {
        -1 => Err(ProcessError::Fork(io::Error::last_os_error())),
        0 => {
            let error = panic::catch_unwind(AssertUnwindSafe(child_setup))
                .unwrap_or(ChildError::Panicked);

            let mut message = MessageBuf::new();
            message.push(b"minish: ");
            error.describe(&mut |piece| message.push(piece));
            write_stderr(message.line());

            // SAFETY: terminates the child without running the parent's
            // atexit handlers or flushing its inherited stdio buffers.
            unsafe { libc::_exit(error.exit_code()) }
        }
        pid => {
            log::debug!("forked child {}", pid);
            Ok(ChildHandle { pid })
        }
    }
}

const MESSAGE_CAPACITY: usize = 1024;

/// Stack buffer for the child's one diagnostic line. Overlong input is cut
/// short; there is always room left for the newline.
struct MessageBuf {
    bytes: [u8; MESSAGE_CAPACITY],
    len: usize,
}

impl MessageBuf {
    fn new() -> Self {
        Self {
            bytes: [0; MESSAGE_CAPACITY],
            len: 0,
        }
    }

    fn push(&mut self, piece: &[u8]) {
        let n = piece.len().min(MESSAGE_CAPACITY - 1 - self.len);
        self.bytes[self.len..self.len + n].copy_from_slice(&piece[..n]);
        self.len += n;
    }

    /// The text pushed so far, newline-terminated.
    fn line(&mut self) -> &[u8] {
        self.bytes[self.len] = b'\n';
        &self.bytes[..=self.len]
    }
}

/// Writes straight to fd 2 with one `write(2)` per chunk, bypassing the std
/// stderr lock.
fn write_stderr(mut bytes: &[u8]) {
    while !bytes.is_empty() {
        // SAFETY: the pointer and length describe the live `bytes` slice.
        let n = unsafe { libc::write(libc::STDERR_FILENO, bytes.as_ptr().cast(), bytes.len()) };
        if n <= 0 {
            if n < 0 && io::Error::last_os_error().kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return;
        }
        bytes = &bytes[n as usize..];
    }
}

impl ChildHandle {
    pub fn pid(&self) -> pid_t {
        self.pid
    }

    /// Blocks until this child ends, with `SIGINT` ignored in the parent.
    ///
    /// The previous `SIGINT` disposition is back in place by the time this
    /// returns, whether the wait succeeded or not.
    pub fn wait(self) -> Result<ProcessOutcome, ProcessError> {
        let guard = match SignalGuard::ignore(signal_hook::consts::SIGINT) {
            Ok(guard) => Some(guard),
            Err(e) => {
                log::warn!("could not ignore SIGINT while waiting: {}", e);
                None
            }
        };

        let status = wait_for(self.pid);
        drop(guard);

        let outcome = ProcessOutcome::from_wait_status(status.map_err(ProcessError::Wait)?);
        match outcome {
            ProcessOutcome::Terminated(signal) => log::debug!(
                "child {} killed by {}",
                self.pid,
                signal.name().unwrap_or("an unnamed signal")
            ),
            _ => log::debug!("child {} finished: {:?}", self.pid, outcome),
        }
        Ok(outcome)
    }
}

fn wait_for(pid: pid_t) -> io::Result<c_int> {
    let mut status: c_int = 0;
    loop {
        // SAFETY: `status` is a valid out-pointer for the duration of the call.
        let rc = unsafe { libc::waitpid(pid, &mut status, 0) };
        if rc == pid {
            return Ok(status);
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}
