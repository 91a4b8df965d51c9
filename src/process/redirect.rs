use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::RawFd;
use std::path::Path;

use libc::c_int;

use super::{last_errno, ChildError, ProcessError, Stream};

const CREATE_MODE: libc::c_uint = 0o666;

/// A standard stream replacement, prepared in the parent and applied in the child.
///
/// The path is converted to a C string up front so the child only has to
/// make raw `open`/`dup2`/`close` calls.
#[derive(Debug)]
pub struct Redirect {
    stream: Stream,
    path: CString,
}

impl Redirect {
    pub fn input(path: &Path) -> Result<Self, ProcessError> {
        Self::new(Stream::Input, path)
    }

    pub fn output(path: &Path) -> Result<Self, ProcessError> {
        Self::new(Stream::Output, path)
    }

    fn new(stream: Stream, path: &Path) -> Result<Self, ProcessError> {
        let path = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| ProcessError::InvalidArgument(path.to_string_lossy().into_owned()))?;
        Ok(Self { stream, path })
    }

    fn target(&self) -> RawFd {
        match self.stream {
            Stream::Input => libc::STDIN_FILENO,
            Stream::Output => libc::STDOUT_FILENO,
        }
    }

    fn flags(&self) -> c_int {
        match self.stream {
            Stream::Input => libc::O_RDONLY,
            Stream::Output => libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC,
        }
    }

    /// Opens the file and moves it onto stdin or stdout. Child side only.
    pub fn apply(&self) -> Result<(), ChildError<'_>> {
        // SAFETY: `path` is a valid NUL-terminated string owned by self.
        let fd = unsafe { libc::open(self.path.as_ptr(), self.flags(), CREATE_MODE) };
        if fd < 0 {
            return Err(ChildError::Open {
                stream: self.stream,
                path: &self.path,
                errno: last_errno(),
            });
        }

        let target = self.target();
        if fd == target {
            return Ok(());
        }

        // SAFETY: both descriptors are valid; dup2 atomically replaces `target`.
        if unsafe { libc::dup2(fd, target) } < 0 {
            let errno = last_errno();
            // SAFETY: `fd` was opened above and is not used afterwards.
            unsafe { libc::close(fd) };
            return Err(ChildError::Duplicate {
                stream: self.stream,
                path: &self.path,
                errno,
            });
        }

        // SAFETY: `fd` is our own descriptor; `target` now refers to the same file.
        unsafe { libc::close(fd) };
        Ok(())
    }
}
