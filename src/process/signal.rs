use std::{io, mem, ptr};

use libc::{c_int, sighandler_t};

/// Installs `SIG_IGN` for one signal and puts the previous action back on drop.
///
/// Held by the parent for the length of a foreground wait, so the
/// disposition is restored on every path out of the wait, errors included.
pub struct SignalGuard {
    signal: c_int,
    previous: libc::sigaction,
}

impl SignalGuard {
    pub fn ignore(signal: c_int) -> io::Result<Self> {
        // SAFETY: both sigaction structs are fully initialised (zeroed, then
        // the handler and mask set) before the kernel reads them.
        unsafe {
            let mut ignore: libc::sigaction = mem::zeroed();
            ignore.sa_sigaction = libc::SIG_IGN;
            libc::sigemptyset(&mut ignore.sa_mask);

            let mut previous: libc::sigaction = mem::zeroed();
            if libc::sigaction(signal, &ignore, &mut previous) == -1 {
                return Err(io::Error::last_os_error());
            }

            log::debug!("ignoring signal {} during wait", signal);
            Ok(Self { signal, previous })
        }
    }
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        // SAFETY: `previous` was filled in by the kernel in `ignore`.
        let rc = unsafe { libc::sigaction(self.signal, &self.previous, ptr::null_mut()) };
        if rc == -1 {
            log::warn!(
                "failed to restore disposition of signal {}: {}",
                self.signal,
                io::Error::last_os_error()
            );
        } else {
            log::debug!("restored disposition of signal {}", self.signal);
        }
    }
}

/// The handler currently installed for `signal`, without changing it.
pub fn disposition(signal: c_int) -> io::Result<sighandler_t> {
    // SAFETY: a null `act` only queries; `current` is written by the kernel.
    unsafe {
        let mut current: libc::sigaction = mem::zeroed();
        if libc::sigaction(signal, ptr::null(), &mut current) == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(current.sa_sigaction)
    }
}
