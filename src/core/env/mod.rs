mod vars;

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};

pub use vars::{validate_name, validate_value};

/// Process-wide state the built-ins read and mutate.
///
/// Every spawned child inherits whatever this context holds at spawn time, so
/// the real implementation writes straight through to the process.
pub trait Ambient {
    fn var(&self, name: &str) -> Option<OsString>;
    fn set_var(&mut self, name: &OsStr, value: &OsStr) -> io::Result<()>;
    fn remove_var(&mut self, name: &OsStr) -> io::Result<()>;
    fn current_dir(&self) -> io::Result<PathBuf>;
    fn change_dir(&mut self, path: &Path) -> io::Result<()>;
}

/// The interpreter's own environment and working directory.
#[derive(Debug, Default)]
pub struct ProcessContext {
    _private: (),
}

impl ProcessContext {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Ambient for ProcessContext {
    fn var(&self, name: &str) -> Option<OsString> {
        std::env::var_os(name)
    }

    fn set_var(&mut self, name: &OsStr, value: &OsStr) -> io::Result<()> {
        validate_name(name)?;
        validate_value(value)?;
        std::env::set_var(name, value);
        Ok(())
    }

    fn remove_var(&mut self, name: &OsStr) -> io::Result<()> {
        validate_name(name)?;
        std::env::remove_var(name);
        Ok(())
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn change_dir(&mut self, path: &Path) -> io::Result<()> {
        std::env::set_current_dir(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::os::unix::ffi::OsStrExt;

    fn os(s: &str) -> &OsStr {
        OsStr::new(s)
    }

    #[test]
    #[serial]
    fn test_set_and_remove() -> io::Result<()> {
        let mut ctx = ProcessContext::new();
        ctx.set_var(os("MINISH_CTX_VAR"), os("some value"))?;
        assert_eq!(ctx.var("MINISH_CTX_VAR"), Some("some value".into()));
        assert_eq!(std::env::var("MINISH_CTX_VAR").unwrap(), "some value");

        ctx.remove_var(os("MINISH_CTX_VAR"))?;
        assert_eq!(ctx.var("MINISH_CTX_VAR"), None);

        // removing an absent variable is fine
        ctx.remove_var(os("MINISH_CTX_VAR"))?;
        Ok(())
    }

    #[test]
    #[serial]
    fn test_non_utf8_value() -> io::Result<()> {
        let mut ctx = ProcessContext::new();
        ctx.set_var(os("MINISH_CTX_BYTES"), OsStr::from_bytes(b"caf\xe9"))?;
        let value = ctx.var("MINISH_CTX_BYTES").unwrap();
        assert_eq!(value.as_bytes(), b"caf\xe9");
        ctx.remove_var(os("MINISH_CTX_BYTES"))
    }

    #[test]
    #[serial]
    fn test_invalid_names_rejected() {
        let mut ctx = ProcessContext::new();
        assert!(ctx.set_var(os(""), os("value")).is_err());
        assert!(ctx.set_var(os("A=B"), os("value")).is_err());
        assert!(ctx.set_var(os("MINISH_NUL"), os("va\0lue")).is_err());
        assert!(ctx.remove_var(os("")).is_err());
        assert!(ctx.remove_var(os("A=B")).is_err());
        assert_eq!(ctx.var("MINISH_NUL"), None);
    }

    #[test]
    #[serial]
    fn test_change_dir() -> io::Result<()> {
        let mut ctx = ProcessContext::new();
        let original = ctx.current_dir()?;
        let temp = tempfile::tempdir()?;
        let target = temp.path().canonicalize()?;

        ctx.change_dir(&target)?;
        assert_eq!(ctx.current_dir()?, target);

        assert!(ctx.change_dir(&target.join("missing")).is_err());
        assert_eq!(ctx.current_dir()?, target);

        ctx.change_dir(&original)?;
        Ok(())
    }
}
