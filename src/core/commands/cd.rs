use super::{Builtin, BuiltinError, Flow};
use crate::core::env::Ambient;
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Clone, Debug, Default)]
pub struct CdCommand;

impl CdCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Builtin for CdCommand {
    fn execute<A: Ambient>(&self, ctx: &mut A, args: &[OsString]) -> Result<Flow, BuiltinError> {
        let target = match args.first() {
            Some(path) => PathBuf::from(path),
            None => ctx.var("HOME").map(PathBuf::from).ok_or(BuiltinError::HomeUnset)?,
        };

        ctx.change_dir(&target)
            .map_err(|source| BuiltinError::DirectoryChangeFailed {
                path: target.clone(),
                source,
            })?;

        log::debug!("cd: now in {}", target.display());
        Ok(Flow::Continue)
    }
}
