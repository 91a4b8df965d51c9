use super::{Builtin, BuiltinError, Flow};
use crate::core::env::Ambient;
use std::ffi::OsString;

/// `setenv NAME VALUE` sets, `setenv NAME` unsets.
#[derive(Clone, Debug, Default)]
pub struct SetenvCommand;

impl SetenvCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Builtin for SetenvCommand {
    fn execute<A: Ambient>(&self, ctx: &mut A, args: &[OsString]) -> Result<Flow, BuiltinError> {
        match args {
            [] => Err(BuiltinError::MissingOperand),
            [name] => ctx
                .remove_var(name)
                .map(|()| Flow::Continue)
                .map_err(|source| BuiltinError::UnsetFailed {
                    name: name.to_string_lossy().into_owned(),
                    source,
                }),
            [name, value, ..] => ctx
                .set_var(name, value)
                .map(|()| Flow::Continue)
                .map_err(|source| BuiltinError::SetFailed {
                    name: name.to_string_lossy().into_owned(),
                    source,
                }),
        }
    }
}
