use super::{Builtin, BuiltinError, Flow};
use crate::core::env::Ambient;
use std::ffi::OsString;

#[derive(Clone, Debug, Default)]
pub struct ExitCommand;

impl ExitCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Builtin for ExitCommand {
    fn execute<A: Ambient>(&self, _ctx: &mut A, _args: &[OsString]) -> Result<Flow, BuiltinError> {
        Ok(Flow::Exit)
    }
}
