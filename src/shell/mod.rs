use std::io::{self, BufReader, IsTerminal};
use std::path::Path;

mod input;

pub use input::{LineSource, PromptedSource, ScriptSource, TerminalSource};

use crate::{
    command::Command,
    core::{
        commands::{Dispatcher, Flow},
        env::{Ambient, ProcessContext},
    },
    error::ShellError,
    flags::Flags,
    process::{Launcher, ProcessExecutor},
};

pub const PROMPT: &str = "shell> ";

/// Picks the input source: the script named on the command line, the
/// terminal, or piped standard input.
pub fn open_source(flags: &Flags) -> Result<Box<dyn LineSource>, ShellError> {
    let prompt = (!flags.is_set("quiet")).then(|| PROMPT.to_string());

    if let Some(script) = flags.script() {
        log::debug!("reading commands from {}", script);
        return Ok(Box::new(ScriptSource::open(Path::new(script))?));
    }

    if io::stdin().is_terminal() {
        log::debug!("reading commands from the terminal");
        return Ok(Box::new(TerminalSource::new(prompt)?));
    }

    log::debug!("reading commands from standard input");
    Ok(Box::new(PromptedSource::new(
        BufReader::new(io::stdin()),
        io::stderr(),
        prompt,
    )))
}

/// The read → parse → dispatch loop.
pub struct Session<S, A = ProcessContext, L = ProcessExecutor> {
    source: S,
    ctx: A,
    dispatcher: Dispatcher<L>,
}

impl<S: LineSource> Session<S> {
    pub fn new(source: S) -> Self {
        Self::with_parts(source, ProcessContext::new(), Dispatcher::new())
    }
}

impl<S: LineSource, A: Ambient, L: Launcher> Session<S, A, L> {
    pub fn with_parts(source: S, ctx: A, dispatcher: Dispatcher<L>) -> Self {
        Self {
            source,
            ctx,
            dispatcher,
        }
    }

    /// Runs until end of input or `exit`. Errors are the fatal ones only.
    pub fn run(&mut self) -> Result<(), ShellError> {
        while let Some(line) = self.source.read_line()? {
            if self.step(&line)? == Flow::Exit {
                log::debug!("exit requested");
                return Ok(());
            }
        }
        log::debug!("end of input");
        Ok(())
    }

    fn step(&mut self, line: &[u8]) -> Result<Flow, ShellError> {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("minish: {}", e);
                return Ok(Flow::Continue);
            }
        };
        self.dispatcher.dispatch(&mut self.ctx, &command)
    }

    #[cfg(test)]
    fn context(&self) -> &A {
        &self.ctx
    }

    #[cfg(test)]
    fn dispatcher(&self) -> &Dispatcher<L> {
        &self.dispatcher
    }
}

impl LineSource for Box<dyn LineSource> {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, ShellError> {
        (**self).read_line()
    }
}
