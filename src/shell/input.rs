use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use rustyline::config::Behavior;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};

use crate::error::ShellError;

/// Where the session gets its lines from. `Ok(None)` means end of input.
///
/// Lines are raw bytes: a line that is not valid UTF-8 is still a line.
pub trait LineSource {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, ShellError>;
}

fn read_from<R: BufRead>(reader: &mut R) -> Result<Option<Vec<u8>>, ShellError> {
    let mut line = Vec::new();
    match reader.read_until(b'\n', &mut line) {
        Ok(0) => Ok(None),
        Ok(_) => Ok(Some(line)),
        Err(e) => Err(ShellError::Read(e)),
    }
}

/// A script file: no prompt, ever.
pub struct ScriptSource<R> {
    reader: R,
}

impl ScriptSource<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, ShellError> {
        let file = File::open(path).map_err(|source| ShellError::ScriptOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> ScriptSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ScriptSource<R> {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, ShellError> {
        read_from(&mut self.reader)
    }
}

/// Standard input that is not a terminal: the prompt goes to `out`
/// (stderr in practice) before every read.
pub struct PromptedSource<R, W> {
    reader: R,
    out: W,
    prompt: Option<String>,
}

impl<R: BufRead, W: Write> PromptedSource<R, W> {
    pub fn new(reader: R, out: W, prompt: Option<String>) -> Self {
        Self {
            reader,
            out,
            prompt,
        }
    }
}

impl<R: BufRead, W: Write> LineSource for PromptedSource<R, W> {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, ShellError> {
        if let Some(prompt) = &self.prompt {
            // a prompt that cannot be shown is not worth ending the session over
            if let Err(e) = write!(self.out, "{}", prompt).and_then(|()| self.out.flush()) {
                log::warn!("failed to write prompt: {}", e);
            }
        }
        read_from(&mut self.reader)
    }
}

/// Interactive terminal input with line editing. No history is kept.
pub struct TerminalSource {
    editor: DefaultEditor,
    prompt: String,
}

impl TerminalSource {
    pub fn new(prompt: Option<String>) -> Result<Self, ShellError> {
        let config = Config::builder()
            .behavior(Behavior::PreferTerm)
            .auto_add_history(false)
            .build();
        let editor = DefaultEditor::with_config(config)?;

        Ok(Self {
            editor,
            prompt: prompt.unwrap_or_default(),
        })
    }
}

impl LineSource for TerminalSource {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, ShellError> {
        match self.editor.readline(&self.prompt) {
            Ok(line) => Ok(Some(line.into_bytes())),
            // ^C at the prompt drops the partial line
            Err(ReadlineError::Interrupted) => Ok(Some(Vec::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
