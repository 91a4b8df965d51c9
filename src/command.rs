use std::ffi::{OsStr, OsString};
use std::fmt;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

/// One parsed input line: the argument vector plus optional redirections.
///
/// Arguments are kept as raw bytes; nothing here assumes an encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    pub arguments: Vec<OsString>,
    pub input_redirect: Option<PathBuf>,
    pub output_redirect: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    MissingRedirectTarget(char),
    MissingCommand,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingRedirectTarget(op) => {
                write!(f, "syntax error: missing file name after '{}'", op)
            }
            ParseError::MissingCommand => write!(f, "syntax error: redirection without a command"),
        }
    }
}

impl std::error::Error for ParseError {}

impl Command {
    /// Splits a raw line on whitespace and pulls out `<` and `>` targets.
    ///
    /// Both `< file` and `<file` are accepted. A repeated redirection keeps
    /// the last target. There is no quoting or expansion.
    pub fn parse<L: AsRef<[u8]> + ?Sized>(line: &L) -> Result<Self, ParseError> {
        let mut command = Command::default();
        let mut tokens = line
            .as_ref()
            .split(u8::is_ascii_whitespace)
            .filter(|token| !token.is_empty());

        while let Some(token) = tokens.next() {
            let op = match token[0] {
                b'<' => '<',
                b'>' => '>',
                _ => {
                    command.arguments.push(os_string(token));
                    continue;
                }
            };

            let attached = &token[1..];
            let target = if attached.is_empty() {
                tokens.next().ok_or(ParseError::MissingRedirectTarget(op))?
            } else {
                attached
            };

            let target = PathBuf::from(os_string(target));
            if op == '<' {
                command.input_redirect = Some(target);
            } else {
                command.output_redirect = Some(target);
            }
        }

        if command.arguments.is_empty() && command.has_redirects() {
            return Err(ParseError::MissingCommand);
        }

        Ok(command)
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    pub fn name(&self) -> Option<&OsStr> {
        self.arguments.first().map(OsString::as_os_str)
    }

    pub fn has_redirects(&self) -> bool {
        self.input_redirect.is_some() || self.output_redirect.is_some()
    }
}

fn os_string(bytes: &[u8]) -> OsString {
    OsStr::from_bytes(bytes).to_os_string()
}
