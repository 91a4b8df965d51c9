use crate::error::ShellError;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct Flags {
    flags: BTreeMap<String, Flag>,
    script: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Flag {
    pub short: String,
    pub long: String,
    pub description: String,
    pub value: Option<String>,
}

impl Default for Flags {
    fn default() -> Self {
        Self::new()
    }
}

impl Flags {
    pub fn new() -> Self {
        let mut flags = BTreeMap::new();

        flags.insert(
            "help".to_string(),
            Flag {
                short: "-h".to_string(),
                long: "--help".to_string(),
                description: "Print this help message".to_string(),
                value: None,
            },
        );

        flags.insert(
            "version".to_string(),
            Flag {
                short: "-v".to_string(),
                long: "--version".to_string(),
                description: "Show version information".to_string(),
                value: None,
            },
        );

        flags.insert(
            "quiet".to_string(),
            Flag {
                short: "-q".to_string(),
                long: "--quiet".to_string(),
                description: "Do not print the prompt".to_string(),
                value: None,
            },
        );

        flags.insert(
            "debug".to_string(),
            Flag {
                short: "-d".to_string(),
                long: "--debug".to_string(),
                description: "Enable debug logging on stderr".to_string(),
                value: None,
            },
        );

        Flags {
            flags,
            script: None,
        }
    }

    /// Parses flags and the optional script path. Only the first positional
    /// argument is used; the rest are ignored.
    pub fn parse(&mut self, args: &[String]) -> Result<(), ShellError> {
        for arg in args {
            if arg.len() > 1 && arg.starts_with('-') {
                let flag = self
                    .flags
                    .values_mut()
                    .find(|flag| arg == &flag.short || arg == &flag.long)
                    .ok_or_else(|| ShellError::FlagError(format!("unknown option: {}", arg)))?;
                flag.value = Some("true".to_string());
            } else if self.script.is_none() {
                self.script = Some(arg.clone());
            }
        }
        Ok(())
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.flags
            .get(name)
            .and_then(|f| f.value.as_ref())
            .is_some()
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn print_help(&self) {
        println!("Usage: minish [OPTIONS] [SCRIPT]");
        println!("\nReads one command per line from SCRIPT, or from standard input.");
        println!("\nOptions:");
        for flag in self.flags.values() {
            println!("  {}, {:<15} {}", flag.short, flag.long, flag.description);
        }
    }
}
