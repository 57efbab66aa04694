use anyhow::{Result, bail};
use std::fmt;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// A program plus leading arguments, parsed from a string like `python3 -m pip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Split on whitespace. Quoting is not supported, but a value naming an
    /// existing file is taken whole, so `/opt/My Tools/pip` works.
    pub fn parse(raw: &str) -> Result<Self> {
        let whole = raw.trim();
        if whole.contains(char::is_whitespace) && Path::new(whole).is_file() {
            return Ok(Self {
                program: whole.to_string(),
                args: Vec::new(),
            });
        }

        let mut parts = raw.split_whitespace().map(str::to_string);
        let Some(program) = parts.next() else {
            bail!("command is empty");
        };
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Copy with `extra` appended to the argument list.
    pub fn with_args<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = self.clone();
        next.args.extend(extra.into_iter().map(Into::into));
        next
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Run `command` in `dir` with inherited stdio and wait for it.
pub fn run_in(command: &CommandLine, dir: &Path) -> io::Result<ExitStatus> {
    Command::new(command.program())
        .args(command.args())
        .current_dir(dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
}
