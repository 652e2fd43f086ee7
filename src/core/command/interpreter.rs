use crate::core::communication::{Sink, Transport, LINE_ENDING};
use crate::domain::error::CrowComResult;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Control line asking the device to print its stored script.
pub const PRINT_SCRIPT_LINE: &str = "^^p";

pub const HELP_TEXT: &str = "
 h            this menu
 r            runs the default script
 u            uploads the default script
 r <filename> run <filename>
 u <filename> upload <filename>
 p            print current userscript
 q            quit

";

/// One parsed line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    RunScript(PathBuf),
    UploadScript(PathBuf),
    PrintUserScript,
    ShowHelp,
    RawPassthrough(String),
}

/// What the session should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Terminate,
}

/// Split off the command token; the remainder loses its leading whitespace
/// and counts as absent when nothing is left.
fn split_command(line: &str) -> Option<(&str, Option<&str>)> {
    let line = line.trim_start();
    if line.is_empty() {
        return None;
    }

    match line.find(char::is_whitespace) {
        None => Some((line, None)),
        Some(at) => {
            let rest = line[at..].trim_start();
            Some((&line[..at], (!rest.is_empty()).then_some(rest)))
        }
    }
}

/// Stateless mapper from operator lines to device actions.
#[derive(Debug, Clone)]
pub struct CommandInterpreter {
    default_script: PathBuf,
}

impl CommandInterpreter {
    pub fn new(default_script: impl Into<PathBuf>) -> Self {
        Self {
            default_script: default_script.into(),
        }
    }

    pub fn default_script(&self) -> &Path {
        &self.default_script
    }

    /// Classify a line. Blank input yields `None`.
    ///
    /// `r` and `u` only accept a remainder that names an existing file;
    /// anything unrecognized is passed to the device verbatim.
    pub fn parse(&self, line: &str) -> Option<Command> {
        let (token, rest) = split_command(line)?;

        let script = |rest: Option<&str>| -> Option<PathBuf> {
            match rest {
                None => Some(self.default_script.clone()),
                Some(path) if Path::new(path).is_file() => Some(PathBuf::from(path)),
                Some(_) => None,
            }
        };

        let command = match token {
            "q" => Some(Command::Quit),
            "r" => script(rest).map(Command::RunScript),
            "u" => script(rest).map(Command::UploadScript),
            "p" => Some(Command::PrintUserScript),
            "h" => Some(Command::ShowHelp),
            _ => None,
        };

        Some(command.unwrap_or_else(|| Command::RawPassthrough(line.to_string())))
    }

    /// Perform the side effect of a parsed command.
    pub async fn dispatch(
        &self,
        command: Command,
        transport: &dyn Transport,
        sink: &dyn Sink,
    ) -> CrowComResult<Outcome> {
        match command {
            Command::Quit => return Ok(Outcome::Terminate),
            Command::RunScript(path) => {
                sink.show(&format!(" running {}\n", path.display()));
                transport.execute(&path).await?;
            }
            Command::UploadScript(path) => {
                sink.show(&format!(" uploading {}\n", path.display()));
                transport.upload(&path).await?;
            }
            Command::PrintUserScript => transport.writeline(PRINT_SCRIPT_LINE).await?,
            Command::ShowHelp => sink.show(HELP_TEXT),
            Command::RawPassthrough(text) => {
                transport.write(&format!("{}{}", text, LINE_ENDING)).await?
            }
        }
        Ok(Outcome::Continue)
    }

    /// Parse and dispatch one line of operator input.
    pub async fn interpret(
        &self,
        line: &str,
        transport: &dyn Transport,
        sink: &dyn Sink,
    ) -> CrowComResult<Outcome> {
        debug!("User input: {:?}", line);
        match self.parse(line) {
            Some(command) => self.dispatch(command, transport, sink).await,
            None => Ok(Outcome::Continue),
        }
    }
}
