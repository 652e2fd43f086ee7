use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Command line arguments for crowcom
#[derive(Parser, Debug)]
#[command(
    name = "crowcom",
    version = env!("CARGO_PKG_VERSION"),
    about = "Interactive serial console for the crow module",
    long_about = "Talks to a crow over USB serial: type Lua at the prompt, send or upload scripts, and watch input events as they stream in."
)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Serial port to use instead of USB discovery
    #[arg(short, long, global = true)]
    pub port: Option<String>,

    /// Script to run once connected
    pub script: Option<PathBuf>,

    /// Command to execute (defaults to the interactive console)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Interactive console
    Repl {
        /// Script to run once connected
        script: Option<PathBuf>,
    },
    /// List serial ports, marking the ones that look like a crow
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },
    /// Execute a script and print what the device answers
    Run {
        script: PathBuf,
        /// Seconds to keep printing device output
        #[arg(short, long, default_value = "1")]
        listen: u64,
    },
    /// Store a script on the device and print what it answers
    Upload {
        script: PathBuf,
        /// Seconds to keep printing device output
        #[arg(short, long, default_value = "1")]
        listen: u64,
    },
}

impl Args {
    /// The subcommand to run, with the bare form mapped to the console.
    pub fn command(&self) -> Command {
        match &self.command {
            Some(command) => command.clone(),
            None => Command::Repl {
                script: self.script.clone(),
            },
        }
    }
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
    /// Table output
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_invocation_is_repl() {
        let args = Args::try_parse_from(["crowcom"]).unwrap();
        assert_eq!(args.command(), Command::Repl { script: None });
    }

    #[test]
    fn test_bare_script_is_repl_startup_script() {
        let args = Args::try_parse_from(["crowcom", "boot.lua"]).unwrap();
        assert_eq!(
            args.command(),
            Command::Repl {
                script: Some(PathBuf::from("boot.lua"))
            }
        );
    }

    #[test]
    fn test_subcommands() {
        let args = Args::try_parse_from(["crowcom", "list", "--output", "json"]).unwrap();
        assert_eq!(args.command(), Command::List { output: OutputFormat::Json });

        let args = Args::try_parse_from(["crowcom", "upload", "a.lua", "--listen", "3", "-p", "/dev/ttyACM1"])
            .unwrap();
        assert_eq!(args.port.as_deref(), Some("/dev/ttyACM1"));
        assert_eq!(
            args.command(),
            Command::Upload {
                script: PathBuf::from("a.lua"),
                listen: 3
            }
        );
    }

    #[test]
    fn test_run_requires_script() {
        assert!(Args::try_parse_from(["crowcom", "run"]).is_err());
    }
}
