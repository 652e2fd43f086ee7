// Command module - Operator input interpretation
pub mod interpreter;

pub use interpreter::{Command, CommandInterpreter, Outcome, HELP_TEXT, PRINT_SCRIPT_LINE};
