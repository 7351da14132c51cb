pub mod cli_args;
pub mod formatter;

pub use cli_args::{CliArgs, Command, OutputFormat};
pub use formatter::OutputFormatter;
