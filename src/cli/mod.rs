//! Command-line interface: argument parsing, dispatch, and output.

pub mod command;
pub mod handler;
pub mod output;

pub use command::Cli;
pub use handler::run;
