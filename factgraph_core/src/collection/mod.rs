//! Collection helpers shared by datasources

pub mod command;

pub use command::{CommandError, CommandResult, SystemCommandExecutor};
