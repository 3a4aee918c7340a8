//! Command-backed specs

use super::host_context;
use factgraph_core::broker::Broker;
use factgraph_core::collection::SystemCommandExecutor;
use factgraph_core::executor::ComponentError;
use factgraph_core::log_warning;
use factgraph_core::logging::codes;
use factgraph_core::registry::Component;
use factgraph_core::types::{ContentRecord, Value};
use std::time::Duration;

/// Create the command executor used by the catalogue
///
/// Allow list:
/// - uname: kernel and architecture
/// - hostname: fully qualified host name
pub fn create_command_executor(timeout: Duration) -> SystemCommandExecutor {
    let mut executor = SystemCommandExecutor::with_timeout(timeout);
    executor.allow_commands(&["uname", "hostname"]);
    executor
}

/// Output of one allow-listed command. Only runs against the live root.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    program: String,
    args: Vec<String>,
    executor: SystemCommandExecutor,
}

impl CommandOutput {
    pub fn new(executor: SystemCommandExecutor, program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            executor,
        }
    }

    /// Command line as collected, e.g. `uname -a`
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Path the output is recorded under
    pub fn record_path(&self) -> String {
        format!("/factgraph_commands/{}", self.command_line().replace(' ', "_"))
    }
}

impl Component for CommandOutput {
    fn invoke(&self, broker: &Broker) -> Result<Value, ComponentError> {
        let context = host_context(broker)?;
        if !context.is_live() {
            return Err(ComponentError::skip(format!(
                "'{}' only runs against the live root",
                self.command_line()
            )));
        }

        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        let result = self.executor.execute(&self.program, &args, None)?;

        if !result.success() {
            log_warning!(
                code = codes::content::COMMAND_FAILED,
                "Command exited unsuccessfully",
                "command" => self.command_line(),
                "exit_code" => result.exit_code
            );
            return Err(ComponentError::Content(format!(
                "'{}' exited with {}: {}",
                self.command_line(),
                result.exit_code,
                result.stderr.trim()
            )));
        }

        Ok(ContentRecord::from_text(self.record_path(), &result.stdout).into())
    }

    fn describe(&self) -> String {
        format!("command {}", self.command_line())
    }
}
