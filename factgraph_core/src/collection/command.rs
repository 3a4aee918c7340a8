//! Allow-listed command execution for command-backed specs

use crate::executor::ComponentError;
use crate::logging::codes;
use std::collections::HashSet;
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Runs allow-listed programs with a timeout and a restricted environment
#[derive(Debug, Clone)]
pub struct SystemCommandExecutor {
    default_timeout: Duration,
    allowed_commands: HashSet<String>,
}

impl SystemCommandExecutor {
    /// Executor with an empty allow list
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            default_timeout: timeout,
            allowed_commands: HashSet::new(),
        }
    }

    pub fn allow_command(&mut self, command: impl Into<String>) {
        self.allowed_commands.insert(command.into());
    }

    pub fn allow_commands(&mut self, commands: &[&str]) {
        for cmd in commands {
            self.allowed_commands.insert(cmd.to_string());
        }
    }

    pub fn is_allowed(&self, command: &str) -> bool {
        self.allowed_commands.contains(command)
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Execute `program` and capture its output
    pub fn execute(
        &self,
        program: &str,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> Result<CommandResult, CommandError> {
        if !self.is_allowed(program) {
            log_warning!(
                code = codes::content::COMMAND_REJECTED,
                "Command rejected by allow list",
                "program" => program
            );
            return Err(CommandError::NotAllowed {
                program: program.to_string(),
            });
        }

        let timeout_duration = timeout.unwrap_or(self.default_timeout);
        let start = Instant::now();

        let mut cmd = Command::new(program);
        cmd.args(args)
            .env_clear()
            .env("PATH", "/usr/bin:/bin:/usr/sbin:/sbin")
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CommandError::ProgramNotFound {
                program: program.to_string(),
            },
            std::io::ErrorKind::PermissionDenied => CommandError::PermissionDenied {
                program: program.to_string(),
            },
            _ => failed(program, e.to_string()),
        })?;

        // Drain both pipes while waiting so a chatty child cannot fill them and stall
        let stdout = drain(program, child.stdout.take());
        let stderr = drain(program, child.stderr.take());

        let status = wait_timeout::ChildExt::wait_timeout(&mut child, timeout_duration)
            .map_err(|e| failed(program, e.to_string()))?;

        match status {
            Some(status) => Ok(CommandResult {
                stdout: collect(stdout),
                stderr: collect(stderr),
                exit_code: status.code().unwrap_or(-1),
                duration: start.elapsed(),
            }),
            None => {
                if let Err(e) = child.kill() {
                    log_debug!(
                        "Failed to kill timed out command",
                        "program" => program,
                        "error" => e
                    );
                }
                match child.wait() {
                    Ok(status) => log_debug!(
                        "Timed out command reaped",
                        "program" => program,
                        "status" => status
                    ),
                    Err(e) => log_debug!(
                        "Failed to reap timed out command",
                        "program" => program,
                        "error" => e
                    ),
                }
                log_warning!(
                    code = codes::content::COMMAND_TIMEOUT,
                    "Command timed out",
                    "program" => program,
                    "timeout_ms" => timeout_duration.as_millis()
                );
                Err(CommandError::Timeout {
                    program: program.to_string(),
                    timeout_ms: timeout_duration.as_millis() as u64,
                })
            }
        }
    }
}

fn failed(program: &str, reason: String) -> CommandError {
    log_warning!(
        code = codes::content::COMMAND_FAILED,
        "Command could not be run",
        "program" => program,
        "reason" => &reason
    );
    CommandError::ExecutionFailed {
        program: program.to_string(),
        reason,
    }
}

/// Read `pipe` to the end on its own thread
fn drain<R: Read + Send + 'static>(program: &str, pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    let mut pipe = pipe?;
    let program = program.to_string();
    let handle = thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut buffer) {
            log_debug!("Command output truncated", "program" => program, "error" => e);
        }
        buffer
    });
    Some(handle)
}

fn collect(reader: Option<JoinHandle<Vec<u8>>>) -> String {
    let bytes = reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

impl Default for SystemCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// Captured command output
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Program not found: {program}")]
    ProgramNotFound { program: String },

    #[error("Execution failed for '{program}': {reason}")]
    ExecutionFailed { program: String, reason: String },

    #[error("Command '{program}' timed out after {timeout_ms}ms")]
    Timeout { program: String, timeout_ms: u64 },

    #[error("Permission denied: {program}")]
    PermissionDenied { program: String },

    #[error("Command '{program}' is not on the allow list")]
    NotAllowed { program: String },
}

impl From<CommandError> for ComponentError {
    fn from(error: CommandError) -> Self {
        match error {
            // A missing program means the command does not apply to this host
            CommandError::ProgramNotFound { .. } => ComponentError::Skip(error.to_string()),
            other => ComponentError::Content(other.to_string()),
        }
    }
}
