//! Process Execution
//!
//! External tools (ant, gradlew, adb) are driven through [`ProcessExecutor`]
//! so that callers can substitute a recording executor in tests.

use std::path::Path;
use std::process::Stdio;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Process errors
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {}", exit_label(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        output: String,
    },
}

/// Human-readable exit status
pub fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Runs external commands
#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    /// Run `program` in `cwd`, relaying its output to the log as it arrives.
    ///
    /// Returns the captured stdout followed by stderr. A non-zero exit is
    /// reported as [`ProcessError::Failed`] carrying the same output.
    async fn spawn(&self, program: &Path, args: &[String], cwd: &Path) -> Result<String, ProcessError>;

    /// Run `program` and capture its stdout
    async fn exec(&self, program: &Path, args: &[String]) -> Result<String, ProcessError>;
}

/// Executor backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl SystemExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessExecutor for SystemExecutor {
    async fn spawn(&self, program: &Path, args: &[String], cwd: &Path) -> Result<String, ProcessError> {
        let command = command_line(program, args);
        debug!("Running: {}", command);

        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ProcessError::Launch {
                command: command.clone(),
                source,
            })?;

        let (stdout, stderr) = tokio::join!(
            relay(child.stdout.take(), false),
            relay(child.stderr.take(), true),
        );

        let status = child.wait().await.map_err(|source| ProcessError::Launch {
            command: command.clone(),
            source,
        })?;

        let mut output = stdout;
        output.push_str(&stderr);

        if !status.success() {
            return Err(ProcessError::Failed {
                command,
                code: status.code(),
                output,
            });
        }

        Ok(output)
    }

    async fn exec(&self, program: &Path, args: &[String]) -> Result<String, ProcessError> {
        let command = command_line(program, args);
        debug!("Executing: {}", command);

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|source| ProcessError::Launch {
                command: command.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProcessError::Failed {
                command,
                code: output.status.code(),
                output: format!("{}{}", stdout, stderr),
            });
        }

        Ok(stdout)
    }
}

/// Forward each line of `stream` to the log and collect it.
///
/// Lines are decoded lossily. The stream is always drained to EOF so the
/// child never sees a closed pipe.
async fn relay<R>(stream: Option<R>, is_stderr: bool) -> String
where
    R: AsyncRead + Unpin,
{
    let mut captured = String::new();
    let Some(stream) = stream else {
        return captured;
    };

    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']);
                if is_stderr {
                    warn!("{}", line);
                } else {
                    info!("{}", line);
                }
                captured.push_str(line);
                captured.push('\n');
            }
            Err(e) => {
                warn!("Stopped reading process output: {}", e);
                // Keep the pipe open until the child is done writing.
                let _ = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await;
                break;
            }
        }
    }
    captured
}

/// Render a command for logs and error messages
pub fn command_line(program: &Path, args: &[String]) -> String {
    let mut line = program.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}
