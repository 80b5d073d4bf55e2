use crate::core::command::ToolCommand;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use crate::logging::BuildLog;
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// Pattern a tool output line must match to count as a reported error:
/// the token `error` followed by a four-letter category code and a numeric
/// code (e.g. `error CNDL0104`). Matched case-insensitively.
pub fn error_signature() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)error\s+[a-z]{4}[0-9]{1,4}").expect("error signature pattern is valid")
    })
}

/// Outcome of one external tool invocation.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub lines: Vec<String>,
    pub error_lines: usize,
}

impl ExecutionResult {
    /// A run failed when the process exited non-zero or any output line
    /// matched the error signature.
    pub fn failed(&self) -> bool {
        self.exit_code != 0 || self.error_lines > 0
    }
}

/// Executes tool invocations. Trait-based so the orchestrator can be tested
/// against a scripted runner without spawning real processes.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, command: &ToolCommand, log: &BuildLog) -> Result<ExecutionResult, AppError>;
}

/// Real runner backed by tokio process handling. Streams stdout and stderr
/// line by line into the build log while scanning for error signatures, then
/// waits for the process to exit. An optional timeout bounds the whole run;
/// expiry kills the process.
pub struct TokioProcessRunner {
    timeout: Option<Duration>,
}

impl TokioProcessRunner {
    pub fn new() -> Self {
        TokioProcessRunner { timeout: None }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        TokioProcessRunner {
            timeout: Some(timeout),
        }
    }

    /// Launch an executable with an already-built argument vector. The
    /// trait implementation delegates here after building the command's
    /// arguments.
    pub async fn run_process(
        &self,
        executable: &Path,
        args: &[String],
        workdir: Option<&Path>,
        env: &HashMap<String, String>,
        log: &BuildLog,
    ) -> Result<ExecutionResult, AppError> {
        let mut process = Command::new(executable);
        process
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = workdir {
            process.current_dir(dir);
        }
        process.envs(env);

        let mut child = process.spawn().map_err(|err| {
            AppError::new(
                ErrorCategory::ToolExecutionError,
                format!("failed to launch {}: {}", executable.display(), err),
            )
            .with_code("WIX-RUN-001")
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let streamed = async {
            let out = async {
                match stdout {
                    Some(pipe) => drain_lines(BufReader::new(pipe), log).await,
                    None => (Vec::new(), 0),
                }
            };
            let err = async {
                match stderr {
                    Some(pipe) => drain_lines(BufReader::new(pipe), log).await,
                    None => (Vec::new(), 0),
                }
            };
            let ((out_lines, out_errors), (err_lines, err_errors)) = tokio::join!(out, err);
            let status = child.wait().await;
            (out_lines, out_errors, err_lines, err_errors, status)
        };

        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, streamed).await,
            None => Ok(streamed.await),
        };
        let (out_lines, out_errors, err_lines, err_errors, status) = match outcome {
            Ok(result) => result,
            Err(_) => {
                child.kill().await.ok();
                return Err(AppError::new(
                    ErrorCategory::TimeoutError,
                    format!(
                        "{} did not finish within the configured timeout",
                        executable.display()
                    ),
                )
                .with_code("WIX-RUN-003"));
            }
        };

        let status = status.map_err(|err| {
            AppError::new(
                ErrorCategory::ToolExecutionError,
                format!("failed to wait on {}: {}", executable.display(), err),
            )
            .with_code("WIX-RUN-002")
        })?;

        let mut lines = out_lines;
        lines.extend(err_lines);
        Ok(ExecutionResult {
            exit_code: status.code().unwrap_or(-1),
            lines,
            error_lines: out_errors + err_errors,
        })
    }
}

impl Default for TokioProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, command: &ToolCommand, log: &BuildLog) -> Result<ExecutionResult, AppError> {
        let args = command.build_args()?;
        self.run_process(
            command.executable(),
            &args,
            command.workdir(),
            command.env(),
            log,
        )
        .await
    }
}

/// Read a stream to EOF, logging every line and counting error signatures.
async fn drain_lines<R>(reader: BufReader<R>, log: &BuildLog) -> (Vec<String>, usize)
where
    R: AsyncRead + Unpin,
{
    let mut lines = reader.lines();
    let mut captured = Vec::new();
    let mut errors = 0;
    while let Ok(Some(line)) = lines.next_line().await {
        if error_signature().is_match(&line) {
            errors += 1;
        }
        log.log(&line);
        captured.push(line);
    }
    (captured, errors)
}
