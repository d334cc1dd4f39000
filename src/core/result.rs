//! ### 命令执行结果

use super::{
    error::{AppError, AppResult},
    xml::parse_xml,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// One decoded line, as it arrived from the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub stream: OutputStream,
    pub text: String,
}

/// Receives output lines live while a command runs.
pub trait OutputObserver {
    fn on_line(&mut self, line: &OutputLine);
}

impl<F> OutputObserver for F
where
    F: FnMut(&OutputLine),
{
    fn on_line(&mut self, line: &OutputLine) {
        self(line)
    }
}

/// 不关心实时输出时使用
pub struct NoopObserver;

impl OutputObserver for NoopObserver {
    fn on_line(&mut self, _line: &OutputLine) {}
}

/// Outcome of one finished process. Never built for cancelled or timed-out
/// runs, those surface as errors instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub failure: Option<String>,
    command: String,
}

impl ExecutionResult {
    pub(crate) fn new(command: String, exit_code: i32, stdout: String, stderr: String) -> Self {
        let success = exit_code == 0;
        let failure = if success {
            None
        } else if stderr.trim().is_empty() {
            Some(format!("process exited with code {}", exit_code))
        } else {
            Some(stderr.trim().to_string())
        };

        ExecutionResult {
            success,
            stdout,
            stderr,
            exit_code,
            failure,
            command,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// stdout on success, `SvnCommandFailed` carrying stderr and exit code otherwise.
    pub fn into_output(self) -> AppResult<String> {
        if self.success {
            Ok(self.stdout)
        } else {
            Err(self.into_error())
        }
    }

    /// The failure as an error, whatever the exit code was.
    pub fn into_error(self) -> AppError {
        AppError::SvnCommandFailed {
            command: self.command,
            exit_code: self.exit_code,
            stderr: self.stderr,
        }
    }
}

/// Result of a command run with `--xml`.
#[derive(Debug, Clone)]
pub struct XmlOutput {
    pub result: ExecutionResult,
}

impl XmlOutput {
    /// The parsed document, or `None` when the command failed or did not
    /// print well-formed XML. Only the second case warrants a text rerun.
    pub fn document(&self) -> Option<roxmltree::Document<'_>> {
        if !self.result.success {
            return None;
        }
        parse_xml(&self.result.stdout)
    }
}
