//! External tool execution and output capture.
//!
//! Every pipeline step boils down to running a subprocess and blocking on
//! its exit. Output is streamed line by line into the log as it arrives; a
//! tail of stderr is retained for error messages. Children are spawned with
//! `kill_on_drop` so a step timeout tears the subprocess down with it.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// How many trailing stderr lines are kept for failure messages.
pub const STDERR_TAIL_LINES: usize = 20;

/// Captured result of a tool invocation.
#[derive(Debug)]
pub struct ToolOutput {
    /// Exit status of the tool
    pub status: ExitStatus,
    /// Complete captured stdout
    pub stdout: String,
    /// Trailing stderr lines (up to [`STDERR_TAIL_LINES`])
    pub stderr_tail: Vec<String>,
}

impl ToolOutput {
    /// Whether the tool exited zero.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// One-line failure description combining exit status and stderr tail.
    pub fn failure_detail(&self) -> String {
        let code = self
            .status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        if self.stderr_tail.is_empty() {
            format!("exit status {}", code)
        } else {
            format!("exit status {}: {}", code, self.stderr_tail.join(" | "))
        }
    }
}

/// Runs a tool to completion, streaming its output into the log.
///
/// Returns an error only when the tool cannot be spawned or its pipes fail;
/// a non-zero exit is reported through [`ToolOutput::status`] so callers can
/// classify it.
pub async fn run_tool<S: AsRef<OsStr>>(
    program: &Path,
    args: &[S],
    cwd: Option<&Path>,
) -> std::io::Result<ToolOutput> {
    let display_args: Vec<String> = args
        .iter()
        .map(|a| a.as_ref().to_string_lossy().into_owned())
        .collect();
    log::info!("running {} {}", program.display(), display_args.join(" "));

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let mut child = command.spawn()?;

    let stdout = child.stdout.take().ok_or_else(|| {
        std::io::Error::other("child stdout pipe missing")
    })?;
    let stderr = child.stderr.take().ok_or_else(|| {
        std::io::Error::other("child stderr pipe missing")
    })?;

    let program_name = program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string());

    let (stdout_lines, stderr_lines, status) = tokio::join!(
        collect_lines(stdout, &program_name, "stdout"),
        collect_lines(stderr, &program_name, "stderr"),
        child.wait(),
    );
    let status = status?;

    let stderr_lines = stderr_lines?;
    let tail_start = stderr_lines.len().saturating_sub(STDERR_TAIL_LINES);

    Ok(ToolOutput {
        status,
        stdout: stdout_lines?.join("\n"),
        stderr_tail: stderr_lines[tail_start..].to_vec(),
    })
}

/// Reads a pipe to EOF, logging each line as it arrives.
async fn collect_lines<R: AsyncRead + Unpin>(
    pipe: R,
    program: &str,
    stream: &str,
) -> std::io::Result<Vec<String>> {
    let mut reader = BufReader::new(pipe).lines();
    let mut collected = Vec::new();
    while let Some(line) = reader.next_line().await? {
        log::debug!("[{} {}] {}", program, stream, line);
        collected.push(line);
    }
    Ok(collected)
}
