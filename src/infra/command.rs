//! # Command Execution Module / 命令执行模块
//!
//! This module hides process spawning behind the [`ProcessRunner`] trait so
//! the orchestrator can be driven by the real tool or by a recording fake.
//!
//! 此模块将进程派生隐藏在 [`ProcessRunner`] trait 之后，
//! 使编排器既可以驱动真实工具，也可以驱动用于记录的伪实现。

use async_trait::async_trait;
use std::collections::VecDeque;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::core::models::{InvocationStatus, RunOutcome, ToolCommand};

/// Runs one tool command to completion.
///
/// Implementations must not fail: anything that prevents the tool from
/// running is reported as [`InvocationStatus::LaunchFailed`].
///
/// 运行一条工具命令直到结束。
/// 实现不得返回错误：任何阻止工具运行的情况都报告为 `LaunchFailed`。
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, command: &ToolCommand) -> RunOutcome;
}

#[async_trait]
impl<R: ProcessRunner + ?Sized> ProcessRunner for Arc<R> {
    async fn run(&self, command: &ToolCommand) -> RunOutcome {
        (**self).run(command).await
    }
}

/// What happens to the tool's stdout and stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Stream straight to our own console.
    #[default]
    Inherit,
    /// Collect both streams into the result for reporting.
    Capture,
}

/// Lines of captured output kept per invocation. Older lines are dropped.
pub const CAPTURE_TAIL_LINES: usize = 2_000;

/// Spawns the real external tool with `tokio::process`.
/// 使用 `tokio::process` 派生真实的外部工具。
#[derive(Debug, Clone)]
pub struct SystemRunner {
    output: OutputMode,
    tail_lines: usize,
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new(OutputMode::default())
    }
}

impl SystemRunner {
    pub fn new(output: OutputMode) -> Self {
        Self {
            output,
            tail_lines: CAPTURE_TAIL_LINES,
        }
    }

    /// Keeps at most `lines` lines of captured output.
    pub fn with_tail_lines(mut self, lines: usize) -> Self {
        self.tail_lines = lines;
        self
    }

    fn command_for(tool: &ToolCommand) -> Command {
        let mut cmd = Command::new(&tool.program);
        cmd.kill_on_drop(true);
        cmd.current_dir(&tool.working_dir);
        cmd.args(tool.args());
        cmd.stdin(Stdio::null());
        cmd
    }
}

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(&self, tool: &ToolCommand) -> RunOutcome {
        debug!(command = %tool.command_line(), "spawning tool");
        let cmd = Self::command_for(tool);

        match self.output {
            OutputMode::Inherit => match inherit_and_wait(cmd).await {
                Ok(status) => RunOutcome::new(status.into()),
                Err(e) => launch_failed(tool, e),
            },
            OutputMode::Capture => {
                let (status, output) = spawn_and_capture(cmd, self.tail_lines).await;
                match status {
                    Ok(status) => RunOutcome::new(status.into()).with_output(output),
                    Err(e) => launch_failed(tool, e).with_output(output),
                }
            }
        }
    }
}

fn launch_failed(tool: &ToolCommand, e: std::io::Error) -> RunOutcome {
    warn!(program = %tool.program.display(), error = %e, "tool could not be launched");
    RunOutcome::new(InvocationStatus::LaunchFailed {
        error: e.to_string(),
    })
}

async fn inherit_and_wait(mut cmd: Command) -> std::io::Result<std::process::ExitStatus> {
    cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    let mut child = cmd.spawn()?;
    child.wait().await
}

/// Spawns a command and captures its stdout and stderr.
/// Both streams are read concurrently and combined line by line. Bytes that
/// are not valid UTF-8 are replaced, and only the last `tail_lines` lines are
/// kept. Both pipes are drained to the end so the tool never writes into a
/// closed pipe.
///
/// # Returns
/// A tuple containing:
/// - The `ExitStatus` of the process wrapped in an `io::Result`.
/// - The kept tail of the combined stdout and stderr as a `String`.
///
/// 派生一个命令，捕获其 stdout 和 stderr。
/// 两个输出流被并发读取并按行合并；无效的 UTF-8 字节会被替换，
/// 只保留最后 `tail_lines` 行。两个管道都会被读到结尾，工具不会写入已关闭的管道。
pub async fn spawn_and_capture(
    mut cmd: Command,
    tail_lines: usize,
) -> (std::io::Result<std::process::ExitStatus>, String) {
    let mut child = match cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).spawn() {
        Ok(child) => child,
        Err(e) => return (Err(e), String::new()),
    };

    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        // Both pipes were requested above.
        let _ = child.kill().await;
        return (
            Err(std::io::Error::other("failed to capture tool output")),
            String::new(),
        );
    };

    // Shared by both reader tasks.
    // 由两个读取任务共享。
    let tail = Arc::new(Mutex::new(VecDeque::with_capacity(tail_lines.min(1024))));

    let stdout_handle = tokio::spawn(collect_lines(stdout, Arc::clone(&tail), tail_lines));
    let stderr_handle = tokio::spawn(collect_lines(stderr, Arc::clone(&tail), tail_lines));

    let status = child.wait().await;

    // Wait for the readers so no trailing output is lost.
    // 等待读取任务完成，以免丢失尾部输出。
    if let Err(e) = stdout_handle.await {
        warn!(error = %e, "failed to join stdout reader");
    }
    if let Err(e) = stderr_handle.await {
        warn!(error = %e, "failed to join stderr reader");
    }

    let captured = tail.lock().await.iter().fold(String::new(), |mut out, line| {
        out.push_str(line);
        out.push('\n');
        out
    });
    (status, captured)
}

async fn collect_lines<R>(stream: R, sink: Arc<Mutex<VecDeque<String>>>, tail_lines: usize)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']).to_string();
                let mut tail = sink.lock().await;
                if tail.len() >= tail_lines {
                    tail.pop_front();
                }
                if tail_lines > 0 {
                    tail.push_back(line);
                }
            }
            Err(e) => {
                warn!(error = %e, "stopped reading tool output");
                break;
            }
        }
    }
}
