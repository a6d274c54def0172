//! # Data Models Module / 数据模型模块
//!
//! This module defines the data structures produced by a run: the resolved
//! tool command, per-invocation statuses and results, the precondition
//! outcome, and the report that yields the aggregate verdict.
//!
//! 此模块定义一次运行产生的数据结构：解析后的工具命令、每次调用的状态和结果、
//! 前置条件结果，以及得出汇总结论的报告。

use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use crate::core::config::InvocationSpec;

/// Flag the tool expects the absolute profile path on.
pub const CONFIG_FILE_FLAG: &str = "--configFile";

/// Status contribution of an invocation that could not be started,
/// matching the shell's "command not found".
pub const LAUNCH_FAILURE_CODE: u64 = 127;

/// Base contribution of an invocation killed by a signal.
pub const SIGNAL_BASE_CODE: u64 = 128;

/// Status contribution of a failed precondition.
pub const PRECONDITION_FAILURE_CODE: u64 = 1;

/// A fully resolved invocation of the external tool.
/// 完全解析后的外部工具调用。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCommand {
    /// The program to execute.
    pub program: PathBuf,
    /// Absolute path of the configuration profile.
    pub config_file: PathBuf,
    /// Flags forwarded after `--`.
    pub extra_args: Vec<String>,
    /// Directory the tool runs in.
    pub working_dir: PathBuf,
}

impl ToolCommand {
    /// Builds the argument vector: `--configFile=<abs> [-- <extra>...]`.
    /// 构建参数列表：`--configFile=<abs> [-- <extra>...]`。
    pub fn args(&self) -> Vec<OsString> {
        let mut config_arg = OsString::from(format!("{CONFIG_FILE_FLAG}="));
        config_arg.push(self.config_file.as_os_str());

        let mut args = vec![config_arg];
        if !self.extra_args.is_empty() {
            args.push(OsString::from("--"));
            args.extend(self.extra_args.iter().map(OsString::from));
        }
        args
    }

    /// A shell-quoted, human readable rendering of the command line.
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.to_string_lossy().into_owned()];
        parts.extend(self.args().iter().map(|a| a.to_string_lossy().into_owned()));
        shlex::try_join(parts.iter().map(String::as_str)).unwrap_or_else(|_| parts.join(" "))
    }
}

/// How one invocation terminated.
/// 一次调用的终止方式。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvocationStatus {
    /// The tool ran and exited with a code.
    /// 工具运行并以退出码结束。
    Exited { code: i32 },
    /// The tool was terminated without an exit code (e.g. by a signal).
    /// 工具在没有退出码的情况下被终止（例如被信号终止）。
    Signaled { signal: Option<i32> },
    /// The tool could not be started at all.
    /// 工具根本无法启动。
    LaunchFailed { error: String },
}

impl InvocationStatus {
    pub fn success() -> Self {
        InvocationStatus::Exited { code: 0 }
    }

    pub fn exited(code: i32) -> Self {
        InvocationStatus::Exited { code }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InvocationStatus::Exited { code: 0 })
    }

    /// Non-negative contribution to the aggregate total. Zero only for a
    /// clean exit, so distinct failures can never cancel each other out.
    pub fn contribution(&self) -> u64 {
        match self {
            InvocationStatus::Exited { code } => u64::from(code.unsigned_abs()),
            InvocationStatus::Signaled { signal } => {
                SIGNAL_BASE_CODE + signal.map_or(0, |s| u64::from(s.unsigned_abs()))
            }
            InvocationStatus::LaunchFailed { .. } => LAUNCH_FAILURE_CODE,
        }
    }
}

impl From<std::process::ExitStatus> for InvocationStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return InvocationStatus::Exited { code };
        }

        #[cfg(unix)]
        let signal = {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        };
        #[cfg(not(unix))]
        let signal = None;

        InvocationStatus::Signaled { signal }
    }
}

impl fmt::Display for InvocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationStatus::Exited { code } => write!(f, "exit code {code}"),
            InvocationStatus::Signaled { signal: Some(s) } => write!(f, "terminated by signal {s}"),
            InvocationStatus::Signaled { signal: None } => write!(f, "terminated"),
            InvocationStatus::LaunchFailed { error } => write!(f, "failed to launch: {error}"),
        }
    }
}

/// What a `ProcessRunner` hands back for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub status: InvocationStatus,
    /// Combined stdout/stderr, only when output capture is enabled.
    pub output: Option<String>,
}

impl RunOutcome {
    pub fn new(status: InvocationStatus) -> Self {
        Self {
            status,
            output: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }
}

/// The recorded result of one invocation. Never mutated once created.
/// 一次调用的记录结果。创建后不再修改。
#[derive(Debug, Clone, Serialize)]
pub struct InvocationResult {
    /// The manifest entry this result belongs to.
    pub spec: InvocationSpec,
    /// The command that was actually run.
    pub command: ToolCommand,
    /// How the tool terminated.
    pub status: InvocationStatus,
    /// Wall-clock time until the tool returned.
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
    /// Captured output, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl InvocationResult {
    pub fn name(&self) -> String {
        self.spec.display_name()
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// State of the usage-acceptance marker.
/// 使用许可标记的状态。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PreconditionStatus {
    Ready,
    Failed { error: String },
}

/// Result of the one-time precondition step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreconditionOutcome {
    pub marker: PathBuf,
    pub status: PreconditionStatus,
}

impl PreconditionOutcome {
    pub fn is_ready(&self) -> bool {
        self.status == PreconditionStatus::Ready
    }

    pub fn contribution(&self) -> u64 {
        if self.is_ready() {
            0
        } else {
            PRECONDITION_FAILURE_CODE
        }
    }
}

/// The single pass/fail outcome of a run.
/// 一次运行的唯一通过/失败结论。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    /// Verdict for an aggregate status total.
    pub fn from_total(total: u64) -> Self {
        if total == 0 { Verdict::Pass } else { Verdict::Fail }
    }

    pub fn is_pass(self) -> bool {
        self == Verdict::Pass
    }

    /// Numeric process exit code: 0 on pass, 1 on fail.
    pub fn exit_code(self) -> u8 {
        match self {
            Verdict::Pass => 0,
            Verdict::Fail => 1,
        }
    }
}

impl From<Verdict> for ExitCode {
    fn from(verdict: Verdict) -> Self {
        ExitCode::from(verdict.exit_code())
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
        }
    }
}

/// Everything a finished run produced.
/// 一次完成的运行所产生的全部内容。
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Local>,
    pub root: PathBuf,
    pub precondition: PreconditionOutcome,
    /// Results in manifest order.
    pub invocations: Vec<InvocationResult>,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl RunReport {
    /// Sum of every status contribution, precondition included. Saturates
    /// instead of wrapping.
    pub fn total_status(&self) -> u64 {
        self.invocations
            .iter()
            .map(|r| r.status.contribution())
            .fold(self.precondition.contribution(), u64::saturating_add)
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_total(self.total_status())
    }

    pub fn failures(&self) -> Vec<&InvocationResult> {
        self.invocations.iter().filter(|r| !r.is_success()).collect()
    }

    pub fn passed_count(&self) -> usize {
        self.invocations.iter().filter(|r| r.is_success()).count()
    }
}

/// Report as written to disk, with the derived verdict fields inlined.
#[derive(Serialize)]
pub struct ReportDocument<'a> {
    pub verdict: Verdict,
    pub exit_code: u8,
    pub total_status: u64,
    #[serde(flatten)]
    pub report: &'a RunReport,
}

impl<'a> From<&'a RunReport> for ReportDocument<'a> {
    fn from(report: &'a RunReport) -> Self {
        let verdict = report.verdict();
        Self {
            verdict,
            exit_code: verdict.exit_code(),
            total_status: report.total_status(),
            report,
        }
    }
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
