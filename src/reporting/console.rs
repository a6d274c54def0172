//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints run plans and results to the console with colour and
//! internationalization support.
//!
//! 此模块以彩色输出并支持国际化的方式在控制台打印运行计划和结果。

use colored::*;

use crate::core::models::{
    InvocationResult, InvocationStatus, PreconditionStatus, RunReport, Verdict,
};
use crate::core::planner::RunPlan;
use crate::infra::t;

/// Number of trailing output lines shown for a failed invocation.
const OUTPUT_TAIL_LINES: usize = 50;

/// Prints the commands a plan would run, without running them.
///
/// 打印计划将要运行的命令，但不实际运行。
pub fn print_plan(plan: &RunPlan, locale: &str) {
    println!("\n{}", t!("plan.banner", locale = locale).bold());
    println!(
        "  {}",
        t!("plan.marker", locale = locale, path = plan.marker.display())
    );
    if plan.is_empty() {
        println!("  {}", t!("plan.empty", locale = locale).dimmed());
        return;
    }
    for (i, planned) in plan.invocations.iter().enumerate() {
        println!(
            "  {:>2}. {:<24} {}",
            i + 1,
            planned.spec.display_name().cyan(),
            planned.command.command_line()
        );
    }
}

/// Prints a formatted summary of a finished run.
///
/// 在控制台打印已完成运行的格式化摘要。
///
/// # Output Format / 输出格式
/// ```text
/// --- Run Summary ---
///   - Status   | Invocation               |   Code |   Duration
///   - Ready    | .accept-weathervane      |        |
///   - Passed   | micro                    |      0 |     12.03s
///   - Failed   | xsmall                   |      1 |      4.51s
/// ```
pub fn print_summary(report: &RunReport, locale: &str) {
    println!("\n{}", t!("report.summary_banner", locale = locale).bold());

    let marker_colored = match &report.precondition.status {
        PreconditionStatus::Ready => t!("report.status_ready", locale = locale).to_string().green(),
        PreconditionStatus::Failed { .. } => {
            t!("report.status_failed", locale = locale).to_string().red()
        }
    };
    let marker_name = report
        .precondition
        .marker
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| report.precondition.marker.display().to_string());
    println!("  - {:<10} | {:<24} | {:>6} | {:>10}", marker_colored, marker_name, "", "");

    for result in &report.invocations {
        println!(
            "  - {:<10} | {:<24} | {:>6} | {:>10}",
            status_colored(result, locale),
            result.name(),
            code_str(result),
            format!("{:.2?}", result.duration)
        );
    }

    let verdict = report.verdict();
    let line = t!(
        "report.totals",
        locale = locale,
        passed = report.passed_count(),
        total = report.invocations.len(),
        status = report.total_status()
    );
    println!("\n  {}", line);

    match verdict {
        Verdict::Pass => println!("\n{}", t!("report.verdict_pass", locale = locale).green().bold()),
        Verdict::Fail => println!("\n{}", t!("report.verdict_fail", locale = locale).red().bold()),
    }
}

/// Prints details for every failed step, including the tail of captured
/// output when it is available.
///
/// 打印每个失败步骤的详细信息，若有捕获的输出则包含其尾部内容。
pub fn print_failure_details(report: &RunReport, locale: &str) {
    let failures = report.failures();
    let precondition_error = match &report.precondition.status {
        PreconditionStatus::Failed { error } => Some(error),
        PreconditionStatus::Ready => None,
    };

    if failures.is_empty() && precondition_error.is_none() {
        return;
    }

    println!("\n{}", t!("report.failure_banner", locale = locale).red().bold());
    println!("{}", "-".repeat(80));

    if let Some(error) = precondition_error {
        println!(
            "{} {}: {}",
            t!("report.precondition_header", locale = locale).red(),
            report.precondition.marker.display().to_string().cyan(),
            error
        );
        println!("{}", "-".repeat(80));
    }

    for (i, result) in failures.iter().enumerate() {
        println!(
            "[{}/{}] {} '{}' ({})",
            i + 1,
            failures.len(),
            t!("report.failure_header", locale = locale).red(),
            result.name().cyan(),
            result.status
        );
        println!("  {}", result.command.command_line());

        if let Some(output) = &result.output {
            println!("\n--- {} ---\n", t!("report.output_log", locale = locale).yellow());
            println!("{}", output_tail(output, OUTPUT_TAIL_LINES));
        }
        println!("{}", "-".repeat(80));
    }
}

fn status_colored(result: &InvocationResult, locale: &str) -> ColoredString {
    if result.is_success() {
        t!("report.status_passed", locale = locale).to_string().green()
    } else {
        t!("report.status_failed", locale = locale).to_string().red()
    }
}

fn code_str(result: &InvocationResult) -> String {
    match &result.status {
        InvocationStatus::Exited { code } => code.to_string(),
        InvocationStatus::Signaled { signal: Some(s) } => format!("sig{s}"),
        InvocationStatus::Signaled { signal: None } => "-".to_string(),
        InvocationStatus::LaunchFailed { .. } => "n/a".to_string(),
    }
}

/// Last `lines` lines of `output`.
pub fn output_tail(output: &str, lines: usize) -> String {
    let all: Vec<&str> = output.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}
