//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders a finished run as a standalone HTML page: the
//! verdict, counts, the precondition row and one row per invocation with
//! its command line and any captured output.
//!
//! 此模块将一次已完成的运行渲染为独立的 HTML 页面：结论、计数、
//! 前置条件行，以及每次调用一行（含命令行和捕获的输出）。

use anyhow::{Context, Result};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::fs;
use std::path::Path;

use crate::core::models::{InvocationResult, PreconditionStatus, RunReport, Verdict};
use crate::infra::t;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 2em; color: #24292e; }
h1 { margin-bottom: 0.2em; }
.meta { color: #6a737d; margin-bottom: 1.5em; }
.verdict { display: inline-block; padding: 0.3em 1em; border-radius: 4px; font-weight: bold; color: #fff; }
.verdict-pass { background: #28a745; }
.verdict-fail { background: #d73a49; }
.summary-container { display: flex; gap: 2em; margin: 1.5em 0; }
.summary-item .count { font-size: 1.8em; font-weight: bold; display: block; }
.passed-text { color: #28a745; }
.failed-text { color: #d73a49; }
table { border-collapse: collapse; width: 100%; }
th, td { text-align: left; padding: 0.5em; border-bottom: 1px solid #e1e4e8; vertical-align: top; }
code { font-size: 0.85em; }
.status-Passed { color: #28a745; font-weight: bold; }
.status-Failed { color: #d73a49; font-weight: bold; }
pre.output-content { background: #f6f8fa; padding: 1em; overflow-x: auto; max-height: 30em; }
"#;

/// Writes the HTML report for `report` to `output_path`.
///
/// 将 `report` 的 HTML 报告写入 `output_path`。
///
/// # Errors / 错误
/// Returns an error if the file cannot be written.
/// 如果无法写入文件则返回错误。
pub fn generate_html_report(report: &RunReport, output_path: &Path, locale: &str) -> Result<()> {
    let page = render(report, locale);
    fs::write(output_path, page.into_string())
        .with_context(|| format!("Failed to write HTML report to {}", output_path.display()))?;
    Ok(())
}

/// Renders the report page.
pub fn render(report: &RunReport, locale: &str) -> Markup {
    let verdict = report.verdict();
    let (verdict_class, verdict_text) = match verdict {
        Verdict::Pass => ("verdict verdict-pass", t!("html_report.verdict_pass", locale = locale)),
        Verdict::Fail => ("verdict verdict-fail", t!("html_report.verdict_fail", locale = locale)),
    };
    let total = report.invocations.len();
    let passed = report.passed_count();

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html_report.title", locale = locale).to_string()) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_report.main_header", locale = locale).to_string()) }
                div class="meta" {
                    (report.started_at.format("%Y-%m-%d %H:%M:%S %:z").to_string()) " · "
                    code { (report.root.display().to_string()) }
                }
                span class=(verdict_class) { (verdict_text.to_string()) }

                div class="summary-container" {
                    div class="summary-item" {
                        span class="count" { (total) }
                        span class="label" { (t!("html_report.summary.total", locale = locale).to_string()) }
                    }
                    div class="summary-item" {
                        span class="count passed-text" { (passed) }
                        span class="label" { (t!("html_report.summary.passed", locale = locale).to_string()) }
                    }
                    div class="summary-item" {
                        span class="count failed-text" { (total - passed) }
                        span class="label" { (t!("html_report.summary.failed", locale = locale).to_string()) }
                    }
                    div class="summary-item" {
                        span class="count" { (report.total_status()) }
                        span class="label" { (t!("html_report.summary.total_status", locale = locale).to_string()) }
                    }
                }

                table {
                    thead {
                        tr {
                            th { "#" }
                            th { (t!("html_report.table.name", locale = locale).to_string()) }
                            th { (t!("html_report.table.status", locale = locale).to_string()) }
                            th { (t!("html_report.table.duration", locale = locale).to_string()) }
                            th { (t!("html_report.table.command", locale = locale).to_string()) }
                        }
                    }
                    tbody {
                        tr {
                            td { "0" }
                            td { code { (report.precondition.marker.display().to_string()) } }
                            @match &report.precondition.status {
                                PreconditionStatus::Ready => {
                                    td class="status-Passed" { (t!("report.status_ready", locale = locale).to_string()) }
                                    td {}
                                    td {}
                                }
                                PreconditionStatus::Failed { error } => {
                                    td class="status-Failed" { (t!("report.status_failed", locale = locale).to_string()) }
                                    td {}
                                    td { (error.as_str()) }
                                }
                            }
                        }
                        @for (i, result) in report.invocations.iter().enumerate() {
                            (invocation_row(i + 1, result, locale))
                        }
                    }
                }
            }
        }
    }
}

fn invocation_row(position: usize, result: &InvocationResult, locale: &str) -> Markup {
    let (status_class, status_text) = if result.is_success() {
        ("status-Passed", t!("report.status_passed", locale = locale))
    } else {
        ("status-Failed", t!("report.status_failed", locale = locale))
    };

    html! {
        tr {
            td { (position) }
            td { (result.name()) }
            td class=(status_class) { (status_text.to_string()) " (" (result.status.to_string()) ")" }
            td { (format!("{:.2}s", result.duration.as_secs_f64())) }
            td { code { (result.command.command_line()) } }
        }
        @if let Some(output) = &result.output {
            @if !result.is_success() {
                tr {
                    td colspan="5" {
                        details {
                            summary { (t!("html_report.toggle_output", locale = locale).to_string()) }
                            pre class="output-content" { (output.as_str()) }
                        }
                    }
                }
            }
        }
    }
}
