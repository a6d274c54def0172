//! # JSON Reporting Module / JSON 报告模块
//!
//! Machine-readable run output: the verdict and exit code plus every
//! invocation's status, in manifest order.
//!
//! 机器可读的运行输出：结论、退出码以及按清单顺序排列的每次调用状态。

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::core::models::{ReportDocument, RunReport};

/// Serialises `report` to a pretty-printed JSON string.
pub fn to_json(report: &RunReport) -> Result<String> {
    serde_json::to_string_pretty(&ReportDocument::from(report)).context("Failed to serialise run report")
}

/// Writes the JSON report to `output_path`.
pub fn write_json_report(report: &RunReport, output_path: &Path) -> Result<()> {
    let json = to_json(report)?;
    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))
}
