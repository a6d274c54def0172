//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command: load the manifest, capture the
//! root directory, plan, orchestrate and report.
//!
//! 此模块实现 `run` 命令：加载清单、确定根目录、制定计划、编排运行并生成报告。

use anyhow::{Context, Result};
use colored::*;
use std::{env, fs, path::Path, path::PathBuf};
use tracing::info;

use crate::{
    cli::RunArgs,
    core::{
        config::Manifest,
        models::{RunReport, Verdict},
        orchestrator::Orchestrator,
        planner::{self, PlanOptions},
    },
    infra::{
        command::{OutputMode, SystemRunner},
        fs::FsMarker,
        t,
    },
    reporting::{
        console::{print_failure_details, print_plan, print_summary},
        html::generate_html_report,
        json::write_json_report,
    },
};

/// Executes the run command.
///
/// Errors are reserved for problems that stop a run from being set up at
/// all (unreadable manifest, bad root, unknown `--only` name). Once the
/// orchestrator starts, every failure is part of the returned verdict.
///
/// 执行运行命令。错误仅用于无法建立运行的情况；编排开始后，所有失败都体现在返回的结论中。
pub async fn execute(args: RunArgs, lang: Option<&str>) -> Result<Verdict> {
    let (manifest, manifest_path) = load_manifest(&args.manifest, lang)?;
    let locale = crate::init_locale(lang.or(manifest.language.as_deref()));

    let root = resolve_root(args.root.as_deref(), &locale)?;

    println!(
        "{}",
        t!("run.root_detected", locale = locale, path = root.display())
    );
    println!(
        "{}",
        t!("run.loading_manifest", locale = locale, path = manifest_path.display())
    );

    let options = PlanOptions {
        tool_override: args.tool.clone(),
        only: args.only.clone(),
    };
    let plan = planner::plan_run(&manifest, &root, &options)
        .with_context(|| t!("run.plan_failed", locale = locale).to_string())?;

    println!(
        "{}",
        t!(
            "run.plan_ready",
            locale = locale,
            count = plan.len(),
            tool = plan.tool.display()
        )
        .cyan()
    );
    info!(root = %root.display(), invocations = plan.len(), "run planned");

    if args.dry_run {
        print_plan(&plan, &locale);
        return Ok(Verdict::Pass);
    }

    if plan.is_empty() {
        println!("{}", t!("run.no_invocations", locale = locale).yellow());
    }

    let output_mode = if args.capture_output {
        OutputMode::Capture
    } else {
        OutputMode::Inherit
    };
    let orchestrator = Orchestrator::new(SystemRunner::new(output_mode), FsMarker);
    let report = orchestrator.run(&plan).await;

    print_summary(&report, &locale);
    print_failure_details(&report, &locale);
    write_reports(&report, args.html.as_deref(), args.json.as_deref(), &locale);

    let verdict = report.verdict();
    info!(%verdict, total_status = report.total_status(), "run finished");
    Ok(verdict)
}

/// Until the manifest is read only `--lang` (or the system locale) can pick
/// the language of a read error.
fn load_manifest(path_arg: &Path, lang: Option<&str>) -> Result<(Manifest, PathBuf)> {
    let locale = crate::init_locale(lang);
    let manifest_path = fs::canonicalize(path_arg).with_context(|| {
        t!("run.manifest_read_failed", locale = locale, path = path_arg.display()).to_string()
    })?;
    let manifest = Manifest::load(&manifest_path)?;
    Ok((manifest, manifest_path))
}

/// The root is captured once, here, and every relative path in the manifest
/// is resolved against it.
fn resolve_root(root_arg: Option<&Path>, locale: &str) -> Result<PathBuf> {
    let root = match root_arg {
        Some(dir) => fs::canonicalize(dir).with_context(|| {
            t!("run.root_not_found", locale = locale, path = dir.display()).to_string()
        })?,
        None => env::current_dir().context("Failed to read the current working directory")?,
    };

    if !root.is_dir() {
        anyhow::bail!(
            "{}",
            t!("run.root_not_directory", locale = locale, path = root.display())
        );
    }
    Ok(root)
}

/// Report files are best effort: a write failure is printed and the verdict
/// is left untouched.
fn write_reports(report: &RunReport, html: Option<&Path>, json: Option<&Path>, locale: &str) {
    if let Some(path) = html {
        println!(
            "\n{}",
            t!("run.writing_html", locale = locale, path = path.display())
        );
        if let Err(e) = generate_html_report(report, path, locale) {
            eprintln!("{} {:#}", t!("run.report_failed", locale = locale).red(), e);
        }
    }
    if let Some(path) = json {
        println!(
            "{}",
            t!("run.writing_json", locale = locale, path = path.display())
        );
        if let Err(e) = write_json_report(report, path) {
            eprintln!("{} {:#}", t!("run.report_failed", locale = locale).red(), e);
        }
    }
}
