//! # Run Orchestrator Module / 运行编排模块
//!
//! This module owns the sequential run loop: touch the precondition marker
//! once, invoke the tool for every planned profile in manifest order, and
//! fold every status into the report.
//!
//! No failure stops the loop. A profile that fails, or a tool that cannot
//! even be launched, is recorded and the next profile still runs, so CI
//! always sees the result of every profile.
//!
//! 此模块负责顺序运行循环：只创建一次前置条件标记，按清单顺序为每个计划中的
//! 配置档案调用工具，并将所有状态汇总到报告中。
//! 任何失败都不会中断循环，CI 总能看到每个配置档案的结果。

use chrono::Local;
use colored::*;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::core::models::{
    InvocationResult, PreconditionOutcome, PreconditionStatus, RunReport,
};
use crate::core::planner::{PlannedInvocation, RunPlan};
use crate::infra::command::ProcessRunner;
use crate::infra::fs::MarkerWriter;
use crate::infra::t;

/// Drives one run of a [`RunPlan`].
///
/// The process runner and marker writer are injected so the aggregation
/// logic can be exercised without a real tool.
///
/// 驱动一次 [`RunPlan`] 的运行。进程运行器和标记写入器通过注入提供。
pub struct Orchestrator<R, M> {
    runner: R,
    marker: M,
}

impl<R, M> Orchestrator<R, M>
where
    R: ProcessRunner,
    M: MarkerWriter,
{
    pub fn new(runner: R, marker: M) -> Self {
        Self { runner, marker }
    }

    /// Runs the whole plan and returns its report.
    ///
    /// This never returns an error: every failure ends up as a status inside
    /// the report, and [`RunReport::verdict`] turns them into the single
    /// pass/fail outcome.
    ///
    /// 运行整个计划并返回报告。此函数从不返回错误：所有失败都作为状态记录在报告中。
    pub async fn run(&self, plan: &RunPlan) -> RunReport {
        let started_at = Local::now();
        let start = Instant::now();

        let precondition = self.prepare(plan);

        let total = plan.len();
        let mut invocations = Vec::with_capacity(total);
        for (index, planned) in plan.invocations.iter().enumerate() {
            invocations.push(self.invoke(index, total, planned).await);
        }

        RunReport {
            started_at,
            root: plan.root.clone(),
            precondition,
            invocations,
            duration: start.elapsed(),
        }
    }

    /// Touches the marker exactly once, before any invocation.
    fn prepare(&self, plan: &RunPlan) -> PreconditionOutcome {
        let status = match self.marker.touch(&plan.marker) {
            Ok(()) => {
                debug!(marker = %plan.marker.display(), "precondition marker ready");
                PreconditionStatus::Ready
            }
            Err(e) => {
                warn!(marker = %plan.marker.display(), error = %e, "precondition marker failed");
                println!(
                    "{}",
                    t!("run.marker_failed", path = plan.marker.display(), error = e).red()
                );
                PreconditionStatus::Failed {
                    error: e.to_string(),
                }
            }
        };

        PreconditionOutcome {
            marker: plan.marker.clone(),
            status,
        }
    }

    async fn invoke(&self, index: usize, total: usize, planned: &PlannedInvocation) -> InvocationResult {
        let name = planned.spec.display_name();
        println!(
            "{}",
            t!(
                "run.invocation_start",
                index = index + 1,
                total = total,
                name = name
            )
            .blue()
        );
        info!(index, name = %name, command = %planned.command.command_line(), "invoking tool");

        let start = Instant::now();
        let outcome = self.runner.run(&planned.command).await;
        let duration = start.elapsed();

        if outcome.status.is_success() {
            println!(
                "{}",
                t!(
                    "run.invocation_passed",
                    name = name,
                    duration = format!("{:.2?}", duration)
                )
                .green()
            );
        } else {
            println!(
                "{}",
                t!(
                    "run.invocation_failed",
                    name = name,
                    status = &outcome.status,
                    duration = format!("{:.2?}", duration)
                )
                .red()
            );
        }
        info!(index, name = %name, status = %outcome.status, "tool returned");

        InvocationResult {
            spec: planned.spec.clone(),
            command: planned.command.clone(),
            status: outcome.status,
            duration,
            output: outcome.output,
        }
    }
}
