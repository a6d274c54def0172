//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the orchestrator:
//! the manifest, run planning, data models and the sequential run loop.
//!
//! 此模块包含编排器的核心功能：
//! 清单、运行计划、数据模型以及顺序运行循环。

pub mod config;
pub mod models;
pub mod orchestrator;
pub mod planner;

// Re-exports
pub use config::{InvocationSpec, Manifest};
pub use models::{InvocationResult, InvocationStatus, RunReport, Verdict};
pub use orchestrator::Orchestrator;
pub use planner::{plan_run, PlanOptions, RunPlan};
