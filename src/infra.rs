//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for the orchestrator,
//! including process execution, marker files, tracing and i18n support.
//!
//! 此模块为编排器提供基础设施服务，
//! 包括进程执行、标记文件、tracing 和国际化支持。

pub mod command;
pub mod fs;
pub mod telemetry;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
