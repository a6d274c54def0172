//! # E2E Orchestrator Library / E2E 编排器库
//!
//! This library drives an external benchmark tool once per configuration
//! profile, strictly in manifest order, and folds every exit status into a
//! single pass/fail verdict for CI.
//!
//! 此库按清单顺序为每个配置档案调用一次外部基准测试工具，
//! 并将所有退出状态汇总为一个供 CI 使用的通过/失败结论。
//!
//! ## Modules / 模块
//!
//! - `core` - Manifest, planning, data models and the run orchestrator
//! - `infra` - Process spawning, marker files and tracing setup
//! - `reporting` - Console, HTML and JSON reports
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 清单、计划、数据模型和运行编排器
//! - `infra` - 进程派生、标记文件和 tracing 初始化
//! - `reporting` - 控制台、HTML 和 JSON 报告
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::config;
pub use core::models;
pub use core::orchestrator;
pub use core::planner;

/// Picks the output language for this process.
///
/// An explicit choice wins. Otherwise the system locale is matched first as a
/// whole (e.g. "zh-CN"), then by its language part (e.g. "en" from "en-US"),
/// and finally falls back to "en". Returns the locale that was applied.
pub fn init_locale(explicit: Option<&str>) -> String {
    let available_locales = rust_i18n::available_locales!();

    let requested = explicit
        .map(str::to_string)
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());

    let lang = if available_locales.contains(&requested.as_str()) {
        requested.as_str()
    } else {
        requested
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
    lang.to_string()
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_locale_is_matched_whole_then_by_language() {
        assert_eq!(init_locale(Some("zh-CN")), "zh-CN");
        assert_eq!(init_locale(Some("en-US")), "en");
        assert_eq!(init_locale(Some("fr-FR")), "en");
    }
}
