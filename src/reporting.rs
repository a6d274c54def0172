//! # Reporting Module / 报告模块
//!
//! This module renders a finished run in multiple formats: a colourful
//! console summary, a standalone HTML page and a machine-readable JSON file.
//!
//! 此模块以多种格式呈现一次已完成的运行：彩色控制台摘要、
//! 独立的 HTML 页面以及机器可读的 JSON 文件。

pub mod console;
pub mod html;
pub mod json;

// Re-export common reporting functions
pub use console::{print_failure_details, print_plan, print_summary};
pub use html::generate_html_report;
pub use json::write_json_report;
