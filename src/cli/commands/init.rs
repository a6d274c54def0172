//! # Manifest Initialization Module / 清单初始化模块
//!
//! This module writes one of the canonical manifest templates so a project
//! can start from the standard profile set instead of a hand-written file.
//!
//! 此模块写出标准清单模板之一，使项目可以直接从标准配置档案集开始，
//! 而无需手写清单文件。
//!
//! ## Templates / 模板
//!
//! - **Redeploy** (default): every profile, each run with `--redeploy`
//! - **Dev** (`--dev`): the `-dev` profile variants, no extra flags
//!
//! - **Redeploy**（默认）：所有配置档案，每次运行都带 `--redeploy`
//! - **Dev**（`--dev`）：`-dev` 配置档案变体，不带额外参数

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::fs;
use std::path::Path;

use crate::cli::InitArgs;
use crate::core::config::Manifest;
use crate::infra::t;

/// Writes the selected template to `args.output`.
///
/// An existing file is only replaced after an interactive confirmation;
/// in non-interactive mode it is left alone and an error is returned.
///
/// 将所选模板写入 `args.output`。已存在的文件仅在交互确认后才会被替换；
/// 非交互模式下保持原样并返回错误。
pub fn execute(args: InitArgs, lang: Option<&str>) -> Result<()> {
    let locale = crate::init_locale(lang);
    let path = args.output.as_path();

    if path.exists() {
        if args.non_interactive {
            anyhow::bail!(
                "{}",
                t!("init.exists_refused", locale = locale, path = path.display())
            );
        }
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("init.overwrite_prompt", locale = locale, path = path.display()))
            .default(false)
            .interact()
            .with_context(|| t!("init.confirmation_failed", locale = locale).to_string())?;
        if !confirmed {
            println!("{}", t!("init.aborted", locale = locale));
            return Ok(());
        }
    }

    let manifest = if args.dev { Manifest::dev() } else { Manifest::redeploy() };
    write_manifest(path, &manifest, &locale)
}

fn write_manifest(path: &Path, manifest: &Manifest, locale: &str) -> Result<()> {
    let body = manifest
        .to_toml()
        .with_context(|| t!("init.serialize_failed", locale = locale).to_string())?;
    let content = format!("{}\n\n{}", t!("init.file_header", locale = locale), body);

    fs::write(path, content)
        .with_context(|| t!("init.write_failed", locale = locale, path = path.display()).to_string())?;

    println!(
        "{}",
        t!(
            "init.written",
            locale = locale,
            path = path.display(),
            count = manifest.invocations.len()
        )
        .green()
    );
    Ok(())
}
