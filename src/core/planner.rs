// src/core/planner.rs
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use thiserror::Error;

use crate::core::config::{InvocationSpec, Manifest};
use crate::core::models::ToolCommand;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("failed to expand `{value}`: {message}")]
    Expansion { value: String, message: String },
    #[error("no invocation named `{0}` in the manifest")]
    UnknownInvocation(String),
}

/// Knobs the CLI passes through to planning.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Replaces the manifest's `tool` when set.
    pub tool_override: Option<String>,
    /// Keep only these invocations. Empty keeps all.
    pub only: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PlannedInvocation {
    pub spec: InvocationSpec,
    pub command: ToolCommand,
}

#[derive(Debug, Clone)]
pub struct RunPlan {
    /// Working directory captured when the run was set up.
    pub root: PathBuf,
    pub marker: PathBuf,
    pub tool: PathBuf,
    /// In manifest order.
    pub invocations: Vec<PlannedInvocation>,
}

impl RunPlan {
    pub fn len(&self) -> usize {
        self.invocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invocations.is_empty()
    }
}

/// Resolves a manifest against `root` into concrete tool commands.
///
/// Every profile path handed to the tool is absolute: relative entries are
/// joined onto `root`, absolute ones are kept. Nothing is canonicalised, so a
/// profile that does not exist still produces a command and the tool reports
/// the problem through its exit status.
pub fn plan_run(manifest: &Manifest, root: &Path, options: &PlanOptions) -> Result<RunPlan, PlanError> {
    let tool_raw = options.tool_override.as_deref().unwrap_or(&manifest.tool);
    let tool = resolve_tool(&expand(tool_raw)?, root);
    let marker = root.join(expand(&manifest.marker)?);

    for name in &options.only {
        if !manifest.invocations.iter().any(|spec| spec.display_name() == *name) {
            return Err(PlanError::UnknownInvocation(name.clone()));
        }
    }

    let invocations = manifest
        .invocations
        .iter()
        .filter(|spec| options.only.is_empty() || options.only.contains(&spec.display_name()))
        .map(|spec| {
            let config_file = root.join(expand(&spec.config_file.to_string_lossy())?);
            Ok(PlannedInvocation {
                spec: spec.clone(),
                command: ToolCommand {
                    program: tool.clone(),
                    config_file,
                    extra_args: spec.extra_args.clone(),
                    working_dir: root.to_path_buf(),
                },
            })
        })
        .collect::<Result<Vec<_>, PlanError>>()?;

    Ok(RunPlan {
        root: root.to_path_buf(),
        marker,
        tool,
        invocations,
    })
}

fn expand(value: &str) -> Result<String, PlanError> {
    shellexpand::full(value)
        .map(|expanded| expanded.into_owned())
        .map_err(|e| PlanError::Expansion {
            value: value.to_string(),
            message: e.to_string(),
        })
}

/// A tool given as a path is anchored at the root; a bare name is left for
/// `PATH` lookup.
fn resolve_tool(tool: &str, root: &Path) -> PathBuf {
    if tool.contains(MAIN_SEPARATOR) || tool.contains('/') {
        root.join(tool)
    } else {
        PathBuf::from(tool)
    }
}
