//! # Manifest Configuration Module / 清单配置模块
//!
//! The manifest is the ordered list of benchmark invocations plus the few
//! settings needed to drive the external tool. It is loaded from a TOML file,
//! so the orchestrator never hardcodes which profiles it runs.
//!
//! 清单是基准测试调用的有序列表，以及驱动外部工具所需的少量设置。
//! 它从 TOML 文件加载，因此编排器从不硬编码要运行的配置档案。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default manifest file name looked up by `run` and written by `init`.
pub const DEFAULT_MANIFEST_FILE: &str = "E2eMatrix.toml";

/// Default tool, relative to the root directory.
pub const DEFAULT_TOOL: &str = "./runWeathervane.pl";

/// Default name of the usage-acceptance marker the tool checks for.
pub const DEFAULT_MARKER: &str = ".accept-weathervane";

/// Directory holding the canonical profile files, relative to the root.
pub const PROFILE_DIR: &str = "testing/e2e/weathervaneConfigFiles";

/// Canonical profiles, smallest first.
const CANONICAL_PROFILES: [&str; 4] = ["micro", "xsmall", "small2", "small3"];

/// Errors raised while loading or validating a manifest.
/// 加载或校验清单时产生的错误。
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid manifest: {0}")]
    Invalid(String),
}

/// A single benchmark run declared in the manifest.
/// 清单中声明的单次基准测试运行。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InvocationSpec {
    /// Optional display name. Falls back to the profile's file name.
    /// 可选的显示名称。缺省时使用配置档案的文件名。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Path to the configuration profile, relative to the root directory
    /// unless already absolute.
    /// 配置档案的路径；除非已是绝对路径，否则相对于根目录。
    pub config_file: PathBuf,
    /// Flags forwarded to the tool after a `--` separator.
    /// 在 `--` 分隔符之后转发给工具的参数。
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl InvocationSpec {
    pub fn new(config_file: impl Into<PathBuf>) -> Self {
        Self {
            name: None,
            config_file: config_file.into(),
            extra_args: vec![],
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// The name used in logs and reports.
    /// 用于日志和报告的名称。
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        self.config_file
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.config_file.display().to_string())
    }
}

/// The whole manifest, as loaded from TOML.
/// 从 TOML 加载的完整清单。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Manifest {
    /// The language for output messages (e.g. "en", "zh-CN").
    /// 输出消息的语言（例如 "en", "zh-CN"）。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// The external tool to invoke.
    /// 要调用的外部工具。
    #[serde(default = "default_tool")]
    pub tool: String,

    /// The marker file touched before the first invocation.
    /// 在第一次调用之前创建的标记文件。
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Invocations, run in declaration order.
    /// 按声明顺序运行的调用。
    #[serde(default)]
    pub invocations: Vec<InvocationSpec>,
}

fn default_tool() -> String {
    DEFAULT_TOOL.to_string()
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            language: None,
            tool: default_tool(),
            marker: default_marker(),
            invocations: vec![],
        }
    }
}

impl Manifest {
    /// Reads, parses and validates a manifest file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: Manifest = toml::from_str(&content).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Checks the fields the orchestrator relies on. Profile contents are
    /// never inspected.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.tool.trim().is_empty() {
            return Err(ManifestError::Invalid("`tool` must not be empty".into()));
        }
        if self.marker.trim().is_empty() {
            return Err(ManifestError::Invalid("`marker` must not be empty".into()));
        }
        if let Some(pos) = self
            .invocations
            .iter()
            .position(|spec| spec.config_file.as_os_str().is_empty())
        {
            return Err(ManifestError::Invalid(format!(
                "invocation #{} has an empty `config_file`",
                pos + 1
            )));
        }
        Ok(())
    }

    /// The full template: every canonical profile, each redeploying the
    /// services before its run.
    /// 完整模板：每个标准配置档案在运行前都会重新部署服务。
    pub fn redeploy() -> Self {
        Self::from_profiles("", &["--redeploy"])
    }

    /// The developer template: the `-dev` profile variants without a redeploy.
    /// 开发者模板：使用 `-dev` 配置档案变体，不重新部署。
    pub fn dev() -> Self {
        Self::from_profiles("-dev", &[])
    }

    fn from_profiles(suffix: &str, extra_args: &[&str]) -> Self {
        let invocations = CANONICAL_PROFILES
            .iter()
            .map(|profile| {
                let file = format!("weathervane.config.k8s.{profile}{suffix}");
                InvocationSpec::new(Path::new(PROFILE_DIR).join(file))
                    .with_name(format!("{profile}{suffix}"))
                    .with_args(extra_args.iter().copied())
            })
            .collect();

        Self {
            language: Some("en".to_string()),
            invocations,
            ..Self::default()
        }
    }

    /// Serialises the manifest back to TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
