//! # Planner Unit Tests / Planner 单元测试
//!
//! Tests for resolving a manifest into concrete tool commands.
//!
//! 测试将清单解析为具体的工具命令。

mod common;

use common::manifest_of;
use e2e_orchestrator::config::{InvocationSpec, Manifest};
use e2e_orchestrator::planner::{plan_run, PlanError, PlanOptions};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[cfg(test)]
mod path_resolution_tests {
    use super::*;

    #[test]
    fn test_relative_profile_is_joined_onto_root() {
        let manifest = manifest_of(&[("cfg/a.config", &[])]);
        let plan = plan_run(&manifest, Path::new("/work"), &PlanOptions::default()).unwrap();

        assert_eq!(plan.invocations[0].command.config_file, PathBuf::from("/work/cfg/a.config"));
        assert_eq!(
            plan.invocations[0].command.args(),
            vec![OsString::from("--configFile=/work/cfg/a.config")]
        );
    }

    #[test]
    fn test_absolute_profile_is_kept() {
        let manifest = manifest_of(&[("/etc/bench/a.config", &[])]);
        let plan = plan_run(&manifest, Path::new("/work"), &PlanOptions::default()).unwrap();

        assert_eq!(plan.invocations[0].command.config_file, PathBuf::from("/etc/bench/a.config"));
    }

    #[test]
    fn test_marker_and_tool_resolve_against_root() {
        let manifest = Manifest::default();
        let plan = plan_run(&manifest, Path::new("/work"), &PlanOptions::default()).unwrap();

        assert_eq!(plan.marker, PathBuf::from("/work/.accept-weathervane"));
        assert_eq!(plan.tool, PathBuf::from("/work/./runWeathervane.pl"));
        assert!(plan.is_empty());
    }

    #[test]
    fn test_bare_tool_name_is_left_for_path_lookup() {
        let manifest = Manifest {
            tool: "weathervane".to_string(),
            ..manifest_of(&[("a.config", &[])])
        };
        let plan = plan_run(&manifest, Path::new("/work"), &PlanOptions::default()).unwrap();

        assert_eq!(plan.invocations[0].command.program, PathBuf::from("weathervane"));
    }

    #[test]
    fn test_tool_override_replaces_manifest_tool() {
        let manifest = manifest_of(&[("a.config", &[])]);
        let options = PlanOptions {
            tool_override: Some("/usr/local/bin/bench".to_string()),
            ..PlanOptions::default()
        };
        let plan = plan_run(&manifest, Path::new("/work"), &options).unwrap();

        assert_eq!(plan.tool, PathBuf::from("/usr/local/bin/bench"));
        assert_eq!(plan.invocations[0].command.program, PathBuf::from("/usr/local/bin/bench"));
    }

    #[test]
    fn test_environment_variables_are_expanded() {
        // SAFETY: the variable name is unique to this test.
        unsafe { std::env::set_var("E2E_PLANNER_TEST_PROFILE_DIR", "profiles") };
        let manifest = manifest_of(&[("$E2E_PLANNER_TEST_PROFILE_DIR/a.config", &[])]);
        let plan = plan_run(&manifest, Path::new("/work"), &PlanOptions::default()).unwrap();

        assert_eq!(
            plan.invocations[0].command.config_file,
            PathBuf::from("/work/profiles/a.config")
        );
    }

    #[test]
    fn test_undefined_variable_is_an_error() {
        let manifest = manifest_of(&[("$E2E_PLANNER_TEST_SURELY_UNSET_VAR/a.config", &[])]);
        let err = plan_run(&manifest, Path::new("/work"), &PlanOptions::default()).unwrap_err();

        assert!(matches!(err, PlanError::Expansion { .. }));
    }
}

#[cfg(test)]
mod selection_tests {
    use super::*;

    fn named_manifest() -> Manifest {
        Manifest {
            invocations: ["micro", "xsmall", "small2"]
                .iter()
                .map(|n| InvocationSpec::new(format!("cfg/{n}.config")).with_name(*n))
                .collect(),
            ..Manifest::default()
        }
    }

    #[test]
    fn test_only_keeps_manifest_order() {
        let options = PlanOptions {
            only: vec!["small2".to_string(), "micro".to_string()],
            ..PlanOptions::default()
        };
        let plan = plan_run(&named_manifest(), Path::new("/work"), &options).unwrap();

        let names: Vec<String> = plan.invocations.iter().map(|p| p.spec.display_name()).collect();
        assert_eq!(names, vec!["micro", "small2"]);
    }

    #[test]
    fn test_only_with_unknown_name_is_an_error() {
        let options = PlanOptions {
            only: vec!["large".to_string()],
            ..PlanOptions::default()
        };
        let err = plan_run(&named_manifest(), Path::new("/work"), &options).unwrap_err();

        assert!(matches!(err, PlanError::UnknownInvocation(ref n) if n == "large"));
    }

    #[test]
    fn test_extra_args_follow_separator() {
        let manifest = manifest_of(&[("a.config", &["--redeploy"])]);
        let plan = plan_run(&manifest, Path::new("/work"), &PlanOptions::default()).unwrap();

        let args = plan.invocations[0].command.args();
        assert_eq!(args[1], OsString::from("--"));
        assert_eq!(args[2], OsString::from("--redeploy"));

        let line = plan.invocations[0].command.command_line();
        assert!(line.starts_with("/work/./runWeathervane.pl "));
        assert!(line.contains("/work/a.config"));
        assert!(line.ends_with(" -- --redeploy"));
    }
}
