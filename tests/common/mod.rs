// Shared test helpers for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use e2e_orchestrator::config::{InvocationSpec, Manifest};
use e2e_orchestrator::infra::command::ProcessRunner;
use e2e_orchestrator::infra::fs::MarkerWriter;
use e2e_orchestrator::models::{InvocationStatus, RunOutcome, ToolCommand};
use e2e_orchestrator::planner::{plan_run, PlanOptions, RunPlan};
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// One observable side effect of a run, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Marker(PathBuf),
    Invoke(ToolCommand),
}

/// Fake process runner and marker writer sharing one event log.
///
/// Statuses are handed out in call order; once the script runs out every
/// further invocation succeeds.
#[derive(Clone, Default)]
pub struct RecordingHost {
    events: Arc<Mutex<Vec<Event>>>,
    statuses: Arc<Mutex<VecDeque<InvocationStatus>>>,
    marker_error: Option<io::ErrorKind>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_codes(codes: &[i32]) -> Self {
        Self::with_statuses(codes.iter().map(|c| InvocationStatus::exited(*c)).collect())
    }

    pub fn with_statuses(statuses: Vec<InvocationStatus>) -> Self {
        Self {
            statuses: Arc::new(Mutex::new(statuses.into())),
            ..Self::default()
        }
    }

    pub fn failing_marker(mut self, kind: io::ErrorKind) -> Self {
        self.marker_error = Some(kind);
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn invocations(&self) -> Vec<ToolCommand> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Invoke(cmd) => Some(cmd),
                Event::Marker(_) => None,
            })
            .collect()
    }

    pub fn marker_touches(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Marker(_)))
            .count()
    }
}

#[async_trait]
impl ProcessRunner for RecordingHost {
    async fn run(&self, command: &ToolCommand) -> RunOutcome {
        self.events.lock().unwrap().push(Event::Invoke(command.clone()));
        let status = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(InvocationStatus::success);
        RunOutcome::new(status)
    }
}

impl MarkerWriter for RecordingHost {
    fn touch(&self, path: &Path) -> io::Result<()> {
        self.events.lock().unwrap().push(Event::Marker(path.to_path_buf()));
        match self.marker_error {
            Some(kind) => Err(io::Error::new(kind, "marker refused")),
            None => Ok(()),
        }
    }
}

/// Builds a manifest from `(config_file, extra_args)` pairs.
pub fn manifest_of(entries: &[(&str, &[&str])]) -> Manifest {
    Manifest {
        invocations: entries
            .iter()
            .map(|(file, args)| InvocationSpec::new(*file).with_args(args.iter().copied()))
            .collect(),
        ..Manifest::default()
    }
}

/// Plans `entries` against `root` with default options.
pub fn plan_for(root: &str, entries: &[(&str, &[&str])]) -> RunPlan {
    plan_run(&manifest_of(entries), Path::new(root), &PlanOptions::default())
        .expect("plan should resolve")
}

/// Writes an executable shell script standing in for the benchmark tool.
///
/// Each call appends its arguments as one line to `calls.log` in the working
/// directory, then exits with the code found in `codes/<profile file name>`
/// (0 when that file is missing).
#[cfg(unix)]
pub fn write_fake_tool(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = r#"#!/bin/sh
echo "$@" >> calls.log
cfg="${1#--configFile=}"
name=$(basename "$cfg")
if [ -f "codes/$name" ]; then
  exit "$(cat "codes/$name")"
fi
exit 0
"#;
    let path = dir.join("fake-tool.sh");
    fs::write(&path, script).expect("Failed to write fake tool");
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    fs::create_dir_all(dir.join("codes")).unwrap();
    path
}

/// Makes the fake tool exit with `code` for profile `file_name`.
pub fn set_exit_code(dir: &Path, file_name: &str, code: i32) {
    fs::create_dir_all(dir.join("codes")).unwrap();
    fs::write(dir.join("codes").join(file_name), code.to_string()).unwrap();
}

/// Lines the fake tool logged, one per call.
pub fn read_calls(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("calls.log"))
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

/// A scratch root with a fake tool and a manifest running it over `profiles`.
#[cfg(unix)]
pub fn setup_fake_project(profiles: &[(&str, &[&str])]) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temporary directory");
    write_fake_tool(temp_dir.path());

    let mut content = String::from("language = \"en\"\ntool = \"./fake-tool.sh\"\nmarker = \".accept-e2e\"\n");
    for (file, args) in profiles {
        let args = args
            .iter()
            .map(|a| format!("\"{a}\""))
            .collect::<Vec<_>>()
            .join(", ");
        content.push_str(&format!(
            "\n[[invocations]]\nconfig_file = \"profiles/{file}\"\nextra_args = [{args}]\n"
        ));
    }
    let manifest_path = temp_dir.path().join("E2eMatrix.toml");
    fs::write(&manifest_path, content).expect("Failed to write manifest");
    (temp_dir, manifest_path)
}
