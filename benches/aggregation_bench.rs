use async_trait::async_trait;
use criterion::{criterion_group, criterion_main, Criterion};
use e2e_orchestrator::config::{InvocationSpec, Manifest};
use e2e_orchestrator::infra::command::ProcessRunner;
use e2e_orchestrator::infra::fs::MarkerWriter;
use e2e_orchestrator::models::{InvocationStatus, RunOutcome, ToolCommand};
use e2e_orchestrator::orchestrator::Orchestrator;
use e2e_orchestrator::planner::{plan_run, PlanOptions};
use std::io;
use std::path::Path;
use tokio::runtime::Runtime;

struct InstantRunner;

#[async_trait]
impl ProcessRunner for InstantRunner {
    async fn run(&self, command: &ToolCommand) -> RunOutcome {
        let code = i32::from(command.extra_args.is_empty());
        RunOutcome::new(InvocationStatus::exited(code))
    }
}

struct NoopMarker;

impl MarkerWriter for NoopMarker {
    fn touch(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

fn large_manifest(size: usize) -> Manifest {
    Manifest {
        invocations: (0..size)
            .map(|i| {
                let spec = InvocationSpec::new(format!("profiles/p{i}.config")).with_name(format!("p{i}"));
                if i % 2 == 0 { spec.with_args(["--redeploy"]) } else { spec }
            })
            .collect(),
        ..Manifest::default()
    }
}

fn bench_plan(c: &mut Criterion) {
    let manifest = large_manifest(1_000);
    let root = Path::new("/work");
    let options = PlanOptions::default();

    c.bench_function("plan_run_1000", |b| {
        b.iter(|| plan_run(&manifest, root, &options).unwrap());
    });
}

fn bench_orchestrate(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let plan = plan_run(&large_manifest(8), Path::new("/work"), &PlanOptions::default()).unwrap();
    let orchestrator = Orchestrator::new(InstantRunner, NoopMarker);

    c.bench_function("orchestrate_and_aggregate", |b| {
        b.to_async(&rt).iter(|| async {
            let report = orchestrator.run(&plan).await;
            let _ = report.verdict();
        });
    });
}

criterion_group!(benches, bench_plan, bench_orchestrate);
criterion_main!(benches);
