use gsc_algo::pipeline::PipelineRequest;
use gsc_algo::solver::SolverConfig;
use gsc_algo::{CapacityScheme, ParamRange};
use gsc_batch::{load_batch_manifest, run_batch, seed_range, BatchConfig};

fn config(request: PipelineRequest, seeds: Vec<u64>) -> BatchConfig {
    BatchConfig {
        request,
        seeds,
        backend: "clarabel".into(),
        solver: SolverConfig::default(),
        output_root: None,
        write_results: false,
        threads: 2,
    }
}

#[test]
fn batch_solves_every_seed_and_writes_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let mut request = PipelineRequest::new(3, 10, None);
    request.generator.capacity = CapacityScheme::DemandScaled { flexibility: 1.0 };

    let mut cfg = config(request, seed_range(100, 4));
    cfg.output_root = Some(dir.path().to_path_buf());
    cfg.write_results = true;
    let summary = run_batch(&cfg).unwrap();

    assert_eq!(summary.optimal, 4);
    assert_eq!(summary.failed, 0);
    let seeds: Vec<u64> = summary.runs.iter().map(|r| r.seed).collect();
    assert_eq!(seeds, vec![100, 101, 102, 103]);

    let manifest_path = summary.manifest_path.unwrap();
    assert!(manifest_path.ends_with("batch_manifest.json"));
    let manifest = load_batch_manifest(&manifest_path).unwrap();
    assert_eq!(manifest.num_runs, 4);
    assert_eq!(manifest.backend, "clarabel");
    for run in &manifest.runs {
        let output = run.output.as_ref().unwrap();
        assert!(std::path::Path::new(output).exists());
    }
}

#[test]
fn batch_is_independent_of_thread_count() {
    let request = PipelineRequest::new(2, 8, None);
    let mut single = config(request.clone(), seed_range(7, 5));
    single.threads = 1;
    let mut auto = config(request, seed_range(7, 5));
    auto.threads = 0;

    let a = run_batch(&single).unwrap();
    let b = run_batch(&auto).unwrap();
    for (x, y) in a.runs.iter().zip(&b.runs) {
        assert_eq!(x.seed, y.seed);
        assert_eq!(x.status, y.status);
        let (ox, oy) = (x.objective_value.unwrap(), y.objective_value.unwrap());
        assert!((ox - oy).abs() <= 1e-9 * ox.abs().max(1.0));
    }
    assert!(a.manifest_path.is_none());
}

#[test]
fn shortfall_runs_are_counted_as_infeasible() {
    let mut request = PipelineRequest::new(1, 20, None);
    request.generator.capacity = CapacityScheme::Uniform(ParamRange::new(1.0, 2.0));
    request.generator.demand = ParamRange::new(5.0, 10.0);

    let summary = run_batch(&config(request, seed_range(0, 3))).unwrap();
    assert_eq!(summary.infeasible, 3);
    assert!(summary.runs.iter().all(|r| r.objective_value.is_none()));
}

#[test]
fn invalid_request_is_recorded_per_run() {
    let mut request = PipelineRequest::new(2, 2, None);
    request.generator.demand = ParamRange::new(3.0, 1.0);

    let summary = run_batch(&config(request, seed_range(0, 2))).unwrap();
    assert_eq!(summary.failed, 2);
    assert!(summary.runs.iter().all(|r| r.status == "error"));
    assert!(summary.runs[0].error.as_ref().unwrap().contains("inverted"));
}

#[test]
fn unknown_backend_fails_the_batch() {
    let mut cfg = config(PipelineRequest::new(2, 2, None), seed_range(0, 1));
    cfg.backend = "no-such-engine".into();
    let err = run_batch(&cfg).err().unwrap();
    assert!(format!("{err:#}").contains("no-such-engine"));
}
