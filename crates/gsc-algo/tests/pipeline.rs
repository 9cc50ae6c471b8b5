//! End-to-end pipeline tests

use gsc_algo::pipeline::{run, run_instance, PipelineRequest};
use gsc_algo::solver::{EngineStatus, LpBackend, RawSolution, SolverConfig};
use gsc_algo::{CapacityScheme, ParamRange, SolutionStatus, TransportModel};
use gsc_core::{
    geodesy, CentreId, CostParams, DemandNode, GeoPoint, GscError, GscResult, Instance, NodeId,
    ProductionCentre,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Records how often it is called and always claims infeasibility.
#[derive(Default)]
struct SpyBackend {
    calls: AtomicUsize,
}

impl LpBackend for SpyBackend {
    fn id(&self) -> &str {
        "spy"
    }

    fn solve(&self, _model: &TransportModel, _config: &SolverConfig) -> GscResult<RawSolution> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RawSolution::terminated(EngineStatus::Infeasible))
    }
}

/// Claims an optimal plan of all zeros at zero cost.
struct LyingBackend;

impl LpBackend for LyingBackend {
    fn id(&self) -> &str {
        "liar"
    }

    fn solve(&self, model: &TransportModel, _config: &SolverConfig) -> GscResult<RawSolution> {
        Ok(RawSolution::optimal(vec![0.0; model.num_variables()], 0.0))
    }
}

struct SlowBackend;

impl LpBackend for SlowBackend {
    fn id(&self) -> &str {
        "slow"
    }

    fn solve(&self, _model: &TransportModel, _config: &SolverConfig) -> GscResult<RawSolution> {
        std::thread::sleep(Duration::from_secs(2));
        Ok(RawSolution::terminated(EngineStatus::Infeasible))
    }
}

struct OfflineBackend;

impl LpBackend for OfflineBackend {
    fn id(&self) -> &str {
        "offline"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn solve(&self, _model: &TransportModel, _config: &SolverConfig) -> GscResult<RawSolution> {
        Err(GscError::SolverUnavailable("offline".into()))
    }
}

fn point(lat: f64, lon: f64) -> GeoPoint {
    GeoPoint::new(lat, lon).unwrap()
}

/// Request whose capacities are far below any possible demand.
fn short_request() -> PipelineRequest {
    let mut request = PipelineRequest::new(2, 10, Some(3));
    request.generator.capacity = CapacityScheme::Uniform(ParamRange::new(0.1, 0.2));
    request.generator.demand = ParamRange::new(5.0, 10.0);
    request
}

#[test]
fn test_capacity_shortfall_skips_backend() {
    let spy = Arc::new(SpyBackend::default());
    let backend: Arc<dyn LpBackend> = spy.clone();

    let outcome = run(&short_request(), &backend, &SolverConfig::default()).unwrap();

    assert_eq!(spy.calls.load(Ordering::SeqCst), 0);
    assert_eq!(outcome.solution.status, SolutionStatus::Infeasible);
    assert!(outcome.model.is_none());
    assert!(!outcome.feasibility.is_feasible());
    assert!(outcome.result.routes.is_empty());
}

#[test]
fn test_feasible_instance_reaches_backend() {
    let spy = Arc::new(SpyBackend::default());
    let backend: Arc<dyn LpBackend> = spy.clone();

    let mut request = PipelineRequest::new(3, 5, Some(8));
    request.generator.capacity = CapacityScheme::DemandScaled { flexibility: 1.0 };
    let outcome = run(&request, &backend, &SolverConfig::default()).unwrap();

    assert_eq!(spy.calls.load(Ordering::SeqCst), 1);
    assert_eq!(outcome.solution.status, SolutionStatus::Infeasible);
    assert_eq!(outcome.solution.backend, "spy");
    assert_eq!(outcome.model.unwrap().num_variables(), 15);
}

#[test]
fn test_lying_backend_caught() {
    let backend: Arc<dyn LpBackend> = Arc::new(LyingBackend);
    let mut request = PipelineRequest::new(2, 4, Some(21));
    request.generator.demand = ParamRange::new(1.0, 10.0);

    let outcome = run(&request, &backend, &SolverConfig::default()).unwrap();
    assert_eq!(outcome.solution.status, SolutionStatus::SolverError);
    assert!(outcome.solution.objective_value.is_none());
    assert!(outcome.result.routes.is_empty());
}

#[test]
fn test_timeout_is_solver_error() {
    let backend: Arc<dyn LpBackend> = Arc::new(SlowBackend);
    let config = SolverConfig {
        timeout: Some(Duration::from_millis(50)),
        ..SolverConfig::default()
    };
    let mut request = PipelineRequest::new(2, 3, Some(1));
    request.generator.capacity = CapacityScheme::DemandScaled { flexibility: 0.5 };

    let outcome = run(&request, &backend, &config).unwrap();
    assert_eq!(outcome.solution.status, SolutionStatus::SolverError);
    assert!(outcome.solution.message.unwrap().contains("timed out"));
    assert!(outcome.solution.solve_time < Duration::from_secs(2));
}

#[test]
fn test_unavailable_backend_is_an_error() {
    let backend: Arc<dyn LpBackend> = Arc::new(OfflineBackend);
    let mut request = PipelineRequest::new(2, 3, Some(1));
    request.generator.capacity = CapacityScheme::DemandScaled { flexibility: 0.5 };

    let result = run(&request, &backend, &SolverConfig::default());
    assert!(matches!(result, Err(GscError::SolverUnavailable(_))));
}

#[test]
fn test_invalid_request_is_an_error() {
    let backend: Arc<dyn LpBackend> = Arc::new(SpyBackend::default());
    let request = PipelineRequest::new(0, 3, Some(1));
    let result = run(&request, &backend, &SolverConfig::default());
    assert!(matches!(result, Err(GscError::InvalidParameter(_))));
}

#[cfg(feature = "solver-clarabel")]
mod clarabel {
    use super::*;
    use gsc_algo::solver::SolverRegistry;

    fn backends() -> Vec<Arc<dyn LpBackend>> {
        let registry = SolverRegistry::with_defaults();
        vec![
            registry.get("clarabel").unwrap(),
            registry.get("clarabel-native").unwrap(),
        ]
    }

    #[test]
    fn test_single_route_quarter_circumference() {
        let instance = Instance::new(
            vec![ProductionCentre::new(CentreId::new(0), point(0.0, 0.0), 1.0, 100.0).unwrap()],
            vec![DemandNode::new(NodeId::new(0), point(0.0, 90.0), 50.0).unwrap()],
        )
        .unwrap();
        let params = CostParams { distance_rate: 1.0 };
        let coefficient = 1.0 + std::f64::consts::FRAC_PI_2 * geodesy::EARTH_RADIUS_KM;

        for backend in backends() {
            let outcome =
                run_instance(instance.clone(), &params, &backend, &SolverConfig::default()).unwrap();

            assert_eq!(outcome.solution.status, SolutionStatus::Optimal, "{}", backend.id());
            let cost = outcome.costs.cost(CentreId::new(0), NodeId::new(0));
            assert!((cost - coefficient).abs() < 1e-6);

            let flow = outcome.solution.flow(CentreId::new(0), NodeId::new(0));
            assert!((flow - 50.0).abs() < 1e-4, "flow {flow}");

            let objective = outcome.solution.objective_value.unwrap();
            let expected = 50.0 * coefficient;
            assert!((objective - expected).abs() / expected < 1e-6, "objective {objective}");
            assert_eq!(outcome.result.routes.len(), 1);
        }
    }

    #[test]
    fn test_remainder_flows_through_farther_centre() {
        // Near centre is 10° from the node and can cover 30 of 50 units.
        let near = ProductionCentre::new(CentreId::new(0), point(0.0, 0.0), 1.0, 30.0).unwrap();
        let far = ProductionCentre::new(CentreId::new(1), point(0.0, 60.0), 1.0, 100.0).unwrap();
        let node = DemandNode::new(NodeId::new(0), point(0.0, 10.0), 50.0).unwrap();
        let instance = Instance::new(vec![near, far], vec![node]).unwrap();
        let params = CostParams::default();

        for backend in backends() {
            let outcome =
                run_instance(instance.clone(), &params, &backend, &SolverConfig::default()).unwrap();
            assert_eq!(outcome.solution.status, SolutionStatus::Optimal);

            let from_near = outcome.solution.flow(CentreId::new(0), NodeId::new(0));
            let from_far = outcome.solution.flow(CentreId::new(1), NodeId::new(0));
            assert!((from_near - 30.0).abs() < 1e-4, "near {from_near}");
            assert!((from_far - 20.0).abs() < 1e-4, "far {from_far}");

            let c_near = outcome.costs.cost(CentreId::new(0), NodeId::new(0));
            let c_far = outcome.costs.cost(CentreId::new(1), NodeId::new(0));
            assert!(c_near < c_far);
            let expected = 30.0 * c_near + 20.0 * c_far;
            let objective = outcome.result.total_cost;
            assert!((objective - expected).abs() / expected < 1e-5, "objective {objective}");

            assert!((outcome.result.utilization[0].ratio - 1.0).abs() < 1e-5);
            assert!((outcome.result.utilization[1].ratio - 0.2).abs() < 1e-5);
        }
    }

    #[test]
    fn test_timeout_does_not_affect_fast_solves() {
        let backend = SolverRegistry::with_defaults().get("clarabel").unwrap();
        let config = SolverConfig {
            timeout: Some(Duration::from_secs(30)),
            ..SolverConfig::default()
        };
        let mut request = PipelineRequest::new(3, 12, Some(77));
        request.generator.capacity = CapacityScheme::DemandScaled { flexibility: 2.0 };
        let outcome = run(&request, &backend, &config).unwrap();
        assert_eq!(outcome.solution.status, SolutionStatus::Optimal);
    }
}
