//! # gsc-algo: Instance Generation and Transport LP Solving
//!
//! This crate turns a random (or supplied) supply-chain [`Instance`] into a
//! minimum-cost transport plan:
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Generate | [`generator`] | [`Instance`] |
//! | Pre-check | [`feasibility`] | [`FeasibilityReport`] |
//! | Cost | [`gsc_core::cost`] | [`CostMatrix`] |
//! | Build | [`model`] | [`TransportModel`] |
//! | Solve | [`solver`] | [`Solution`] |
//! | Structure | [`structure`] | [`StructuredResult`] |
//!
//! [`pipeline`] chains all stages.
//!
//! ### Architecture
//!
//! - **[`model::TransportModel`]**: typed LP (variables, rows, objective), engine-agnostic
//! - **[`solver::LpBackend`]**: an LP engine (how to solve it)
//! - **[`solver::SolverRegistry`]**: backends by id, gated by cargo features
//! - **[`export`]**: CPLEX LP text and dense standard form for external engines
//!
//! Backends are never trusted: an optimal answer is re-checked against every
//! row of the model before it becomes a [`Solution`].
//!
//! ## Example
//!
//! ```no_run
//! use gsc_algo::pipeline::{run, PipelineRequest};
//! use gsc_algo::solver::{SolverConfig, SolverRegistry};
//!
//! let backend = SolverRegistry::with_defaults().select()?;
//! let outcome = run(&PipelineRequest::new(5, 50, Some(42)), &backend, &SolverConfig::default())?;
//! println!("{}", outcome.result.summary());
//! # Ok::<(), gsc_core::GscError>(())
//! ```

pub mod export;
pub mod feasibility;
pub mod generator;
pub mod model;
pub mod pipeline;
pub mod solution;
pub mod solver;
pub mod structure;

pub use feasibility::{Feasibility, FeasibilityReport};
pub use generator::{generate, CapacityScheme, GeneratorConfig, ParamRange};
pub use model::{ConstraintKind, FlowVariable, LinearConstraint, Sense, TransportModel};
pub use pipeline::{PipelineOutcome, PipelineRequest};
pub use solution::{Solution, SolutionStatus};
pub use solver::{EngineStatus, LpBackend, RawSolution, SolverConfig, SolverRegistry};
pub use structure::{structure, CentreUtilization, RouteFlow, StructuredResult};

pub use gsc_core::{CostMatrix, CostParams, GscError, GscResult, Instance};
