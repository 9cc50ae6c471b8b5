//! Registry of LP backends, looked up by id.

use super::LpBackend;
use gsc_core::{GscError, GscResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Preference order for [`SolverRegistry::select`].
const PREFERRED: &[&str] = &["clarabel", "highs", "clarabel-native"];

/// Holds all registered backends.
///
/// Create with `SolverRegistry::new()` for empty or
/// `SolverRegistry::with_defaults()` for the engines compiled into this build.
#[derive(Default)]
pub struct SolverRegistry {
    backends: HashMap<String, Arc<dyn LpBackend>>,
}

impl SolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every backend enabled by cargo features.
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();
        #[cfg(feature = "solver-clarabel")]
        {
            registry.register(Arc::new(super::ClarabelBackend));
            registry.register(Arc::new(super::ClarabelNativeBackend));
        }
        #[cfg(feature = "solver-highs")]
        registry.register(Arc::new(super::HighsBackend));
        registry
    }

    /// Register a backend, replacing any existing one with the same id.
    pub fn register(&mut self, backend: Arc<dyn LpBackend>) {
        self.backends.insert(backend.id().to_string(), backend);
    }

    /// Get an available backend by id.
    pub fn get(&self, id: &str) -> GscResult<Arc<dyn LpBackend>> {
        let backend = self.backends.get(id).ok_or_else(|| {
            GscError::SolverUnavailable(format!(
                "unknown backend '{id}' (registered: {})",
                self.list().join(", ")
            ))
        })?;
        if !backend.is_available() {
            return Err(GscError::SolverUnavailable(format!(
                "backend '{id}' is registered but not available"
            )));
        }
        Ok(Arc::clone(backend))
    }

    /// Pick the preferred available backend.
    pub fn select(&self) -> GscResult<Arc<dyn LpBackend>> {
        PREFERRED
            .iter()
            .filter_map(|id| self.backends.get(*id))
            .chain(self.backends.values())
            .find(|b| b.is_available())
            .cloned()
            .ok_or_else(|| GscError::SolverUnavailable("no LP backend is available".into()))
    }

    /// Registered ids, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.backends.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransportModel;
    use crate::solver::{EngineStatus, RawSolution, SolverConfig};

    struct Mock {
        id: &'static str,
        available: bool,
    }

    impl LpBackend for Mock {
        fn id(&self) -> &str {
            self.id
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn solve(&self, _model: &TransportModel, _config: &SolverConfig) -> GscResult<RawSolution> {
            Ok(RawSolution::terminated(EngineStatus::Error("mock".into())))
        }
    }

    #[test]
    fn test_trait_is_object_safe() {
        fn _accepts(_b: &dyn LpBackend) {}
        fn _assert_send_sync<T: Send + Sync>() {}
        _assert_send_sync::<Arc<dyn LpBackend>>();
    }

    #[test]
    fn test_unknown_backend_is_unavailable() {
        let registry = SolverRegistry::new();
        assert!(registry.is_empty());
        assert!(matches!(registry.get("gurobi"), Err(GscError::SolverUnavailable(_))));
        assert!(matches!(registry.select(), Err(GscError::SolverUnavailable(_))));
    }

    #[test]
    fn test_unavailable_backend_skipped() {
        let mut registry = SolverRegistry::new();
        registry.register(Arc::new(Mock { id: "highs", available: false }));
        registry.register(Arc::new(Mock { id: "custom", available: true }));

        assert!(matches!(registry.get("highs"), Err(GscError::SolverUnavailable(_))));
        assert_eq!(registry.select().unwrap().id(), "custom");
        assert_eq!(registry.list(), vec!["custom", "highs"]);
    }

    #[test]
    fn test_preference_order() {
        let mut registry = SolverRegistry::new();
        registry.register(Arc::new(Mock { id: "zzz", available: true }));
        registry.register(Arc::new(Mock { id: "clarabel", available: true }));
        assert_eq!(registry.select().unwrap().id(), "clarabel");
    }

    #[cfg(feature = "solver-clarabel")]
    #[test]
    fn test_defaults_include_clarabel() {
        let registry = SolverRegistry::with_defaults();
        assert_eq!(registry.get("clarabel").unwrap().id(), "clarabel");
        assert!(registry.get("clarabel-native").is_ok());
    }
}
