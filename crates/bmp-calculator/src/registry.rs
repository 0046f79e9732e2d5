use crate::Calculator;
use crate::built_in;
use crate::load_rates::LoadRateStore;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps primary practice codes to calculators.
///
/// Adding a practice means registering one more calculator; existing entries
/// are untouched.
#[derive(Default, Clone)]
pub struct CalculatorRegistry {
    calculators: HashMap<&'static str, Arc<dyn Calculator>>,
}

impl CalculatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in calculator. Segment-weighted
    /// calculators share `store`; `parallel_lookups` lets them fan segment
    /// reads out across the rayon pool.
    pub fn with_builtins(store: Arc<dyn LoadRateStore>, parallel_lookups: bool) -> Self {
        let mut registry = Self::new();
        for calculator in built_in::all(store, parallel_lookups) {
            registry.register(calculator);
        }
        registry
    }

    /// Register a calculator under its own code, replacing any previous entry
    /// with the same code.
    pub fn register(&mut self, calculator: Arc<dyn Calculator>) {
        self.calculators.insert(calculator.code(), calculator);
    }

    /// Look up a calculator by primary code.
    pub fn get(&self, code: &str) -> Option<&dyn Calculator> {
        self.calculators.get(code).map(|c| c.as_ref())
    }

    /// Whether a primary code is registered.
    pub fn contains(&self, code: &str) -> bool {
        self.calculators.contains_key(code)
    }

    /// Registered codes, sorted.
    pub fn codes(&self) -> Vec<&'static str> {
        let mut codes: Vec<&'static str> = self.calculators.keys().copied().collect();
        codes.sort_unstable();
        codes
    }

    /// Number of registered calculators.
    pub fn len(&self) -> usize {
        self.calculators.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.calculators.is_empty()
    }
}

impl std::fmt::Debug for CalculatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalculatorRegistry").field("codes", &self.codes()).finish()
    }
}
