use crate::aggregation::{AggregateTotals, MetricSet, aggregate};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::summary::{PracticeSummary, summarize};
use bmp_calculator::{
    Calculator, CalculatorRegistry, InMemoryLoadRateStore, LoadRateStore, LoadSource,
};
use bmp_types::{AttrValue, PracticeCode, PracticeRecord, ReductionResult};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Front door of the engine: validates records, routes them to their
/// calculator and rolls period histories up.
///
/// The engine holds no mutable state; one instance can serve any number of
/// concurrent callers.
#[derive(Clone)]
pub struct BmpEngine {
    registry: CalculatorRegistry,
    store: Arc<dyn LoadRateStore>,
}

impl BmpEngine {
    /// Engine with every built-in calculator over `store`.
    #[instrument(skip(store))]
    pub fn new(store: Arc<dyn LoadRateStore>, parallel_lookups: bool) -> Self {
        let registry = CalculatorRegistry::with_builtins(Arc::clone(&store), parallel_lookups);
        info!(calculators = registry.len(), "Creating new BMP engine");
        Self { registry, store }
    }

    /// Engine over an empty load-rate store.
    pub fn without_load_rates() -> Self {
        Self::new(Arc::new(InMemoryLoadRateStore::new()), false)
    }

    /// Engine over a caller-built registry, for hosts that register their own
    /// calculators.
    pub fn with_registry(registry: CalculatorRegistry, store: Arc<dyn LoadRateStore>) -> Self {
        Self { registry, store }
    }

    /// Build from configuration, reading the load-rate table when one is
    /// configured.
    #[instrument(skip(config))]
    pub fn from_config(config: &EngineConfig) -> EngineResult<Self> {
        let store = match &config.load_rates.path {
            Some(path) => InMemoryLoadRateStore::from_path(path)?,
            None => InMemoryLoadRateStore::new(),
        };
        Ok(Self::new(Arc::new(store), config.load_rates.parallel_lookups))
    }

    /// The calculators this engine dispatches to.
    pub fn registry(&self) -> &CalculatorRegistry {
        &self.registry
    }

    /// Registered primary codes, sorted.
    pub fn codes(&self) -> Vec<&'static str> {
        self.registry.codes()
    }

    /// Resolve a `primary[.secondary]` token to its calculator.
    pub fn resolve(&self, token: &str) -> EngineResult<(&dyn Calculator, PracticeCode)> {
        let code = PracticeCode::parse(token).ok_or_else(|| EngineError::invalid_practice_code(token))?;
        let calculator = self
            .registry
            .get(&code.primary)
            .ok_or_else(|| EngineError::invalid_practice_code(token))?;
        Ok((calculator, code))
    }

    /// Validate and route: the record's text `practice_code` selects the
    /// calculator, and its secondary segment, if any, reaches the calculator
    /// as `secondary_code`.
    #[instrument(skip_all, fields(practice_code = tracing::field::Empty))]
    pub fn dispatch(&self, record: &PracticeRecord) -> EngineResult<ReductionResult> {
        let (calculator, record) = self.prepare(record)?;
        Ok(calculator.reduction(&record))
    }

    /// Reporting metrics for a record, routed like [`BmpEngine::dispatch`].
    #[instrument(skip_all, fields(practice_code = tracing::field::Empty))]
    pub fn dispatch_metrics(&self, record: &PracticeRecord) -> EngineResult<ReductionResult> {
        let (calculator, record) = self.prepare(record)?;
        Ok(calculator.metrics(&record))
    }

    /// Dispatch a raw JSON body. Anything but a JSON object is an empty or
    /// invalid request.
    pub fn dispatch_json(&self, body: &str) -> EngineResult<ReductionResult> {
        let record = match serde_json::from_str::<AttrValue>(body) {
            Ok(AttrValue::Object(attributes)) => PracticeRecord::from(attributes),
            _ => return Err(EngineError::empty_request()),
        };
        self.dispatch(&record)
    }

    /// Input defaults a form should pre-fill for a practice code.
    pub fn defaults_for(&self, token: &str) -> EngineResult<PracticeRecord> {
        let (calculator, _) = self.resolve(token)?;
        Ok(calculator.input_defaults())
    }

    /// Load sources present in the given segments.
    pub fn load_sources(&self, segments: &[String]) -> Vec<LoadSource> {
        self.store.load_sources(segments)
    }

    /// Roll up an already-annotated period history.
    pub fn aggregate(&self, periods: &[PracticeRecord], set: &MetricSet, as_percentage: bool) -> AggregateTotals {
        aggregate(periods, set, as_percentage)
    }

    /// Evaluate every period of one practice and roll the results up.
    #[instrument(skip(self, periods, set), fields(periods = periods.len()))]
    pub fn summarize(
        &self,
        token: &str,
        periods: &[PracticeRecord],
        set: &MetricSet,
    ) -> EngineResult<PracticeSummary> {
        let (calculator, code) = self.resolve(token)?;
        Ok(summarize(calculator, code.secondary.as_deref(), periods, set))
    }

    fn prepare<'r>(
        &self,
        record: &'r PracticeRecord,
    ) -> EngineResult<(&dyn Calculator, Cow<'r, PracticeRecord>)> {
        let token = record
            .text("practice_code")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(EngineError::empty_request)?;
        tracing::Span::current().record("practice_code", token);

        let (calculator, code) = self.resolve(token)?;
        debug!(primary = %code.primary, secondary = ?code.secondary, "dispatching record");
        let record = match code.secondary {
            Some(secondary) => Cow::Owned(record.clone().with("secondary_code", secondary)),
            None => Cow::Borrowed(record),
        };
        Ok((calculator, record))
    }
}

impl std::fmt::Debug for BmpEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BmpEngine").field("registry", &self.registry).finish()
    }
}
