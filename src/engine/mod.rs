//! Core simulation engine
//!
//! The SimulationEngine turns one request into either an injected fault or
//! a [`Completion`] ready for a protocol emitter:
//! - Deciding the fault outcome before any content work
//! - Resolving the persona and selecting content
//! - Translating persona error sentinels into faults
//! - Scaling latency on slowdown
//! - Estimating usage

mod chaos;
mod faults;
mod segmenter;

pub use chaos::*;
pub use faults::*;
pub use segmenter::*;

use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::SimulatorConfig;
use crate::error::SimulatorResult;
use crate::latency::LatencyModel;
use crate::persona::{select_content, PersonaCatalog};
use crate::providers::emitter_for;
use crate::random::{RandomSource, SeededRandom};
use crate::telemetry::metrics;
use crate::types::*;

/// Everything an emitter needs to answer one request
#[derive(Debug, Clone)]
pub struct Completion {
    pub id: String,
    /// Unix seconds
    pub created: i64,
    pub model: String,
    pub provider: Provider,
    pub persona: String,
    pub content: ResponseContent,
    pub usage: UsageCounts,
    /// Latency for this request, already scaled on slowdown
    pub latency: LatencyModel,
    pub outcome: FaultOutcome,
}

/// Where an injected fault came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultOrigin {
    /// Rate-driven fault injection
    Chaos,
    /// An error sentinel in the persona's content
    Persona,
}

impl FaultOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chaos => "chaos",
            Self::Persona => "persona",
        }
    }
}

/// A request answered with a simulated provider error
#[derive(Debug, Clone)]
pub struct InjectedFault {
    pub kind: FaultKind,
    pub origin: FaultOrigin,
    pub response: FaultResponse,
}

impl IntoResponse for InjectedFault {
    fn into_response(self) -> Response {
        self.response.into_response()
    }
}

/// The main simulation engine
pub struct SimulationEngine {
    config: Arc<SimulatorConfig>,
    catalog: Arc<PersonaCatalog>,
    faults: FaultEngine,
    latency: LatencyModel,
    rng: Arc<dyn RandomSource>,
}

impl SimulationEngine {
    /// Create an engine seeded from `config.seed`
    pub fn new(config: SimulatorConfig) -> SimulatorResult<Self> {
        let rng = Arc::new(SeededRandom::new(config.seed));
        Self::with_random(config, rng)
    }

    /// Create an engine drawing from the given random source
    pub fn with_random(config: SimulatorConfig, rng: Arc<dyn RandomSource>) -> SimulatorResult<Self> {
        config.validate()?;
        let catalog = config.persona_catalog()?;

        Ok(Self {
            faults: FaultEngine::new(config.chaos.clone()),
            latency: LatencyModel::new(&config.latency),
            catalog: Arc::new(catalog),
            config: Arc::new(config),
            rng,
        })
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &PersonaCatalog {
        &self.catalog
    }

    pub fn faults(&self) -> &FaultEngine {
        &self.faults
    }

    /// Latency model before any slowdown scaling
    pub fn latency(&self) -> &LatencyModel {
        &self.latency
    }

    /// Random source shared by selection, jitter and fault decisions
    pub fn random(&self) -> &dyn RandomSource {
        self.rng.as_ref()
    }

    /// Owned handle to the random source, for spawned stream tasks
    pub fn shared_random(&self) -> Arc<dyn RandomSource> {
        Arc::clone(&self.rng)
    }

    fn reject(&self, kind: FaultKind, origin: FaultOrigin, request: &SimulationRequest) -> InjectedFault {
        info!(
            provider = %request.provider,
            model = %request.model,
            kind = kind.as_str(),
            origin = origin.as_str(),
            "Injecting simulated fault"
        );
        metrics::record_fault(request.provider, kind);

        let response = render_fault(kind, request.provider)
            .with_retry_after(self.config.chaos.retry_after_secs);
        InjectedFault {
            kind,
            origin,
            response,
        }
    }

    /// Decide the outcome of one request.
    ///
    /// The fault decision comes first; a failing outcome returns before
    /// content is selected. Otherwise the persona is resolved, content is
    /// selected, and an error sentinel in that content becomes a fault.
    pub fn prepare(&self, request: &SimulationRequest) -> Result<Completion, InjectedFault> {
        let outcome = self.faults.decide(self.rng.as_ref());
        if let FaultOutcome::Fail(kind) = outcome {
            return Err(self.reject(kind, FaultOrigin::Chaos, request));
        }

        let persona = self
            .catalog
            .resolve(request.persona_hint.as_deref(), &self.config.default_persona);
        let content = select_content(persona, request.declares_tools, self.rng.as_ref());

        if let Some(kind) = content.fault_marker() {
            return Err(self.reject(kind, FaultOrigin::Persona, request));
        }

        let latency = match outcome {
            FaultOutcome::Slowdown => {
                debug!(provider = %request.provider, "Applying slowdown");
                self.latency.scaled(self.faults.slowdown_multiplier())
            }
            _ => self.latency.clone(),
        };

        let usage = UsageCounts::estimate(request.prompt_chars, &content);
        let id = emitter_for(request.provider).new_message_id();

        debug!(
            id = %id,
            provider = %request.provider,
            persona = %persona.name,
            tool_call = content.is_tool_call(),
            "Prepared completion"
        );

        Ok(Completion {
            id,
            created: chrono::Utc::now().timestamp(),
            model: request.model.clone(),
            provider: request.provider,
            persona: persona.name.clone(),
            content,
            usage,
            latency,
            outcome,
        })
    }
}

impl std::fmt::Debug for SimulationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationEngine")
            .field("personas", &self.catalog.len())
            .field("faults", &self.faults)
            .field("latency", &self.latency)
            .finish()
    }
}
