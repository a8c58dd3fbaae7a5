//! Server state management

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::SimulatorConfig;
use crate::engine::SimulationEngine;
use crate::error::SimulatorResult;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SimulationEngine>,
    pub config: Arc<SimulatorConfig>,
    pub started: Instant,
}

impl AppState {
    pub fn new(config: SimulatorConfig) -> SimulatorResult<Self> {
        Ok(Self::from_engine(SimulationEngine::new(config)?))
    }

    /// State around an existing engine, e.g. one with a scripted random source
    pub fn from_engine(engine: SimulationEngine) -> Self {
        Self {
            config: Arc::new(engine.config().clone()),
            engine: Arc::new(engine),
            started: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }
}
