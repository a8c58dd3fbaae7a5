//! Per-stream bookkeeping

use super::{Provider, UsageCounts};

/// Lifecycle of a single stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPhase {
    /// Created, nothing written yet
    Pending,
    /// Opening frames written
    Announced,
    /// Unit frames being written
    Emitting,
    /// Closing frames written
    Finished,
    /// Client went away before the closing frames
    Cancelled,
}

impl StreamPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled)
    }
}

/// State of one streaming response. Lives for exactly one request.
#[derive(Debug, Clone)]
pub struct StreamSession {
    pub id: String,
    pub model: String,
    pub provider: Provider,
    pub usage: UsageCounts,
    cursor: usize,
    total_units: usize,
    frames_written: usize,
    phase: StreamPhase,
}

impl StreamSession {
    pub fn new(
        id: impl Into<String>,
        model: impl Into<String>,
        provider: Provider,
        total_units: usize,
        usage: UsageCounts,
    ) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            provider,
            usage,
            cursor: 0,
            total_units,
            frames_written: 0,
            phase: StreamPhase::Pending,
        }
    }

    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    /// Units delivered so far
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total_units(&self) -> usize {
        self.total_units
    }

    pub fn remaining_units(&self) -> usize {
        self.total_units - self.cursor
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    pub fn record_frames(&mut self, count: usize) {
        self.frames_written += count;
    }

    pub fn announce(&mut self) {
        if self.phase == StreamPhase::Pending {
            self.phase = StreamPhase::Announced;
        }
    }

    /// Move the cursor past one delivered unit. Returns false once every
    /// unit has been delivered or the session already ended.
    pub fn advance(&mut self) -> bool {
        if self.phase.is_terminal() || self.cursor >= self.total_units {
            return false;
        }
        self.phase = StreamPhase::Emitting;
        self.cursor += 1;
        true
    }

    pub fn finish(&mut self) {
        if !self.phase.is_terminal() {
            self.phase = StreamPhase::Finished;
        }
    }

    pub fn cancel(&mut self) {
        if !self.phase.is_terminal() {
            self.phase = StreamPhase::Cancelled;
        }
    }
}
