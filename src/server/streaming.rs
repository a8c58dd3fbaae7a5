//! Paced stream emission
//!
//! [`StreamOrchestrator`] drives one [`FramePlan`] through an explicit state
//! machine: opening frames, the first-unit wait, then one paced unit per
//! iteration, then the closing frames. Liveness is polled through
//! [`FrameSink`] before every unit; a closed sink ends the stream quietly.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::debug;

use crate::engine::Completion;
use crate::latency::LatencyModel;
use crate::providers::{Frame, FramePlan};
use crate::random::RandomSource;
use crate::telemetry::metrics;
use crate::types::StreamSession;

/// Frames buffered between the emission task and the response body
const STREAM_BUFFER: usize = 32;

/// Destination of stream frames
#[async_trait]
pub trait FrameSink: Send {
    /// Whether the peer can still receive frames
    fn is_open(&self) -> bool;

    /// Write one frame. Returns false if the peer is gone.
    async fn write(&mut self, frame: &Frame) -> bool;
}

/// Sink backed by the channel feeding an HTTP response body. The receiver
/// is dropped when the client disconnects, which closes the sink.
pub struct ChannelSink {
    tx: mpsc::Sender<Result<Bytes, Infallible>>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Result<Bytes, Infallible>>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl FrameSink for ChannelSink {
    fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    async fn write(&mut self, frame: &Frame) -> bool {
        self.tx.send(Ok(frame.to_bytes())).await.is_ok()
    }
}

/// How a stream ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// Closing frames were written
    Completed,
    /// The peer went away first
    Cancelled,
}

impl StreamOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Announce,
    AwaitFirstUnit,
    Emit,
    Finish,
    Done(StreamOutcome),
}

/// Drives one stream from announcement to termination
pub struct StreamOrchestrator {
    plan: FramePlan,
    session: StreamSession,
    latency: LatencyModel,
    rng: Arc<dyn RandomSource>,
}

impl StreamOrchestrator {
    pub fn new(completion: &Completion, plan: FramePlan, rng: Arc<dyn RandomSource>) -> Self {
        let session = StreamSession::new(
            completion.id.clone(),
            completion.model.clone(),
            completion.provider,
            plan.units.len(),
            completion.usage,
        );
        Self {
            plan,
            session,
            latency: completion.latency.clone(),
            rng,
        }
    }

    pub fn session(&self) -> &StreamSession {
        &self.session
    }

    async fn write_all<S: FrameSink + ?Sized>(sink: &mut S, frames: &[Frame]) -> Option<usize> {
        for frame in frames {
            if !sink.write(frame).await {
                return None;
            }
        }
        Some(frames.len())
    }

    fn cancel(&mut self) -> Step {
        self.session.cancel();
        Step::Done(StreamOutcome::Cancelled)
    }

    async fn step<S: FrameSink + ?Sized>(&mut self, step: Step, sink: &mut S) -> Step {
        match step {
            Step::Announce => {
                if !sink.is_open() {
                    return self.cancel();
                }
                match Self::write_all(sink, &self.plan.opening).await {
                    Some(n) => {
                        self.session.record_frames(n);
                        self.session.announce();
                        Step::AwaitFirstUnit
                    }
                    None => self.cancel(),
                }
            }
            Step::AwaitFirstUnit => {
                let delay = self.latency.first_unit_delay(self.rng.as_ref());
                if !delay.is_zero() {
                    sleep(delay).await;
                }
                Step::Emit
            }
            Step::Emit => {
                if self.session.remaining_units() == 0 {
                    return Step::Finish;
                }
                let delay = self.latency.per_unit_delay(self.rng.as_ref());
                if !delay.is_zero() {
                    sleep(delay).await;
                }
                if !sink.is_open() {
                    return self.cancel();
                }
                let unit = &self.plan.units[self.session.cursor()];
                match Self::write_all(sink, unit).await {
                    Some(n) => {
                        self.session.record_frames(n);
                        self.session.advance();
                        Step::Emit
                    }
                    None => self.cancel(),
                }
            }
            Step::Finish => match Self::write_all(sink, &self.plan.closing).await {
                Some(n) => {
                    self.session.record_frames(n);
                    self.session.finish();
                    Step::Done(StreamOutcome::Completed)
                }
                None => self.cancel(),
            },
            Step::Done(outcome) => Step::Done(outcome),
        }
    }

    /// Emit the whole plan into `sink`
    pub async fn run<S: FrameSink + ?Sized>(mut self, sink: &mut S) -> StreamOutcome {
        let mut step = Step::Announce;
        let outcome = loop {
            step = self.step(step, sink).await;
            if let Step::Done(outcome) = step {
                break outcome;
            }
        };

        debug_assert!(self.session.phase().is_terminal());
        debug!(
            id = %self.session.id,
            provider = %self.session.provider,
            frames = self.session.frames_written(),
            units = self.session.cursor(),
            outcome = outcome.as_str(),
            "Stream ended"
        );
        metrics::record_stream(self.session.provider, outcome);
        outcome
    }
}

/// Start emitting `plan` on a background task and return the SSE response
/// whose body receives the frames
pub fn sse_response(completion: &Completion, plan: FramePlan, rng: Arc<dyn RandomSource>) -> Response {
    let (tx, mut rx) = mpsc::channel(STREAM_BUFFER);
    let orchestrator = StreamOrchestrator::new(completion, plan, rng);

    tokio::spawn(async move {
        let mut sink = ChannelSink::new(tx);
        orchestrator.run(&mut sink).await;
    });

    let body = Body::from_stream(async_stream::stream! {
        while let Some(chunk) = rx.recv().await {
            yield chunk;
        }
    });

    let mut response = (StatusCode::OK, body).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/event-stream"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response
}
