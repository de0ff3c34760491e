//! Scripted [`NetworkServiceClient`] for tests.
//!
//! [`MockNetworkService`] answers each `start` call with the next entry of
//! its output queue instead of touching the network. Entries can repeat a
//! fixed number of times or forever, and every answer can be held back by a
//! [`Delay`] measured on the tokio clock, so paused-time tests stay
//! deterministic.

use async_trait::async_trait;
use bytes::Bytes;
use netservice::{encode_body, Encoder, Failure, HttpConfig, JsonCodec, NetworkServiceClient, Request};
use netservice_log::spans;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::time::Duration;
use tracing::Instrument;

/// One scripted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOutput {
    /// Served once.
    Single(Result<Bytes, Failure>),
    /// Served `count` times, then removed.
    Repeat(Result<Bytes, Failure>, NonZeroUsize),
    /// Served on every call; never removed.
    RepeatInfinite(Result<Bytes, Failure>),
}

impl MockOutput {
    /// A successful body, served once.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::Single(Ok(body.into()))
    }

    /// A failure, served once.
    pub fn failure(failure: Failure) -> Self {
        Self::Single(Err(failure))
    }

    /// `value` encoded with `encoder`, served once. An encode error becomes
    /// the scripted failure.
    pub fn encoded<E, T>(encoder: &E, value: &T) -> Self
    where
        E: Encoder,
        T: Serialize + ?Sized,
    {
        Self::Single(encode_body(encoder, value))
    }

    /// `value` as JSON, served once.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        Self::encoded(&JsonCodec::new(), value)
    }

    /// Serve `output` `count` times. `None` when `count` is zero.
    pub fn repeat(output: Result<Bytes, Failure>, count: usize) -> Option<Self> {
        NonZeroUsize::new(count).map(|count| Self::Repeat(output, count))
    }

    /// Serve `output` on every call from now on.
    pub fn repeat_infinite(output: Result<Bytes, Failure>) -> Self {
        Self::RepeatInfinite(output)
    }

    /// The result this entry serves.
    pub fn output(&self) -> &Result<Bytes, Failure> {
        match self {
            Self::Single(output) | Self::Repeat(output, _) | Self::RepeatInfinite(output) => output,
        }
    }
}

/// How long each answer is held back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delay {
    /// Resolve on the first poll. The timer is never touched.
    #[default]
    None,
    /// Sleep on the tokio clock before resolving.
    Seconds(Duration),
    /// Never resolve; the call only ends when its future is dropped.
    Infinite,
}

impl Delay {
    /// Delay of `secs` seconds. Negative and NaN inputs clamp to zero;
    /// values too large for a `Duration` become [`Delay::Infinite`].
    pub fn seconds(secs: f64) -> Self {
        Duration::try_from_secs_f64(secs.max(0.0))
            .map(Self::Seconds)
            .unwrap_or(Self::Infinite)
    }

    /// The finite delay, if any.
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Self::Seconds(duration) => Some(*duration),
            Self::None | Self::Infinite => None,
        }
    }
}

/// Errors raised by the mock itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MockError {
    #[error("no output queued")]
    NoOutputQueued,
}

impl From<MockError> for Failure {
    fn from(e: MockError) -> Self {
        Failure::Unknown(e.to_string())
    }
}

/// Transport double serving outputs from a queue.
///
/// Every setter takes `&self` so a test can keep an `Arc` to the mock while a
/// [`netservice::NetworkService`] owns another. The queue is locked only for
/// the dequeue itself; concurrent callers each get some entry, but which
/// caller gets which entry is unspecified. Drive calls sequentially when order
/// matters.
#[derive(Debug, Default)]
pub struct MockNetworkService {
    outputs: Mutex<VecDeque<MockOutput>>,
    delay: Mutex<Delay>,
    requests: Mutex<Vec<Request>>,
    config: HttpConfig,
}

impl MockNetworkService {
    /// Queue `outputs`, each held back by `delay`.
    pub fn new(outputs: impl IntoIterator<Item = MockOutput>, delay: Delay) -> Self {
        Self {
            outputs: Mutex::new(outputs.into_iter().collect()),
            delay: Mutex::new(delay),
            ..Self::default()
        }
    }

    /// Queue `outputs` with no delay.
    pub fn with_outputs(outputs: impl IntoIterator<Item = MockOutput>) -> Self {
        Self::new(outputs, Delay::None)
    }

    /// Replace the configuration returned by `session()`.
    pub fn with_config(mut self, config: HttpConfig) -> Self {
        self.config = config;
        self
    }

    pub fn delay(&self) -> Delay {
        *self.delay.lock()
    }

    pub fn set_delay(&self, delay: Delay) {
        *self.delay.lock() = delay;
    }

    /// Snapshot of the queue, head first.
    pub fn outputs(&self) -> Vec<MockOutput> {
        self.outputs.lock().iter().cloned().collect()
    }

    pub fn set_outputs(&self, outputs: impl IntoIterator<Item = MockOutput>) {
        *self.outputs.lock() = outputs.into_iter().collect();
    }

    /// Append to the tail of the queue.
    pub fn push_output(&self, output: MockOutput) {
        self.outputs.lock().push_back(output);
    }

    pub fn len(&self) -> usize {
        self.outputs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.lock().is_empty()
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Pop the head and put repeating entries back in front.
    fn dequeue(&self) -> Result<Result<Bytes, Failure>, MockError> {
        let mut outputs = self.outputs.lock();
        let next = outputs.pop_front().ok_or(MockError::NoOutputQueued)?;

        let output = match next {
            MockOutput::Single(output) => output,
            MockOutput::Repeat(output, count) => {
                if let Some(remaining) = NonZeroUsize::new(count.get() - 1) {
                    outputs.push_front(MockOutput::Repeat(output.clone(), remaining));
                }
                output
            }
            MockOutput::RepeatInfinite(output) => {
                outputs.push_front(MockOutput::RepeatInfinite(output.clone()));
                output
            }
        };

        tracing::trace!(remaining = outputs.len(), ok = output.is_ok(), "dequeued mock output");
        Ok(output)
    }
}

#[async_trait]
impl NetworkServiceClient for MockNetworkService {
    type Session = HttpConfig;

    fn session(&self) -> &HttpConfig {
        &self.config
    }

    async fn start(&self, request: Request) -> Result<Bytes, Failure> {
        let span = spans::mock_span(self.len());

        async move {
            self.requests.lock().push(request);

            // An empty queue fails right away, whatever the delay.
            let output = self.dequeue().map_err(|e| {
                tracing::warn!(error = %e, "mock transport called with an empty queue");
                Failure::from(e)
            })?;

            match self.delay() {
                // Zero-length delays still go through the timer; only
                // `None` skips it.
                Delay::None => {}
                Delay::Seconds(duration) => tokio::time::sleep(duration).await,
                Delay::Infinite => std::future::pending::<()>().await,
            }

            output
        }
        .instrument(span)
        .await
    }
}
