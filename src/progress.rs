//! Progress reporting for pipeline runs.
//!
//! The pipeline writes [`PipelineProgress`] snapshots to a [`ProgressSink`].
//! Any `Fn(&PipelineProgress)` closure is a sink, and [`ChannelSink`]
//! forwards snapshots over a tokio channel for consumers on another task.

use crate::models::{PipelineProgress, PipelineStep};
use tokio::sync::mpsc;
use tracing::debug;

/// Receives progress snapshots in the order they are emitted.
pub trait ProgressSink {
    fn report(&self, progress: &PipelineProgress);
}

impl<F> ProgressSink for F
where
    F: Fn(&PipelineProgress),
{
    fn report(&self, progress: &PipelineProgress) {
        self(progress)
    }
}

/// Forwards snapshots into an unbounded channel.
///
/// A closed receiver is not an error; the run continues without a listener.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<PipelineProgress>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::UnboundedSender<PipelineProgress>) -> Self {
        Self { sender }
    }

    /// Create a sink together with the receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PipelineProgress>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl ProgressSink for ChannelSink {
    fn report(&self, progress: &PipelineProgress) {
        if self.sender.send(progress.clone()).is_err() {
            debug!(step = %progress.step, "Progress receiver dropped");
        }
    }
}

/// Build a snapshot on the 0-100 scale.
pub(crate) fn snapshot(step: PipelineStep, progress: f64, current: usize, message: impl Into<String>) -> PipelineProgress {
    PipelineProgress {
        step,
        progress,
        current,
        total: 100,
        message: message.into(),
    }
}
