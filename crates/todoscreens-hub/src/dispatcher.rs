//! Bounded trigger queue
//!
//! Presses are queued and a single worker fires them one at a time. When the
//! queue is full the press is dropped rather than piling up requests behind a
//! slow server.

use crate::button::{ButtonEvent, ButtonMap, HubAction};
use crate::trigger::{TriggerClient, TriggerError};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// What happened to a button event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Queued for the worker
    Queued(HubAction),
    /// No binding for this mask and status
    Ignored,
    /// Queue full or worker gone
    Dropped(HubAction),
}

/// Counts from relaying an event stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    /// Events handed to the dispatcher
    pub events: usize,
    /// Lines that were not valid button events
    pub malformed: usize,
}

/// Front end of the trigger queue
#[derive(Debug, Clone)]
pub struct Dispatcher {
    map: ButtonMap,
    queue: mpsc::Sender<HubAction>,
}

impl Dispatcher {
    /// Start the worker on the current runtime
    ///
    /// The worker exits once every `Dispatcher` clone is dropped and the
    /// queue is drained.
    pub fn spawn(
        map: ButtonMap,
        trigger: Arc<dyn TriggerClient>,
        depth: usize,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(depth.max(1));
        let worker = tokio::spawn(run_worker(rx, trigger));
        (Self { map, queue: tx }, worker)
    }

    /// Handle one event from the hub
    pub fn on_button_event(&self, event: &ButtonEvent) -> Dispatch {
        info!(
            node_id = %event.node_id,
            mask = event.button_mask,
            status = event.status,
            "Got button event"
        );
        let Some(action) = self.map.resolve(event) else {
            debug!("No binding for button event");
            return Dispatch::Ignored;
        };
        match self.queue.try_send(action) {
            Ok(()) => Dispatch::Queued(action),
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(%action, "Trigger queue full, dropping press");
                Dispatch::Dropped(action)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                error!(%action, "Trigger worker stopped, dropping press");
                Dispatch::Dropped(action)
            }
        }
    }

    /// Dispatch every JSON-line button event from `reader` until EOF
    ///
    /// Blank lines are skipped and malformed lines are logged and counted.
    pub async fn relay_lines<R>(&self, reader: R) -> std::io::Result<RelayStats>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut stats = RelayStats::default();
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<ButtonEvent>(line) {
                Ok(event) => {
                    self.on_button_event(&event);
                    stats.events += 1;
                }
                Err(e) => {
                    warn!(error = %e, "Ignoring malformed event");
                    stats.malformed += 1;
                }
            }
        }
        Ok(stats)
    }
}

async fn run_worker(mut rx: mpsc::Receiver<HubAction>, trigger: Arc<dyn TriggerClient>) {
    while let Some(action) = rx.recv().await {
        info!(%action, "Requesting");
        match trigger.fire(action).await {
            Ok(reply) => info!(%action, status = reply.status, result = %reply.body, "Trigger accepted"),
            Err(TriggerError::Rejected { status, body }) => {
                warn!(%action, status, result = %body, "Trigger rejected");
            }
            Err(e @ TriggerError::Transport(_)) => {
                error!(%action, error = %e, "Request failed");
            }
        }
    }
    debug!("Trigger queue closed");
}
