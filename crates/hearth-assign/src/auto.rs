//! Delayed auto-assignment after villager spawns.
//!
//! Every spawn calls [`AutoAssignHandle::trigger`]. The assigner waits for
//! the configured delay and then houses the newest homeless villager. A
//! trigger arriving while the timer is pending restarts it, so a burst of
//! spawns produces one cycle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, error, info};

use crate::service::AssignmentService;
use crate::village::Village;

/// Cheap, cloneable sender for spawn notifications.
#[derive(Debug, Clone)]
pub struct AutoAssignHandle {
    tx: mpsc::UnboundedSender<()>,
}

impl AutoAssignHandle {
    /// Report a villager spawn. Returns `false` once the assigner has stopped.
    pub fn trigger(&self) -> bool {
        self.tx.send(()).is_ok()
    }
}

pub struct AutoAssigner<V> {
    service: Arc<Mutex<AssignmentService<V>>>,
    delay: Duration,
    enabled: bool,
    triggers: mpsc::UnboundedReceiver<()>,
}

impl<V: Village + Send + 'static> AutoAssigner<V> {
    pub fn new(service: AssignmentService<V>) -> (Self, AutoAssignHandle) {
        let delay = service.config().housing.auto_assign_delay();
        let enabled = service.config().auto_assign_enabled();
        let (tx, triggers) = mpsc::unbounded_channel();
        let assigner = Self {
            service: Arc::new(Mutex::new(service)),
            delay,
            enabled,
            triggers,
        };
        (assigner, AutoAssignHandle { tx })
    }

    /// The service the assigner drives. Lock it to run manual cycles; they
    /// never overlap with a delayed one.
    pub fn service(&self) -> Arc<Mutex<AssignmentService<V>>> {
        Arc::clone(&self.service)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run until `shutdown` changes, or until every handle is dropped and no
    /// cycle is pending.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let Self {
            service,
            delay,
            enabled,
            mut triggers,
        } = self;
        info!(delay_secs = delay.as_secs(), enabled, "auto-assigner started");

        let mut deadline: Option<Instant> = None;
        let mut listening = true;

        loop {
            tokio::select! {
                trigger = triggers.recv(), if listening => match trigger {
                    Some(()) if enabled => {
                        deadline = Some(Instant::now() + delay);
                        debug!(delay_secs = delay.as_secs(), "villager spawned, auto-assign timer restarted");
                    }
                    Some(()) => debug!("auto-assign disabled, ignoring spawn"),
                    None => {
                        listening = false;
                        if deadline.is_none() {
                            break;
                        }
                    }
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    deadline = None;
                    let mut service = service.lock().await;
                    match service.assign_homeless(true) {
                        Ok(outcome) => debug!(
                            placed = outcome.report.placed_count(),
                            "auto-assign cycle finished"
                        ),
                        Err(e) => error!(error = %e, "auto-assign cycle failed"),
                    }
                    if !listening {
                        break;
                    }
                }
                _ = shutdown.changed() => {
                    info!("auto-assigner shutting down");
                    break;
                }
            }
        }
    }
}
