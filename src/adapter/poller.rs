//! Background acquisition of adapter snapshots.
//!
//! One tokio task polls the [`ReportSource`] on a fixed interval and
//! publishes the decoded per-port snapshots through a watch channel, so
//! readers always observe one complete, self-consistent snapshot per port
//! and never a torn update. Starting and stopping are idempotent; the
//! classifier and UI layers only ever see the latest published state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::adapter::report::{ControllerSnapshot, PORT_COUNT};
use crate::adapter::source::ReportSource;

/// Snapshot of every adapter port, published atomically.
pub type PortStates = [ControllerSnapshot; PORT_COUNT];

/// Poller settings.
#[derive(Clone, Debug)]
pub struct PollerSettings {
    pub poll_interval_ms: u64,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
        }
    }
}

/// Handle owning the polling task and the published port states.
///
/// Constructed once by the hosting application and passed by reference to
/// whatever needs adapter state; there is no process-wide singleton.
pub struct PollerHandle {
    source: Arc<Mutex<Box<dyn ReportSource>>>,
    states_tx: Arc<watch::Sender<PortStates>>,
    states_rx: watch::Receiver<PortStates>,
    running: Arc<AtomicBool>,
    task: std::sync::Mutex<Option<JoinHandle<()>>>,
    settings: PollerSettings,
}

impl PollerHandle {
    pub fn new<S: ReportSource>(source: S, settings: PollerSettings) -> Self {
        let (states_tx, states_rx) = watch::channel(PortStates::default());
        debug!("Created port state channel for {} ports", PORT_COUNT);

        Self {
            source: Arc::new(Mutex::new(Box::new(source))),
            states_tx: Arc::new(states_tx),
            states_rx,
            running: Arc::new(AtomicBool::new(false)),
            task: std::sync::Mutex::new(None),
            settings,
        }
    }

    /// Begin background acquisition. Idempotent; returns whether polling
    /// is now active.
    pub fn start_polling(&self) -> bool {
        let mut task = self
            .task
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if let Some(handle) = task.as_ref() {
            if !handle.is_finished() {
                debug!("Adapter polling already active");
                return true;
            }
        }

        self.running.store(true, Ordering::SeqCst);
        info!(
            "Starting adapter polling at {} ms intervals",
            self.settings.poll_interval_ms
        );
        *task = Some(tokio::spawn(run_poll_loop(
            self.source.clone(),
            self.states_tx.clone(),
            self.running.clone(),
            self.settings.poll_interval_ms,
        )));

        true
    }

    /// Halt background acquisition. Idempotent.
    pub fn stop_polling(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            debug!("Adapter polling already stopped");
            return;
        }

        let handle = self
            .task
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
        info!("Adapter polling stopped");
    }

    pub fn is_polling(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Most recent complete snapshot for `port`.
    ///
    /// Safe to call concurrently with the polling task. Reads a default
    /// (disconnected) snapshot while no adapter is present, before the
    /// first transfer arrives, or for a port outside `0..PORT_COUNT`.
    pub fn get_controller_state(&self, port: usize) -> ControllerSnapshot {
        self.states_rx.borrow().get(port).copied().unwrap_or_default()
    }

    /// Receiver that wakes whenever a new transfer is published.
    pub fn subscribe(&self) -> watch::Receiver<PortStates> {
        self.states_rx.clone()
    }
}

async fn run_poll_loop(
    source: Arc<Mutex<Box<dyn ReportSource>>>,
    states: Arc<watch::Sender<PortStates>>,
    running: Arc<AtomicBool>,
    poll_interval_ms: u64,
) {
    info!("Adapter poll loop started ({} ms interval)", poll_interval_ms);
    let mut ticker = tokio::time::interval(Duration::from_millis(poll_interval_ms.max(1)));

    // Throughput stats, logged periodically.
    let mut transfers = 0u64;
    let mut read_errors = 0u64;
    let mut last_log_time = Local::now();
    let log_interval = chrono::Duration::seconds(30);

    while running.load(Ordering::SeqCst) {
        ticker.tick().await;

        let result = source.lock().await.read_frame();
        match result {
            Ok(Some(frame)) => {
                transfers += 1;
                let ports: PortStates = std::array::from_fn(|port| frame.snapshot(port));
                if states.send(ports).is_err() {
                    error!("All snapshot receivers dropped, stopping poll loop");
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => {
                // Transport failure degrades every port to disconnected;
                // readers never see the error itself.
                read_errors += 1;
                warn!("Adapter read failed: {}", e);
                if states.send(PortStates::default()).is_err() {
                    error!("All snapshot receivers dropped, stopping poll loop");
                    break;
                }
            }
        }

        let now = Local::now();
        if now - last_log_time > log_interval {
            info!(
                "Poll loop stats: {} transfers, {} read errors in last {} seconds",
                transfers,
                read_errors,
                log_interval.num_seconds()
            );
            transfers = 0;
            read_errors = 0;
            last_log_time = now;
        }
    }

    info!("Adapter poll loop exited");
}
