/// Cancellation plumbing for Ctrl-C.
///
/// The run must stop hard on SIGINT: no partial output, distinct exit
/// code. Rather than a process-global handler, a watch channel is
/// flipped by a background listener and observed by the scheduler at
/// its suspension points.
use tokio::sync::watch;

/// Read side of the cancellation channel. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

/// Write side, held by whoever decides the run is over.
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }
}

impl ShutdownSignal {
    /// True once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve when cancellation is requested. If the trigger side is
    /// gone without firing, cancellation can no longer happen and this
    /// pends forever — callers select against it.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Create an unwired trigger/signal pair. Used directly by tests;
/// `install` wires the trigger to SIGINT.
pub fn channel() -> (ShutdownTrigger, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, ShutdownSignal { rx })
}

/// Install a Ctrl-C listener and return the signal the scheduler
/// should watch. Must be called from within the tokio runtime.
pub fn install() -> ShutdownSignal {
    let (trigger, signal) = channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping run");
            trigger.trigger();
        }
    });
    signal
}
