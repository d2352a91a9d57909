//! Cooperative shutdown
//!
//! Loops observe the request at iteration boundaries only: after a tick
//! completes, or while sleeping between ticks.

use std::time::Duration;

use tokio::sync::watch;

pub struct ShutdownTrigger(watch::Sender<bool>);

#[derive(Clone)]
pub struct Shutdown(watch::Receiver<bool>);

pub fn channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger(tx), Shutdown(rx))
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        let _ = self.0.send(true);
    }
}

impl Shutdown {
    pub fn is_requested(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once shutdown is requested (or the trigger is gone)
    pub async fn requested(&mut self) {
        let _ = self.0.wait_for(|requested| *requested).await;
    }

    /// Sleep for `period`; returns true if the loop should exit
    pub async fn sleep(&mut self, period: Duration) -> bool {
        if self.is_requested() {
            return true;
        }

        tokio::select! {
            _ = tokio::time::sleep(period) => self.is_requested(),
            _ = self.requested() => true,
        }
    }
}
