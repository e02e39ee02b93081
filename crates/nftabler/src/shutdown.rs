//! Cooperative shutdown signal shared between the signal handler and tasks.

use tokio::sync::watch;

/// Creates a connected trigger/listener pair.
pub fn channel() -> (ShutdownTrigger, ShutdownListener) {
    let (sender, receiver) = watch::channel(false);
    (ShutdownTrigger { sender }, ShutdownListener { receiver })
}

/// Requests shutdown. Safe to call from any thread, any number of times.
#[derive(Debug)]
pub struct ShutdownTrigger {
    sender: watch::Sender<bool>,
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }
}

#[derive(Debug, Clone)]
pub struct ShutdownListener {
    receiver: watch::Receiver<bool>,
}

impl ShutdownListener {
    pub fn is_triggered(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once shutdown has been requested or the trigger was dropped.
    pub async fn wait(&mut self) {
        let _ = self.receiver.wait_for(|stop| *stop).await;
    }
}
