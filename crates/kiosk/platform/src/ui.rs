//! UI thread dispatch
//!
//! Window and decor view mutations must run on the UI execution context no
//! matter which thread asks for them. Dispatch is fire-and-forget: the caller
//! does not wait. A [`UiReceipt`] is handed back for callers that want to
//! observe when the mutation actually ran.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// A unit of work for the UI thread
pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// Marshals work onto the UI execution context
pub trait UiThread: Send + Sync {
    /// Schedule `task`; returns without waiting for it to run
    fn run_on_ui_thread(&self, task: UiTask);
}

/// Runs tasks immediately on the calling thread
///
/// For hosts whose callers are already on the UI thread, and for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineUiThread;

impl UiThread for InlineUiThread {
    fn run_on_ui_thread(&self, task: UiTask) {
        task();
    }
}

/// Queues tasks for a host-driven [`UiLoop`]
#[derive(Debug, Clone)]
pub struct ChannelUiThread {
    sender: mpsc::UnboundedSender<UiTask>,
}

impl ChannelUiThread {
    /// Create a dispatcher and the loop that drains it
    pub fn new() -> (Self, UiLoop) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, UiLoop { receiver })
    }
}

impl UiThread for ChannelUiThread {
    fn run_on_ui_thread(&self, task: UiTask) {
        if self.sender.send(task).is_err() {
            warn!("UI loop is gone, dropping UI task");
        }
    }
}

/// Receiving end of a [`ChannelUiThread`], owned by the UI thread
pub struct UiLoop {
    receiver: mpsc::UnboundedReceiver<UiTask>,
}

impl UiLoop {
    /// Run every task queued so far; returns how many ran
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.receiver.try_recv() {
            task();
            ran += 1;
        }
        if ran > 0 {
            debug!(tasks = ran, "Drained UI tasks");
        }
        ran
    }

    /// Run tasks as they arrive until every dispatcher is dropped
    pub async fn run(mut self) {
        while let Some(task) = self.receiver.recv().await {
            task();
        }
        debug!("UI loop finished");
    }
}

impl std::fmt::Debug for UiLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiLoop").finish_non_exhaustive()
    }
}

/// Completion signal for a dispatched UI mutation
///
/// Resolves to `true` when the mutation touched a window, `false` when there
/// was nothing to mutate or the task was dropped before running.
#[derive(Debug)]
pub struct UiReceipt {
    receiver: oneshot::Receiver<bool>,
    resolved: Option<bool>,
}

impl UiReceipt {
    /// Wait for the mutation to run
    pub async fn applied(self) -> bool {
        match self.resolved {
            Some(applied) => applied,
            None => self.receiver.await.unwrap_or(false),
        }
    }

    /// Check without waiting; `None` while the task is still queued
    pub fn try_applied(&mut self) -> Option<bool> {
        if self.resolved.is_none() {
            self.resolved = match self.receiver.try_recv() {
                Ok(applied) => Some(applied),
                Err(oneshot::error::TryRecvError::Empty) => None,
                Err(oneshot::error::TryRecvError::Closed) => Some(false),
            };
        }
        self.resolved
    }

    /// Block the current thread until the mutation has run
    ///
    /// Must not be called from inside an async runtime.
    pub fn wait(self) -> bool {
        match self.resolved {
            Some(applied) => applied,
            None => self.receiver.blocking_recv().unwrap_or(false),
        }
    }
}

/// Dispatch `mutation` to `ui` and return its receipt
pub fn dispatch<F>(ui: &dyn UiThread, mutation: F) -> UiReceipt
where
    F: FnOnce() -> bool + Send + 'static,
{
    let (sender, receiver) = oneshot::channel();
    ui.run_on_ui_thread(Box::new(move || {
        let _ = sender.send(mutation());
    }));
    UiReceipt {
        receiver,
        resolved: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_inline_runs_immediately() {
        let mut receipt = dispatch(&InlineUiThread, || true);
        assert_eq!(receipt.try_applied(), Some(true));
    }

    #[test]
    fn test_channel_defers_until_drained() {
        let (ui, mut ui_loop) = ChannelUiThread::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&counter);
        let mut receipt = dispatch(&ui, move || {
            c.fetch_add(1, Ordering::SeqCst);
            true
        });

        assert_eq!(receipt.try_applied(), None);
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        assert_eq!(ui_loop.run_pending(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(receipt.try_applied(), Some(true));
        assert_eq!(receipt.try_applied(), Some(true));
    }

    #[test]
    fn test_dropped_loop_resolves_false() {
        let (ui, ui_loop) = ChannelUiThread::new();
        drop(ui_loop);

        let receipt = dispatch(&ui, || true);
        assert!(!receipt.wait());
    }

    #[tokio::test]
    async fn test_loop_runs_until_dispatchers_dropped() {
        let (ui, ui_loop) = ChannelUiThread::new();
        let handle = tokio::spawn(ui_loop.run());

        let receipt = dispatch(&ui, || false);
        assert!(!receipt.applied().await);

        let receipt = dispatch(&ui, || true);
        assert!(receipt.applied().await);

        drop(ui);
        handle.await.unwrap();
    }
}
