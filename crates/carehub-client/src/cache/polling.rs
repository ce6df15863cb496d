//! Background unread-count polling.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Owns the polling task; dropping it stops the poll.
#[derive(Debug)]
pub struct PollingGuard {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollingGuard {
    pub(crate) fn new(token: CancellationToken, task: JoinHandle<()>) -> Self {
        Self {
            token,
            task: Some(task),
        }
    }

    /// Whether the polling task is still scheduled.
    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Stop polling and wait for the task to exit.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollingGuard {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
