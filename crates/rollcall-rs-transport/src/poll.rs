//! Long-poll dispatch loop.

use crate::api::TelegramApi;
use log::{debug, warn};
use rollcall_rs_protocol::UserEvent;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Pulls updates from the Bot API and hands events to a handler one at a
/// time.
///
/// Events are dispatched strictly sequentially, which is what guarantees the
/// engine's single-flight-per-user session access.
pub struct UpdatePoller {
    api: Arc<TelegramApi>,
    timeout_secs: u64,
    offset: i64,
}

impl UpdatePoller {
    /// Create a poller with the given long-poll timeout.
    pub fn new(api: Arc<TelegramApi>, timeout_secs: u64) -> Self {
        Self {
            api,
            timeout_secs,
            offset: 0,
        }
    }

    /// Poll forever, invoking the handler for each consumable event.
    ///
    /// Fetch failures are logged and retried after a backoff; nothing here
    /// is fatal to the process.
    pub async fn run<F, Fut>(mut self, mut handler: F)
    where
        F: FnMut(UserEvent) -> Fut,
        Fut: Future<Output = ()>,
    {
        loop {
            match self.api.get_updates(self.offset, self.timeout_secs).await {
                Ok(updates) => {
                    for update in updates {
                        self.offset = self.offset.max(update.update_id + 1);
                        match update.into_event() {
                            Some(event) => handler(event).await,
                            None => debug!("skipped update (offset={})", self.offset),
                        }
                    }
                }
                Err(err) => {
                    warn!(
                        "getUpdates failed, backing off (timeout={}s, error={})",
                        self.timeout_secs, err
                    );
                    tokio::time::sleep(ERROR_BACKOFF).await;
                }
            }
        }
    }
}
