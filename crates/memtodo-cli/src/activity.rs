//! Background task that logs every store change.

use memtodo_core::StoreEvent;
use tokio::sync::broadcast::{Receiver, error::RecvError};
use tracing::{info, warn};

/// Log events until every sender is gone. Returns how many were logged.
pub async fn log_events(mut events: Receiver<StoreEvent>) -> usize {
    let mut logged = 0;
    loop {
        match events.recv().await {
            Ok(StoreEvent::Added(item)) => info!(id = item.id, title = %item.title, "todo added"),
            Ok(StoreEvent::Updated(item)) => {
                info!(id = item.id, title = %item.title, "todo updated")
            }
            Ok(StoreEvent::Deleted(item)) => info!(id = item.id, "todo deleted"),
            Ok(StoreEvent::Cleared { removed }) => info!(removed, "todos cleared"),
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "activity log fell behind");
                continue;
            }
            Err(RecvError::Closed) => break,
        }
        logged += 1;
    }
    logged
}
