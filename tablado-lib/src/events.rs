//! Driving a run while consuming its progress events.

use std::future::Future;

use tablado_core::Diagnostics;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{Duration, timeout};

/// How long to keep draining events once the task has finished.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Run `task` to completion, handing every event it sends to `on_event`.
///
/// Events still queued when the task finishes are delivered before this
/// returns, as long as they arrive within [`DRAIN_TIMEOUT`].
pub async fn run_with_events<F, E, R>(
    task: F,
    mut events: UnboundedReceiver<E>,
    mut on_event: impl FnMut(E),
    diag: &dyn Diagnostics,
) -> R
where
    F: Future<Output = R>,
{
    tokio::pin!(task);

    let result = loop {
        tokio::select! {
            r = &mut task => break r,
            event = events.recv() => match event {
                Some(e) => on_event(e),
                // All senders gone; nothing more to show.
                None => break (&mut task).await,
            },
        }
    };

    loop {
        match timeout(DRAIN_TIMEOUT, events.recv()).await {
            Ok(Some(e)) => on_event(e),
            Ok(None) => break,
            Err(_) => {
                diag.debug(format!(
                    "Stopped draining progress events after {DRAIN_TIMEOUT:?}"
                ));
                break;
            }
        }
    }

    result
}
