//! Keyboard-wedge scanner adapters.
//!
//! A USB QR reader types the code and presses Enter. On a headless desk the
//! reader's output arrives as lines on stdin; each line is replayed as key
//! events for [`ScanInputHandler`](crate::application::ScanInputHandler),
//! and the handler's display updates are written to the log.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::application::handlers::scanner::DeskUpdate;
use crate::domain::scanner::KeyEvent;

/// Replays each line from `reader` as typed characters followed by Enter.
///
/// Every key of a line is stamped with the instant the line was read, so a
/// busy handler still debounces against arrival time.
///
/// Returns the number of lines fed once the reader is exhausted or the
/// handler stops listening.
pub async fn feed_lines<R>(reader: R, keys: mpsc::Sender<KeyEvent>) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut fed = 0;

    while let Some(line) = lines.next_line().await? {
        let read_at = Instant::now();
        let events = line
            .chars()
            .map(KeyEvent::char)
            .chain(std::iter::once(KeyEvent::enter()))
            .map(|event| event.arrived_at(read_at));
        for event in events {
            if keys.send(event).await.is_err() {
                debug!("Scan input handler stopped, closing feed");
                return Ok(fed);
            }
        }
        fed += 1;
    }

    Ok(fed)
}

/// Writes display updates to the log until the channel closes.
pub async fn log_updates(mut updates: mpsc::Receiver<DeskUpdate>) {
    while let Some(update) = updates.recv().await {
        match &update {
            DeskUpdate::Scanned(report) => info!(
                outcome = ?report.validation.outcome,
                action = report.action.as_str(),
                status = report.status.as_str(),
                message = %report.validation.message,
                "Scan"
            ),
            DeskUpdate::Unavailable { code, message } => {
                warn!(code = %code, message = %message, "Scan unavailable")
            }
            DeskUpdate::Cleared => debug!("Display cleared"),
        }
    }
}
