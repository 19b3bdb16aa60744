//! Headless driver
//!
//! Runs a queue without a terminal: Enter on every page, acknowledging
//! errors, until the queue finishes. Fetches go through worker threads and
//! the channel exactly as they do in the interactive loop.

use crate::wizard::{Key, Msg, PageState, Queue};
use anyhow::{Context, bail};
use std::sync::mpsc;
use std::time::Duration;
use tracing::{info, warn};

/// Recoveries allowed before giving up
pub const MAX_RECOVERIES: usize = 3;

/// Longest wait for a single fetch result
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(120);

/// Drive `queue` to a final status, accepting every default.
///
/// Returns an error when a page cannot be answered by its default, when a
/// fetch never reports back, or after `max_recoveries` error recoveries.
pub fn run_headless(queue: &mut Queue, max_recoveries: usize) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel::<Msg>();
    let commands = queue.init()?.into_commands();
    queue.spawn(commands, &tx);

    let mut recoveries = 0;
    while !queue.is_finished() {
        let (key, epoch, state) = match queue.current() {
            Some(page) => (page.key.clone(), page.epoch(), page.state()),
            None => break,
        };

        let msg = match state {
            PageState::Idle | PageState::AwaitingResult => rx
                .recv_timeout(FETCH_TIMEOUT)
                .with_context(|| format!("no result for page '{key}'"))?,
            PageState::Error => {
                recoveries += 1;
                let message = queue
                    .current()
                    .and_then(|p| p.error())
                    .map(|e| e.message.clone())
                    .unwrap_or_default();
                if recoveries > max_recoveries {
                    bail!("gave up after {max_recoveries} recoveries, last error on '{key}': {message}");
                }
                warn!(page = %key, recoveries, %message, "Acknowledging error");
                Msg::Key(Key::Enter)
            }
            PageState::Displaying => Msg::Key(Key::Enter),
        };

        let pressed_enter = matches!(msg, Msg::Key(Key::Enter)) && state == PageState::Displaying;
        let commands = queue.dispatch(msg)?;
        queue.spawn(commands, &tx);

        if pressed_enter {
            let stuck = queue.current().is_some_and(|p| {
                p.key == key && p.epoch() == epoch && p.state() == PageState::Displaying
            });
            if stuck {
                let notice = queue.current().and_then(|p| p.input_notice()).unwrap_or("no default");
                bail!("page '{key}' needs an answer: {notice}");
            }
        }
    }

    info!(status = ?queue.status(), recoveries, "Headless run finished");
    Ok(())
}
