//! Periodic check scheduling.
//!
//! An owned tick source replaces the original design's process-wide
//! timer: the caller holds the handle, receives ticks over a channel,
//! and shuts the task down explicitly. Ticks fire at a fixed interval
//! (the first immediately on spawn) and once per reported save event
//! after a short debounce delay. A pending debounced tick is never
//! coalesced or cancelled - a later save simply produces another tick.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::debug;

/// Why a tick fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The periodic interval elapsed.
    Interval,
    /// A document save was reported and the debounce delay passed.
    SaveDebounced,
}

/// Handle to the spawned tick source.
///
/// Dropping the handle without calling [`Scheduler::shutdown`] also
/// stops the task once the tick channel closes, but shutdown is the
/// intended teardown path.
pub struct Scheduler {
    ticks: mpsc::Receiver<Tick>,
    saves: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl Scheduler {
    /// Spawn the tick source. The first interval tick fires immediately,
    /// mirroring a check-on-startup loop.
    pub fn spawn(period: Duration, debounce: Duration) -> Self {
        let (tick_tx, ticks) = mpsc::channel(16);
        let (saves, mut save_rx) = mpsc::channel::<()>(16);

        let handle = tokio::spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        if tick_tx.send(Tick::Interval).await.is_err() {
                            break;
                        }
                    }
                    event = save_rx.recv() => match event {
                        Some(()) => {
                            sleep(debounce).await;
                            if tick_tx.send(Tick::SaveDebounced).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
            }
            debug!("scheduler task stopped");
        });

        Self {
            ticks,
            saves,
            handle,
        }
    }

    /// Sender used to report document save events.
    pub fn save_events(&self) -> mpsc::Sender<()> {
        self.saves.clone()
    }

    /// Wait for the next tick. Returns `None` after shutdown.
    pub async fn next_tick(&mut self) -> Option<Tick> {
        self.ticks.recv().await
    }

    /// Stop the tick source. No further ticks are delivered.
    pub fn shutdown(self) {
        self.handle.abort();
    }
}
