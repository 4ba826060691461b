//! Fixed-period tick source for playback.
//! Runs on its own thread and talks to the session over crossbeam channels.
//!
//! The ticker only measures time. It never touches the timeline: each tick is
//! a message the session applies on its own thread. The [`TickerHandle`]
//! returned by [`Ticker::start`] is the cancellation token; cancelling or
//! dropping it stops the thread and joins it.
//!
//! At most one tick waits in the channel. While the session is not draining,
//! further ticks are not queued; their time is folded into the next tick
//! that gets through, so no elapsed time is lost.

use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use std::thread;
use std::time::{Duration, Instant};

/// One tick of the playback clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub at: Instant,
    /// Wall-clock time since the previous delivered tick (or since start)
    pub elapsed: Duration,
}

/// Error type for the ticker
#[derive(Debug, thiserror::Error)]
pub enum TickerError {
    #[error("failed to spawn ticker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub struct Ticker;

impl Ticker {
    /// Start ticking every `period`. Ticks arrive on the returned receiver
    /// until the handle is cancelled or dropped.
    pub fn start(period: Duration) -> Result<(TickerHandle, Receiver<Tick>), TickerError> {
        let period = period.max(Duration::from_millis(1));
        let (cancel_tx, cancel_rx) = channel::bounded::<()>(1);
        let (tick_tx, tick_rx) = channel::bounded(1);

        let thread = thread::Builder::new()
            .name("playback-ticker".into())
            .spawn(move || run(period, cancel_rx, tick_tx))?;

        log::debug!("ticker started, period {:?}", period);
        Ok((
            TickerHandle {
                cancel: Some(cancel_tx),
                thread: Some(thread),
            },
            tick_rx,
        ))
    }
}

fn run(period: Duration, cancel_rx: Receiver<()>, tick_tx: Sender<Tick>) {
    let clock = channel::tick(period);
    let mut last = Instant::now();

    loop {
        crossbeam::select! {
            // A message or a dropped sender both mean stop
            recv(cancel_rx) -> _ => break,
            recv(clock) -> msg => {
                let Ok(now) = msg else { break };
                let tick = Tick {
                    at: now,
                    elapsed: now.saturating_duration_since(last),
                };
                match tick_tx.try_send(tick) {
                    Ok(()) => last = now,
                    // Keep `last`: the next tick carries this one's time too
                    Err(TrySendError::Full(_)) => {}
                    Err(TrySendError::Disconnected(_)) => break,
                }
            }
        }
    }
    log::debug!("ticker stopped");
}

/// Cancellation token for a running ticker
pub struct TickerHandle {
    cancel: Option<Sender<()>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl TickerHandle {
    pub fn is_active(&self) -> bool {
        self.thread.is_some()
    }

    /// Stop the ticker and wait for its thread. Safe to call more than once.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.try_send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("ticker thread panicked");
            }
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_arrive() {
        let (mut handle, ticks) = Ticker::start(Duration::from_millis(5)).unwrap();
        let first = ticks.recv_timeout(Duration::from_secs(2)).unwrap();
        let second = ticks.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(second.at >= first.at);
        assert!(handle.is_active());
        handle.cancel();
        assert!(!handle.is_active());
    }

    #[test]
    fn test_cancel_disconnects_receiver() {
        let (mut handle, ticks) = Ticker::start(Duration::from_millis(5)).unwrap();
        handle.cancel();
        handle.cancel();

        // Drain whatever was in flight; afterwards the channel is closed
        while ticks.try_recv().is_ok() {}
        assert!(ticks.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn test_backlog_is_bounded_and_keeps_time() {
        let started = Instant::now();
        let (mut handle, ticks) = Ticker::start(Duration::from_millis(2)).unwrap();
        std::thread::sleep(Duration::from_millis(60));
        assert!(ticks.len() <= 1);

        // The waiting tick plus the next one cover the whole stall
        let first = ticks.recv_timeout(Duration::from_secs(2)).unwrap();
        let second = ticks.recv_timeout(Duration::from_secs(2)).unwrap();
        handle.cancel();
        assert!(first.elapsed + second.elapsed >= Duration::from_millis(50));
        assert!(first.elapsed + second.elapsed <= started.elapsed());
    }

    #[test]
    fn test_drop_stops_thread() {
        let (handle, ticks) = Ticker::start(Duration::from_millis(5)).unwrap();
        drop(handle);
        while ticks.try_recv().is_ok() {}
        assert!(matches!(
            ticks.recv_timeout(Duration::from_millis(50)),
            Err(channel::RecvTimeoutError::Disconnected)
        ));
    }
}
