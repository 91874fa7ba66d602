//! Background poll loop driving the sync subsystem.
//!
//! A fixed-period timer fires for the lifetime of the process. Each tick
//! refreshes the active query (if one exists) and folds the chat list
//! into the count tracker, so data is warm before the next request
//! arrives. Tick failures are logged and abandoned; last-known-good state
//! stays visible to readers and the next tick is the retry.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::observe::SyncObserver;
use crate::service::ChatSyncService;
use crate::store::MessageStore;

/// Tick sequence numbers wrap here; they exist only for log correlation.
const TICK_SEQ_WRAP: u64 = 10_000;

/// Spawn the poll loop. Runs until `cancel` fires.
///
/// Ticks run inline on the loop task: a tick that outlives its period
/// delays the next tick instead of stacking a backlog, so a hung store
/// call never piles up pending ticks. Request-driven queries and sends
/// still proceed concurrently with a slow tick; state updates stay
/// atomic either way.
pub fn spawn_poll_loop<S, O>(
    service: Arc<ChatSyncService<S, O>>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()>
where
    S: MessageStore + 'static,
    O: SyncObserver + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut seq: u64 = 0;
        tracing::info!(period_ms = period.as_millis() as u64, "poll loop started");

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("poll loop stopped");
                    break;
                }
                _ = ticker.tick() => {
                    seq = if seq >= TICK_SEQ_WRAP { 0 } else { seq + 1 };
                    if let Err(err) = service.poll_tick(seq).await {
                        tracing::warn!(
                            tick = seq,
                            error = %err,
                            "poll tick failed, keeping last known good state"
                        );
                    }
                }
            }
        }
    })
}
