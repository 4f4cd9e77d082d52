use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::ws::manager::WsManager;

/// Interval between heartbeat pings.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Spawn the heartbeat task.
///
/// Each tick drops connections whose outbound channel has closed, then
/// pings the rest. Exits when `shutdown` is cancelled.
pub fn start_heartbeat(
    ws_manager: Arc<WsManager>,
    interval: Duration,
    shutdown: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let pruned = ws_manager.prune_closed().await;
            let pinged = ws_manager.ping_all().await;
            tracing::debug!(pinged, pruned, "WebSocket heartbeat");
        }
        tracing::debug!("WebSocket heartbeat stopped");
    })
}
