use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::{
    sync::{mpsc, watch},
    time::MissedTickBehavior,
};

#[derive(Debug, Clone)]
pub enum HeartbeatEvent {
    Tick(DateTime<Local>),
}

#[derive(Debug)]
pub struct HeartbeatHandle {
    stop_sender: watch::Sender<bool>, // Shutdown signal
    handle: tokio::task::JoinHandle<()>,
}

impl HeartbeatHandle {
    /// Stops the heartbeat task.
    pub async fn stop(self) {
        let _ = self.stop_sender.send(true);
        let _ = self.handle.await;
    }
}

/// Starts a task that emits a tick every `interval`, the first one right away.
///
/// Ticks missed while the receiver was busy are skipped instead of being delivered in a burst.
/// The task ends when stopped or when the receiver is dropped.
pub fn run_heartbeat_task(interval: Duration, channel_size: usize) -> (HeartbeatHandle, mpsc::Receiver<HeartbeatEvent>) {
    let (event_sender, event_receiver) = mpsc::channel(channel_size);
    let (stop_sender, mut stop_receiver) = watch::channel(false);

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                changed = stop_receiver.changed() => {
                    if changed.is_err() || *stop_receiver.borrow() {
                        log::debug!("Stopping heartbeat task...");
                        break;
                    }
                }

                _ = ticker.tick() => {
                    let now = Local::now();
                    log::trace!("Heartbeat at {}", now);
                    if event_sender.send(HeartbeatEvent::Tick(now)).await.is_err() {
                        log::debug!("Heartbeat receiver closed, exiting heartbeat task");
                        break;
                    }
                }
            }
        }
    });

    (HeartbeatHandle { stop_sender, handle }, event_receiver)
}
