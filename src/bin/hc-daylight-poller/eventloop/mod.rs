use std::time::Duration;

use color_eyre::eyre::Result;
use hc_daylight_poller::{
    app_state::{AppEvent, AppState},
    heartbeat::HeartbeatEvent,
};
use heartbeat::handle_heartbeat_event;
use tokio::sync::mpsc::Receiver;

use crate::poll_action::LogPollAction;

mod app;
mod heartbeat;

pub use app::*;

#[derive(Debug)]
pub enum Event {
    App(AppEvent),
    Heartbeat(HeartbeatEvent),
    Timeout,
    None,
}

/// Merges the event sources of the application into a single stream.
pub struct EventMultiPlexer {
    app: Receiver<AppEvent>,
    heartbeat: Receiver<HeartbeatEvent>,
}

impl EventMultiPlexer {
    pub fn new(app: Receiver<AppEvent>, heartbeat: Receiver<HeartbeatEvent>) -> Self {
        Self { app, heartbeat }
    }

    pub async fn next(&mut self, timeout_secs: u64) -> Event {
        tokio::select! {
            Some(event) = self.app.recv() => Event::App(event),
            Some(event) = self.heartbeat.recv() => Event::Heartbeat(event),
            _ = tokio::time::sleep(Duration::from_secs(timeout_secs)) => Event::Timeout,
            else => Event::None,
        }
    }
}

pub async fn run_event_loop(event_multiplexer: &mut EventMultiPlexer, state: &mut AppState<LogPollAction>) -> Result<()> {
    loop {
        let exit = match event_multiplexer.next(60).await {
            Event::App(app_event) => handle_app_event(app_event, state).await?,
            Event::Heartbeat(heartbeat_event) => handle_heartbeat_event(heartbeat_event, state).await?,
            Event::Timeout => state.should_exit,
            Event::None => true,
        };

        if exit {
            break;
        }
    }
    log::debug!("Exiting application event loop");
    Ok(())
}
