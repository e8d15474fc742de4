use tokio::sync::mpsc::Sender;

use crate::{
    poller::{HeartbeatPoller, PollAction},
    sun_times::SunCalc,
};

#[derive(Debug)]
pub enum AppEvent {
    Exit,
}

pub struct AppState<A: PollAction> {
    pub poller: HeartbeatPoller<SunCalc, A>,
    pub app_event_sender: Sender<AppEvent>,
    pub should_exit: bool,
    pub heartbeats: u64,
    pub polls: u64,
}

impl<A: PollAction> AppState<A> {
    pub fn new(poller: HeartbeatPoller<SunCalc, A>, app_event_sender: Sender<AppEvent>) -> Self {
        Self {
            poller,
            app_event_sender,
            should_exit: false,
            heartbeats: 0,
            polls: 0,
        }
    }
}
