use color_eyre::eyre::Result;
use hc_daylight_poller::{
    app_state::{AppEvent, AppState},
    daylight_gate::DaylightGate,
    heartbeat::{run_heartbeat_task, HeartbeatHandle},
    poller::HeartbeatPoller,
    settings::{CHANNEL_CAPACITY, SETTINGS},
};
use tokio::sync::mpsc;

use crate::{eventloop::EventMultiPlexer, poll_action::LogPollAction};

pub fn initialize_app() -> Result<(EventMultiPlexer, HeartbeatHandle, AppState<LogPollAction>)> {
    let settings = &SETTINGS;

    let (app_event_sender, app_event_receiver) = mpsc::channel::<AppEvent>(CHANNEL_CAPACITY);

    // Setup daylight gate
    // =====================================================
    let mut gate = DaylightGate::new().elevation(settings.location.elevation);
    if gate
        .initialize(&settings.location.latitude, &settings.location.longitude)
        .is_err()
    {
        log::warn!("No usable location configured, polling on every heartbeat");
    }

    // Setup heartbeat
    // =====================================================
    let (heartbeat_handle, heartbeat_receiver) = run_heartbeat_task(settings.heartbeat, CHANNEL_CAPACITY);
    log::info!("Heartbeat every {:?}", settings.heartbeat);

    let event_multiplexer = EventMultiPlexer::new(app_event_receiver, heartbeat_receiver);

    Ok((
        event_multiplexer,
        heartbeat_handle,
        AppState::new(HeartbeatPoller::new(gate, LogPollAction::default()), app_event_sender),
    ))
}

pub async fn deinitialize_app(heartbeat_handle: HeartbeatHandle, state: &AppState<LogPollAction>) -> Result<()> {
    heartbeat_handle.stop().await;
    log::info!(
        "Deinitialized app after {} heartbeats and {} polls",
        state.heartbeats,
        state.polls
    );
    Ok(())
}
