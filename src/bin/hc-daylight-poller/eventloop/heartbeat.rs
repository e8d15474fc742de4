use color_eyre::eyre::Result;
use hc_daylight_poller::{
    app_state::AppState,
    heartbeat::HeartbeatEvent,
    poller::{PollAction, PollOutcome},
};

pub async fn handle_heartbeat_event<A: PollAction>(event: HeartbeatEvent, state: &mut AppState<A>) -> Result<bool> {
    if state.should_exit {
        return Ok(false);
    }

    match event {
        HeartbeatEvent::Tick(now) => {
            state.heartbeats += 1;
            if state.poller.on_heartbeat(&now) == PollOutcome::Polled {
                state.polls += 1;
            }
        }
    }
    Ok(false)
}
