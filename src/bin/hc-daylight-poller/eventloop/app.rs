use color_eyre::eyre::Result;
use hc_daylight_poller::{
    app_state::{AppEvent, AppState},
    poller::PollAction,
};

pub async fn handle_app_event<A: PollAction>(event: AppEvent, state: &mut AppState<A>) -> Result<bool> {
    match event {
        AppEvent::Exit => {
            log::info!("Shutting down...");
            state.should_exit = true;
            Ok(true)
        }
    }
}
