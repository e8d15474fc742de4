pub mod app_state;
pub mod daylight_gate;
pub mod heartbeat;
pub mod poller;
pub mod settings;
pub mod sun_times;
pub mod unwrap_or_exit;
