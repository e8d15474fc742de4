use chrono::{DateTime, TimeZone};
use hc_daylight_poller::{daylight_gate::DaylightWindow, poller::PollAction};

/// Stand-in for the inverter read-out: records the poll in the log.
#[derive(Debug, Default)]
pub struct LogPollAction {
    last_window: Option<DaylightWindow>,
}

impl PollAction for LogPollAction {
    fn poll<Tz: TimeZone>(&mut self, now: &DateTime<Tz>, window: Option<&DaylightWindow>) {
        log::info!("Polling inverter at {}", now.naive_local());

        if window != self.last_window.as_ref() {
            match window.map(serde_json::to_string).transpose() {
                Ok(Some(json)) => log::debug!("Daylight window: {}", json),
                Ok(None) => log::debug!("No daylight window, polling unconditionally"),
                Err(err) => log::warn!("Cannot serialize daylight window: {}", err),
            }
            self.last_window = window.copied();
        }
    }
}
