use chrono::{DateTime, TimeZone};

use crate::{
    daylight_gate::{DaylightGate, DaylightWindow},
    sun_times::SunTimesProvider,
};

/// The action run on a heartbeat while it is daylight, e.g. reading the inverter.
pub trait PollAction {
    fn poll<Tz: TimeZone>(&mut self, now: &DateTime<Tz>, window: Option<&DaylightWindow>);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Polled,
    Skipped,
}

/// Couples a [`DaylightGate`] with the action it guards.
#[derive(Debug)]
pub struct HeartbeatPoller<P, A> {
    gate: DaylightGate<P>,
    action: A,
}

impl<P: SunTimesProvider, A: PollAction> HeartbeatPoller<P, A> {
    pub fn new(gate: DaylightGate<P>, action: A) -> Self {
        Self { gate, action }
    }

    pub fn on_heartbeat<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> PollOutcome {
        if !self.gate.should_poll(now) {
            return PollOutcome::Skipped;
        }
        self.action.poll(now, self.gate.window());
        PollOutcome::Polled
    }

    pub fn gate(&self) -> &DaylightGate<P> {
        &self.gate
    }

    pub fn action(&self) -> &A {
        &self.action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, Utc};

    #[derive(Default)]
    struct CountingAction {
        polls: usize,
    }

    impl PollAction for CountingAction {
        fn poll<Tz: TimeZone>(&mut self, _now: &DateTime<Tz>, _window: Option<&DaylightWindow>) {
            self.polls += 1;
        }
    }

    #[test]
    fn unconfigured_gate_still_polls() {
        let mut poller = HeartbeatPoller::new(DaylightGate::new(), CountingAction::default());

        assert_eq!(poller.on_heartbeat(&Local::now()), PollOutcome::Polled);
        assert_eq!(poller.action().polls, 1);
    }

    #[test]
    fn night_heartbeat_is_skipped() {
        let mut gate = DaylightGate::new();
        gate.initialize("48.137", "11.575").unwrap();
        let mut poller = HeartbeatPoller::new(gate, CountingAction::default());

        let midnight = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(poller.on_heartbeat(&midnight), PollOutcome::Skipped);
        assert_eq!(poller.action().polls, 0);
        assert!(poller.gate().window().is_some());
    }
}
