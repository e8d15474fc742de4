use std::sync::Mutex;

use chrono::{NaiveDate, TimeZone, Utc};
use hc_daylight_poller::{
    daylight_gate::DaylightGate,
    sun_times::{ComputationError, Observer, SunTimes, SunTimesProvider},
};
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Keeps every record so tests can check what the gate reported.
struct CapturingLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut records) = self.records.lock() {
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger {
    records: Mutex::new(Vec::new()),
};

fn captured_errors() -> Vec<String> {
    LOGGER
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(level, _)| *level == Level::Error)
        .map(|(_, msg)| msg.clone())
        .collect()
}

struct NoSun;

impl SunTimesProvider for NoSun {
    fn sun_times(&self, observer: &Observer, date: NaiveDate) -> Result<SunTimes, ComputationError> {
        Err(ComputationError::NoSunEvent {
            date,
            latitude: observer.coordinates.latitude,
            longitude: observer.coordinates.longitude,
        })
    }
}

// single test per binary: the logger is process global
#[test]
fn fail_open_decisions_are_logged_as_errors() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let mut unconfigured = DaylightGate::with_provider(NoSun);
    assert!(unconfigured.should_poll(&Utc.with_ymd_and_hms(2024, 12, 21, 0, 0, 0).unwrap()));
    let errors = captured_errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("before a location was configured"), "{errors:?}");

    let mut gate = DaylightGate::with_provider(NoSun);
    gate.initialize("78.22", "15.65").unwrap();
    assert!(gate.should_poll(&Utc.with_ymd_and_hms(2024, 12, 21, 0, 0, 0).unwrap()));
    let errors = captured_errors();
    assert_eq!(errors.len(), 2);
    assert!(errors[1].contains("Error checking daylight hours"), "{errors:?}");
    assert!(errors[1].contains("does not rise or set on 2024-12-21"), "{errors:?}");
}
