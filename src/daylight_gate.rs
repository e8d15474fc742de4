use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::sun_times::{Coordinates, Observer, SunCalc, SunTimesProvider};

/// Polling starts this long before sunrise and stops this long after sunset.
pub const DAYLIGHT_BUFFER_MINUTES: i64 = 30;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Location not set. Please configure {0}")]
    MissingLocation(&'static str),
    #[error("Invalid {field}: [{value}] - {source}")]
    InvalidCoordinate {
        field: &'static str,
        value: String,
        source: std::num::ParseFloatError,
    },
}

/// Buffered daylight interval for one calendar date.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct DaylightWindow {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub computed_for: NaiveDate,
}

impl DaylightWindow {
    pub fn contains<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        let now = now.with_timezone(&Utc);
        self.sunrise <= now && now <= self.sunset
    }
}

#[derive(Debug, Clone)]
pub enum GateState {
    Uninitialized,
    Ready {
        observer: Observer,
        window: Option<DaylightWindow>,
    },
}

/// Decides on every heartbeat whether the inverter should be polled.
///
/// The gate fails open: whenever it cannot tell whether it is daylight (not configured,
/// sun times not computable) it answers `true`, so a reading is never silently missed.
#[derive(Debug)]
pub struct DaylightGate<P = SunCalc> {
    provider: P,
    elevation: f64,
    state: GateState,
}

impl DaylightGate<SunCalc> {
    pub fn new() -> Self {
        Self::with_provider(SunCalc)
    }
}

impl Default for DaylightGate<SunCalc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SunTimesProvider> DaylightGate<P> {
    pub fn with_provider(provider: P) -> Self {
        Self {
            provider,
            elevation: 0.0,
            state: GateState::Uninitialized,
        }
    }

    /// Observer elevation in meters, used for the next computed window.
    pub fn elevation(mut self, elevation: f64) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn initialize(&mut self, latitude_raw: &str, longitude_raw: &str) -> Result<(), ConfigurationError> {
        let coordinates = match parse_coordinates(latitude_raw, longitude_raw) {
            Ok(coordinates) => coordinates,
            Err(err) => {
                log::error!("Error initializing daylight gate: {}", err);
                return Err(err);
            }
        };

        log::debug!(
            "Daylight gate initialized with location: {}, {}",
            coordinates.latitude,
            coordinates.longitude
        );
        self.state = GateState::Ready {
            observer: Observer::new(coordinates, self.elevation),
            window: None,
        };
        Ok(())
    }

    pub fn should_poll<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> bool {
        let GateState::Ready { observer, window } = &mut self.state else {
            log::error!("Daylight gate used before a location was configured, polling anyway");
            return true;
        };

        let today = now.date_naive();
        let cached = window.filter(|current| current.computed_for == today);
        let current = match cached {
            Some(current) => current,
            None => match self.provider.sun_times(observer, today) {
                Ok(sun_times) => {
                    let buffered = sun_times.widen(TimeDelta::minutes(DAYLIGHT_BUFFER_MINUTES));
                    let fresh = DaylightWindow {
                        sunrise: buffered.sunrise,
                        sunset: buffered.sunset,
                        computed_for: today,
                    };
                    log::debug!(
                        "Updated sun times for {} - Sunrise: {}, Sunset: {}",
                        today,
                        fresh.sunrise.with_timezone(&now.timezone()).time(),
                        fresh.sunset.with_timezone(&now.timezone()).time()
                    );
                    *window = Some(fresh);
                    fresh
                }
                Err(err) => {
                    log::error!("Error checking daylight hours: {}", err);
                    *window = None;
                    return true;
                }
            },
        };

        let should_poll = current.contains(now);
        if !should_poll {
            log::debug!(
                "Skipping poll - outside daylight hours (+/- {}min buffer)",
                DAYLIGHT_BUFFER_MINUTES
            );
        }
        should_poll
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, GateState::Ready { .. })
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// The window used by the last decision. `None` before the first computation and after a
    /// failed one.
    pub fn window(&self) -> Option<&DaylightWindow> {
        match &self.state {
            GateState::Ready { window, .. } => window.as_ref(),
            GateState::Uninitialized => None,
        }
    }
}

fn parse_coordinates(latitude_raw: &str, longitude_raw: &str) -> Result<Coordinates, ConfigurationError> {
    Ok(Coordinates {
        latitude: parse_coordinate("latitude", latitude_raw)?,
        longitude: parse_coordinate("longitude", longitude_raw)?,
    })
}

fn parse_coordinate(field: &'static str, raw: &str) -> Result<f64, ConfigurationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConfigurationError::MissingLocation(field));
    }
    raw.parse::<f64>()
        .map_err(|source| ConfigurationError::InvalidCoordinate {
            field,
            value: raw.to_string(),
            source,
        })
}
