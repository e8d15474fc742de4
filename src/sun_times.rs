use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sun::SunPhase;
use thiserror::Error;

const MS_PER_HOUR: f64 = 3_600_000.0;
const MS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ComputationError {
    #[error("Invalid observer location: latitude {latitude}, longitude {longitude}, elevation {elevation}")]
    InvalidCoordinates {
        latitude: f64,
        longitude: f64,
        elevation: f64,
    },
    #[error("The sun does not rise or set on {date} at latitude {latitude}, longitude {longitude}")]
    NoSunEvent {
        date: NaiveDate,
        latitude: f64,
        longitude: f64,
    },
    #[error("Sun time for {date} is out of the representable range")]
    InvalidTimestamp { date: NaiveDate },
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Where the sun is observed from. Elevation is in meters above sea level.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    pub coordinates: Coordinates,
    pub elevation: f64,
}

impl Observer {
    pub fn new(coordinates: Coordinates, elevation: f64) -> Self {
        Self { coordinates, elevation }
    }

    fn is_valid(&self) -> bool {
        let Coordinates { latitude, longitude } = self.coordinates;
        latitude.is_finite()
            && longitude.is_finite()
            && self.elevation.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SunTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// Source of sunrise and sunset instants for a calendar date.
///
/// Implementations are expected to be deterministic for a given observer and date.
pub trait SunTimesProvider {
    fn sun_times(&self, observer: &Observer, date: NaiveDate) -> Result<SunTimes, ComputationError>;
}

impl<P: SunTimesProvider + ?Sized> SunTimesProvider for &P {
    fn sun_times(&self, observer: &Observer, date: NaiveDate) -> Result<SunTimes, ComputationError> {
        (**self).sun_times(observer, date)
    }
}

/// Sun times calculated with the `sun` crate.
#[derive(Debug, Default, Copy, Clone)]
pub struct SunCalc;

impl SunTimesProvider for SunCalc {
    fn sun_times(&self, observer: &Observer, date: NaiveDate) -> Result<SunTimes, ComputationError> {
        if !observer.is_valid() {
            return Err(ComputationError::InvalidCoordinates {
                latitude: observer.coordinates.latitude,
                longitude: observer.coordinates.longitude,
                elevation: observer.elevation,
            });
        }
        let Coordinates { latitude, longitude } = observer.coordinates;

        // approximate local solar noon, so both events belong to the observer's day
        let noon_ms = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis() + 12 * 3_600_000
            - (longitude / 15.0 * MS_PER_HOUR) as i64;

        // the horizon dip is only defined above sea level, lower sites see the sea-level horizon
        let height = observer.elevation.max(0.0);
        let sunrise_ms = sun::time_at_phase(noon_ms, SunPhase::Sunrise, latitude, longitude, height);
        let sunset_ms = sun::time_at_phase(noon_ms, SunPhase::Sunset, latitude, longitude, height);

        // polar day/night yields NaN internally, which ends up far away from the anchor
        let near_anchor = |ms: i64| (ms - noon_ms).abs() < MS_PER_DAY;
        if !near_anchor(sunrise_ms) || !near_anchor(sunset_ms) || sunrise_ms > sunset_ms {
            return Err(ComputationError::NoSunEvent {
                date,
                latitude,
                longitude,
            });
        }

        let to_utc = |ms: i64| {
            Utc.timestamp_millis_opt(ms)
                .single()
                .ok_or(ComputationError::InvalidTimestamp { date })
        };

        Ok(SunTimes {
            sunrise: to_utc(sunrise_ms)?,
            sunset: to_utc(sunset_ms)?,
        })
    }
}

impl SunTimes {
    /// Widens the interval by `buffer` on both ends.
    pub fn widen(&self, buffer: TimeDelta) -> SunTimes {
        SunTimes {
            sunrise: self.sunrise - buffer,
            sunset: self.sunset + buffer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn observer(latitude: f64, longitude: f64) -> Observer {
        Observer::new(Coordinates { latitude, longitude }, 0.0)
    }

    #[test]
    fn munich_midsummer_has_long_day() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let times = SunCalc.sun_times(&observer(48.137, 11.575), date).unwrap();

        assert_eq!(times.sunrise.date_naive(), date);
        assert_eq!(times.sunset.date_naive(), date);
        // roughly 05:15 local (03:15 UTC) and 21:15 local (19:15 UTC)
        assert!((2..=4).contains(&times.sunrise.hour()), "sunrise {}", times.sunrise);
        assert!((18..=20).contains(&times.sunset.hour()), "sunset {}", times.sunset);
        assert!(times.sunset - times.sunrise > TimeDelta::hours(15));
    }

    #[test]
    fn western_longitude_stays_on_requested_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        // Los Angeles: sunset is after midnight UTC, sunrise is on the requested date
        let times = SunCalc.sun_times(&observer(34.05, -118.24), date).unwrap();

        assert_eq!(times.sunrise.date_naive(), date);
        assert!(times.sunrise < times.sunset);
        assert!(times.sunset - times.sunrise < TimeDelta::hours(13));
    }

    #[test]
    fn polar_night_is_reported() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 21).unwrap();
        let err = SunCalc.sun_times(&observer(78.22, 15.65), date).unwrap_err();
        assert!(matches!(err, ComputationError::NoSunEvent { .. }), "{err}");
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        for (lat, lon) in [(91.0, 0.0), (0.0, 181.0), (f64::NAN, 0.0), (0.0, f64::INFINITY)] {
            let err = SunCalc.sun_times(&observer(lat, lon), date).unwrap_err();
            assert!(matches!(err, ComputationError::InvalidCoordinates { .. }));
        }
    }

    #[test]
    fn below_sea_level_uses_sea_level_horizon() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let amsterdam = Coordinates {
            latitude: 52.37,
            longitude: 4.89,
        };

        let below = SunCalc.sun_times(&Observer::new(amsterdam, -5.0), date).unwrap();
        let sea_level = SunCalc.sun_times(&Observer::new(amsterdam, 0.0), date).unwrap();
        assert_eq!(below, sea_level);
    }

    #[test]
    fn widen_moves_both_ends() {
        let sunrise = Utc.with_ymd_and_hms(2024, 6, 1, 6, 0, 0).unwrap();
        let sunset = Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap();
        let widened = SunTimes { sunrise, sunset }.widen(TimeDelta::minutes(30));

        assert_eq!(widened.sunrise, Utc.with_ymd_and_hms(2024, 6, 1, 5, 30, 0).unwrap());
        assert_eq!(widened.sunset, Utc.with_ymd_and_hms(2024, 6, 1, 18, 30, 0).unwrap());
    }
}
