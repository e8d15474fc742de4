use color_eyre::eyre::{self, eyre};
use once_cell::sync::Lazy;
use std::{env, str::FromStr, time::Duration};

use crate::unwrap_or_exit::UnwrapOrExit;

pub static ENV_PREFIX: Lazy<String> = Lazy::new(|| "HCDLP".to_string());

pub static SETTINGS: Lazy<Settings> = Lazy::new(Settings::default);

pub const CHANNEL_CAPACITY: usize = 1024;

fn env_name(name: &str) -> String {
    format!("{}_{}", *ENV_PREFIX, name)
}

#[derive(Debug)]
pub struct Settings {
    pub location: LocationSettings,
    pub heartbeat: Duration,
}

/// Location as supplied by the host, left unparsed so the daylight gate can report what is wrong.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationSettings {
    pub latitude: String,
    pub longitude: String,
    pub elevation: f64,
}

/// `<latitude>,<longitude>[,<elevation>]` shorthand for the location.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationShorthand {
    pub latitude: String,
    pub longitude: String,
    pub elevation: Option<f64>,
}

impl TryFrom<String> for LocationShorthand {
    type Error = eyre::Report;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let parts: Vec<&str> = s.splitn(3, ',').map(str::trim).collect();
        if parts.len() < 2 {
            return Err(eyre!("Invalid format. Use '<latitude>,<longitude>[,<elevation>]'"));
        }
        let elevation = match parts.get(2) {
            Some(elevation) => Some(elevation.parse::<f64>()?),
            None => None,
        };
        Ok(LocationShorthand {
            latitude: parts[0].to_string(),
            longitude: parts[1].to_string(),
            elevation,
        })
    }
}

impl LocationSettings {
    fn resolve(
        latitude: Option<String>,
        longitude: Option<String>,
        elevation: Option<f64>,
        shorthand: Option<LocationShorthand>,
    ) -> Self {
        let (short_lat, short_lon, short_elevation) = match shorthand {
            Some(LocationShorthand {
                latitude,
                longitude,
                elevation,
            }) => (Some(latitude), Some(longitude), elevation),
            None => (None, None, None),
        };
        Self {
            latitude: latitude.or(short_lat).unwrap_or_default(),
            longitude: longitude.or(short_lon).unwrap_or_default(),
            elevation: elevation.or(short_elevation).unwrap_or(0f64),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        let location = LocationSettings::resolve(
            optional_string_setting("LATITUDE"),
            optional_string_setting("LONGITUDE"),
            optional_number_setting("ELEVATION"),
            optional_generic_setting("LOCATION"),
        );
        let heartbeat = Duration::from_secs(number_setting("HEARTBEAT_SECS", 10u64).max(1));

        Self { location, heartbeat }
    }
}

fn optional_string_setting(name: &str) -> Option<String> {
    env::var(env_name(name)).ok()
}

fn number_setting<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    optional_number_setting(name).unwrap_or(default)
}

fn optional_number_setting<T>(name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env::var(env_name(name))
        .ok()
        .map(|value| value.trim().parse::<T>().unwrap_or_exit("Not a valid number!"))
}

fn optional_generic_setting<T>(name: &str) -> Option<T>
where
    T: TryFrom<String>,
    T::Error: std::fmt::Display,
{
    env::var(env_name(name))
        .ok()
        .map(|value| value.try_into().unwrap_or_exit("Invalid setting supplied!"))
}
