use serde::{Deserialize, Serialize};

/// Current conditions for one location, in imperial units except wind (km/h).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReading {
    pub location: String,
    #[serde(rename = "temperatureF")]
    pub temperature_f: i64,
    pub description: String,
    pub humidity_pct: u8,
    pub wind_speed_kmh: i64,
    #[serde(rename = "feelsLikeF")]
    pub feels_like_f: i64,
}

/// Nearest whole number, with halves rounded toward positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Meters per second to kilometers per hour, rounded.
pub fn mps_to_kmh(speed_mps: f64) -> i64 {
    round_half_up(speed_mps * 3.6)
}
