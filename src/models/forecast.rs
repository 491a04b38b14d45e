use super::Condition;
use crate::error::{ParaweroError, Result};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Forecast payload as delivered by the provider.
///
/// Two shapes are accepted:
/// - `Modern`: One Call style `current` / `hourly` / `daily` sections
/// - `Legacy`: a flat `list` of 3-hour buckets (demo and historical data)
///
/// A payload is exactly one of the two; fields are never mixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RawForecastPayload {
    Modern(OneCallForecast),
    Legacy(LegacyForecast),
}

impl RawForecastPayload {
    pub fn from_json(input: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(input)
            .map_err(|e| ParaweroError::InvalidPayloadShape(format!("not JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Detect the payload shape and decode it.
    /// `hourly` or `daily` selects the modern shape; otherwise `list` selects the legacy one.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            ParaweroError::InvalidPayloadShape("payload is not a JSON object".into())
        })?;

        let present = |key: &str| object.get(key).is_some_and(|v| !v.is_null());
        let is_modern = present("hourly") || present("daily");
        let is_legacy = present("list");

        if is_modern {
            if is_legacy {
                tracing::debug!("Payload carries both shapes, ignoring legacy `list`");
            }
            let forecast: OneCallForecast = serde_json::from_value(value).map_err(|e| {
                ParaweroError::InvalidPayloadShape(format!("malformed hourly/daily forecast: {}", e))
            })?;
            tracing::debug!(
                hourly = forecast.hourly.len(),
                daily = forecast.daily.len(),
                "Decoded modern forecast payload"
            );
            Ok(RawForecastPayload::Modern(forecast))
        } else if is_legacy {
            let forecast: LegacyForecast = serde_json::from_value(value).map_err(|e| {
                ParaweroError::InvalidPayloadShape(format!("malformed 3-hour forecast list: {}", e))
            })?;
            if forecast.list.is_empty() {
                return Err(ParaweroError::InvalidPayloadShape(
                    "3-hour forecast list is empty".into(),
                ));
            }
            tracing::debug!(buckets = forecast.list.len(), "Decoded legacy forecast payload");
            Ok(RawForecastPayload::Legacy(forecast))
        } else {
            Err(ParaweroError::InvalidPayloadShape(
                "neither hourly/daily nor list forecast present".into(),
            ))
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, RawForecastPayload::Legacy(_))
    }

    /// `at` in the forecast location's own UTC offset, when the payload carries one
    pub fn local_time(&self, at: DateTime<Utc>) -> Option<DateTime<FixedOffset>> {
        match self {
            RawForecastPayload::Modern(forecast) => forecast
                .timezone_offset
                .and_then(FixedOffset::east_opt)
                .map(|offset| at.with_timezone(&offset)),
            RawForecastPayload::Legacy(_) => None,
        }
    }
}

/// Providers send `null` for values they do not have; read those as the default
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Modern hourly/daily forecast
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneCallForecast {
    /// Seconds east of UTC at the forecast location
    #[serde(default)]
    pub timezone_offset: Option<i32>,
    #[serde(default)]
    pub current: Option<CurrentConditions>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hourly: Vec<HourlyForecast>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub daily: Vec<DailyForecast>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    #[serde(default)]
    pub dt: Option<i64>,
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weather: Vec<ConditionReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub dt: i64,
    pub temp: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pop: f64, // probability of precipitation, 0.0-1.0
    #[serde(default)]
    pub rain: Option<Precipitation>,
    #[serde(default)]
    pub wind_speed: Option<f64>, // m/s
    #[serde(default, deserialize_with = "null_as_default")]
    pub weather: Vec<ConditionReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecast {
    #[serde(default)]
    pub dt: Option<i64>,
    pub temp: DailyTemperature,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pop: f64,
    #[serde(default)]
    pub rain: Option<f64>, // mm for the whole day
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weather: Vec<ConditionReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTemperature {
    pub morn: f64,
    pub day: f64,
    pub eve: f64,
    #[serde(default)]
    pub night: Option<f64>,
}

/// Trailing precipitation volume in mm
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Precipitation {
    #[serde(rename = "1h", default)]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h", default)]
    pub three_hour: Option<f64>,
}

/// Legacy 3-hour bucket forecast
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyForecast {
    pub list: Vec<LegacyBucket>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyBucket {
    #[serde(default)]
    pub dt: Option<i64>,
    pub main: LegacyMain,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pop: f64,
    #[serde(default)]
    pub rain: Option<Precipitation>,
    #[serde(default)]
    pub wind: Option<LegacyWind>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weather: Vec<ConditionReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyMain {
    pub temp: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyWind {
    #[serde(default)]
    pub speed: Option<f64>,
}

/// One entry of a provider `weather` list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionReport {
    pub main: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl From<&ConditionReport> for Condition {
    fn from(report: &ConditionReport) -> Self {
        Condition::new(report.main.clone(), report.description.clone())
    }
}

/// First listed condition, if any
pub fn primary_condition(reports: &[ConditionReport]) -> Option<Condition> {
    reports.first().map(Condition::from)
}
