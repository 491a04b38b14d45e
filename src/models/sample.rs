use super::{Condition, TimeWindow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Hours covered by one sample of each provider shape
pub const HOURLY_SPAN: u32 = 1;
pub const LEGACY_BUCKET_SPAN: u32 = 3;
pub const DAILY_SPAN: u32 = 24;

/// Forecast for one hour (or one coarser bucket) in a uniform shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSample {
    /// Local hour of day, when the source carried a timestamp
    pub hour: Option<u32>,
    pub rain_probability: f64, // 0-100
    pub precipitation_mm: f64, // volume over `span_hours`
    pub temperature_c: f64,
    pub wind_speed: Option<f64>, // as reported, m/s with metric units
    pub condition: Option<Condition>,
    pub span_hours: u32,
}

impl NormalizedSample {
    /// Precipitation rate in mm/h over the span of this sample
    pub fn intensity_mm_per_hour(&self) -> f64 {
        self.precipitation_mm / self.span_hours.max(1) as f64
    }

    /// Measurable precipitation, or more than a 40% chance of it
    pub fn is_rain_hour(&self) -> bool {
        self.precipitation_mm > 0.0 || self.rain_probability > 40.0
    }
}

/// Samples restricted to the requested window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "samples", rename_all = "snake_case")]
pub enum WindowSamples {
    Hourly(Vec<NormalizedSample>),
    Legacy(Vec<NormalizedSample>),
    DailyFallback(NormalizedSample),
}

impl WindowSamples {
    pub fn as_slice(&self) -> &[NormalizedSample] {
        match self {
            WindowSamples::Hourly(samples) | WindowSamples::Legacy(samples) => samples,
            WindowSamples::DailyFallback(sample) => std::slice::from_ref(sample),
        }
    }

    pub fn source(&self) -> SampleSource {
        match self {
            WindowSamples::Hourly(_) => SampleSource::Hourly,
            WindowSamples::Legacy(_) => SampleSource::Legacy,
            WindowSamples::DailyFallback(_) => SampleSource::DailyFallback,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleSource {
    Hourly,
    Legacy,
    DailyFallback,
}

impl SampleSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleSource::Hourly => "hourly forecast",
            SampleSource::Legacy => "3-hour forecast",
            SampleSource::DailyFallback => "daily forecast",
        }
    }
}

/// Result of selecting a window out of a forecast payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSelection {
    pub window: TimeWindow,
    pub date: NaiveDate,
    pub date_offset: u8,
    pub samples: WindowSamples,
    /// Present-condition report, used when no sample names a condition
    pub current_condition: Option<Condition>,
}

/// Weather signals aggregated over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSignals {
    pub max_rain_probability: f64,
    pub total_precipitation_mm: f64,
    pub peak_intensity_mm_per_hour: f64,
    pub peak_wind: Option<f64>,
    pub mean_temperature_c: f64,
    pub dominant_condition: Condition,
    pub rain_hours: u32,
    pub longest_rain_run: u32,
    pub total_hours: u32,
}

impl AggregateSignals {
    /// Share of samples that count as rain hours, 0.0-1.0
    pub fn rain_hour_ratio(&self) -> f64 {
        if self.total_hours == 0 {
            0.0
        } else {
            self.rain_hours as f64 / self.total_hours as f64
        }
    }

    /// No chance of rain, no measured precipitation and no wet condition
    pub fn is_dry(&self) -> bool {
        self.max_rain_probability <= 0.0
            && self.total_precipitation_mm <= 0.0
            && !self.dominant_condition.is_wet()
    }
}
