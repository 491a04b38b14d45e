use crate::error::{ParaweroError, Result};
use crate::models::{
    primary_condition, DailyForecast, HourlyForecast, LegacyBucket, LegacyForecast,
    NormalizedSample, OneCallForecast, RawForecastPayload, TimeWindow, WindowSamples,
    WindowSelection, DAILY_SPAN, HOURLY_SPAN, LEGACY_BUCKET_SPAN,
};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Timelike};

/// Restrict a forecast payload to the samples covering `window`.
///
/// `now` is the caller's current instant in the timezone the windows are
/// interpreted in; it is never read from the system clock here.
pub fn select_window<Tz: TimeZone>(
    payload: &RawForecastPayload,
    window: TimeWindow,
    now: &DateTime<Tz>,
) -> Result<WindowSelection> {
    match payload {
        RawForecastPayload::Modern(forecast) => select_modern(forecast, window, now),
        RawForecastPayload::Legacy(forecast) => Ok(select_legacy(forecast, window, now)),
    }
}

fn select_modern<Tz: TimeZone>(
    forecast: &OneCallForecast,
    window: TimeWindow,
    now: &DateTime<Tz>,
) -> Result<WindowSelection> {
    let tz = now.timezone();
    let current_hour = now.hour();
    let (start_hour, end_hour) = window.hours(current_hour);
    let date_offset = window.date_offset(current_hour);
    let date = now.date_naive() + Days::new(u64::from(date_offset));

    let start = local_instant(&tz, date, start_hour, 0, 0, 0)?;
    let end = local_instant(&tz, date, end_hour - 1, 59, 59, 999)?;

    tracing::debug!(
        %window,
        date_offset,
        start = ?start,
        end = ?end,
        "Resolved forecast window"
    );

    let hourly: Vec<NormalizedSample> = forecast
        .hourly
        .iter()
        .filter_map(|hour| {
            let at = tz.timestamp_opt(hour.dt, 0).single()?;
            (at >= start && at <= end).then(|| normalize_hourly(hour, at.hour()))
        })
        .collect();

    let current_condition = forecast
        .current
        .as_ref()
        .and_then(|c| primary_condition(&c.weather));

    let samples = if !hourly.is_empty() {
        WindowSamples::Hourly(hourly)
    } else if let Some(day) = forecast.daily.get(usize::from(date_offset)) {
        tracing::info!(%window, date_offset, "No hourly forecast in window, using daily forecast");
        WindowSamples::DailyFallback(normalize_daily(day, window))
    } else {
        return Err(ParaweroError::EmptyWindowNoFallback {
            window,
            date_offset,
        });
    };

    Ok(WindowSelection {
        window,
        date,
        date_offset,
        samples,
        current_condition,
    })
}

/// 3-hour buckets carry no per-window granularity, so every bucket is used
/// whatever window was asked for and the date never shifts.
fn select_legacy<Tz: TimeZone>(
    forecast: &LegacyForecast,
    window: TimeWindow,
    now: &DateTime<Tz>,
) -> WindowSelection {
    let tz = now.timezone();
    tracing::debug!(
        %window,
        buckets = forecast.list.len(),
        "3-hour forecast ignores the requested window"
    );

    let samples = forecast
        .list
        .iter()
        .map(|bucket| normalize_bucket(bucket, &tz))
        .collect();

    WindowSelection {
        window,
        date: now.date_naive(),
        date_offset: 0,
        samples: WindowSamples::Legacy(samples),
        current_condition: None,
    }
}

fn local_instant<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    hour: u32,
    minute: u32,
    second: u32,
    milli: u32,
) -> Result<DateTime<Tz>> {
    let time = NaiveTime::from_hms_milli_opt(hour, minute, second, milli)
        .ok_or_else(|| ParaweroError::InvalidWindow(format!("hour {} out of range", hour)))?;
    let naive = date.and_time(time);
    // A local time skipped by a DST jump has no mapping; read it as UTC instead
    Ok(tz
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive)))
}

fn normalize_hourly(hour: &HourlyForecast, local_hour: u32) -> NormalizedSample {
    NormalizedSample {
        hour: Some(local_hour),
        rain_probability: hour.pop * 100.0,
        precipitation_mm: hour.rain.as_ref().and_then(|r| r.one_hour).unwrap_or(0.0),
        temperature_c: hour.temp,
        wind_speed: hour.wind_speed,
        condition: primary_condition(&hour.weather),
        span_hours: HOURLY_SPAN,
    }
}

fn normalize_daily(day: &DailyForecast, window: TimeWindow) -> NormalizedSample {
    let temperature_c = match window {
        TimeWindow::Morning => day.temp.morn,
        TimeWindow::Afternoon | TimeWindow::Today => day.temp.day,
        TimeWindow::Evening => day.temp.eve,
    };

    NormalizedSample {
        hour: None,
        rain_probability: day.pop * 100.0,
        precipitation_mm: day.rain.unwrap_or(0.0),
        temperature_c,
        wind_speed: day.wind_speed,
        condition: primary_condition(&day.weather),
        span_hours: DAILY_SPAN,
    }
}

fn normalize_bucket<Tz: TimeZone>(bucket: &LegacyBucket, tz: &Tz) -> NormalizedSample {
    NormalizedSample {
        hour: bucket
            .dt
            .and_then(|dt| tz.timestamp_opt(dt, 0).single())
            .map(|at| at.hour()),
        rain_probability: bucket.pop * 100.0,
        precipitation_mm: bucket
            .rain
            .as_ref()
            .and_then(|r| r.three_hour)
            .unwrap_or(0.0),
        temperature_c: bucket.main.temp,
        wind_speed: bucket.wind.as_ref().and_then(|w| w.speed),
        condition: primary_condition(&bucket.weather),
        span_hours: LEGACY_BUCKET_SPAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SampleSource;
    use chrono::FixedOffset;
    use serde_json::{json, Value};

    fn madrid() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<FixedOffset> {
        madrid()
            .with_ymd_and_hms(2026, 10, day, hour, minute, 0)
            .unwrap()
    }

    fn hourly_entry(day: u32, hour: u32, pop: f64) -> Value {
        json!({
            "dt": at(day, hour, 0).timestamp(),
            "temp": 10.0 + hour as f64,
            "pop": pop,
            "wind_speed": 5.0,
            "weather": [{ "main": "Clouds", "description": "broken clouds" }]
        })
    }

    fn daily_entry(pop: f64, rain: Option<f64>) -> Value {
        let mut day = json!({
            "temp": { "morn": 8.0, "day": 16.0, "eve": 12.0, "night": 9.0 },
            "pop": pop,
            "wind_speed": 4.0,
            "weather": [{ "main": "Rain", "description": "light rain" }]
        });
        if let Some(mm) = rain {
            day["rain"] = json!(mm);
        }
        day
    }

    /// Hourly data for the 19th from `from_hour` to the end of the 20th
    fn modern_payload(from_hour: u32, daily: Vec<Value>) -> RawForecastPayload {
        let mut hourly = Vec::new();
        for hour in from_hour..24 {
            hourly.push(hourly_entry(19, hour, 0.1));
        }
        for hour in 0..24 {
            hourly.push(hourly_entry(20, hour, 0.2));
        }
        RawForecastPayload::from_value(json!({
            "current": { "temp": 14.0, "weather": [{ "main": "Clear", "description": "clear sky" }] },
            "hourly": hourly,
            "daily": daily
        }))
        .unwrap()
    }

    fn hours_of(selection: &WindowSelection) -> Vec<u32> {
        selection
            .samples
            .as_slice()
            .iter()
            .filter_map(|s| s.hour)
            .collect()
    }

    #[test]
    fn morning_keeps_only_hours_before_noon() {
        let payload = modern_payload(9, vec![]);
        let selection = select_window(&payload, TimeWindow::Morning, &at(19, 9, 30)).unwrap();

        assert_eq!(selection.date_offset, 0);
        assert_eq!(selection.date, at(19, 0, 0).date_naive());
        assert_eq!(hours_of(&selection), vec![9, 10, 11]);
        assert_eq!(selection.samples.source(), SampleSource::Hourly);
    }

    #[test]
    fn past_window_moves_to_next_day() {
        let payload = modern_payload(19, vec![]);
        let selection = select_window(&payload, TimeWindow::Afternoon, &at(19, 19, 5)).unwrap();

        assert_eq!(selection.date_offset, 1);
        assert_eq!(selection.date, at(20, 0, 0).date_naive());
        assert_eq!(hours_of(&selection), vec![12, 13, 14, 15, 16, 17]);
        // next-day samples come from the 20th (pop 0.2)
        assert!(selection
            .samples
            .as_slice()
            .iter()
            .all(|s| (s.rain_probability - 20.0).abs() < 1e-9));
    }

    #[test]
    fn today_runs_from_current_hour_to_midnight() {
        let payload = modern_payload(15, vec![]);
        let selection = select_window(&payload, TimeWindow::Today, &at(19, 15, 40)).unwrap();

        assert_eq!(selection.date_offset, 0);
        assert_eq!(hours_of(&selection), (15..24).collect::<Vec<_>>());
    }

    #[test]
    fn hourly_samples_are_normalized() {
        let payload = RawForecastPayload::from_value(json!({
            "hourly": [{
                "dt": at(19, 13, 0).timestamp(),
                "temp": 17.5,
                "pop": 0.65,
                "rain": { "1h": 1.5 },
                "wind_speed": 10.0,
                "weather": [
                    { "main": "Rain", "description": "moderate rain" },
                    { "main": "Clouds", "description": "overcast clouds" }
                ]
            }]
        }))
        .unwrap();
        let selection = select_window(&payload, TimeWindow::Afternoon, &at(19, 12, 0)).unwrap();
        let sample = &selection.samples.as_slice()[0];

        assert!((sample.rain_probability - 65.0).abs() < 1e-9);
        assert_eq!(sample.precipitation_mm, 1.5);
        assert_eq!(sample.wind_speed, Some(10.0));
        assert_eq!(sample.condition.as_ref().unwrap().label, "Rain");
        assert_eq!(sample.span_hours, 1);
    }

    #[test]
    fn falls_back_to_next_day_daily_forecast() {
        let payload = RawForecastPayload::from_value(json!({
            "hourly": [],
            "daily": [daily_entry(0.1, None), daily_entry(0.5, Some(0.0))]
        }))
        .unwrap();
        let selection = select_window(&payload, TimeWindow::Afternoon, &at(19, 20, 0)).unwrap();

        assert_eq!(selection.date_offset, 1);
        let WindowSamples::DailyFallback(sample) = &selection.samples else {
            panic!("expected daily fallback");
        };
        assert!((sample.rain_probability - 50.0).abs() < 1e-9);
        assert_eq!(sample.precipitation_mm, 0.0);
        assert_eq!(sample.temperature_c, 16.0);
        assert_eq!(sample.span_hours, 24);
    }

    #[test]
    fn daily_fallback_uses_period_temperature() {
        let payload = RawForecastPayload::from_value(json!({
            "daily": [daily_entry(0.5, Some(2.4))]
        }))
        .unwrap();

        let evening = select_window(&payload, TimeWindow::Evening, &at(19, 20, 0)).unwrap();
        assert_eq!(evening.samples.as_slice()[0].temperature_c, 12.0);

        let morning = select_window(&payload, TimeWindow::Morning, &at(19, 7, 0)).unwrap();
        assert_eq!(morning.samples.as_slice()[0].temperature_c, 8.0);

        let today = select_window(&payload, TimeWindow::Today, &at(19, 7, 0)).unwrap();
        assert_eq!(today.samples.as_slice()[0].temperature_c, 16.0);
        assert_eq!(today.samples.as_slice()[0].precipitation_mm, 2.4);
    }

    #[test]
    fn empty_window_without_daily_fails() {
        let payload = RawForecastPayload::from_value(json!({
            "hourly": [hourly_entry(19, 8, 0.0)],
            "daily": [daily_entry(0.1, None)]
        }))
        .unwrap();

        // afternoon at 19:00 needs daily[1], which is missing
        let err = select_window(&payload, TimeWindow::Afternoon, &at(19, 19, 0)).unwrap_err();
        assert!(matches!(
            err,
            ParaweroError::EmptyWindowNoFallback {
                window: TimeWindow::Afternoon,
                date_offset: 1
            }
        ));
    }

    #[test]
    fn legacy_payload_ignores_window() {
        let payload = RawForecastPayload::from_value(json!({
            "list": [
                { "main": { "temp": 11.0 }, "pop": 0.3, "weather": [] },
                { "main": { "temp": 13.0 }, "pop": 0.7, "rain": { "3h": 2.1 },
                  "wind": { "speed": 2.0 },
                  "weather": [{ "main": "Rain", "description": "light rain" }] },
                { "main": { "temp": 9.0 } }
            ]
        }))
        .unwrap();

        for window in TimeWindow::ALL {
            let selection = select_window(&payload, window, &at(19, 21, 0)).unwrap();
            assert_eq!(selection.date_offset, 0);
            assert_eq!(selection.samples.source(), SampleSource::Legacy);
            assert_eq!(selection.samples.as_slice().len(), 3);
        }

        let selection = select_window(&payload, TimeWindow::Morning, &at(19, 21, 0)).unwrap();
        let bucket = &selection.samples.as_slice()[1];
        assert_eq!(bucket.precipitation_mm, 2.1);
        assert_eq!(bucket.span_hours, 3);
        assert_eq!(bucket.wind_speed, Some(2.0));
    }

    #[test]
    fn keeps_current_condition_for_later_fallback() {
        let payload = modern_payload(9, vec![]);
        let selection = select_window(&payload, TimeWindow::Morning, &at(19, 9, 0)).unwrap();
        assert_eq!(selection.current_condition.unwrap().label, "Clear");
    }
}
