use crate::models::{AggregateSignals, Condition, NormalizedSample, WindowSelection};

/// Aggregate the samples of a selected window
pub fn aggregate_selection(selection: &WindowSelection) -> AggregateSignals {
    aggregate(
        selection.samples.as_slice(),
        selection.current_condition.as_ref(),
    )
}

/// Fold chronologically ordered samples into window-level signals.
///
/// `fallback_condition` stands in when no sample names a condition; after
/// that the clear-sky placeholder is used.
pub fn aggregate(
    samples: &[NormalizedSample],
    fallback_condition: Option<&Condition>,
) -> AggregateSignals {
    let mut max_rain_probability: f64 = 0.0;
    let mut total_precipitation_mm = 0.0;
    let mut peak_intensity_mm_per_hour: f64 = 0.0;
    let mut peak_wind: Option<f64> = None;
    let mut temperature_sum = 0.0;
    let mut dominant: Option<&Condition> = None;
    let mut rain_hours = 0;
    let mut current_run = 0;
    let mut longest_rain_run = 0;
    let mut previous_was_rain = false;

    for sample in samples {
        max_rain_probability = max_rain_probability.max(sample.rain_probability);
        total_precipitation_mm += sample.precipitation_mm;
        peak_intensity_mm_per_hour = peak_intensity_mm_per_hour.max(sample.intensity_mm_per_hour());
        temperature_sum += sample.temperature_c;

        if let Some(wind) = sample.wind_speed {
            peak_wind = Some(peak_wind.map_or(wind, |peak| peak.max(wind)));
        }

        // Latest wet condition wins; a dry one only fills an empty slot
        if let Some(condition) = &sample.condition {
            if condition.is_wet() || dominant.is_none() {
                dominant = Some(condition);
            }
        }

        if sample.is_rain_hour() {
            rain_hours += 1;
            current_run = if previous_was_rain { current_run + 1 } else { 1 };
            longest_rain_run = longest_rain_run.max(current_run);
            previous_was_rain = true;
        } else {
            previous_was_rain = false;
        }
    }

    let mean_temperature_c = if samples.is_empty() {
        0.0
    } else {
        temperature_sum / samples.len() as f64
    };

    let dominant_condition = dominant
        .or(fallback_condition)
        .cloned()
        .unwrap_or_else(Condition::placeholder);

    AggregateSignals {
        max_rain_probability,
        total_precipitation_mm,
        peak_intensity_mm_per_hour,
        peak_wind,
        mean_temperature_c,
        dominant_condition,
        rain_hours,
        longest_rain_run,
        total_hours: samples.len() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(pop: f64, mm: f64, condition: Option<(&str, &str)>) -> NormalizedSample {
        NormalizedSample {
            hour: None,
            rain_probability: pop,
            precipitation_mm: mm,
            temperature_c: 10.0,
            wind_speed: None,
            condition: condition.map(|(label, desc)| Condition::new(label, desc)),
            span_hours: 1,
        }
    }

    fn clear() -> Option<(&'static str, &'static str)> {
        Some(("Clear", "clear sky"))
    }

    #[test]
    fn wet_condition_overwrites_earlier_ones() {
        let samples = vec![
            sample(0.0, 0.0, clear()),
            sample(60.0, 0.5, Some(("Rain", "light rain"))),
            sample(0.0, 0.0, clear()),
        ];
        let signals = aggregate(&samples, None);
        assert_eq!(signals.dominant_condition.label, "Rain");
    }

    #[test]
    fn first_dry_condition_is_kept() {
        let samples = vec![sample(0.0, 0.0, clear()), sample(0.0, 0.0, Some(("Mist", "mist")))];
        let signals = aggregate(&samples, None);
        assert_eq!(signals.dominant_condition.label, "Clear");
    }

    #[test]
    fn latest_wet_condition_wins() {
        let samples = vec![
            sample(90.0, 3.0, Some(("Thunderstorm", "thunderstorm"))),
            sample(50.0, 0.2, Some(("Drizzle", "light intensity drizzle"))),
        ];
        let signals = aggregate(&samples, None);
        assert_eq!(signals.dominant_condition.label, "Drizzle");
    }

    #[test]
    fn condition_falls_back_to_current_then_placeholder() {
        let samples = vec![sample(0.0, 0.0, None)];
        let current = Condition::new("Clouds", "few clouds");

        assert_eq!(aggregate(&samples, Some(&current)).dominant_condition, current);
        assert_eq!(
            aggregate(&samples, None).dominant_condition,
            Condition::placeholder()
        );
    }

    #[test]
    fn tracks_rain_hours_and_longest_run() {
        let samples = vec![
            sample(50.0, 0.0, None), // rain
            sample(10.0, 0.3, None), // rain
            sample(10.0, 0.0, None),
            sample(45.0, 0.0, None), // rain
            sample(80.0, 1.0, None), // rain
            sample(90.0, 2.0, None), // rain
            sample(0.0, 0.0, None),
        ];
        let signals = aggregate(&samples, None);

        assert_eq!(signals.rain_hours, 5);
        assert_eq!(signals.longest_rain_run, 3);
        assert_eq!(signals.total_hours, 7);
    }

    #[test]
    fn sums_and_peaks() {
        let mut samples = vec![
            sample(20.0, 0.5, None),
            sample(70.0, 2.5, None),
            sample(40.0, 1.0, None),
        ];
        samples[0].wind_speed = Some(12.0);
        samples[1].wind_speed = Some(31.0);
        samples[2].temperature_c = 13.0;

        let signals = aggregate(&samples, None);

        assert_eq!(signals.max_rain_probability, 70.0);
        assert_eq!(signals.total_precipitation_mm, 4.0);
        assert_eq!(signals.peak_intensity_mm_per_hour, 2.5);
        assert_eq!(signals.peak_wind, Some(31.0));
        assert_eq!(signals.mean_temperature_c, 11.0);
    }

    #[test]
    fn missing_wind_stays_unknown() {
        let signals = aggregate(&[sample(10.0, 0.0, None)], None);
        assert_eq!(signals.peak_wind, None);
    }
}
