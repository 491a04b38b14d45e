use super::Factor;
use crate::models::AggregateSignals;

/// Wind speed, in the provider's unit, above which an umbrella gets hard to use
pub const WIND_THRESHOLD: f64 = 20.0;
const PENALTY_PER_UNIT: f64 = 5.0;

/// Full credit up to the threshold, then a linear penalty reaching 0 at 40.
/// Unknown wind is treated as calm.
pub struct WindFactor;

impl Factor for WindFactor {
    fn id(&self) -> &'static str {
        "wind_speed"
    }

    fn name(&self) -> &'static str {
        "Wind speed"
    }

    fn weight(&self) -> f64 {
        0.10
    }

    fn sub_score(&self, signals: &AggregateSignals) -> f64 {
        match signals.peak_wind {
            Some(wind) if wind > WIND_THRESHOLD => {
                (100.0 - (wind - WIND_THRESHOLD) * PENALTY_PER_UNIT).max(0.0)
            }
            _ => 100.0,
        }
    }
}
