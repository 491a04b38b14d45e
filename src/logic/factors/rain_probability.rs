use super::Factor;
use crate::models::AggregateSignals;

/// Highest chance of rain anywhere in the window, used as-is
pub struct RainProbabilityFactor;

impl Factor for RainProbabilityFactor {
    fn id(&self) -> &'static str {
        "rain_probability"
    }

    fn name(&self) -> &'static str {
        "Rain probability"
    }

    fn weight(&self) -> f64 {
        0.40
    }

    fn sub_score(&self, signals: &AggregateSignals) -> f64 {
        signals.max_rain_probability.clamp(0.0, 100.0)
    }
}
