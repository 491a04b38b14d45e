use super::Factor;
use crate::models::AggregateSignals;

/// Rain-hour share above which the persistence bonus applies
const PERSISTENT_RAIN_RATIO: f64 = 0.70;
const PERSISTENT_RAIN_BONUS: f64 = 15.0;
/// Consecutive rain hours that count as prolonged rain
pub const PROLONGED_RAIN_RUN: u32 = 3;
const PROLONGED_RAIN_BONUS: f64 = 10.0;

/// Keyword-based score of the dominant condition plus rain persistence bonuses
pub struct ConditionFactor;

impl ConditionFactor {
    fn base_score(text: &str) -> f64 {
        if text.contains("thunderstorm") {
            100.0
        } else if text.contains("rain") && text.contains("heavy") {
            90.0
        } else if text.contains("rain") {
            80.0
        } else if text.contains("shower") {
            70.0
        } else if text.contains("drizzle") {
            60.0
        } else if text.contains("snow") || text.contains("sleet") {
            50.0
        } else if text.contains("mist") || text.contains("fog") {
            10.0
        } else {
            0.0
        }
    }
}

impl Factor for ConditionFactor {
    fn id(&self) -> &'static str {
        "weather_condition"
    }

    fn name(&self) -> &'static str {
        "Weather condition"
    }

    fn weight(&self) -> f64 {
        0.20
    }

    fn sub_score(&self, signals: &AggregateSignals) -> f64 {
        let mut score = Self::base_score(&signals.dominant_condition.keyword_text());

        if signals.rain_hour_ratio() > PERSISTENT_RAIN_RATIO {
            score = (score + PERSISTENT_RAIN_BONUS).min(100.0);
        }
        if signals.longest_rain_run >= PROLONGED_RAIN_RUN {
            score = (score + PROLONGED_RAIN_BONUS).min(100.0);
        }
        score
    }
}
