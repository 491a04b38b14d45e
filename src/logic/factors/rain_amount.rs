use super::Factor;
use crate::models::AggregateSignals;

/// Peak hourly intensity above which the downpour bonus applies
pub const HEAVY_INTENSITY_MM_PER_HOUR: f64 = 2.0;
const HEAVY_INTENSITY_BONUS: f64 = 20.0;

/// Total precipitation on a logarithmic curve
///
/// `33 * log10(mm * 10 + 1)` climbs steeply over the first millimeters and
/// flattens out afterwards (1 mm scores ~34, 10 mm ~66). A peak hourly
/// intensity above 2 mm/h adds a bonus of 20, still capped at 100.
pub struct RainAmountFactor;

impl Factor for RainAmountFactor {
    fn id(&self) -> &'static str {
        "rain_amount"
    }

    fn name(&self) -> &'static str {
        "Rain amount"
    }

    fn weight(&self) -> f64 {
        0.30
    }

    fn sub_score(&self, signals: &AggregateSignals) -> f64 {
        let total = signals.total_precipitation_mm;
        if total <= 0.0 {
            return 0.0;
        }

        let mut score = (33.0 * (total * 10.0 + 1.0).log10()).min(100.0);
        if signals.peak_intensity_mm_per_hour > HEAVY_INTENSITY_MM_PER_HOUR {
            score = (score + HEAVY_INTENSITY_BONUS).min(100.0);
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::factors::test_support::calm_signals;

    fn score_for(total: f64, peak: f64) -> f64 {
        let mut signals = calm_signals();
        signals.total_precipitation_mm = total;
        signals.peak_intensity_mm_per_hour = peak;
        RainAmountFactor.sub_score(&signals)
    }

    #[test]
    fn dry_window_scores_zero() {
        assert_eq!(score_for(0.0, 0.0), 0.0);
    }

    #[test]
    fn follows_log_curve() {
        // 33 * log10(51) ~= 56.35
        assert!((score_for(5.0, 0.5) - 56.35).abs() < 0.01);
        // 33 * log10(2) ~= 9.93
        assert!((score_for(0.1, 0.1) - 9.93).abs() < 0.01);
        assert_eq!(score_for(200.0, 1.0), 100.0);
    }

    #[test]
    fn intense_rain_adds_bonus_capped_at_100() {
        let base = score_for(5.0, 2.0);
        assert!((score_for(5.0, 2.1) - (base + 20.0)).abs() < 1e-9);
        assert_eq!(score_for(50.0, 8.0), 100.0);
    }

    #[test]
    fn monotonic_in_volume() {
        let mut previous = 0.0;
        for step in 0..=300 {
            let mm = step as f64 * 0.1;
            let score = score_for(mm, 0.0);
            assert!(score >= previous, "score dropped at {} mm", mm);
            previous = score;
        }
    }
}
