use super::{
    condition::{ConditionFactor, PROLONGED_RAIN_RUN},
    rain_amount::RainAmountFactor,
    rain_probability::RainProbabilityFactor,
    wind::{WindFactor, WIND_THRESHOLD},
    Factor,
};
use crate::models::{AdvisoryLevel, AggregateSignals, Caveat, ScoreResult};
use serde::Serialize;

/// Contribution of one factor to a score
#[derive(Debug, Clone, Serialize)]
pub struct FactorScore {
    pub id: &'static str,
    pub name: &'static str,
    pub weight: f64,
    pub sub_score: f64,
}

impl FactorScore {
    pub fn weighted(&self) -> f64 {
        self.sub_score * self.weight
    }
}

pub struct ScoringEngine {
    factors: Vec<Box<dyn Factor>>,
}

impl ScoringEngine {
    pub fn new() -> Self {
        let factors: Vec<Box<dyn Factor>> = vec![
            Box::new(RainProbabilityFactor),
            Box::new(RainAmountFactor),
            Box::new(ConditionFactor),
            Box::new(WindFactor),
        ];

        Self { factors }
    }

    pub fn breakdown(&self, signals: &AggregateSignals) -> Vec<FactorScore> {
        self.factors
            .iter()
            .map(|factor| FactorScore {
                id: factor.id(),
                name: factor.name(),
                weight: factor.weight(),
                sub_score: factor.sub_score(signals),
            })
            .collect()
    }

    /// Weighted sum of all factor sub-scores, rounded into 0-100.
    /// A window without any rain signal scores 0.
    pub fn score(&self, signals: &AggregateSignals) -> u8 {
        if signals.is_dry() {
            return 0;
        }
        let total: f64 = self.breakdown(signals).iter().map(FactorScore::weighted).sum();
        if total.is_nan() {
            return 0;
        }
        total.round().clamp(0.0, 100.0) as u8
    }

    pub fn evaluate(&self, signals: &AggregateSignals) -> ScoreResult {
        let score = self.score(signals);
        let level = AdvisoryLevel::for_score(score);
        let caveats = caveats_for(signals);

        tracing::debug!(score, %level, ?caveats, "Scored forecast window");

        ScoreResult {
            score,
            level,
            caveats,
        }
    }

    pub fn list_factors(&self) -> Vec<(&'static str, &'static str)> {
        self.factors.iter().map(|f| (f.id(), f.name())).collect()
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Situational warnings, in display order. Attached whatever the level.
pub fn caveats_for(signals: &AggregateSignals) -> Vec<Caveat> {
    let mut caveats = Vec::new();
    if signals
        .peak_wind
        .is_some_and(|wind| wind > WIND_THRESHOLD)
    {
        caveats.push(Caveat::StrongWind);
    }
    if signals.longest_rain_run >= PROLONGED_RAIN_RUN {
        caveats.push(Caveat::ProlongedRain);
    }
    if signals.dominant_condition.is_thunderstorm() {
        caveats.push(Caveat::Thunderstorm);
    }
    caveats
}
