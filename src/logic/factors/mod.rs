pub mod condition;
pub mod engine;
pub mod rain_amount;
pub mod rain_probability;
pub mod wind;

pub use engine::ScoringEngine;

use crate::models::AggregateSignals;

/// One weighted input to the umbrella score
pub trait Factor: Send + Sync {
    /// Unique identifier for this factor
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Share of the final score, all factors together sum to 1.0
    fn weight(&self) -> f64;

    /// Sub-score on a 0-100 scale
    fn sub_score(&self, signals: &AggregateSignals) -> f64;
}
