use super::factors::ScoringEngine;
use super::signals::aggregate_selection;
use super::window_selector::select_window;
use crate::error::Result;
use crate::models::{Advice, RawForecastPayload, TimeWindow};
use chrono::{DateTime, TimeZone};

/// Decide whether an umbrella is needed during `window`.
///
/// Pure function of its inputs: the same payload, window and `now` always
/// give the same advice. Either the whole advice is produced or an error is
/// returned.
pub fn advise<Tz: TimeZone>(
    payload: &RawForecastPayload,
    window: TimeWindow,
    now: &DateTime<Tz>,
) -> Result<Advice> {
    advise_with(&ScoringEngine::new(), payload, window, now)
}

pub fn advise_with<Tz: TimeZone>(
    engine: &ScoringEngine,
    payload: &RawForecastPayload,
    window: TimeWindow,
    now: &DateTime<Tz>,
) -> Result<Advice> {
    let selection = select_window(payload, window, now)?;
    let signals = aggregate_selection(&selection);
    let result = engine.evaluate(&signals);

    let condition = &signals.dominant_condition;
    let base = if condition.description.is_empty() {
        condition.label.as_str()
    } else {
        condition.description.as_str()
    };
    let description = result.describe(base);

    tracing::info!(
        %window,
        date = %selection.date,
        score = result.score,
        level = %result.level,
        "Umbrella advice ready"
    );

    Ok(Advice {
        window,
        date: selection.date,
        date_offset: selection.date_offset,
        source: selection.samples.source(),
        signals,
        result,
        description,
    })
}
