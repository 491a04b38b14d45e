use super::{AggregateSignals, SampleSource, TimeWindow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How strongly an umbrella is advised, highest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryLevel {
    Definitely,
    Probably,
    Maybe,
    No,
}

impl AdvisoryLevel {
    /// Inclusive lower score bounds, evaluated highest first
    const THRESHOLDS: [(u8, AdvisoryLevel); 3] = [
        (70, AdvisoryLevel::Definitely),
        (50, AdvisoryLevel::Probably),
        (30, AdvisoryLevel::Maybe),
    ];

    pub fn for_score(score: u8) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(min, _)| score >= *min)
            .map(|(_, level)| *level)
            .unwrap_or(AdvisoryLevel::No)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisoryLevel::Definitely => "definitely",
            AdvisoryLevel::Probably => "probably",
            AdvisoryLevel::Maybe => "maybe",
            AdvisoryLevel::No => "no",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AdvisoryLevel::Definitely => "Take an umbrella!",
            AdvisoryLevel::Probably => "You will probably need an umbrella",
            AdvisoryLevel::Maybe => "Maybe bring an umbrella, just in case",
            AdvisoryLevel::No => "No umbrella needed",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            AdvisoryLevel::Definitely => "☔",
            AdvisoryLevel::Probably => "🌂",
            AdvisoryLevel::Maybe => "🌦",
            AdvisoryLevel::No => "☀",
        }
    }

    /// Color token for whatever renders the advice
    pub fn color(&self) -> &'static str {
        match self {
            AdvisoryLevel::Definitely => "danger",
            AdvisoryLevel::Probably => "warning",
            AdvisoryLevel::Maybe => "info",
            AdvisoryLevel::No => "success",
        }
    }

    pub fn needs_umbrella(&self) -> bool {
        !matches!(self, AdvisoryLevel::No)
    }
}

impl std::fmt::Display for AdvisoryLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Caveat {
    StrongWind,
    ProlongedRain,
    Thunderstorm,
}

impl Caveat {
    pub fn message(&self) -> &'static str {
        match self {
            Caveat::StrongWind => "Strong wind, consider additional rain gear.",
            Caveat::ProlongedRain => "Prolonged rain periods expected.",
            Caveat::Thunderstorm => "Thunderstorm warning.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u8,
    pub level: AdvisoryLevel,
    pub caveats: Vec<Caveat>,
}

impl ScoreResult {
    pub fn needs_umbrella(&self) -> bool {
        self.level.needs_umbrella()
    }

    /// Base weather description followed by the caveats, space separated
    pub fn describe(&self, base: &str) -> String {
        let mut parts = vec![capitalize_first(base)];
        parts.extend(self.caveats.iter().map(|c| c.message().to_string()));
        parts.retain(|p| !p.is_empty());
        parts.join(" ")
    }
}

/// Everything needed to present one umbrella recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub window: TimeWindow,
    pub date: NaiveDate,
    pub date_offset: u8,
    pub source: SampleSource,
    pub signals: AggregateSignals,
    pub result: ScoreResult,
    pub description: String,
}

impl Advice {
    /// e.g. "Tuesday, October 20, 2026 · Evening (18:00 - 24:00)"
    pub fn date_line(&self) -> String {
        format!(
            "{} · {}",
            self.date.format("%A, %B %-d, %Y"),
            self.window.display_range()
        )
    }
}

pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
