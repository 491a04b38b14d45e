use serde::{Deserialize, Serialize};

/// Keywords that mark a condition as wet enough to represent a window
const WET_VOCABULARY: [&str; 6] = ["rain", "drizzle", "thunderstorm", "shower", "snow", "sleet"];

/// Weather condition as reported by the provider: a short label ("Rain")
/// and a human description ("light rain").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub label: String,
    pub description: String,
}

impl Condition {
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
        }
    }

    /// Stand-in used when the provider sends no condition at all
    pub fn placeholder() -> Self {
        Self::new("Clear", "clear sky")
    }

    /// Lowercased label and description, for keyword matching
    pub fn keyword_text(&self) -> String {
        format!("{} {}", self.label, self.description).to_lowercase()
    }

    pub fn mentions(&self, keyword: &str) -> bool {
        self.keyword_text().contains(keyword)
    }

    /// Whether this condition involves precipitation or storms
    pub fn is_wet(&self) -> bool {
        let text = self.keyword_text();
        WET_VOCABULARY.iter().any(|k| text.contains(k))
    }

    pub fn is_thunderstorm(&self) -> bool {
        self.mentions("thunderstorm")
    }

    pub fn symbol(&self) -> &'static str {
        let text = self.keyword_text();
        if text.contains("thunderstorm") {
            "⛈"
        } else if text.contains("drizzle") || text.contains("shower") {
            "🌦"
        } else if text.contains("rain") {
            "🌧"
        } else if text.contains("snow") || text.contains("sleet") {
            "❄"
        } else if text.contains("mist") || text.contains("fog") || text.contains("haze") {
            "🌫"
        } else if text.contains("cloud") {
            "☁"
        } else {
            "☀"
        }
    }
}

impl Default for Condition {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}
