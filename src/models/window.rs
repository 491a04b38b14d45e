use crate::error::ParaweroError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Part of the day the advice is asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Morning,
    Afternoon,
    Evening,
    #[default]
    Today,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 4] = [
        TimeWindow::Morning,
        TimeWindow::Afternoon,
        TimeWindow::Evening,
        TimeWindow::Today,
    ];

    /// Half-open `[start, end)` local hours covered by the window.
    /// `today` starts at the caller's current hour.
    pub fn hours(&self, current_hour: u32) -> (u32, u32) {
        match self {
            TimeWindow::Morning => (6, 12),
            TimeWindow::Afternoon => (12, 18),
            TimeWindow::Evening => (18, 24),
            TimeWindow::Today => (current_hour.min(23), 24),
        }
    }

    /// Days to skip when the window is already over for the current day.
    /// `today` never shifts.
    pub fn date_offset(&self, current_hour: u32) -> u8 {
        if *self == TimeWindow::Today {
            return 0;
        }
        let (_, end) = self.hours(current_hour);
        if current_hour >= end {
            1
        } else {
            0
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Morning => "morning",
            TimeWindow::Afternoon => "afternoon",
            TimeWindow::Evening => "evening",
            TimeWindow::Today => "today",
        }
    }

    pub fn display_range(&self) -> &'static str {
        match self {
            TimeWindow::Morning => "Morning (6:00 - 12:00)",
            TimeWindow::Afternoon => "Afternoon (12:00 - 18:00)",
            TimeWindow::Evening => "Evening (18:00 - 24:00)",
            TimeWindow::Today => "Throughout the day",
        }
    }
}

impl FromStr for TimeWindow {
    type Err = ParaweroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Ok(TimeWindow::Morning),
            "afternoon" => Ok(TimeWindow::Afternoon),
            "evening" | "night" => Ok(TimeWindow::Evening),
            "today" | "day" => Ok(TimeWindow::Today),
            other => Err(ParaweroError::InvalidWindow(other.to_string())),
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_windows_shift_once_their_end_has_passed() {
        assert_eq!(TimeWindow::Morning.date_offset(11), 0);
        assert_eq!(TimeWindow::Morning.date_offset(12), 1);
        assert_eq!(TimeWindow::Afternoon.date_offset(17), 0);
        assert_eq!(TimeWindow::Afternoon.date_offset(18), 1);
        // Evening ends at midnight so it is never over within the day
        assert_eq!(TimeWindow::Evening.date_offset(23), 0);
    }

    #[test]
    fn today_starts_at_current_hour_and_never_shifts() {
        assert_eq!(TimeWindow::Today.hours(15), (15, 24));
        assert_eq!(TimeWindow::Today.date_offset(23), 0);
    }

    #[test]
    fn parses_window_names() {
        assert_eq!("Morning".parse::<TimeWindow>().unwrap(), TimeWindow::Morning);
        assert_eq!(" today ".parse::<TimeWindow>().unwrap(), TimeWindow::Today);
        assert!(matches!(
            "midnight".parse::<TimeWindow>(),
            Err(ParaweroError::InvalidWindow(_))
        ));
    }
}
