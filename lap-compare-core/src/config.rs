//! Comparison configuration types
//!
//! The library only needs a handful of switches. Session paths, driver lists and
//! output formatting belong to the application layer (lap-compare-cli).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the secondary series is resampled onto the reference distance grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleMode {
    /// Take the observed sample with the closest distance (ties go to the lower distance)
    #[default]
    Nearest,
}

impl fmt::Display for ResampleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResampleMode::Nearest => write!(f, "nearest"),
        }
    }
}

/// Which lap of a driver to compare
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LapSelector {
    /// The driver's fastest timed lap
    #[default]
    Fastest,
    /// A specific lap number
    Number(u32),
}

impl fmt::Display for LapSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LapSelector::Fastest => write!(f, "fastest"),
            LapSelector::Number(n) => write!(f, "lap {}", n),
        }
    }
}

impl FromStr for LapSelector {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("fastest") {
            return Ok(LapSelector::Fastest);
        }
        trimmed
            .parse::<u32>()
            .map(LapSelector::Number)
            .map_err(|_| format!("expected 'fastest' or a lap number, got '{}'", s))
    }
}

/// Configuration for a lap comparison run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonConfig {
    /// Resampling policy used by the aligner
    #[serde(default)]
    pub resample_mode: ResampleMode,

    /// Whether to derive heading series from position data
    #[serde(default = "default_true")]
    pub compute_heading: bool,

    /// Which lap to pick for each driver
    #[serde(default)]
    pub lap: LapSelector,
}

fn default_true() -> bool {
    true
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            resample_mode: ResampleMode::default(),
            compute_heading: true,
            lap: LapSelector::default(),
        }
    }
}

impl ComparisonConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the resampling policy
    pub fn with_resample_mode(mut self, mode: ResampleMode) -> Self {
        self.resample_mode = mode;
        self
    }

    /// Builder method: enable or disable heading derivation
    pub fn with_heading(mut self, enabled: bool) -> Self {
        self.compute_heading = enabled;
        self
    }

    /// Builder method: choose which lap to compare
    pub fn with_lap(mut self, lap: LapSelector) -> Self {
        self.lap = lap;
        self
    }
}
