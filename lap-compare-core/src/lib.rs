//! Lap Compare Core Library
//!
//! A stateless library for comparing two drivers' single-lap telemetry on a shared
//! distance axis.
//!
//! # Architecture
//!
//! The library is a set of pure functions over in-memory series:
//! - Aligns two independently sampled laps onto the primary lap's distance grid
//! - Computes the running time delta between the aligned laps
//! - Locates sector boundary distances from cumulative sector times
//! - Derives heading from raw position samples and projects it onto the grid
//!
//! The library does NOT:
//! - Fetch, cache or parse session data (see [`TelemetryProvider`])
//! - Render charts
//! - Parse command-line arguments
//!
//! All of that lives in the application layer (lap-compare-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use lap_compare_core::{ComparisonConfig, LapComparison, LapSelector, MemoryProvider, TelemetryProvider};
//!
//! let provider = MemoryProvider::new();
//! let config = ComparisonConfig::new().with_lap(LapSelector::Fastest);
//!
//! let primary = provider.lap_data("NOR", config.lap).unwrap();
//! let secondary = provider.lap_data("HAM", config.lap).unwrap();
//!
//! let output = LapComparison::new(config).compare(&primary, &secondary).unwrap();
//! println!("Final delta: {:?}", output.derived.delta_series.last());
//! println!("{}", output.derived.sector_boundaries);
//! ```

// Public modules
pub mod align;
pub mod comparison;
pub mod config;
pub mod derived;
pub mod laps;
pub mod provider;
pub mod types;

// Re-export main types for convenience
pub use align::{align, align_with};
pub use comparison::{ComparisonOutput, LapComparison};
pub use config::{ComparisonConfig, LapSelector, ResampleMode};
pub use derived::{compute_delta, compute_heading, compute_sector_boundaries, derive_headings, HeadingSample};
pub use laps::{fastest_per_team, pick_lap, LapRecord, TeamFastestLap};
pub use provider::{LapData, MemoryProvider, TelemetryProvider};
pub use types::{
    from_seconds, seconds, AlignedPair, CompareError, DerivedResult, HeadingPair,
    HeadingPoint, LapTime, PositionSample, Result, SectorBoundaries, SectorTiming,
    TelemetrySample, TelemetrySeries,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
