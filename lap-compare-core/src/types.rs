//! Core types for the lap comparison library
//!
//! This module defines the telemetry inputs handed over by a data provider and the
//! values produced by the alignment and derived-signal stages. Every value is built
//! once and then only read - no stage mutates another stage's output.

use chrono::TimeDelta;
use std::fmt;

/// Duration type used for elapsed lap time and session time
pub type LapTime = TimeDelta;

/// Result type for comparison operations
pub type Result<T> = std::result::Result<T, CompareError>;

/// Convert a lap/session time to floating-point seconds
pub fn seconds(time: LapTime) -> f64 {
    match time.num_nanoseconds() {
        Some(nanos) => nanos as f64 / 1_000_000_000.0,
        // Only reachable for spans of several centuries
        None => time.num_milliseconds() as f64 / 1_000.0,
    }
}

/// Build a lap/session time from floating-point seconds (nanosecond resolution)
pub fn from_seconds(secs: f64) -> LapTime {
    TimeDelta::nanoseconds((secs * 1_000_000_000.0).round() as i64)
}

/// Errors that can occur while comparing two laps
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Sector boundary not found: no sample reaches {threshold:.3}s (last sample at {last_elapsed:.3}s)")]
    SectorBoundaryNotFound {
        /// Cumulative sector threshold in seconds
        threshold: f64,
        /// Largest elapsed time present in the series, in seconds
        last_elapsed: f64,
    },

    #[error("Misaligned input: {0}")]
    MisalignedInput(String),

    #[error("Lap not found: {0}")]
    LapNotFound(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

/// One instant of a driver's lap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySample {
    /// Time since the start of the lap
    pub elapsed_time: LapTime,
    /// Absolute session timestamp (links the sample to position data)
    pub session_time: LapTime,
    /// Cumulative meters traveled since the start of the lap
    pub distance: f64,
    /// Speed in km/h
    pub speed: f64,
    /// Throttle application, 0-100
    pub throttle_pct: f64,
    /// Brake pedal pressed
    pub brake_on: bool,
    /// Selected gear
    pub gear: u8,
}

/// Ordered telemetry samples for one driver's lap
///
/// Samples are sorted by elapsed time and carry a non-decreasing distance. Both
/// properties are checked on construction; an empty series is allowed here and
/// rejected by the stages that need data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TelemetrySeries {
    samples: Vec<TelemetrySample>,
}

impl TelemetrySeries {
    /// Create a series, validating time ordering and distance monotonicity
    pub fn new(samples: Vec<TelemetrySample>) -> Result<Self> {
        validate_samples(&samples)?;
        Ok(Self { samples })
    }

    /// Create a series whose distance channel is integrated from speed
    ///
    /// Used for exports without a distance channel. The first sample sits at 0 m and
    /// every following sample adds `speed / 3.6 * dt`, with speed in km/h and `dt`
    /// the elapsed time since the previous sample.
    pub fn with_integrated_distance(mut samples: Vec<TelemetrySample>) -> Result<Self> {
        let mut distance = 0.0;
        let mut previous: Option<LapTime> = None;

        for sample in samples.iter_mut() {
            if let Some(prev) = previous {
                let dt = seconds(sample.elapsed_time - prev);
                distance += sample.speed / 3.6 * dt;
            }
            previous = Some(sample.elapsed_time);
            sample.distance = distance;
        }

        log::debug!(
            "Integrated distance over {} samples: {:.1} m",
            samples.len(),
            distance
        );
        Self::new(samples)
    }

    /// Wrap samples that are already known to satisfy the series invariants
    pub(crate) fn from_validated(samples: Vec<TelemetrySample>) -> Self {
        Self { samples }
    }

    /// All samples in elapsed-time order
    pub fn samples(&self) -> &[TelemetrySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Distance channel as a vector
    pub fn distances(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.distance).collect()
    }

    /// Total distance covered (distance of the last sample)
    pub fn total_distance(&self) -> Option<f64> {
        self.samples.last().map(|s| s.distance)
    }

    /// Elapsed time of the last sample
    pub fn last_elapsed(&self) -> Option<LapTime> {
        self.samples.last().map(|s| s.elapsed_time)
    }
}

fn validate_samples(samples: &[TelemetrySample]) -> Result<()> {
    for (idx, sample) in samples.iter().enumerate() {
        if !sample.distance.is_finite() {
            return Err(CompareError::MisalignedInput(format!(
                "sample {} has a non-finite distance",
                idx
            )));
        }
    }

    for (idx, pair) in samples.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.elapsed_time < prev.elapsed_time {
            return Err(CompareError::MisalignedInput(format!(
                "elapsed time goes backwards at sample {} ({:.3}s < {:.3}s)",
                idx + 1,
                seconds(next.elapsed_time),
                seconds(prev.elapsed_time)
            )));
        }
        if next.distance < prev.distance {
            return Err(CompareError::MisalignedInput(format!(
                "distance decreases at sample {} ({:.2} m < {:.2} m)",
                idx + 1,
                next.distance,
                prev.distance
            )));
        }
    }

    Ok(())
}

/// A planar car position at an absolute session timestamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    pub session_time: LapTime,
    pub x: f64,
    pub y: f64,
}

/// Elapsed durations of the first two sectors of a lap
///
/// Sector 3 is the remainder of the lap and is not needed for boundary lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorTiming {
    pub sector1: LapTime,
    pub sector2: LapTime,
}

impl SectorTiming {
    pub fn new(sector1: LapTime, sector2: LapTime) -> Self {
        Self { sector1, sector2 }
    }

    /// Cumulative lap times at which sector 1 and sector 2 end
    pub fn thresholds(&self) -> Result<(LapTime, LapTime)> {
        if self.sector1 < TimeDelta::zero() || self.sector2 < TimeDelta::zero() {
            return Err(CompareError::MisalignedInput(format!(
                "negative sector duration (sector 1 {:.3}s, sector 2 {:.3}s)",
                seconds(self.sector1),
                seconds(self.sector2)
            )));
        }
        Ok((self.sector1, self.sector1 + self.sector2))
    }
}

/// Two telemetry series sharing one strictly increasing distance grid
///
/// Only produced by the aligner. Both series have the same length and the same
/// distance at every index.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    primary: TelemetrySeries,
    secondary: TelemetrySeries,
}

impl AlignedPair {
    pub(crate) fn new(primary: TelemetrySeries, secondary: TelemetrySeries) -> Self {
        debug_assert_eq!(primary.len(), secondary.len());
        Self { primary, secondary }
    }

    /// The reference driver's series (its distances form the grid)
    pub fn primary(&self) -> &TelemetrySeries {
        &self.primary
    }

    /// The compared driver's series, resampled onto the reference grid
    pub fn secondary(&self) -> &TelemetrySeries {
        &self.secondary
    }

    pub fn len(&self) -> usize {
        self.primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// The shared distance grid
    pub fn distances(&self) -> Vec<f64> {
        self.primary.distances()
    }
}

/// Distances at which sector 1 and sector 2 end on the primary lap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorBoundaries {
    pub sector1_end: f64,
    pub sector2_end: f64,
}

impl SectorBoundaries {
    pub fn as_array(&self) -> [f64; 2] {
        [self.sector1_end, self.sector2_end]
    }
}

/// Direction of travel at one reference-grid distance
///
/// `degrees` is `None` where no heading is defined (the first position sample has
/// no predecessor to difference against).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingPoint {
    pub distance: f64,
    pub degrees: Option<f64>,
}

/// Heading series of both drivers on the reference grid
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingPair {
    pub primary: Vec<HeadingPoint>,
    pub secondary: Vec<HeadingPoint>,
}

/// All comparison signals derived from an aligned pair
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedResult {
    /// Primary elapsed time minus secondary elapsed time, in seconds, per grid index.
    /// Negative values mean the primary driver reached that distance sooner.
    pub delta_series: Vec<f64>,
    /// Sector boundary distances of the primary lap
    pub sector_boundaries: SectorBoundaries,
    /// Heading per driver, when heading derivation is enabled
    pub heading: Option<HeadingPair>,
}

impl fmt::Display for SectorBoundaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "S1 ends at {:.1} m, S2 ends at {:.1} m",
            self.sector1_end, self.sector2_end
        )
    }
}
