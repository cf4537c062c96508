//! Lap comparison pipeline
//!
//! Runs the full analysis for one pair of laps: align, then derive the delta,
//! sector boundaries and (optionally) heading. A failure in any stage fails the
//! whole comparison; no partial output is returned.

use crate::align::align_with;
use crate::config::ComparisonConfig;
use crate::derived::{compute_delta, compute_heading, compute_sector_boundaries};
use crate::provider::LapData;
use crate::types::{AlignedPair, DerivedResult, HeadingPair, Result};

/// Output of a successful comparison
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonOutput {
    /// Both laps on the primary lap's distance grid
    pub aligned: AlignedPair,
    /// Delta, sector boundaries and heading
    pub derived: DerivedResult,
}

/// Entry point for comparing two laps
#[derive(Debug, Clone, Default)]
pub struct LapComparison {
    config: ComparisonConfig,
}

impl LapComparison {
    /// Create a comparison with the given configuration
    pub fn new(config: ComparisonConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    /// Compare `secondary` against `primary`
    ///
    /// The primary lap provides the distance grid and the sector timing used for
    /// boundary lookup.
    ///
    /// # Example
    /// ```
    /// use lap_compare_core::{
    ///     from_seconds, ComparisonConfig, LapComparison, LapData, SectorTiming,
    ///     TelemetrySample, TelemetrySeries,
    /// };
    ///
    /// let lap = |driver: &str, times: [f64; 3]| {
    ///     let samples = times
    ///         .iter()
    ///         .zip([0.0, 30.0, 65.0])
    ///         .map(|(&t, d)| TelemetrySample {
    ///             elapsed_time: from_seconds(t),
    ///             session_time: from_seconds(t),
    ///             distance: d,
    ///             speed: 100.0,
    ///             throttle_pct: 100.0,
    ///             brake_on: false,
    ///             gear: 3,
    ///         })
    ///         .collect();
    ///     LapData {
    ///         driver: driver.to_string(),
    ///         lap_number: 1,
    ///         lap_time: None,
    ///         telemetry: TelemetrySeries::new(samples).unwrap(),
    ///         positions: Vec::new(),
    ///         sector_timing: SectorTiming::new(from_seconds(0.5), from_seconds(1.0)),
    ///     }
    /// };
    ///
    /// let comparison = LapComparison::new(ComparisonConfig::new().with_heading(false));
    /// let output = comparison
    ///     .compare(&lap("NOR", [0.0, 1.0, 2.0]), &lap("HAM", [0.0, 1.1, 2.2]))
    ///     .unwrap();
    /// assert_eq!(output.derived.delta_series.len(), 3);
    /// ```
    pub fn compare(&self, primary: &LapData, secondary: &LapData) -> Result<ComparisonOutput> {
        log::info!(
            "Comparing {} lap {} against {} lap {}",
            primary.driver,
            primary.lap_number,
            secondary.driver,
            secondary.lap_number
        );

        let aligned = align_with(
            &primary.telemetry,
            &secondary.telemetry,
            self.config.resample_mode,
        )?;
        let delta_series = compute_delta(&aligned);
        let sector_boundaries =
            compute_sector_boundaries(aligned.primary(), &primary.sector_timing)?;

        let heading = if self.config.compute_heading {
            Some(HeadingPair {
                primary: compute_heading(&primary.positions, aligned.primary())?,
                secondary: compute_heading(&secondary.positions, aligned.secondary())?,
            })
        } else {
            log::debug!("Heading derivation disabled");
            None
        };

        log::info!(
            "Comparison complete: {} grid points, {}",
            aligned.len(),
            sector_boundaries
        );

        Ok(ComparisonOutput {
            aligned,
            derived: DerivedResult {
                delta_series,
                sector_boundaries,
                heading,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{from_seconds, CompareError, PositionSample, SectorTiming, TelemetrySample, TelemetrySeries};

    fn lap_data(driver: &str, points: &[(f64, f64)], with_positions: bool) -> LapData {
        let samples = points
            .iter()
            .map(|&(t, d)| TelemetrySample {
                elapsed_time: from_seconds(t),
                session_time: from_seconds(600.0 + t),
                distance: d,
                speed: 180.0,
                throttle_pct: 90.0,
                brake_on: false,
                gear: 5,
            })
            .collect();
        let positions = if with_positions {
            points
                .iter()
                .map(|&(t, d)| PositionSample {
                    session_time: from_seconds(600.0 + t),
                    x: d,
                    y: 0.0,
                })
                .collect()
        } else {
            Vec::new()
        };

        LapData {
            driver: driver.to_string(),
            lap_number: 1,
            lap_time: None,
            telemetry: TelemetrySeries::new(samples).unwrap(),
            positions,
            sector_timing: SectorTiming::new(from_seconds(1.0), from_seconds(1.0)),
        }
    }

    #[test]
    fn test_compare_full_pipeline() {
        let primary = lap_data("NOR", &[(0.0, 0.0), (1.0, 50.0), (2.0, 100.0), (3.0, 150.0)], true);
        let secondary = lap_data("HAM", &[(0.0, 0.0), (1.1, 50.0), (2.2, 100.0), (3.3, 150.0)], true);

        let output = LapComparison::default().compare(&primary, &secondary).unwrap();
        assert_eq!(output.aligned.len(), 4);
        assert_eq!(output.derived.delta_series.len(), 4);
        assert_eq!(output.derived.sector_boundaries.sector1_end, 50.0);
        assert_eq!(output.derived.sector_boundaries.sector2_end, 100.0);

        let heading = output.derived.heading.unwrap();
        assert_eq!(heading.primary.len(), 4);
        assert_eq!(heading.secondary.len(), 4);
        assert_eq!(heading.primary[0].degrees, None);
        assert_eq!(heading.primary[1].degrees, Some(0.0));
    }

    #[test]
    fn test_compare_without_heading_ignores_positions() {
        let primary = lap_data("NOR", &[(0.0, 0.0), (1.0, 50.0), (2.0, 100.0)], false);
        let secondary = lap_data("HAM", &[(0.0, 0.0), (1.1, 50.0), (2.2, 100.0)], false);

        let comparison = LapComparison::new(ComparisonConfig::new().with_heading(false));
        let output = comparison.compare(&primary, &secondary).unwrap();
        assert!(output.derived.heading.is_none());
    }

    #[test]
    fn test_compare_fails_without_positions_when_heading_enabled() {
        let primary = lap_data("NOR", &[(0.0, 0.0), (1.0, 50.0), (2.0, 100.0)], false);
        let secondary = lap_data("HAM", &[(0.0, 0.0), (1.1, 50.0), (2.2, 100.0)], true);

        let result = LapComparison::default().compare(&primary, &secondary);
        assert!(matches!(result, Err(CompareError::InsufficientData(_))));
    }

    #[test]
    fn test_compare_propagates_sector_failure() {
        let mut primary = lap_data("NOR", &[(0.0, 0.0), (1.0, 50.0)], true);
        primary.sector_timing = SectorTiming::new(from_seconds(5.0), from_seconds(5.0));
        let secondary = lap_data("HAM", &[(0.0, 0.0), (1.1, 50.0)], true);

        let result = LapComparison::default().compare(&primary, &secondary);
        assert!(matches!(result, Err(CompareError::SectorBoundaryNotFound { .. })));
    }
}
