//! Sector boundary lookup
//!
//! Converts cumulative sector times into distances on the primary lap.

use crate::types::{
    seconds, CompareError, LapTime, Result, SectorBoundaries, SectorTiming, TelemetrySeries,
};

/// Distances at which sector 1 and sector 2 end on the primary lap
///
/// Each boundary is the distance of the first sample whose elapsed time is at or
/// past the cumulative sector threshold (`sector1`, then `sector1 + sector2`).
///
/// # Errors
/// * `InsufficientData` if the series is empty
/// * `MisalignedInput` if a sector duration is negative
/// * `SectorBoundaryNotFound` if the lap ends before a threshold is reached
pub fn compute_sector_boundaries(
    primary: &TelemetrySeries,
    timing: &SectorTiming,
) -> Result<SectorBoundaries> {
    if primary.is_empty() {
        return Err(CompareError::InsufficientData(
            "cannot locate sector boundaries on an empty telemetry series".to_string(),
        ));
    }

    let (t1, t2) = timing.thresholds()?;
    let sector1_end = first_distance_at(primary, t1)?;
    let sector2_end = first_distance_at(primary, t2)?;

    log::debug!(
        "Sector thresholds {:.3}s / {:.3}s -> {:.1} m / {:.1} m",
        seconds(t1),
        seconds(t2),
        sector1_end,
        sector2_end
    );

    Ok(SectorBoundaries {
        sector1_end,
        sector2_end,
    })
}

/// Distance of the first sample with `elapsed_time >= threshold`
fn first_distance_at(series: &TelemetrySeries, threshold: LapTime) -> Result<f64> {
    let samples = series.samples();
    // Samples are sorted by elapsed time, so the first match is a partition point
    let idx = samples.partition_point(|s| s.elapsed_time < threshold);

    samples
        .get(idx)
        .map(|s| s.distance)
        .ok_or_else(|| CompareError::SectorBoundaryNotFound {
            threshold: seconds(threshold),
            last_elapsed: series.last_elapsed().map(seconds).unwrap_or(0.0),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{from_seconds, TelemetrySample};

    fn lap(points: &[(f64, f64)]) -> TelemetrySeries {
        TelemetrySeries::new(
            points
                .iter()
                .map(|&(t, d)| TelemetrySample {
                    elapsed_time: from_seconds(t),
                    session_time: from_seconds(2000.0 + t),
                    distance: d,
                    speed: 250.0,
                    throttle_pct: 100.0,
                    brake_on: false,
                    gear: 8,
                })
                .collect(),
        )
        .unwrap()
    }

    fn timing(s1: f64, s2: f64) -> SectorTiming {
        SectorTiming::new(from_seconds(s1), from_seconds(s2))
    }

    #[test]
    fn test_exact_threshold_matches_sample() {
        let series = lap(&[(0.0, 0.0), (10.0, 500.0), (20.0, 1000.0), (30.0, 1500.0)]);
        let boundaries = compute_sector_boundaries(&series, &timing(10.0, 10.0)).unwrap();
        assert_eq!(boundaries.sector1_end, 500.0);
        assert_eq!(boundaries.sector2_end, 1000.0);
    }

    #[test]
    fn test_threshold_between_samples_takes_next() {
        let series = lap(&[(0.0, 0.0), (10.0, 500.0), (20.0, 1000.0), (30.0, 1500.0)]);
        let boundaries = compute_sector_boundaries(&series, &timing(10.5, 9.0)).unwrap();
        assert_eq!(boundaries.sector1_end, 1000.0);
        assert_eq!(boundaries.sector2_end, 1000.0);
    }

    #[test]
    fn test_equal_elapsed_times_take_first() {
        let series = lap(&[(0.0, 0.0), (5.0, 200.0), (5.0, 210.0), (9.0, 400.0)]);
        let boundaries = compute_sector_boundaries(&series, &timing(5.0, 1.0)).unwrap();
        assert_eq!(boundaries.sector1_end, 200.0);
        assert_eq!(boundaries.sector2_end, 400.0);
    }

    #[test]
    fn test_threshold_past_lap_end() {
        let series = lap(&[(0.0, 0.0), (30.0, 1500.0), (40.0, 2000.0)]);
        let err = compute_sector_boundaries(&series, &timing(28.4, 31.1)).unwrap_err();
        match err {
            CompareError::SectorBoundaryNotFound { threshold, last_elapsed } => {
                assert!((threshold - 59.5).abs() < 1e-9);
                assert_eq!(last_elapsed, 40.0);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_series() {
        let result = compute_sector_boundaries(&TelemetrySeries::default(), &timing(1.0, 1.0));
        assert!(matches!(result, Err(CompareError::InsufficientData(_))));
    }
}
