//! Running time delta between two aligned laps

use crate::types::{seconds, AlignedPair};

/// Per-grid-index time difference in seconds
///
/// `delta[i] = primary.elapsed_time[i] - secondary.elapsed_time[i]`. A negative value
/// means the primary driver reached that distance earlier.
pub fn compute_delta(pair: &AlignedPair) -> Vec<f64> {
    let delta: Vec<f64> = pair
        .primary()
        .samples()
        .iter()
        .zip(pair.secondary().samples())
        .map(|(p, s)| seconds(p.elapsed_time - s.elapsed_time))
        .collect();

    if let Some(last) = delta.last() {
        log::debug!("Delta computed over {} points, final {:+.3}s", delta.len(), last);
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::align;
    use crate::types::{from_seconds, TelemetrySample, TelemetrySeries};

    fn series(points: &[(f64, f64)]) -> TelemetrySeries {
        TelemetrySeries::new(
            points
                .iter()
                .map(|&(t, d)| TelemetrySample {
                    elapsed_time: from_seconds(t),
                    session_time: from_seconds(t),
                    distance: d,
                    speed: 100.0,
                    throttle_pct: 50.0,
                    brake_on: false,
                    gear: 4,
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_delta_against_self_is_zero() {
        let lap = series(&[(0.0, 0.0), (1.0, 30.0), (2.0, 65.0)]);
        let pair = align(&lap, &lap).unwrap();
        assert_eq!(compute_delta(&pair), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_delta_sign_convention() {
        let fast = series(&[(0.0, 0.0), (1.0, 50.0), (2.0, 100.0)]);
        let slow = series(&[(0.0, 0.0), (1.5, 50.0), (3.0, 100.0)]);

        let delta = compute_delta(&align(&fast, &slow).unwrap());
        assert_eq!(delta.len(), 3);
        assert!((delta[1] + 0.5).abs() < 1e-9);
        assert!((delta[2] + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_delta_antisymmetry_on_shared_grid() {
        let a = series(&[(0.0, 0.0), (1.0, 50.0), (2.1, 100.0)]);
        let b = series(&[(0.0, 0.0), (1.2, 50.0), (2.0, 100.0)]);

        let ab = compute_delta(&align(&a, &b).unwrap());
        let ba = compute_delta(&align(&b, &a).unwrap());
        for (x, y) in ab.iter().zip(&ba) {
            assert!((x + y).abs() < 1e-9);
        }
    }
}
