//! Telemetry alignment
//!
//! Re-expresses two independently sampled laps on a single distance axis. The
//! primary lap's distances form the reference grid; the secondary lap is resampled
//! onto that grid according to a [`ResampleMode`].

use crate::config::ResampleMode;
use crate::types::{AlignedPair, CompareError, Result, TelemetrySample, TelemetrySeries};
use std::ops::Sub;

/// Align `secondary` onto the distance grid of `primary` with nearest-neighbor resampling
pub fn align(primary: &TelemetrySeries, secondary: &TelemetrySeries) -> Result<AlignedPair> {
    align_with(primary, secondary, ResampleMode::Nearest)
}

/// Align `secondary` onto the distance grid of `primary` using the given policy
///
/// # Errors
/// * `InsufficientData` if either series is empty
pub fn align_with(
    primary: &TelemetrySeries,
    secondary: &TelemetrySeries,
    mode: ResampleMode,
) -> Result<AlignedPair> {
    if primary.is_empty() {
        return Err(CompareError::InsufficientData(
            "primary telemetry series is empty".to_string(),
        ));
    }
    if secondary.is_empty() {
        return Err(CompareError::InsufficientData(
            "secondary telemetry series is empty".to_string(),
        ));
    }

    let reference = reference_grid(primary.samples());
    if reference.len() < primary.len() {
        log::warn!(
            "Collapsed {} duplicate distance(s) in primary telemetry",
            primary.len() - reference.len()
        );
    }

    if let (Some(p_end), Some(s_end)) = (primary.total_distance(), secondary.total_distance()) {
        if s_end < p_end {
            log::warn!(
                "Secondary lap covers {:.1} m of {:.1} m; trailing grid points reuse its last sample",
                s_end,
                p_end
            );
        }
    }

    let resampled = match mode {
        ResampleMode::Nearest => resample_nearest(&reference, secondary.samples()),
    };

    log::debug!(
        "Aligned {} primary / {} secondary samples onto a {}-point grid ({})",
        primary.len(),
        secondary.len(),
        reference.len(),
        mode
    );

    Ok(AlignedPair::new(
        TelemetrySeries::from_validated(reference),
        TelemetrySeries::from_validated(resampled),
    ))
}

/// Primary samples with duplicate distances collapsed to their first occurrence
fn reference_grid(samples: &[TelemetrySample]) -> Vec<TelemetrySample> {
    let mut grid: Vec<TelemetrySample> = Vec::with_capacity(samples.len());
    for sample in samples {
        match grid.last() {
            Some(last) if sample.distance <= last.distance => continue,
            _ => grid.push(*sample),
        }
    }
    grid
}

/// For every grid distance, the closest observed secondary sample moved onto that distance
fn resample_nearest(
    reference: &[TelemetrySample],
    secondary: &[TelemetrySample],
) -> Vec<TelemetrySample> {
    reference
        .iter()
        .map(|grid_point| {
            let idx = nearest_index(secondary, grid_point.distance, |s| s.distance);
            log::trace!(
                "grid {:.2} m -> secondary[{}] at {:.2} m",
                grid_point.distance,
                idx,
                secondary[idx].distance
            );
            TelemetrySample {
                distance: grid_point.distance,
                ..secondary[idx]
            }
        })
        .collect()
}

/// Index of the item whose key is closest to `target`
///
/// `items` must be non-empty and sorted ascending by `key`. Ties between a lower and
/// a higher neighbor go to the lower one, and among equal keys the first occurrence
/// wins. Targets outside the covered range clamp to the first or last item.
pub(crate) fn nearest_index<T, K, F>(items: &[T], target: K, key: F) -> usize
where
    K: Copy + PartialOrd + Sub<Output = K>,
    F: Fn(&T) -> K,
{
    debug_assert!(!items.is_empty());

    let right = items.partition_point(|item| key(item) < target);
    if right == 0 {
        return 0;
    }
    if right == items.len() {
        return first_occurrence(items, right - 1, &key);
    }

    let left = right - 1;
    let below = target - key(&items[left]);
    let above = key(&items[right]) - target;
    if below <= above {
        first_occurrence(items, left, &key)
    } else {
        right
    }
}

fn first_occurrence<T, K, F>(items: &[T], idx: usize, key: &F) -> usize
where
    K: Copy + PartialOrd,
    F: Fn(&T) -> K,
{
    let value = key(&items[idx]);
    items.partition_point(|item| key(item) < value)
}
