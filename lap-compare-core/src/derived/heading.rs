//! Heading derivation from raw position samples
//!
//! Heading is computed in the time domain from consecutive position deltas, then
//! projected onto the distance grid through the telemetry series' own session-time
//! to distance correspondence. Position data is sampled at its own cadence, so the
//! projection picks the nearest heading sample by session time.

use crate::align::nearest_index;
use crate::types::{
    seconds, CompareError, HeadingPoint, LapTime, PositionSample, Result, TelemetrySeries,
};

/// Heading at one position sample, indexed by session time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingSample {
    pub session_time: LapTime,
    /// Direction of travel in degrees (-180, 180], `None` for the first sample
    pub degrees: Option<f64>,
}

/// Heading of every position sample from the delta to its predecessor
///
/// The first sample has no predecessor, so its heading is absent.
///
/// # Errors
/// * `InsufficientData` if `positions` is empty
/// * `MisalignedInput` if positions are not sorted by session time or hold non-finite coordinates
pub fn derive_headings(positions: &[PositionSample]) -> Result<Vec<HeadingSample>> {
    validate_positions(positions)?;

    let first = positions.iter().take(1).map(|p| HeadingSample {
        session_time: p.session_time,
        degrees: None,
    });
    let rest = positions.windows(2).map(|pair| {
        let dx = pair[1].x - pair[0].x;
        let dy = pair[1].y - pair[0].y;
        HeadingSample {
            session_time: pair[1].session_time,
            degrees: Some(dy.atan2(dx).to_degrees()),
        }
    });

    Ok(first.chain(rest).collect())
}

/// Heading of one driver expressed on the distance grid of `telemetry`
///
/// `telemetry` is normally one side of an [`AlignedPair`](crate::AlignedPair): its
/// distances are the reference grid and its session times say when the driver was
/// at each grid point. The output has exactly one entry per telemetry sample.
///
/// # Errors
/// * `InsufficientData` if either input is empty
/// * `MisalignedInput` if positions are not sorted by session time
pub fn compute_heading(
    positions: &[PositionSample],
    telemetry: &TelemetrySeries,
) -> Result<Vec<HeadingPoint>> {
    if telemetry.is_empty() {
        return Err(CompareError::InsufficientData(
            "cannot project heading onto an empty telemetry series".to_string(),
        ));
    }

    let headings = derive_headings(positions)?;

    let projected: Vec<HeadingPoint> = telemetry
        .samples()
        .iter()
        .map(|sample| {
            let idx = nearest_index(&headings, sample.session_time, |h| h.session_time);
            HeadingPoint {
                distance: sample.distance,
                degrees: headings[idx].degrees,
            }
        })
        .collect();

    let undefined = projected.iter().filter(|p| p.degrees.is_none()).count();
    log::debug!(
        "Projected {} heading samples onto {} grid points ({} undefined)",
        headings.len(),
        projected.len(),
        undefined
    );

    Ok(projected)
}

fn validate_positions(positions: &[PositionSample]) -> Result<()> {
    if positions.is_empty() {
        return Err(CompareError::InsufficientData(
            "position data is empty".to_string(),
        ));
    }

    if let Some(idx) = positions
        .iter()
        .position(|p| !p.x.is_finite() || !p.y.is_finite())
    {
        return Err(CompareError::MisalignedInput(format!(
            "position sample {} has non-finite coordinates",
            idx
        )));
    }

    if let Some(idx) = positions
        .windows(2)
        .position(|pair| pair[1].session_time < pair[0].session_time)
    {
        return Err(CompareError::MisalignedInput(format!(
            "position session time goes backwards at sample {} ({:.3}s)",
            idx + 1,
            seconds(positions[idx + 1].session_time)
        )));
    }

    Ok(())
}
