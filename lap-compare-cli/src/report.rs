//! Report generation
//!
//! Summarizes comparison results as plain text or JSON on stdout.

use lap_compare_core::{seconds, ComparisonOutput, LapData, TeamFastestLap};
use serde::Serialize;
use std::fmt::Write;

/// Delta value at a specific grid distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeltaPoint {
    /// Grid distance in meters
    pub distance: f64,
    /// Primary minus rival elapsed time, in seconds
    pub delta: f64,
}

/// Condensed view of one pairwise comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub primary: String,
    pub primary_lap: u32,
    pub primary_lap_time: Option<f64>,
    pub rival: String,
    pub rival_lap: u32,
    pub rival_lap_time: Option<f64>,
    pub grid_points: usize,
    pub lap_distance: f64,
    pub final_delta: f64,
    /// Where the primary driver is furthest ahead (most negative delta)
    pub max_gain: DeltaPoint,
    /// Where the primary driver is furthest behind (most positive delta)
    pub max_loss: DeltaPoint,
    pub sector_boundaries: [f64; 2],
    pub delta_at_sectors: [f64; 2],
    /// Grid points with a defined heading, per driver
    pub heading_points: Option<[usize; 2]>,
}

impl ComparisonSummary {
    pub fn new(primary: &LapData, rival: &LapData, output: &ComparisonOutput) -> Self {
        let distances = output.aligned.distances();
        let delta = &output.derived.delta_series;
        let boundaries = output.derived.sector_boundaries.as_array();

        let point = |idx: usize| DeltaPoint {
            distance: distances[idx],
            delta: delta[idx],
        };
        let max_gain = extreme_index(delta, |a, b| a < b).map(point);
        let max_loss = extreme_index(delta, |a, b| a > b).map(point);
        let empty = DeltaPoint {
            distance: 0.0,
            delta: 0.0,
        };

        let delta_at = |distance: f64| {
            let idx = distances.partition_point(|d| *d < distance);
            delta.get(idx).copied().unwrap_or(0.0)
        };

        let heading_points = output.derived.heading.as_ref().map(|heading| {
            [
                heading.primary.iter().filter(|p| p.degrees.is_some()).count(),
                heading.secondary.iter().filter(|p| p.degrees.is_some()).count(),
            ]
        });

        Self {
            primary: primary.driver.clone(),
            primary_lap: primary.lap_number,
            primary_lap_time: primary.lap_time.map(seconds),
            rival: rival.driver.clone(),
            rival_lap: rival.lap_number,
            rival_lap_time: rival.lap_time.map(seconds),
            grid_points: distances.len(),
            lap_distance: distances.last().copied().unwrap_or(0.0),
            final_delta: delta.last().copied().unwrap_or(0.0),
            max_gain: max_gain.unwrap_or(empty),
            max_loss: max_loss.unwrap_or(empty),
            sector_boundaries: boundaries,
            delta_at_sectors: [delta_at(boundaries[0]), delta_at(boundaries[1])],
            heading_points,
        }
    }
}

/// Index of the first value that wins every `better` comparison
fn extreme_index(values: &[f64], better: impl Fn(f64, f64) -> bool) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, value) in values.iter().enumerate() {
        match best {
            Some(current) if !better(*value, values[current]) => {}
            _ => best = Some(idx),
        }
    }
    best
}

fn format_lap_time(time: Option<f64>) -> String {
    match time {
        Some(t) => {
            let minutes = (t / 60.0).floor();
            format!("{}:{:06.3}", minutes as u32, t - minutes * 60.0)
        }
        None => "--".to_string(),
    }
}

/// Render comparison summaries as a text report
pub fn render_text(summaries: &[ComparisonSummary]) -> String {
    let mut out = String::new();

    for summary in summaries {
        let _ = writeln!(out, "═══════════════════════════════════════════════");
        let _ = writeln!(
            out,
            "  {} (lap {}, {}) vs {} (lap {}, {})",
            summary.primary,
            summary.primary_lap,
            format_lap_time(summary.primary_lap_time),
            summary.rival,
            summary.rival_lap,
            format_lap_time(summary.rival_lap_time)
        );
        let _ = writeln!(out, "═══════════════════════════════════════════════");
        let _ = writeln!(
            out,
            "  Grid:        {} points over {:.1} m",
            summary.grid_points, summary.lap_distance
        );
        let _ = writeln!(out, "  Final delta: {:+.3} s", summary.final_delta);
        let _ = writeln!(
            out,
            "  Max gain:    {:+.3} s at {:.1} m",
            summary.max_gain.delta, summary.max_gain.distance
        );
        let _ = writeln!(
            out,
            "  Max loss:    {:+.3} s at {:.1} m",
            summary.max_loss.delta, summary.max_loss.distance
        );
        for (idx, (distance, delta)) in summary
            .sector_boundaries
            .iter()
            .zip(summary.delta_at_sectors.iter())
            .enumerate()
        {
            let _ = writeln!(
                out,
                "  Sector {} end: {:.1} m (delta {:+.3} s)",
                idx + 1,
                distance,
                delta
            );
        }
        if let Some([primary, rival]) = summary.heading_points {
            let _ = writeln!(
                out,
                "  Heading:     {} / {} grid points defined",
                primary, rival
            );
        }
        let _ = writeln!(out);
    }

    out
}

/// Render the per-team fastest lap ranking as text
pub fn render_team_ranking(ranking: &[TeamFastestLap]) -> String {
    let mut out = String::new();
    let leader = ranking.first().map(|entry| seconds(entry.lap_time));

    let _ = writeln!(out, "{:<4} {:<20} {:<6} {:>9} {:>8}", "Pos", "Team", "Driver", "Lap time", "Gap");
    for (idx, entry) in ranking.iter().enumerate() {
        let time = seconds(entry.lap_time);
        let gap = leader.map(|lead| time - lead).unwrap_or(0.0);
        let _ = writeln!(
            out,
            "{:<4} {:<20} {:<6} {:>9} {:>+8.3}",
            idx + 1,
            entry.team,
            entry.driver,
            format_lap_time(Some(time)),
            gap
        );
    }
    out
}
