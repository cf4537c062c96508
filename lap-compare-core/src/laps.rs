//! Lap records and lap selection
//!
//! Picks which lap of a driver is compared and ranks teams by their fastest lap.

use crate::config::LapSelector;
use crate::types::{CompareError, LapTime, Result, SectorTiming};
use std::collections::BTreeMap;

/// Timing summary of one lap as reported by the session data provider
#[derive(Debug, Clone, PartialEq)]
pub struct LapRecord {
    /// Driver abbreviation (e.g., "NOR")
    pub driver: String,
    /// Team name
    pub team: String,
    pub lap_number: u32,
    /// Total lap time (missing for in/out laps and deleted laps)
    pub lap_time: Option<LapTime>,
    pub sector1: Option<LapTime>,
    pub sector2: Option<LapTime>,
    pub sector3: Option<LapTime>,
}

impl LapRecord {
    /// Sector timing needed for boundary lookup
    ///
    /// # Errors
    /// * `InsufficientData` if sector 1 or sector 2 time is missing
    pub fn sector_timing(&self) -> Result<SectorTiming> {
        match (self.sector1, self.sector2) {
            (Some(s1), Some(s2)) => Ok(SectorTiming::new(s1, s2)),
            _ => Err(CompareError::InsufficientData(format!(
                "{} lap {} has no sector 1/2 times",
                self.driver, self.lap_number
            ))),
        }
    }
}

/// Fastest lap of one team
#[derive(Debug, Clone, PartialEq)]
pub struct TeamFastestLap {
    pub team: String,
    pub driver: String,
    pub lap_number: u32,
    pub lap_time: LapTime,
}

/// Select one lap of `driver`
///
/// `Fastest` ignores laps without a lap time; equal lap times resolve to the lower
/// lap number.
///
/// # Errors
/// * `LapNotFound` if the driver has no matching lap
pub fn pick_lap<'a>(
    laps: &'a [LapRecord],
    driver: &str,
    selector: LapSelector,
) -> Result<&'a LapRecord> {
    let mut driver_laps = laps.iter().filter(|lap| lap.driver == driver);

    let picked = match selector {
        LapSelector::Fastest => driver_laps
            .filter_map(|lap| lap.lap_time.map(|time| (time, lap.lap_number, lap)))
            .min_by_key(|(time, number, _)| (*time, *number))
            .map(|(_, _, lap)| lap),
        LapSelector::Number(n) => driver_laps.find(|lap| lap.lap_number == n),
    };

    match picked {
        Some(lap) => {
            log::debug!("Picked {} lap {} ({})", driver, lap.lap_number, selector);
            Ok(lap)
        }
        None => Err(CompareError::LapNotFound(format!(
            "no {} for driver {}",
            match selector {
                LapSelector::Fastest => "timed lap".to_string(),
                other => other.to_string(),
            },
            driver
        ))),
    }
}

/// Fastest lap per team, quickest team first
///
/// Ties on lap time are ordered by team name. Within a team, equal lap times go to
/// the earlier lap in input order.
pub fn fastest_per_team(laps: &[LapRecord]) -> Vec<TeamFastestLap> {
    let mut best: BTreeMap<&str, &LapRecord> = BTreeMap::new();

    for lap in laps {
        let Some(time) = lap.lap_time else {
            continue;
        };
        match best.get(lap.team.as_str()) {
            Some(current) if current.lap_time.is_some_and(|t| t <= time) => {}
            _ => {
                best.insert(lap.team.as_str(), lap);
            }
        }
    }

    let mut ranking: Vec<TeamFastestLap> = best
        .into_values()
        .filter_map(|lap| {
            lap.lap_time.map(|lap_time| TeamFastestLap {
                team: lap.team.clone(),
                driver: lap.driver.clone(),
                lap_number: lap.lap_number,
                lap_time,
            })
        })
        .collect();

    // Stable sort keeps the alphabetical BTreeMap order for equal times
    ranking.sort_by_key(|entry| entry.lap_time);
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::from_seconds;

    fn lap(driver: &str, team: &str, number: u32, time: Option<f64>) -> LapRecord {
        LapRecord {
            driver: driver.to_string(),
            team: team.to_string(),
            lap_number: number,
            lap_time: time.map(from_seconds),
            sector1: Some(from_seconds(21.0)),
            sector2: Some(from_seconds(30.0)),
            sector3: time.map(|t| from_seconds(t - 51.0)),
        }
    }

    fn session() -> Vec<LapRecord> {
        vec![
            lap("NOR", "McLaren", 1, None),
            lap("NOR", "McLaren", 2, Some(72.1)),
            lap("NOR", "McLaren", 3, Some(71.9)),
            lap("PIA", "McLaren", 2, Some(72.4)),
            lap("HAM", "Mercedes", 2, Some(72.0)),
            lap("HAM", "Mercedes", 5, Some(72.0)),
            lap("RUS", "Mercedes", 4, Some(72.3)),
            lap("VER", "Red Bull Racing", 3, Some(71.9)),
        ]
    }

    #[test]
    fn test_pick_fastest() {
        let laps = session();
        let picked = pick_lap(&laps, "NOR", LapSelector::Fastest).unwrap();
        assert_eq!(picked.lap_number, 3);
    }

    #[test]
    fn test_pick_fastest_tie_takes_lower_lap_number() {
        let laps = session();
        let picked = pick_lap(&laps, "HAM", LapSelector::Fastest).unwrap();
        assert_eq!(picked.lap_number, 2);
    }

    #[test]
    fn test_pick_by_number() {
        let laps = session();
        let picked = pick_lap(&laps, "NOR", LapSelector::Number(1)).unwrap();
        assert_eq!(picked.lap_time, None);
    }

    #[test]
    fn test_pick_missing() {
        let laps = session();
        assert!(matches!(
            pick_lap(&laps, "ALO", LapSelector::Fastest),
            Err(CompareError::LapNotFound(_))
        ));
        assert!(matches!(
            pick_lap(&laps, "NOR", LapSelector::Number(9)),
            Err(CompareError::LapNotFound(_))
        ));
    }

    #[test]
    fn test_fastest_per_team() {
        let ranking = fastest_per_team(&session());
        let teams: Vec<&str> = ranking.iter().map(|e| e.team.as_str()).collect();
        assert_eq!(teams, vec!["McLaren", "Red Bull Racing", "Mercedes"]);
        assert_eq!(ranking[0].driver, "NOR");
        assert_eq!(ranking[2].driver, "HAM");
        assert_eq!(ranking[2].lap_number, 2);
    }

    #[test]
    fn test_sector_timing_missing() {
        let mut record = lap("NOR", "McLaren", 2, Some(72.1));
        assert!(record.sector_timing().is_ok());
        record.sector2 = None;
        assert!(matches!(record.sector_timing(), Err(CompareError::InsufficientData(_))));
    }
}
