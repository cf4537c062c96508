//! Session data provider seam
//!
//! The library never fetches data itself. A provider hands over lap records,
//! telemetry and position samples; how it gets them (files, network, cache) is the
//! caller's business.

use crate::config::LapSelector;
use crate::laps::{pick_lap, LapRecord};
use crate::types::{CompareError, LapTime, PositionSample, Result, SectorTiming, TelemetrySeries};
use std::collections::HashMap;

/// Everything needed to compare one driver's lap
#[derive(Debug, Clone, PartialEq)]
pub struct LapData {
    pub driver: String,
    pub lap_number: u32,
    pub lap_time: Option<LapTime>,
    pub telemetry: TelemetrySeries,
    pub positions: Vec<PositionSample>,
    pub sector_timing: SectorTiming,
}

/// Common trait for all session data sources
pub trait TelemetryProvider {
    /// All lap records of the session
    fn laps(&self) -> Result<Vec<LapRecord>>;

    /// Car telemetry of one lap
    fn telemetry(&self, driver: &str, lap_number: u32) -> Result<TelemetrySeries>;

    /// Position samples of one lap
    fn positions(&self, driver: &str, lap_number: u32) -> Result<Vec<PositionSample>>;

    /// Sector timing of the selected lap
    fn sector_timing(&self, driver: &str, selector: LapSelector) -> Result<SectorTiming> {
        let laps = self.laps()?;
        pick_lap(&laps, driver, selector)?.sector_timing()
    }

    /// Load the selected lap of `driver` with all its series
    fn lap_data(&self, driver: &str, selector: LapSelector) -> Result<LapData> {
        let laps = self.laps()?;
        let record = pick_lap(&laps, driver, selector)?;
        let sector_timing = record.sector_timing()?;

        let telemetry = self.telemetry(driver, record.lap_number)?;
        let positions = self.positions(driver, record.lap_number)?;
        log::info!(
            "Loaded {} lap {}: {} telemetry / {} position samples",
            driver,
            record.lap_number,
            telemetry.len(),
            positions.len()
        );

        Ok(LapData {
            driver: driver.to_string(),
            lap_number: record.lap_number,
            lap_time: record.lap_time,
            telemetry,
            positions,
            sector_timing,
        })
    }
}

/// Provider backed by data already held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    laps: Vec<LapRecord>,
    telemetry: HashMap<(String, u32), TelemetrySeries>,
    positions: HashMap<(String, u32), Vec<PositionSample>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a lap together with its telemetry and positions
    pub fn add_lap(
        &mut self,
        record: LapRecord,
        telemetry: TelemetrySeries,
        positions: Vec<PositionSample>,
    ) {
        let key = (record.driver.clone(), record.lap_number);
        self.telemetry.insert(key.clone(), telemetry);
        self.positions.insert(key, positions);
        self.laps.push(record);
    }
}

impl TelemetryProvider for MemoryProvider {
    fn laps(&self) -> Result<Vec<LapRecord>> {
        Ok(self.laps.clone())
    }

    fn telemetry(&self, driver: &str, lap_number: u32) -> Result<TelemetrySeries> {
        self.telemetry
            .get(&(driver.to_string(), lap_number))
            .cloned()
            .ok_or_else(|| {
                CompareError::Provider(format!("no telemetry for {} lap {}", driver, lap_number))
            })
    }

    fn positions(&self, driver: &str, lap_number: u32) -> Result<Vec<PositionSample>> {
        self.positions
            .get(&(driver.to_string(), lap_number))
            .cloned()
            .ok_or_else(|| {
                CompareError::Provider(format!("no positions for {} lap {}", driver, lap_number))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{from_seconds, TelemetrySample};

    fn record(driver: &str, number: u32, time: f64) -> LapRecord {
        LapRecord {
            driver: driver.to_string(),
            team: "Ferrari".to_string(),
            lap_number: number,
            lap_time: Some(from_seconds(time)),
            sector1: Some(from_seconds(20.0)),
            sector2: Some(from_seconds(25.0)),
            sector3: Some(from_seconds(time - 45.0)),
        }
    }

    fn telemetry(len: usize) -> TelemetrySeries {
        TelemetrySeries::new(
            (0..len)
                .map(|i| TelemetrySample {
                    elapsed_time: from_seconds(i as f64),
                    session_time: from_seconds(300.0 + i as f64),
                    distance: i as f64 * 60.0,
                    speed: 216.0,
                    throttle_pct: 100.0,
                    brake_on: false,
                    gear: 6,
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_lap_data_picks_fastest() {
        let mut provider = MemoryProvider::new();
        provider.add_lap(record("LEC", 4, 75.0), telemetry(3), vec![]);
        provider.add_lap(record("LEC", 7, 74.2), telemetry(5), vec![]);

        let data = provider.lap_data("LEC", LapSelector::Fastest).unwrap();
        assert_eq!(data.lap_number, 7);
        assert_eq!(data.telemetry.len(), 5);
        assert_eq!(data.sector_timing.sector1, from_seconds(20.0));
    }

    #[test]
    fn test_sector_timing_lookup() {
        let mut provider = MemoryProvider::new();
        provider.add_lap(record("SAI", 2, 75.0), telemetry(2), vec![]);

        let timing = provider.sector_timing("SAI", LapSelector::Number(2)).unwrap();
        assert_eq!(timing.sector2, from_seconds(25.0));
    }

    #[test]
    fn test_missing_series() {
        let provider = MemoryProvider::new();
        assert!(matches!(provider.telemetry("LEC", 1), Err(CompareError::Provider(_))));
        assert!(matches!(
            provider.lap_data("LEC", LapSelector::Fastest),
            Err(CompareError::LapNotFound(_))
        ));
    }
}
