//! CSV session export reader
//!
//! Reads a session directory exported from a timing source:
//!
//! ```text
//! <dir>/laps.csv                      driver,team,lap_number,lap_time,sector1,sector2,sector3
//! <dir>/car_data/<DRIVER>_<LAP>.csv   time,session_time,distance,speed,throttle,brake,gear
//! <dir>/pos_data/<DRIVER>_<LAP>.csv   session_time,x,y
//! ```
//!
//! All times are in seconds. Empty lap/sector cells mean "no time". The `distance`
//! column is optional; without it distance is integrated from speed.

use lap_compare_core::{
    from_seconds, CompareError, LapRecord, PositionSample, Result, TelemetryProvider,
    TelemetrySample, TelemetrySeries,
};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct LapRow {
    driver: String,
    team: String,
    lap_number: u32,
    lap_time: Option<f64>,
    sector1: Option<f64>,
    sector2: Option<f64>,
    sector3: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CarRow {
    time: f64,
    session_time: f64,
    #[serde(default)]
    distance: Option<f64>,
    speed: f64,
    throttle: f64,
    #[serde(deserialize_with = "deserialize_flag")]
    brake: bool,
    gear: u8,
}

#[derive(Debug, Deserialize)]
struct PosRow {
    session_time: f64,
    x: f64,
    y: f64,
}

/// Accepts true/false in any case as well as 1/0
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!("invalid brake flag '{}'", other))),
    }
}

/// Session provider reading CSV exports from a directory
pub struct CsvSession {
    dir: PathBuf,
    laps: Vec<LapRecord>,
}

impl CsvSession {
    /// Open a session export and read its lap table
    pub fn open(dir: &Path) -> Result<Self> {
        log::info!("Opening session export: {:?}", dir);

        if !dir.is_dir() {
            return Err(CompareError::Provider(format!(
                "session directory not found: {:?}",
                dir
            )));
        }

        let rows: Vec<LapRow> = read_rows(&dir.join("laps.csv"))?;
        let laps: Vec<LapRecord> = rows
            .into_iter()
            .map(|row| LapRecord {
                driver: row.driver,
                team: row.team,
                lap_number: row.lap_number,
                lap_time: row.lap_time.map(from_seconds),
                sector1: row.sector1.map(from_seconds),
                sector2: row.sector2.map(from_seconds),
                sector3: row.sector3.map(from_seconds),
            })
            .collect();

        log::debug!("Read {} lap records", laps.len());
        Ok(Self {
            dir: dir.to_path_buf(),
            laps,
        })
    }

    fn lap_file(&self, kind: &str, driver: &str, lap_number: u32) -> PathBuf {
        self.dir
            .join(kind)
            .join(format!("{}_{}.csv", driver, lap_number))
    }
}

impl TelemetryProvider for CsvSession {
    fn laps(&self) -> Result<Vec<LapRecord>> {
        Ok(self.laps.clone())
    }

    fn telemetry(&self, driver: &str, lap_number: u32) -> Result<TelemetrySeries> {
        let rows: Vec<CarRow> = read_rows(&self.lap_file("car_data", driver, lap_number))?;
        let has_distance = rows.iter().all(|row| row.distance.is_some());

        let samples: Vec<TelemetrySample> = rows
            .iter()
            .map(|row| TelemetrySample {
                elapsed_time: from_seconds(row.time),
                session_time: from_seconds(row.session_time),
                distance: row.distance.unwrap_or(0.0),
                speed: row.speed,
                throttle_pct: row.throttle,
                brake_on: row.brake,
                gear: row.gear,
            })
            .collect();

        if has_distance {
            TelemetrySeries::new(samples)
        } else {
            log::debug!("No distance channel for {} lap {}, integrating speed", driver, lap_number);
            TelemetrySeries::with_integrated_distance(samples)
        }
    }

    fn positions(&self, driver: &str, lap_number: u32) -> Result<Vec<PositionSample>> {
        let rows: Vec<PosRow> = read_rows(&self.lap_file("pos_data", driver, lap_number))?;
        Ok(rows
            .into_iter()
            .map(|row| PositionSample {
                session_time: from_seconds(row.session_time),
                x: row.x,
                y: row.y,
            })
            .collect())
    }
}

fn read_rows<T>(path: &Path) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    log::trace!("Reading CSV: {:?}", path);

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| CompareError::Provider(format!("Failed to open {:?}: {}", path, e)))?;

    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, csv::Error>>()
        .map_err(|e| CompareError::Provider(format!("Failed to parse {:?}: {}", path, e)))
}
