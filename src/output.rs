//! Flat CSV rows for enriched reports and per-vessel statistics.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use log::debug;
use serde::Serialize;
use std::path::Path;

use crate::model::{
    CargoType, Direction, EnrichedRecord, LocationZone, RiskLevel, ShipSize, SpeedCategory,
    SpeedRange, TimeOfDay,
};
use crate::stats::VesselStatistics;

#[derive(Debug, Serialize)]
pub struct EnrichedRow<'a> {
    pub mmsi: Option<&'a str>,
    pub imo: Option<&'a str>,
    pub vssl_nm: Option<&'a str>,
    pub clsgn: Option<&'a str>,
    pub vssl_tp: Option<&'a str>,
    pub vssl_len: Option<f64>,
    pub vssl_width: Option<f64>,
    pub vssl_def_brd: Option<f64>,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
    pub sog: Option<f64>,
    pub cog: Option<f64>,
    pub rot: Option<f64>,
    pub head_side: Option<f64>,
    pub vssl_navi: Option<&'a str>,
    pub dt_pos_utc: Option<&'a str>,
    pub location_zone: Option<LocationZone>,
    pub is_in_port: Option<bool>,
    pub distance_from_port_nm: Option<f64>,
    pub speed_category: SpeedCategory,
    pub is_moving: bool,
    pub course_direction: Option<Direction>,
    pub ship_size_category: Option<ShipSize>,
    pub cargo_type_category: Option<CargoType>,
    pub time_of_day_category: Option<TimeOfDay>,
    pub is_recent_data: Option<bool>,
    pub risk_level: RiskLevel,
    pub collision_risk_score: f64,
}

impl<'a> From<&'a EnrichedRecord> for EnrichedRow<'a> {
    fn from(value: &'a EnrichedRecord) -> Self {
        let raw = &value.raw;
        let f = &value.features;
        EnrichedRow {
            mmsi: raw.mmsi.as_deref(),
            imo: raw.imo.as_deref(),
            vssl_nm: raw.name.as_deref(),
            clsgn: raw.call_sign.as_deref(),
            vssl_tp: raw.vessel_type.as_deref(),
            vssl_len: raw.vessel_length,
            vssl_width: raw.vessel_width,
            vssl_def_brd: raw.draught,
            lon: raw.longitude,
            lat: raw.latitude,
            sog: raw.speed_over_ground,
            cog: raw.course_over_ground,
            rot: raw.rate_of_turn,
            head_side: raw.heading,
            vssl_navi: raw.navigation_status.as_deref(),
            dt_pos_utc: raw.position_time_utc.as_deref(),
            location_zone: f.location_zone,
            is_in_port: f.is_in_port,
            distance_from_port_nm: f.distance_from_port_nm,
            speed_category: f.speed_category,
            is_moving: f.is_moving,
            course_direction: f.course_direction,
            ship_size_category: f.ship_size_category,
            cargo_type_category: f.cargo_type_category,
            time_of_day_category: f.time_of_day_category,
            is_recent_data: f.is_recent_data,
            risk_level: f.risk_level,
            collision_risk_score: f.collision_risk_score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VesselRow<'a> {
    pub mmsi: Option<&'a str>,
    pub record_count: usize,
    pub average_speed: Option<f64>,
    pub preferred_speed_range: Option<SpeedRange>,
    pub typical_navigation_status: Option<&'a str>,
}

impl<'a> From<&'a VesselStatistics> for VesselRow<'a> {
    fn from(value: &'a VesselStatistics) -> Self {
        VesselRow {
            mmsi: value.mmsi.as_deref(),
            record_count: value.record_count,
            average_speed: value.average_speed,
            preferred_speed_range: value.preferred_speed_range,
            typical_navigation_status: value.typical_navigation_status.as_deref(),
        }
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<usize> {
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    let mut count = 0;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }
    writer.flush()?;

    debug!("wrote {} rows to {}", count, path.display());
    Ok(count)
}

pub fn write_enriched(path: &Path, records: &[EnrichedRecord]) -> Result<usize> {
    write_rows(path, records.iter().map(EnrichedRow::from))
}

pub fn write_vessels(path: &Path, stats: &[VesselStatistics]) -> Result<usize> {
    write_rows(path, stats.iter().map(VesselRow::from))
}
