//! Single-record feature derivation: one raw AIS report in, one enriched
//! record out. Every function here is pure; missing or malformed inputs
//! leave the corresponding feature unset instead of failing.

use crate::geo::{classify_location, ReferencePoint};
use crate::model::{
    CargoType, DerivedFeatures, Direction, EnrichedRecord, RawRecord, ShipSize, SpeedCategory,
    TimeOfDay,
};
use crate::risk::score_risk;
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use log::debug;
use rayon::prelude::*;

static POSITION_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

pub fn classify_speed(sog: Option<f64>) -> SpeedCategory {
    match sog {
        None => SpeedCategory::Stopped,
        Some(s) if s == 0.0 => SpeedCategory::Stopped,
        // negative speeds are not rejected and land in the slow band
        Some(s) if s < 5.0 => SpeedCategory::Slow,
        Some(s) if s < 15.0 => SpeedCategory::Medium,
        Some(_) => SpeedCategory::Fast,
    }
}

/// 8-point compass sector of a course, 45 degrees per sector centered on each point.
/// Values outside [0, 360) fall into N.
pub fn classify_direction(cog: f64) -> Direction {
    if cog >= 337.5 || cog < 22.5 {
        Direction::N
    } else if cog < 67.5 {
        Direction::NE
    } else if cog < 112.5 {
        Direction::E
    } else if cog < 157.5 {
        Direction::SE
    } else if cog < 202.5 {
        Direction::S
    } else if cog < 247.5 {
        Direction::SW
    } else if cog < 292.5 {
        Direction::W
    } else {
        Direction::NW
    }
}

pub fn classify_size(length_m: f64) -> ShipSize {
    if length_m < 100.0 {
        ShipSize::Small
    } else if length_m < 200.0 {
        ShipSize::Medium
    } else {
        ShipSize::Large
    }
}

/// First keyword found wins, checked as CARGO, TANKER, CONTAINER.
pub fn classify_cargo(vessel_type: &str) -> CargoType {
    let upper = vessel_type.to_uppercase();
    if upper.contains("CARGO") {
        CargoType::Cargo
    } else if upper.contains("TANKER") {
        CargoType::Tanker
    } else if upper.contains("CONTAINER") {
        CargoType::Container
    } else {
        CargoType::Other
    }
}

fn hour_of(position_time_utc: &str) -> Option<u32> {
    let digits = position_time_utc.get(8..10)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok()
}

/// Bucket from the hour digits (positions 8..10) of a `YYYYMMDDHHMMSS` timestamp.
/// Any two-digit hour outside the day buckets, 24..=99 included, is night.
pub fn classify_time_of_day(position_time_utc: &str) -> Option<TimeOfDay> {
    let hour = hour_of(position_time_utc)?;
    let bucket = match hour {
        5..=11 => TimeOfDay::Morning,
        12..=16 => TimeOfDay::Afternoon,
        17..=20 => TimeOfDay::Evening,
        _ => TimeOfDay::Night,
    };
    Some(bucket)
}

pub fn parse_position_time(position_time_utc: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(position_time_utc.trim(), POSITION_TIME_FORMAT).ok()?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Whether the report is no older than `window` at `now`. `None` if the timestamp does not parse.
pub fn is_recent(position_time_utc: &str, now: DateTime<Utc>, window: Duration) -> Option<bool> {
    let at = parse_position_time(position_time_utc)?;
    Some(now.signed_duration_since(at) <= window)
}

/// Everything enrichment needs besides the record itself.
#[derive(Debug, Clone)]
pub struct Enricher {
    pub reference: ReferencePoint,
    pub now: DateTime<Utc>,
    pub recency_window: Duration,
}

impl Default for Enricher {
    fn default() -> Self {
        Enricher {
            reference: ReferencePoint::default(),
            now: Utc::now(),
            recency_window: Duration::hours(24),
        }
    }
}

impl Enricher {
    pub fn new(reference: ReferencePoint, now: DateTime<Utc>, recency_window: Duration) -> Self {
        Enricher {
            reference,
            now,
            recency_window,
        }
    }

    pub fn derive(&self, raw: &RawRecord) -> DerivedFeatures {
        let location = classify_location(raw.longitude, raw.latitude, &self.reference);
        let speed_category = classify_speed(raw.speed_over_ground);
        let is_in_port = location.map(|l| l.is_in_port);

        let risk = score_risk(
            raw.speed_over_ground,
            is_in_port.unwrap_or(false),
            raw.navigation_status.as_deref(),
        );

        let position_time = raw.position_time_utc.as_deref();

        DerivedFeatures {
            location_zone: location.map(|l| l.zone),
            is_in_port,
            distance_from_port_nm: location.map(|l| l.distance_nm),
            speed_category,
            is_moving: speed_category != SpeedCategory::Stopped,
            course_direction: raw.course_over_ground.map(classify_direction),
            ship_size_category: raw.vessel_length.map(classify_size),
            cargo_type_category: raw.vessel_type.as_deref().map(classify_cargo),
            time_of_day_category: position_time.and_then(classify_time_of_day),
            is_recent_data: position_time
                .and_then(|t| is_recent(t, self.now, self.recency_window)),
            risk_level: risk.level,
            collision_risk_score: risk.score,
        }
    }

    pub fn enrich(&self, raw: RawRecord) -> EnrichedRecord {
        let features = self.derive(&raw);
        debug!(
            "enriched mmsi={:?} zone={:?} risk={}",
            raw.mmsi, features.location_zone, features.risk_level
        );
        EnrichedRecord { raw, features }
    }

    /// Enriches a batch record-by-record in parallel, keeping input order.
    pub fn enrich_all(&self, records: Vec<RawRecord>) -> Vec<EnrichedRecord> {
        records.into_par_iter().map(|r| self.enrich(r)).collect()
    }
}
