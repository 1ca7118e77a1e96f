use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Best-effort text to float conversion used for every numeric AIS column.
///
/// Blank, unparsable or non-finite input is treated as absent.
pub fn coerce_f64(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(coerce_f64))
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
// Port authority AIS export, one position report per row (header row required).
//  mmsi            MMSI number of vessel
//  imo             IMO number of the vessel
//  vssl_nm         Name of the vessel
//  clsgn           Callsign of the vessel
//  vssl_tp         Free text vessel type, e.g. GENERAL_CARGO, CRUDE_OIL_TANKER
//  vssl_len        Length of the vessel (m)
//  vssl_width      Width of the vessel (m)
//  vssl_def_brd    Draught (m)
//  lon, lat        WGS84 degrees
//  sog             Speed over ground (knots)
//  cog             Course over ground (degrees)
//  rot             Rate of turn
//  head_side       True heading
//  vssl_navi       Navigational status, e.g. MOORED, UNDERWAY
//  dt_pos_utc      Position timestamp, YYYYMMDDHHMMSS
// example: 440123450,9321483,HANJIN BUSAN,DSAB7,GENERAL_CARGO,180,28,9.1,129.0,35.1,0.0,173.2,0,175,MOORED,20221101191752
pub struct RawRecord {
    #[serde(default)]
    pub mmsi: Option<String>,
    #[serde(default)]
    pub imo: Option<String>,
    #[serde(default, rename = "vssl_nm")]
    pub name: Option<String>,
    #[serde(default, rename = "clsgn")]
    pub call_sign: Option<String>,
    #[serde(default, rename = "vssl_tp")]
    pub vessel_type: Option<String>,
    #[serde(default, rename = "vssl_len", deserialize_with = "lenient_f64")]
    pub vessel_length: Option<f64>,
    #[serde(default, rename = "vssl_width", deserialize_with = "lenient_f64")]
    pub vessel_width: Option<f64>,
    #[serde(default, rename = "vssl_def_brd", deserialize_with = "lenient_f64")]
    pub draught: Option<f64>,
    #[serde(default, rename = "lon", deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(default, rename = "lat", deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, rename = "sog", deserialize_with = "lenient_f64")]
    pub speed_over_ground: Option<f64>,
    #[serde(default, rename = "cog", deserialize_with = "lenient_f64")]
    pub course_over_ground: Option<f64>,
    #[serde(default, rename = "rot", deserialize_with = "lenient_f64")]
    pub rate_of_turn: Option<f64>,
    #[serde(default, rename = "head_side", deserialize_with = "lenient_f64")]
    pub heading: Option<f64>,
    #[serde(default, rename = "vssl_navi")]
    pub navigation_status: Option<String>,
    #[serde(default, rename = "dt_pos_utc")]
    pub position_time_utc: Option<String>,
}

macro_rules! labelled {
    ($name:ident { $($variant:ident => $label:expr),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationZone {
    InPort,
    NearPort,
    OpenWater,
}

labelled!(LocationZone {
    InPort => "in-port",
    NearPort => "near-port",
    OpenWater => "open-water",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedCategory {
    Stopped,
    Slow,
    Medium,
    Fast,
}

labelled!(SpeedCategory {
    Stopped => "stopped",
    Slow => "slow",
    Medium => "medium",
    Fast => "fast",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

labelled!(Direction {
    N => "N",
    NE => "NE",
    E => "E",
    SE => "SE",
    S => "S",
    SW => "SW",
    W => "W",
    NW => "NW",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipSize {
    Small,
    Medium,
    Large,
}

labelled!(ShipSize {
    Small => "small",
    Medium => "medium",
    Large => "large",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CargoType {
    Cargo,
    Tanker,
    Container,
    Other,
}

labelled!(CargoType {
    Cargo => "cargo",
    Tanker => "tanker",
    Container => "container",
    Other => "other",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

labelled!(TimeOfDay {
    Morning => "morning",
    Afternoon => "afternoon",
    Evening => "evening",
    Night => "night",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

labelled!(RiskLevel {
    Low => "low",
    Medium => "medium",
    High => "high",
});

/// Speed band of a vessel's historical average, same boundaries as [`SpeedCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SpeedRange {
    #[serde(rename = "slow (0–5 kn)")]
    Slow,
    #[serde(rename = "medium (5–15 kn)")]
    Medium,
    #[serde(rename = "fast (15+ kn)")]
    Fast,
}

labelled!(SpeedRange {
    Slow => "slow (0–5 kn)",
    Medium => "medium (5–15 kn)",
    Fast => "fast (15+ kn)",
});

/// Attributes derived from a single [`RawRecord`]. Unset fields mean the
/// inputs they depend on were missing or malformed.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFeatures {
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

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub raw: RawRecord,
    pub features: DerivedFeatures,
}

impl EnrichedRecord {
    pub fn mmsi(&self) -> Option<&str> {
        self.raw.mmsi.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_handles_blank_and_garbage() {
        assert_eq!(coerce_f64(""), None);
        assert_eq!(coerce_f64("   "), None);
        assert_eq!(coerce_f64("abc"), None);
        assert_eq!(coerce_f64("NaN"), None);
        assert_eq!(coerce_f64("inf"), None);
        assert_eq!(coerce_f64(" 12.5 "), Some(12.5));
        assert_eq!(coerce_f64("-3"), Some(-3.0));
    }

    #[test]
    fn deserialize_row_with_malformed_numbers() {
        let data = "\
mmsi,vssl_tp,vssl_len,lon,lat,sog,cog,vssl_navi,dt_pos_utc
440123450,GENERAL_CARGO,abc,129.0,,12.1,n/a,MOORED,20221101191752
";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let record: RawRecord = rdr.deserialize().next().unwrap().unwrap();

        assert_eq!(record.mmsi.as_deref(), Some("440123450"));
        assert_eq!(record.vessel_type.as_deref(), Some("GENERAL_CARGO"));
        assert_eq!(record.vessel_length, None);
        assert_eq!(record.longitude, Some(129.0));
        assert_eq!(record.latitude, None);
        assert_eq!(record.speed_over_ground, Some(12.1));
        assert_eq!(record.course_over_ground, None);
        assert_eq!(record.navigation_status.as_deref(), Some("MOORED"));
        assert_eq!(record.imo, None);
        assert_eq!(record.heading, None);
    }

    #[test]
    fn labels() {
        assert_eq!(LocationZone::NearPort.to_string(), "near-port");
        assert_eq!(Direction::SW.as_str(), "SW");
        assert_eq!(SpeedRange::Fast.as_str(), "fast (15+ kn)");
        assert_eq!(RiskLevel::High.to_string(), "high");
    }
}
