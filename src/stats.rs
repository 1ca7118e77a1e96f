//! Per-vessel history statistics and fleet-wide category counts.

use crate::model::{EnrichedRecord, LocationZone, RawRecord, RiskLevel, SpeedCategory, SpeedRange};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};

impl AsRef<RawRecord> for RawRecord {
    fn as_ref(&self) -> &RawRecord {
        self
    }
}

impl AsRef<RawRecord> for EnrichedRecord {
    fn as_ref(&self) -> &RawRecord {
        &self.raw
    }
}

impl SpeedRange {
    pub fn from_average(avg: f64) -> Self {
        if avg < 5.0 {
            SpeedRange::Slow
        } else if avg < 15.0 {
            SpeedRange::Medium
        } else {
            SpeedRange::Fast
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VesselStatistics {
    pub mmsi: Option<String>,
    pub record_count: usize,
    pub average_speed: Option<f64>,
    pub preferred_speed_range: Option<SpeedRange>,
    pub typical_navigation_status: Option<String>,
}

impl VesselStatistics {
    /// Summarises one vessel's reports. All records are assumed to share an
    /// MMSI; the first one present is reported. Empty input yields all-unset
    /// statistics.
    pub fn from_history<R: AsRef<RawRecord>>(records: &[R]) -> Self {
        let mmsi = records.iter().find_map(|r| r.as_ref().mmsi.clone());

        let speeds: Vec<f64> = records
            .iter()
            .filter_map(|r| r.as_ref().speed_over_ground)
            .filter(|sog| *sog > 0.0)
            .collect();
        let average_speed = if speeds.is_empty() {
            None
        } else {
            Some(speeds.iter().sum::<f64>() / speeds.len() as f64)
        };

        VesselStatistics {
            mmsi,
            record_count: records.len(),
            average_speed,
            preferred_speed_range: average_speed.map(SpeedRange::from_average),
            typical_navigation_status: most_common(
                records
                    .iter()
                    .filter_map(|r| r.as_ref().navigation_status.as_deref()),
            )
            .map(str::to_string),
        }
    }
}

/// Mode of a sequence; on equal counts the value seen first wins.
pub fn most_common<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for v in values {
        match index.get(v).copied() {
            Some(i) => counts[i].1 += 1,
            None => {
                index.insert(v, counts.len());
                counts.push((v, 1));
            }
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (v, c) in counts {
        match best {
            Some((_, top)) if c <= top => {}
            _ => best = Some((v, c)),
        }
    }
    best.map(|(v, _)| v)
}

/// Groups records by MMSI. Records without one are left out.
pub fn group_by_vessel(records: &[EnrichedRecord]) -> BTreeMap<&str, Vec<&EnrichedRecord>> {
    let mut groups: BTreeMap<&str, Vec<&EnrichedRecord>> = BTreeMap::new();
    for r in records {
        if let Some(mmsi) = r.mmsi() {
            groups.entry(mmsi).or_default().push(r);
        }
    }
    groups
}

/// Statistics for every vessel in `records`, ordered by MMSI.
pub fn aggregate_fleet(records: &[EnrichedRecord]) -> Vec<VesselStatistics> {
    group_by_vessel(records)
        .into_iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(_, history)| VesselStatistics::from_history(&history))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetSummary {
    pub records: usize,
    pub in_port: usize,
    pub moving: usize,
    pub without_position: usize,
    pub by_zone: HashMap<LocationZone, usize>,
    pub by_speed: HashMap<SpeedCategory, usize>,
    pub by_risk: HashMap<RiskLevel, usize>,
}

impl FleetSummary {
    pub fn from_records(records: &[EnrichedRecord]) -> Self {
        let mut s = FleetSummary {
            records: records.len(),
            ..Default::default()
        };

        for r in records {
            let f = &r.features;
            match f.location_zone {
                Some(zone) => *s.by_zone.entry(zone).or_default() += 1,
                None => s.without_position += 1,
            }
            if f.is_in_port == Some(true) {
                s.in_port += 1;
            }
            if f.is_moving {
                s.moving += 1;
            }
            *s.by_speed.entry(f.speed_category).or_default() += 1;
            *s.by_risk.entry(f.risk_level).or_default() += 1;
        }

        s
    }

    pub fn zone(&self, zone: LocationZone) -> usize {
        self.by_zone.get(&zone).copied().unwrap_or(0)
    }

    pub fn risk(&self, level: RiskLevel) -> usize {
        self.by_risk.get(&level).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Enricher;

    fn report(mmsi: &str, sog: Option<f64>, status: Option<&str>) -> RawRecord {
        RawRecord {
            mmsi: Some(mmsi.to_string()),
            speed_over_ground: sog,
            navigation_status: status.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn empty_history() {
        let stats = VesselStatistics::from_history::<RawRecord>(&[]);
        assert_eq!(stats, VesselStatistics::default());
    }

    #[test]
    fn zero_and_missing_speeds_are_ignored() {
        let history = vec![
            report("1", None, None),
            report("1", Some(0.0), None),
            report("1", Some(0.0), None),
        ];
        let stats = VesselStatistics::from_history(&history);
        assert_eq!(stats.mmsi.as_deref(), Some("1"));
        assert_eq!(stats.record_count, 3);
        assert_eq!(stats.average_speed, None);
        assert_eq!(stats.preferred_speed_range, None);
        assert_eq!(stats.typical_navigation_status, None);
    }

    #[test]
    fn average_over_moving_samples() {
        let history = vec![
            report("1", Some(0.0), Some("MOORED")),
            report("1", Some(4.0), Some("UNDERWAY")),
            report("1", Some(8.0), Some("MOORED")),
            report("1", None, Some("ANCHORED")),
        ];
        let stats = VesselStatistics::from_history(&history);
        assert_eq!(stats.average_speed, Some(6.0));
        assert_eq!(stats.preferred_speed_range, Some(SpeedRange::Medium));
        assert_eq!(stats.typical_navigation_status.as_deref(), Some("MOORED"));
    }

    #[test]
    fn speed_range_boundaries() {
        assert_eq!(SpeedRange::from_average(4.99), SpeedRange::Slow);
        assert_eq!(SpeedRange::from_average(5.0), SpeedRange::Medium);
        assert_eq!(SpeedRange::from_average(15.0), SpeedRange::Fast);
    }

    #[test]
    fn mode_prefers_first_seen_on_ties() {
        assert_eq!(
            most_common(["MOORED", "UNDERWAY", "MOORED", "ANCHORED"]),
            Some("MOORED")
        );
        assert_eq!(most_common(["A", "B", "B", "A"]), Some("A"));
        assert_eq!(most_common(["B", "A", "A"]), Some("A"));
        assert_eq!(most_common(Vec::<&str>::new()), None);
    }

    #[test]
    fn fleet_is_grouped_and_sorted() {
        let enricher = Enricher::default();
        let records = enricher.enrich_all(vec![
            report("300", Some(10.0), Some("UNDERWAY")),
            report("100", Some(2.0), Some("MOORED")),
            RawRecord::default(),
            report("300", Some(20.0), Some("UNDERWAY")),
        ]);

        let groups = group_by_vessel(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["300"].len(), 2);

        let fleet = aggregate_fleet(&records);
        assert_eq!(fleet.len(), 2);
        assert_eq!(fleet[0].mmsi.as_deref(), Some("100"));
        assert_eq!(fleet[0].preferred_speed_range, Some(SpeedRange::Slow));
        assert_eq!(fleet[1].mmsi.as_deref(), Some("300"));
        assert_eq!(fleet[1].average_speed, Some(15.0));
        assert_eq!(fleet[1].preferred_speed_range, Some(SpeedRange::Fast));
        assert_eq!(fleet[1].typical_navigation_status.as_deref(), Some("UNDERWAY"));
    }

    #[test]
    fn summary_counts() {
        let enricher = Enricher::default();
        let mut in_port = report("1", Some(12.0), Some("UNDERWAY"));
        in_port.longitude = Some(129.0);
        in_port.latitude = Some(35.1);
        let mut at_sea = report("2", Some(0.0), Some("MOORED"));
        at_sea.longitude = Some(131.0);
        at_sea.latitude = Some(35.1);

        let records = enricher.enrich_all(vec![in_port, at_sea, report("3", None, None)]);
        let s = FleetSummary::from_records(&records);

        assert_eq!(s.records, 3);
        assert_eq!(s.in_port, 1);
        assert_eq!(s.moving, 1);
        assert_eq!(s.without_position, 1);
        assert_eq!(s.zone(LocationZone::InPort), 1);
        assert_eq!(s.zone(LocationZone::OpenWater), 1);
        assert_eq!(s.zone(LocationZone::NearPort), 0);
        assert_eq!(s.risk(RiskLevel::High), 1);
        assert_eq!(s.risk(RiskLevel::Low), 2);
    }
}
