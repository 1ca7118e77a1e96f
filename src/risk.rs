//! Heuristic collision risk. Not a calibrated probability: the integer
//! points map onto three fixed scores.

use crate::model::RiskLevel;

static MOORED: &str = "MOORED";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub score: f64,
    pub points: u32,
}

impl RiskLevel {
    pub fn from_points(points: u32) -> Self {
        match points {
            p if p >= 4 => RiskLevel::High,
            p if p >= 2 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    pub fn collision_score(&self) -> f64 {
        match self {
            RiskLevel::High => 0.8,
            RiskLevel::Medium => 0.5,
            RiskLevel::Low => 0.2,
        }
    }
}

pub fn score_risk(
    sog: Option<f64>,
    is_in_port: bool,
    navigation_status: Option<&str>,
) -> RiskAssessment {
    let mut points = 0;

    if let Some(sog) = sog {
        if sog > 15.0 {
            points += 2;
        } else if sog > 10.0 {
            points += 1;
        }

        if is_in_port && sog > 10.0 {
            points += 3;
        }
    }

    // an absent status counts as not moored
    if navigation_status != Some(MOORED) {
        points += 1;
    }

    let level = RiskLevel::from_points(points);
    RiskAssessment {
        level,
        score: level.collision_score(),
        points,
    }
}
