//! Ramping virtual-user profile

use std::time::Duration;

use serde::{Deserialize, Serialize};
use smoke_common::{Error, Result};

/// Move linearly to `target` virtual users over `duration`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    #[serde(with = "duration_ms")]
    pub duration: Duration,
    pub target: usize,
}

impl Stage {
    pub fn new(duration: Duration, target: usize) -> Self {
        Self { duration, target }
    }
}

/// Ordered list of stages, starting from zero virtual users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadProfile {
    pub stages: Vec<Stage>,
}

impl LoadProfile {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// Ramp up over 30s, hold for `hold`, ramp down over 30s
    pub fn ramp_hold_ramp(vus: usize, hold: Duration) -> Self {
        let ramp = Duration::from_secs(30);
        Self::new(vec![
            Stage::new(ramp, vus),
            Stage::new(hold, vus),
            Stage::new(ramp, 0),
        ])
    }

    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|s| s.duration).sum()
    }

    pub fn peak(&self) -> usize {
        self.stages.iter().map(|s| s.target).max().unwrap_or(0)
    }

    /// Virtual users wanted at `elapsed`, or None once the profile has run out
    pub fn target_at(&self, elapsed: Duration) -> Option<usize> {
        let mut stage_start = Duration::ZERO;
        let mut from = 0usize;

        for stage in &self.stages {
            let stage_end = stage_start + stage.duration;
            if elapsed < stage_end {
                let progress = (elapsed - stage_start).as_secs_f64() / stage.duration.as_secs_f64();
                let delta = stage.target as f64 - from as f64;
                return Some((from as f64 + delta * progress).round() as usize);
            }
            stage_start = stage_end;
            from = stage.target;
        }

        None
    }
}

/// Parse `500ms`, `30s`, `1m`, `2h`, or a bare number of seconds
pub fn parse_duration(input: &str) -> Result<Duration> {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);

    let value: f64 = number
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("invalid duration '{}'", input)))?;

    let seconds = match unit {
        "" | "s" => value,
        "ms" => value / 1000.0,
        "m" => value * 60.0,
        "h" => value * 3600.0,
        other => {
            return Err(Error::InvalidConfig(format!(
                "unknown duration unit '{}' in '{}'",
                other, input
            )))
        }
    };

    Duration::try_from_secs_f64(seconds)
        .map_err(|e| Error::InvalidConfig(format!("invalid duration '{}': {}", input, e)))
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
