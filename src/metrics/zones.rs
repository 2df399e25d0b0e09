//! Power and heart rate zone tables.
//!
//! Power zones follow the Coggan 7-zone model anchored on FTP. The anaerobic
//! ceiling (z6) is lifted to a measured 5-minute test when that test is
//! higher than the fixed 150% multiple.

use serde::{Deserialize, Serialize};

use super::rounding::round_watts;

/// Default upper bound of z7 in watts.
pub const DEFAULT_ZONE_CEILING_WATTS: u32 = 2000;

/// Fractional FTP bounds for z1..z6. z7 is derived from z6.
const POWER_ZONE_FRACTIONS: [(f64, f64); 6] = [
    (0.0, 0.55),
    (0.56, 0.75),
    (0.76, 0.90),
    (0.91, 1.05),
    (1.06, 1.20),
    (1.21, 1.50),
];

/// Power zone names, z1 first.
pub const POWER_ZONE_NAMES: [&str; 7] = [
    "Active Recovery",
    "Endurance",
    "Tempo",
    "Threshold",
    "VO2max",
    "Anaerobic",
    "Neuromuscular",
];

/// Heart rate zone names, z1 first.
pub const HR_ZONE_NAMES: [&str; 5] = ["Recovery", "Aerobic", "Tempo", "Threshold", "Maximum"];

/// Inclusive bounds of a single zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub min: u32,
    pub max: u32,
}

impl Zone {
    /// Create a zone, swapping the bounds if they arrive reversed.
    pub fn new(min: u32, max: u32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Whether a value falls inside the zone.
    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Seven-zone power table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneTable {
    pub z1: Zone,
    pub z2: Zone,
    pub z3: Zone,
    pub z4: Zone,
    pub z5: Zone,
    pub z6: Zone,
    pub z7: Zone,
}

impl ZoneTable {
    /// Coggan zones for an FTP, with the default z7 ceiling and no test override.
    pub fn from_ftp(ftp: u32) -> Self {
        Self::from_ftp_with(ftp, None, DEFAULT_ZONE_CEILING_WATTS)
    }

    /// Coggan zones for an FTP.
    ///
    /// `five_minute_power` raises the z6 ceiling when it exceeds 150% of FTP.
    /// `ceiling` is the z7 upper bound; it never drops below z7's lower bound.
    pub fn from_ftp_with(ftp: u32, five_minute_power: Option<u32>, ceiling: u32) -> Self {
        let ftp = ftp as f64;
        let bounds: Vec<Zone> = POWER_ZONE_FRACTIONS
            .iter()
            .map(|(lo, hi)| Zone::new(round_watts(ftp * lo), round_watts(ftp * hi)))
            .collect();

        let mut z6 = bounds[5];
        if let Some(measured) = five_minute_power.filter(|p| *p > 0) {
            z6.max = z6.max.max(measured);
        }

        let z7_min = z6.max.saturating_add(1);
        let z7 = Zone::new(z7_min, ceiling.max(z7_min));

        Self {
            z1: bounds[0],
            z2: bounds[1],
            z3: bounds[2],
            z4: bounds[3],
            z5: bounds[4],
            z6,
            z7,
        }
    }

    /// Zone number (1-7) for a power value.
    ///
    /// Values falling in the one-watt gap between two bands belong to the
    /// upper band.
    pub fn zone_for(&self, watts: u32) -> u8 {
        self.all()
            .iter()
            .position(|zone| watts <= zone.max)
            .map(|idx| idx as u8 + 1)
            .unwrap_or(7)
    }

    /// Zone bounds by number (1-7).
    pub fn get(&self, zone: u8) -> Option<&Zone> {
        match zone {
            1 => Some(&self.z1),
            2 => Some(&self.z2),
            3 => Some(&self.z3),
            4 => Some(&self.z4),
            5 => Some(&self.z5),
            6 => Some(&self.z6),
            7 => Some(&self.z7),
            _ => None,
        }
    }

    /// All zones, z1 first.
    pub fn all(&self) -> [&Zone; 7] {
        [
            &self.z1, &self.z2, &self.z3, &self.z4, &self.z5, &self.z6, &self.z7,
        ]
    }

    /// Display name for a zone number.
    pub fn name(zone: u8) -> Option<&'static str> {
        POWER_ZONE_NAMES.get(usize::from(zone).checked_sub(1)?).copied()
    }

    /// Every zone has `min <= max` and bounds never decrease band to band.
    pub fn is_monotonic(&self) -> bool {
        let zones = self.all();
        zones.iter().all(|z| z.min <= z.max)
            && zones
                .windows(2)
                .all(|pair| pair[0].min <= pair[1].min && pair[0].max <= pair[1].max)
    }
}

/// Karvonen 5-zone heart rate table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRateZones {
    pub zones: [Zone; 5],
}

impl HeartRateZones {
    /// Target HR = (max - resting) × intensity + resting.
    ///
    /// Returns `None` when the resting rate is not below the maximum.
    pub fn from_karvonen(max_hr: u32, resting_hr: u32) -> Option<Self> {
        if resting_hr >= max_hr {
            return None;
        }
        let reserve = (max_hr - resting_hr) as f64;
        let at = |fraction: f64| round_watts(reserve * fraction) + resting_hr;

        Some(Self {
            zones: [
                Zone::new(at(0.50), at(0.60)),
                Zone::new(at(0.60), at(0.70)),
                Zone::new(at(0.70), at(0.80)),
                Zone::new(at(0.80), at(0.90)),
                Zone::new(at(0.90), max_hr),
            ],
        })
    }

    /// Zone number (1-5) for a heart rate, 0 below z1.
    pub fn zone_for(&self, bpm: u32) -> u8 {
        if bpm < self.zones[0].min {
            return 0;
        }
        self.zones
            .iter()
            .position(|zone| bpm <= zone.max)
            .map(|idx| idx as u8 + 1)
            .unwrap_or(5)
    }
}
