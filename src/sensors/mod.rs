//! Remote sensor categories and the local [`SensorTable`].
//!
//! The table holds one activity flag per category and is rebuilt
//! wholesale from every successful sensor poll: all flags reset to
//! `false`, then each record sets its category's flag.  A category absent
//! from the response reads as inactive.

use core::fmt;

use crate::error::DecodeError;
use crate::payload::{self, RawSensor};

// ───────────────────────────────────────────────────────────────
// Category
// ───────────────────────────────────────────────────────────────

/// The four remote-controllable device types tracked by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorCategory {
    Tv,
    Light,
    AirConditioner,
    CoffeeMaker,
}

impl SensorCategory {
    pub const ALL: [Self; 4] = [Self::Tv, Self::Light, Self::AirConditioner, Self::CoffeeMaker];

    /// Map the backend's `sensor_type` string.  Unknown types yield `None`.
    pub fn from_wire(sensor_type: &str) -> Option<Self> {
        match sensor_type {
            "tv" => Some(Self::Tv),
            "luz" => Some(Self::Light),
            "aire_acondicionado" => Some(Self::AirConditioner),
            "cafetera" => Some(Self::CoffeeMaker),
            _ => None,
        }
    }

    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Tv => "tv",
            Self::Light => "luz",
            Self::AirConditioner => "aire_acondicionado",
            Self::CoffeeMaker => "cafetera",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Tv => 0,
            Self::Light => 1,
            Self::AirConditioner => 2,
            Self::CoffeeMaker => 3,
        }
    }
}

impl fmt::Display for SensorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Tv => "TV",
            Self::Light => "light",
            Self::AirConditioner => "AC",
            Self::CoffeeMaker => "coffee maker",
        };
        f.write_str(label)
    }
}

// ───────────────────────────────────────────────────────────────
// Records
// ───────────────────────────────────────────────────────────────

/// A remote sensor as reported by the sensor list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorRecord {
    pub id: String,
    /// `None` when `sensor_type` is not one of the four known categories.
    pub category: Option<SensorCategory>,
    pub name: String,
    pub is_active: bool,
}

impl From<RawSensor> for SensorRecord {
    fn from(raw: RawSensor) -> Self {
        Self {
            category: SensorCategory::from_wire(&raw.sensor_type),
            id: raw.id,
            name: raw.name,
            is_active: raw.is_active,
        }
    }
}

/// Decode a sensor-list body (bare array or `data` wrapper).
pub fn decode_sensor_list(body: &str) -> Result<Vec<SensorRecord>, DecodeError> {
    let (_, raw) = payload::normalize_sensors(body)?;
    Ok(raw.into_iter().map(SensorRecord::from).collect())
}

// ───────────────────────────────────────────────────────────────
// Table
// ───────────────────────────────────────────────────────────────

/// Last-known activity flag per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorTable {
    flags: [bool; 4],
}

impl SensorTable {
    /// Reset every flag, then apply the records in order.  For duplicate
    /// categories the last record wins.
    pub fn from_records(records: &[SensorRecord]) -> Self {
        let mut table = Self::default();
        for record in records {
            if let Some(category) = record.category {
                table.set(category, record.is_active);
            }
        }
        table
    }

    pub fn is_active(&self, category: SensorCategory) -> bool {
        self.flags[category.index()]
    }

    pub fn set(&mut self, category: SensorCategory, active: bool) {
        self.flags[category.index()] = active;
    }

    /// Mark every category inactive.
    pub fn clear(&mut self) {
        self.flags = [false; 4];
    }

    pub fn any_active(&self) -> bool {
        self.flags.iter().any(|&f| f)
    }

    /// Flags feeding pattern LED A, in argument order: (TV, light).
    pub fn pair_a(&self) -> (bool, bool) {
        (
            self.is_active(SensorCategory::Tv),
            self.is_active(SensorCategory::Light),
        )
    }

    /// Flags feeding pattern LED B, in argument order: (AC, coffee maker).
    pub fn pair_b(&self) -> (bool, bool) {
        (
            self.is_active(SensorCategory::AirConditioner),
            self.is_active(SensorCategory::CoffeeMaker),
        )
    }
}

impl fmt::Display for SensorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on_off = |c| if self.is_active(c) { "on" } else { "off" };
        write!(
            f,
            "tv={} luz={} ac={} cafetera={}",
            on_off(SensorCategory::Tv),
            on_off(SensorCategory::Light),
            on_off(SensorCategory::AirConditioner),
            on_off(SensorCategory::CoffeeMaker),
        )
    }
}
