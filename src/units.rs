use core::ops::{Add, Mul, Sub};

use defmt::Format;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const METERS_PER_FOOT: f64 = 0.3048;
pub const BAR_PER_ATM: f64 = 1.01325;
pub const PASCAL_PER_BAR: f64 = 100_000.0;
pub const MMHG_PER_ATM: f64 = 760.0;
/// Hydrostatic pressure of one meter of sea water.
pub const BAR_PER_METER: f64 = 0.1;
/// Feet of sea water per standard atmosphere.
pub const FSW_PER_ATM: f64 = 33.0;

#[derive(Debug, Format, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LengthUnit {
    Meter,
    Feet,
}

impl LengthUnit {
    fn meters_per_unit(self) -> f64 {
        match self {
            LengthUnit::Meter => 1.0,
            LengthUnit::Feet => METERS_PER_FOOT,
        }
    }
}

#[derive(Debug, Format, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PressureUnit {
    Bar,
    Msw,
    Fsw,
    Atm,
    Pascal,
    MmHg,
}

impl PressureUnit {
    fn bar_per_unit(self) -> f64 {
        match self {
            PressureUnit::Bar => 1.0,
            PressureUnit::Msw => BAR_PER_METER,
            PressureUnit::Fsw => BAR_PER_ATM / FSW_PER_ATM,
            PressureUnit::Atm => BAR_PER_ATM,
            PressureUnit::Pascal => 1.0 / PASCAL_PER_BAR,
            PressureUnit::MmHg => BAR_PER_ATM / MMHG_PER_ATM,
        }
    }
}

/// A length (depth, height, step size). Base unit: meter.
///
/// ```rust
/// use deco_engine::units::{Length, LengthUnit};
///
/// let depth = Length::new(260.0, LengthUnit::Feet);
/// assert!((depth.value(LengthUnit::Meter) - 79.248).abs() < 1e-9);
/// ```
#[derive(Debug, Format, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Length(f64);

impl Length {
    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Self(value * unit.meters_per_unit())
    }

    pub fn from_meters(value: f64) -> Self {
        Self(value)
    }

    pub fn from_feet(value: f64) -> Self {
        Self::new(value, LengthUnit::Feet)
    }

    pub fn value(&self, unit: LengthUnit) -> f64 {
        self.0 / unit.meters_per_unit()
    }

    pub fn set_value(&mut self, value: f64, unit: LengthUnit) {
        self.0 = value * unit.meters_per_unit();
    }

    pub fn meters(&self) -> f64 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0.0
    }

    /// Ambient pressure at this depth below a surface at `surface_pressure`.
    pub fn to_ambient_pressure(&self, surface_pressure: Pressure) -> Pressure {
        Pressure(surface_pressure.0 + self.0 * BAR_PER_METER)
    }
}

impl Add for Length {
    type Output = Length;

    fn add(self, other: Length) -> Length {
        Length(self.0 + other.0)
    }
}

impl Sub for Length {
    type Output = Length;

    fn sub(self, other: Length) -> Length {
        Length(self.0 - other.0)
    }
}

impl Mul<f64> for Length {
    type Output = Length;

    fn mul(self, scalar: f64) -> Length {
        Length(self.0 * scalar)
    }
}

/// An absolute or differential pressure. Base unit: bar.
#[derive(Debug, Format, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Pressure(f64);

impl Pressure {
    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn new(value: f64, unit: PressureUnit) -> Self {
        Self(value * unit.bar_per_unit())
    }

    pub fn from_bar(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self, unit: PressureUnit) -> f64 {
        self.0 / unit.bar_per_unit()
    }

    pub fn set_value(&mut self, value: f64, unit: PressureUnit) {
        self.0 = value * unit.bar_per_unit();
    }

    pub fn bar(&self) -> f64 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0.0
    }

    /// Depth below a surface at `surface_pressure` where this is the ambient pressure.
    pub fn to_depth(&self, surface_pressure: Pressure) -> Length {
        Length((self.0 - surface_pressure.0) / BAR_PER_METER)
    }
}

impl Add for Pressure {
    type Output = Pressure;

    fn add(self, other: Pressure) -> Pressure {
        Pressure(self.0 + other.0)
    }
}

impl Sub for Pressure {
    type Output = Pressure;

    fn sub(self, other: Pressure) -> Pressure {
        Pressure(self.0 - other.0)
    }
}

impl Mul<f64> for Pressure {
    type Output = Pressure;

    fn mul(self, scalar: f64) -> Pressure {
        Pressure(self.0 * scalar)
    }
}

// ICAO standard atmosphere
const EARTH_RADIUS_KM: f64 = 6369.0;
const GRAVITY: f64 = 9.80665;
const MOLAR_MASS_AIR: f64 = 28.9644;
const GAS_CONSTANT: f64 = 8.31432;
const SEA_LEVEL_TEMPERATURE: f64 = 288.15;
const TEMPERATURE_GRADIENT: f64 = -6.5;

/// Barometric pressure at `height` above sea level, given the pressure at sea level.
pub fn barometric_pressure(height: Length, sea_level: Pressure) -> Pressure {
    let height_km = height.meters() / 1000.0;
    let geopotential_height = (height_km * EARTH_RADIUS_KM) / (height_km + EARTH_RADIUS_KM);
    let temperature = SEA_LEVEL_TEMPERATURE + TEMPERATURE_GRADIENT * geopotential_height;
    let gmr_factor = GRAVITY * MOLAR_MASS_AIR / GAS_CONSTANT;
    let exponent = libm::log(SEA_LEVEL_TEMPERATURE / temperature) * gmr_factor / TEMPERATURE_GRADIENT;
    Pressure(sea_level.0 * libm::exp(exponent))
}

#[test]
fn test_barometric_pressure_at_sea_level() {
    let sea_level = Pressure::new(1.0, PressureUnit::Atm);
    let p = barometric_pressure(Length::zero(), sea_level);
    assert!(libm::fabs(p.bar() - sea_level.bar()) < 1e-12);
}

#[test]
fn test_barometric_pressure_drops_with_height() {
    let sea_level = Pressure::new(1.0, PressureUnit::Atm);
    let p = barometric_pressure(Length::from_meters(3000.0), sea_level);
    // standard atmosphere: ~0.70 atm at 3000 m
    assert!(p.value(PressureUnit::Atm) > 0.68 && p.value(PressureUnit::Atm) < 0.71);
}

#[test]
fn test_pressure_unit_conversions() {
    let p = Pressure::new(33.0, PressureUnit::Fsw);
    assert!(libm::fabs(p.value(PressureUnit::Atm) - 1.0) < 1e-12);
    let p = Pressure::new(760.0, PressureUnit::MmHg);
    assert!(libm::fabs(p.value(PressureUnit::Pascal) - 101_325.0) < 1e-6);
    let p = Pressure::new(10.0, PressureUnit::Msw);
    assert!(libm::fabs(p.bar() - 1.0) < 1e-12);
}
