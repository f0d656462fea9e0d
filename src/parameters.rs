use defmt::Format;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::IllegalActionError;
use crate::units::{BAR_PER_ATM, FSW_PER_ATM, Length, LengthUnit, MMHG_PER_ATM, Pressure};
use crate::zhl16::{COMPARTMENTS, HE_HALF_TIMES, N2_HALF_TIMES};

#[derive(Debug, Format, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GradientFactors {
    pub low: f64,  // 0 < x <= high
    pub high: f64, // low <= x <= 1.5
}

impl GradientFactors {
    pub fn new(low: f64, high: f64) -> Self {
        GradientFactors { low, high }
    }

    pub fn validate(&self) -> Result<(), IllegalActionError> {
        let in_range = |gf: f64| gf > 0.0 && gf <= 1.5;
        if !in_range(self.low) || !in_range(self.high) || self.low > self.high {
            return Err(IllegalActionError::InvalidGradientFactors);
        }
        Ok(())
    }
}

impl Default for GradientFactors {
    fn default() -> Self {
        GradientFactors { low: 0.3, high: 0.85 }
    }
}

/// Varying Permeability Model constants.
#[derive(Debug, Format, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct VpmParameters {
    pub surface_tension_gamma: f64,            // N/m
    pub skin_compression_gamma_c: f64,         // N/m
    pub critical_volume_lambda: f64,           // bar min
    pub regeneration_time_constant: f64,       // min
    pub initial_critical_radius_n2: f64,       // m
    pub initial_critical_radius_he: f64,       // m
    pub gradient_onset_of_impermeability: f64, // bar
    pub pressure_other_gases: f64,             // bar
    pub critical_volume_algorithm: bool,
}

impl Default for VpmParameters {
    fn default() -> Self {
        VpmParameters {
            surface_tension_gamma: 0.0179,
            skin_compression_gamma_c: 0.257,
            // 7500 fsw min
            critical_volume_lambda: 7500.0 / FSW_PER_ATM * BAR_PER_ATM,
            regeneration_time_constant: 20160.0,
            initial_critical_radius_n2: 0.55e-6,
            initial_critical_radius_he: 0.45e-6,
            // 8.2 atm
            gradient_onset_of_impermeability: 8.2 * BAR_PER_ATM,
            // 102 mmHg
            pressure_other_gases: 102.0 / MMHG_PER_ATM * BAR_PER_ATM,
            critical_volume_algorithm: true,
        }
    }
}

/// Engine configuration. Built once, then only ever read.
#[derive(Debug, Format, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Parameters {
    pub surface_pressure: f64,      // bar
    pub water_vapour_pressure: f64, // bar
    pub co2_pressure: f64,          // bar
    pub respiratory_quotient: f64,
    pub n2_half_times: [f64; COMPARTMENTS], // min
    pub he_half_times: [f64; COMPARTMENTS], // min
    pub gradient_factors: GradientFactors,
    pub minimum_deco_stop_time: f64, // min
    pub deco_step_size: f64,         // m
    pub depth_unit: LengthUnit,
    pub vpm: VpmParameters,
}

impl Parameters {
    pub fn new(gf_low: f64, gf_high: f64) -> Self {
        Parameters {
            gradient_factors: GradientFactors::new(gf_low, gf_high),
            ..Default::default()
        }
    }

    pub fn with_gradient_factors(mut self, low: f64, high: f64) -> Self {
        self.gradient_factors = GradientFactors::new(low, high);
        self
    }

    pub fn with_surface_pressure(mut self, surface_pressure: Pressure) -> Self {
        self.surface_pressure = surface_pressure.bar();
        self
    }

    pub fn with_depth_unit(mut self, depth_unit: LengthUnit) -> Self {
        self.depth_unit = depth_unit;
        self
    }

    pub fn with_deco_step_size(mut self, step: Length) -> Self {
        self.deco_step_size = step.meters();
        self
    }

    pub fn with_minimum_deco_stop_time(mut self, minutes: f64) -> Self {
        self.minimum_deco_stop_time = minutes;
        self
    }

    pub fn with_vpm(mut self, vpm: VpmParameters) -> Self {
        self.vpm = vpm;
        self
    }

    pub fn with_critical_volume_algorithm(mut self, enabled: bool) -> Self {
        self.vpm.critical_volume_algorithm = enabled;
        self
    }

    /// Inspired-gas correction subtracted from ambient pressure:
    /// `P_H2O - (1 - RQ) / RQ * P_CO2`.
    pub fn alveolar_correction(&self) -> f64 {
        self.water_vapour_pressure
            - (1.0 - self.respiratory_quotient) / self.respiratory_quotient * self.co2_pressure
    }

    pub fn validate(&self) -> Result<(), IllegalActionError> {
        self.gradient_factors.validate()?;
        if self
            .n2_half_times
            .iter()
            .chain(self.he_half_times.iter())
            .any(|t| *t <= 0.0)
        {
            return Err(IllegalActionError::NonPositiveHalfTime);
        }
        if self.deco_step_size <= 0.0 {
            return Err(IllegalActionError::NonPositiveStepSize);
        }
        if !self.minimum_deco_stop_time.is_finite() || self.minimum_deco_stop_time <= 0.0 {
            return Err(IllegalActionError::NonPositiveMinimumStopTime);
        }
        if self.vpm.initial_critical_radius_n2 <= 0.0 || self.vpm.initial_critical_radius_he <= 0.0 {
            return Err(IllegalActionError::NonPositiveRadius);
        }
        Ok(())
    }

    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            surface_pressure: BAR_PER_ATM,
            water_vapour_pressure: 0.0627,
            co2_pressure: 0.0534,
            respiratory_quotient: 0.8,
            n2_half_times: N2_HALF_TIMES,
            he_half_times: HE_HALF_TIMES,
            gradient_factors: GradientFactors::default(),
            minimum_deco_stop_time: 1.0,
            deco_step_size: 3.0,
            depth_unit: LengthUnit::Meter,
            vpm: VpmParameters::default(),
        }
    }
}

#[test]
fn test_alveolar_correction_matches_schreiner_value() {
    // 1.607 fsw
    let correction = Parameters::default().alveolar_correction();
    assert!(libm::fabs(correction - 0.0493) < 1e-4);
}

#[test]
fn test_validate_rejects_inverted_gradient_factors() {
    let params = Parameters::new(0.9, 0.3);
    assert_eq!(params.validate(), Err(IllegalActionError::InvalidGradientFactors));
    assert!(Parameters::default().validate().is_ok());
}

#[test]
fn test_validate_rejects_non_positive_minimum_stop_time() {
    for minutes in [0.0, -1.0, f64::NAN] {
        let params = Parameters::default().with_minimum_deco_stop_time(minutes);
        assert_eq!(params.validate(), Err(IllegalActionError::NonPositiveMinimumStopTime));
    }
    assert!(Parameters::default().with_minimum_deco_stop_time(0.5).validate().is_ok());
}
