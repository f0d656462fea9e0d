use defmt::Format;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::CalculationError;
use crate::gas::GasMixture;
use crate::nucleus::Nucleus;
use crate::parameters::{Parameters, VpmParameters};

pub const LN_2: f64 = core::f64::consts::LN_2;
pub const BACKUP_SLOTS: usize = 2;

/// Alveolar (inspired) partial pressure of a gas fraction at `ambient` bar.
pub fn alveolar_pressure(ambient: f64, fraction: f64, params: &Parameters) -> f64 {
    (ambient - params.alveolar_correction()) * fraction
}

// P(t) = Palv + (P0 - Palv) * e^(-kt)
pub fn haldane(initial: f64, inspired: f64, k: f64, period: f64) -> Result<f64, CalculationError> {
    if period < 0.0 {
        return Err(CalculationError::NegativeExposurePeriod);
    }
    Ok(inspired + (initial - inspired) * libm::exp(-k * period))
}

// P(t) = Palv0 + R(t - 1/k) - [Palv0 - P0 - R/k] * e^(-kt)
// Palv0 -> alveolar pressure of the gas at t=0
// R -> rate of change of that alveolar pressure (bar/min)
pub fn schreiner(
    inspired: f64,
    rate: f64,
    period: f64,
    k: f64,
    initial: f64,
) -> Result<f64, CalculationError> {
    if period < 0.0 {
        return Err(CalculationError::NegativeExposurePeriod);
    }
    Ok(inspired + rate * (period - 1.0 / k)
        - (inspired - initial - rate / k) * libm::exp(-period * k))
}

/// Ambient pressure over one exposure: starts at `start` bar and changes
/// linearly at `rate` bar/min for `period` minutes.
#[derive(Debug, Format, Clone, Copy, PartialEq)]
pub struct AmbientProfile {
    pub start: f64,
    pub rate: f64,
    pub period: f64,
}

impl AmbientProfile {
    pub fn constant(ambient: f64, period: f64) -> Self {
        AmbientProfile {
            start: ambient,
            rate: 0.0,
            period,
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.rate * self.period
    }
}

#[derive(Debug, Format, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GasTensions {
    pub n2: f64,
    pub he: f64,
}

impl GasTensions {
    pub fn total(&self) -> f64 {
        self.n2 + self.he
    }
}

/// Per-gas state of a compartment.
#[derive(Debug, Format, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InertGas {
    pub half_time: f64,
    pub k: f64,
    pub tension: f64,
    pub max_crushing_pressure: f64,
    pub adjusted_crushing_pressure: f64,
    pub nucleus: Nucleus,
    pub initial_allowable_gradient: f64,
    pub allowable_gradient: f64,
    pub deco_gradient: f64,
}

impl InertGas {
    pub fn new(half_time: f64, initial_radius: f64) -> Self {
        InertGas {
            half_time,
            k: LN_2 / half_time,
            tension: 0.0,
            max_crushing_pressure: 0.0,
            adjusted_crushing_pressure: 0.0,
            nucleus: Nucleus::new(initial_radius),
            initial_allowable_gradient: 0.0,
            allowable_gradient: 0.0,
            deco_gradient: 0.0,
        }
    }

    fn loaded(
        &self,
        profile: AmbientProfile,
        fraction: f64,
        params: &Parameters,
    ) -> Result<f64, CalculationError> {
        let inspired = alveolar_pressure(profile.start, fraction, params);
        if profile.rate == 0.0 {
            haldane(self.tension, inspired, self.k, profile.period)
        } else {
            schreiner(inspired, profile.rate * fraction, profile.period, self.k, self.tension)
        }
    }
}

#[derive(Debug, Format, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhaseVolumeTime {
    pub in_water: f64,
    pub surface: f64,
    pub last: f64,
}

impl PhaseVolumeTime {
    pub fn total(&self) -> f64 {
        self.in_water + self.surface
    }
}

/// Ambient pressure and total gas tension (bar) where the nucleus skin
/// turned impermeable during the current descent.
#[derive(Debug, Format, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImpermeabilityOnset {
    pub ambient_pressure: f64,
    pub gas_tension: f64,
}

/// Named tension backup slots for speculative ascents.
#[derive(Debug, Format, Clone, Copy, PartialEq, Eq)]
pub enum BackupSlot {
    StartOfAscent,
    StartOfDecoZone,
}

impl BackupSlot {
    fn slot(self) -> usize {
        match self {
            BackupSlot::StartOfAscent => 0,
            BackupSlot::StartOfDecoZone => 1,
        }
    }
}

#[derive(Debug, Format, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TissueCompartment {
    pub index: usize,
    pub n2: InertGas,
    pub he: InertGas,
    /// Largest tension-over-ambient seen at a stop of the last schedule (bar).
    pub max_actual_gradient: f64,
    pub phase_volume_time: PhaseVolumeTime,
    pub impermeability_onset: Option<ImpermeabilityOnset>,
    backups: [GasTensions; BACKUP_SLOTS],
}

impl TissueCompartment {
    pub fn new(index: usize, params: &Parameters) -> Self {
        TissueCompartment {
            index,
            n2: InertGas::new(params.n2_half_times[index], params.vpm.initial_critical_radius_n2),
            he: InertGas::new(params.he_half_times[index], params.vpm.initial_critical_radius_he),
            max_actual_gradient: 0.0,
            phase_volume_time: PhaseVolumeTime::default(),
            impermeability_onset: None,
            backups: [GasTensions::default(); BACKUP_SLOTS],
        }
    }

    pub fn tensions(&self) -> GasTensions {
        GasTensions {
            n2: self.n2.tension,
            he: self.he.tension,
        }
    }

    pub fn set_tensions(&mut self, tensions: GasTensions) {
        self.n2.tension = tensions.n2;
        self.he.tension = tensions.he;
    }

    pub fn total_tension(&self) -> f64 {
        self.n2.tension + self.he.tension
    }

    /// Tensions this compartment would have after `profile`, without
    /// changing it.
    pub fn loaded_tensions(
        &self,
        profile: AmbientProfile,
        gas: &GasMixture,
        params: &Parameters,
    ) -> Result<GasTensions, CalculationError> {
        Ok(GasTensions {
            n2: self.n2.loaded(profile, gas.n2_fraction(), params)?,
            he: self.he.loaded(profile, gas.he_fraction(), params)?,
        })
    }

    pub fn expose(
        &mut self,
        profile: AmbientProfile,
        gas: &GasMixture,
        params: &Parameters,
    ) -> Result<(), CalculationError> {
        let tensions = self.loaded_tensions(profile, gas, params)?;
        self.set_tensions(tensions);
        Ok(())
    }

    /// Equilibrate with `gas` breathed at `ambient` bar.
    pub fn saturate(&mut self, ambient: f64, gas: &GasMixture, params: &Parameters) {
        self.n2.tension = alveolar_pressure(ambient, gas.n2_fraction(), params);
        self.he.tension = alveolar_pressure(ambient, gas.he_fraction(), params);
    }

    /// Forget everything VPM learned about previous dives.
    pub fn reset_bubble_state(&mut self, vpm: &VpmParameters) {
        self.n2.nucleus = Nucleus::new(vpm.initial_critical_radius_n2);
        self.he.nucleus = Nucleus::new(vpm.initial_critical_radius_he);
        self.reset_dive_history();
    }

    pub fn reset_dive_history(&mut self) {
        for gas in [&mut self.n2, &mut self.he] {
            gas.max_crushing_pressure = 0.0;
            gas.adjusted_crushing_pressure = 0.0;
        }
        self.max_actual_gradient = 0.0;
        self.phase_volume_time = PhaseVolumeTime::default();
        self.impermeability_onset = None;
    }

    pub fn backup(&mut self, slot: BackupSlot) {
        self.backups[slot.slot()] = self.tensions();
    }

    pub fn restore(&mut self, slot: BackupSlot) {
        let tensions = self.backups[slot.slot()];
        self.set_tensions(tensions);
    }

    /// Tension-weighted blend of a per-gas gradient; falls back to the
    /// smaller one when the compartment holds no inert gas.
    pub fn weighted_gradient(
        &self,
        tensions: GasTensions,
        gradient: impl Fn(&InertGas) -> f64,
    ) -> f64 {
        let total = tensions.total();
        if total > 0.0 {
            (gradient(&self.he) * tensions.he + gradient(&self.n2) * tensions.n2) / total
        } else {
            gradient(&self.he).min(gradient(&self.n2))
        }
    }

    /// Nuclear regeneration at the end of the bottom phase, followed by the
    /// initial allowable gradient from the regenerated radii.
    pub fn regenerate_nuclei(&mut self, dive_time: f64, vpm: &VpmParameters) {
        for gas in [&mut self.n2, &mut self.he] {
            gas.adjusted_crushing_pressure =
                gas.nucleus.regenerate(gas.max_crushing_pressure, dive_time, vpm);
        }
    }

    pub fn calculate_initial_allowable_gradient(&mut self, vpm: &VpmParameters) {
        for gas in [&mut self.n2, &mut self.he] {
            gas.initial_allowable_gradient = gas.nucleus.initial_allowable_gradient(vpm);
            gas.allowable_gradient = gas.initial_allowable_gradient;
            gas.deco_gradient = gas.initial_allowable_gradient;
        }
    }
}

#[test]
fn test_haldane_fixed_point() {
    let p = haldane(3.2, 3.2, LN_2 / 12.5, 40.0).unwrap();
    assert_eq!(p, 3.2);
}

#[test]
fn test_negative_period_is_rejected() {
    assert_eq!(
        haldane(1.0, 2.0, 0.1, -1.0),
        Err(CalculationError::NegativeExposurePeriod)
    );
    assert_eq!(
        schreiner(1.0, 0.3, -0.5, 0.1, 2.0),
        Err(CalculationError::NegativeExposurePeriod)
    );
}

#[test]
fn test_schreiner_without_rate_is_haldane() {
    let k = LN_2 / 27.0;
    let h = haldane(0.75, 3.1, k, 12.0).unwrap();
    let s = schreiner(3.1, 0.0, 12.0, k, 0.75).unwrap();
    assert!(libm::fabs(h - s) < 1e-12);
}

#[test]
fn test_backup_slots_are_independent() {
    let params = Parameters::default();
    let mut c = TissueCompartment::new(3, &params);
    c.set_tensions(GasTensions { n2: 1.0, he: 0.5 });
    c.backup(BackupSlot::StartOfAscent);
    c.set_tensions(GasTensions { n2: 2.0, he: 0.25 });
    c.backup(BackupSlot::StartOfDecoZone);
    c.set_tensions(GasTensions { n2: 9.0, he: 9.0 });
    c.restore(BackupSlot::StartOfAscent);
    assert_eq!(c.tensions(), GasTensions { n2: 1.0, he: 0.5 });
    c.restore(BackupSlot::StartOfDecoZone);
    assert_eq!(c.tensions(), GasTensions { n2: 2.0, he: 0.25 });
}
