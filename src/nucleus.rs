use defmt::Format;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::parameters::VpmParameters;
use crate::units::PASCAL_PER_BAR;

/// VPM bubble seed for one inert gas in one compartment. Radii in meters.
#[derive(Debug, Format, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Nucleus {
    initial: f64,
    adjusted: f64,
    critical: f64,
    regenerated: f64,
}

impl Nucleus {
    pub fn new(initial_radius: f64) -> Self {
        Nucleus {
            initial: initial_radius,
            adjusted: initial_radius,
            critical: initial_radius,
            regenerated: initial_radius,
        }
    }

    pub fn initial_radius(&self) -> f64 {
        self.initial
    }

    pub fn adjusted_radius(&self) -> f64 {
        self.adjusted
    }

    /// Radius left after the deepest crush of the last dive.
    pub fn critical_radius(&self) -> f64 {
        self.critical
    }

    pub fn regenerated_radius(&self) -> f64 {
        self.regenerated
    }

    /// Radius at which impermeability sets in, starting from the adjusted radius.
    pub fn radius_onset_of_impermeability(&self, vpm: &VpmParameters) -> f64 {
        let gradient_pa = vpm.gradient_onset_of_impermeability * PASCAL_PER_BAR;
        1.0 / (gradient_pa / (2.0 * (vpm.skin_compression_gamma_c - vpm.surface_tension_gamma))
            + 1.0 / self.adjusted)
    }

    /// Let the crushed nucleus grow back toward its adjusted size over
    /// `dive_time` minutes and return the crushing pressure (bar) scaled to
    /// the regenerated radius.
    pub fn regenerate(
        &mut self,
        max_crushing_pressure: f64,
        dive_time: f64,
        vpm: &VpmParameters,
    ) -> f64 {
        let crushing_pressure_pa = max_crushing_pressure * PASCAL_PER_BAR;
        let ending_radius = 1.0
            / (crushing_pressure_pa
                / (2.0 * (vpm.skin_compression_gamma_c - vpm.surface_tension_gamma))
                + 1.0 / self.adjusted);
        self.critical = ending_radius;
        self.regenerated = self.adjusted
            + (ending_radius - self.adjusted)
                * libm::exp(-dive_time / vpm.regeneration_time_constant);

        if self.adjusted == ending_radius {
            return 0.0;
        }
        let adjust_ratio = (ending_radius * (self.adjusted - self.regenerated))
            / (self.regenerated * (self.adjusted - ending_radius));
        crushing_pressure_pa * adjust_ratio / PASCAL_PER_BAR
    }

    /// Minimum supersaturation (bar) that lets the regenerated nucleus grow.
    pub fn initial_allowable_gradient(&self, vpm: &VpmParameters) -> f64 {
        let gamma = vpm.surface_tension_gamma;
        let gamma_c = vpm.skin_compression_gamma_c;
        let gradient_pa = (2.0 * gamma * (gamma_c - gamma)) / (self.regenerated * gamma_c);
        gradient_pa / PASCAL_PER_BAR
    }

    /// Altitude acclimatisation after a non-acclimatised ascent to height.
    /// `compartment_gradient` is tissue tension over ambient (bar) on arrival.
    pub fn update_nucleus_at_height(
        &mut self,
        compartment_gradient: f64,
        time_at_height: f64,
        vpm: &VpmParameters,
    ) {
        let gamma = vpm.surface_tension_gamma;
        let gamma_c = vpm.skin_compression_gamma_c;
        let gradient_pa = compartment_gradient * PASCAL_PER_BAR;
        let decay = libm::exp(-time_at_height / vpm.regeneration_time_constant);
        let bubble_formation_gradient = (2.0 * gamma * (gamma_c - gamma)) / (self.initial * gamma_c);

        if gradient_pa > bubble_formation_gradient {
            let new_radius = (2.0 * gamma * (gamma_c - gamma)) / (gradient_pa * gamma_c);
            self.adjusted = self.initial + (self.initial - new_radius) * decay;
        } else {
            let ending_radius =
                1.0 / (gradient_pa / (2.0 * (gamma - gamma_c)) + 1.0 / self.initial);
            self.adjusted = self.initial + (ending_radius - self.initial) * decay;
        }
        self.initial = self.adjusted;
        self.critical = self.adjusted;
        self.regenerated = self.adjusted;
    }

    /// Repetitive-dive adjustment after a surface interval: nuclei excited by
    /// the previous dive's supersaturation start the next dive larger.
    pub fn adjust_for_repetitive_dive(
        &mut self,
        max_actual_gradient: f64,
        initial_allowable_gradient: f64,
        adjusted_crushing_pressure: f64,
        surface_interval: f64,
        vpm: &VpmParameters,
    ) {
        let gamma = vpm.surface_tension_gamma;
        let gamma_c = vpm.skin_compression_gamma_c;
        self.adjusted = self.initial;
        if max_actual_gradient > initial_allowable_gradient {
            let denominator = max_actual_gradient * PASCAL_PER_BAR * gamma_c
                - gamma * adjusted_crushing_pressure * PASCAL_PER_BAR;
            if denominator > 0.0 {
                let new_radius = (2.0 * gamma * (gamma_c - gamma)) / denominator;
                let adjusted = self.initial
                    + (self.initial - new_radius)
                        * libm::exp(-surface_interval / vpm.regeneration_time_constant);
                if adjusted > 0.0 {
                    self.adjusted = adjusted;
                }
            }
        }
        self.critical = self.adjusted;
        self.regenerated = self.adjusted;
    }
}

#[test]
fn test_uncrushed_nucleus_does_not_regenerate() {
    let vpm = VpmParameters::default();
    let mut nucleus = Nucleus::new(vpm.initial_critical_radius_n2);
    let adjusted_crush = nucleus.regenerate(0.0, 30.0, &vpm);
    assert_eq!(adjusted_crush, 0.0);
    assert_eq!(nucleus.regenerated_radius(), vpm.initial_critical_radius_n2);
}

#[test]
fn test_crushing_shrinks_nucleus_and_raises_gradient() {
    let vpm = VpmParameters::default();
    let mut nucleus = Nucleus::new(vpm.initial_critical_radius_n2);
    let uncrushed = nucleus.initial_allowable_gradient(&vpm);
    let adjusted_crush = nucleus.regenerate(5.0, 30.0, &vpm);
    assert!(nucleus.critical_radius() < nucleus.adjusted_radius());
    assert!(nucleus.regenerated_radius() < nucleus.adjusted_radius());
    assert!(nucleus.regenerated_radius() > nucleus.critical_radius());
    assert!(adjusted_crush > 0.0 && adjusted_crush < 5.0);
    assert!(nucleus.initial_allowable_gradient(&vpm) > uncrushed);
}

#[test]
fn test_initial_allowable_gradient_default_radius() {
    let vpm = VpmParameters::default();
    let nucleus = Nucleus::new(vpm.initial_critical_radius_n2);
    // 2 * 0.0179 * 0.2391 / (0.55e-6 * 0.257) Pa
    let expected = 2.0 * 0.0179 * (0.257 - 0.0179) / (0.55e-6 * 0.257) / 100_000.0;
    assert!(libm::fabs(nucleus.initial_allowable_gradient(&vpm) - expected) < 1e-12);
}
