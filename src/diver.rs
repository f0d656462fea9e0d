use defmt::Format;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::IllegalActionError;
use crate::gas::GasMixture;
use crate::parameters::Parameters;
use crate::tissue::{BackupSlot, TissueCompartment};
use crate::units::{barometric_pressure, BAR_PER_METER, Length, Pressure};
use crate::zhl16::COMPARTMENTS;

/// The diver: sixteen tissue compartments and where they are.
///
/// `Clone` gives a full deep copy, which is how speculative ascents that
/// need more than the two backup slots are run.
#[derive(Debug, Format, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diver {
    compartments: [TissueCompartment; COMPARTMENTS],
    surface_pressure: f64, // bar
    height: Length,
}

impl Diver {
    /// A diver at sea level, saturated on air.
    pub fn new(params: &Parameters) -> Result<Self, IllegalActionError> {
        params.validate()?;
        let mut diver = Diver {
            compartments: core::array::from_fn(|i| TissueCompartment::new(i, params)),
            surface_pressure: params.surface_pressure,
            height: Length::zero(),
        };
        diver.saturate(&GasMixture::air(), params);
        Ok(diver)
    }

    pub fn compartments(&self) -> &[TissueCompartment; COMPARTMENTS] {
        &self.compartments
    }

    pub fn compartments_mut(&mut self) -> &mut [TissueCompartment; COMPARTMENTS] {
        &mut self.compartments
    }

    /// Barometric pressure (bar) at the diver's current height.
    pub fn surface_pressure(&self) -> f64 {
        self.surface_pressure
    }

    pub fn height(&self) -> Length {
        self.height
    }

    /// Move the diver to `height` above sea level. Tensions are untouched.
    pub fn set_height(&mut self, height: Length, params: &Parameters) {
        self.height = height;
        self.surface_pressure =
            barometric_pressure(height, Pressure::from_bar(params.surface_pressure)).bar();
    }

    /// Ambient pressure (bar) at `depth` meters below the diver's surface.
    pub fn ambient_pressure(&self, depth: f64) -> f64 {
        self.surface_pressure + depth * BAR_PER_METER
    }

    /// Equilibrate every compartment with `gas` at the surface.
    pub fn saturate(&mut self, gas: &GasMixture, params: &Parameters) {
        let surface_pressure = self.surface_pressure;
        for compartment in self.compartments.iter_mut() {
            compartment.saturate(surface_pressure, gas, params);
        }
    }

    pub fn backup(&mut self, slot: BackupSlot) {
        for compartment in self.compartments.iter_mut() {
            compartment.backup(slot);
        }
    }

    pub fn restore(&mut self, slot: BackupSlot) {
        for compartment in self.compartments.iter_mut() {
            compartment.restore(slot);
        }
    }
}

#[test]
fn test_new_diver_is_saturated_on_air() {
    let params = Parameters::default();
    let diver = Diver::new(&params).unwrap();
    let expected = (params.surface_pressure - params.alveolar_correction()) * 0.79;
    for compartment in diver.compartments() {
        assert_eq!(compartment.n2.tension, expected);
        assert_eq!(compartment.he.tension, 0.0);
    }
}

#[test]
fn test_clone_is_independent() {
    use crate::tissue::GasTensions;
    let params = Parameters::default();
    let diver = Diver::new(&params).unwrap();
    let mut trial = diver.clone();
    trial.compartments_mut()[4].set_tensions(GasTensions { n2: 4.0, he: 1.0 });
    assert_ne!(trial, diver);
    assert_eq!(diver.compartments()[4].he.tension, 0.0);
}

#[test]
fn test_height_lowers_surface_pressure() {
    let params = Parameters::default();
    let mut diver = Diver::new(&params).unwrap();
    diver.set_height(Length::from_meters(2000.0), &params);
    assert!(diver.surface_pressure() < params.surface_pressure);
    assert_eq!(diver.ambient_pressure(10.0), diver.surface_pressure() + 1.0);
}
