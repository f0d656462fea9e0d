use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::diver::Diver;
use crate::error::DecoError;
use crate::exposure::Exposure;
use crate::parameters::Parameters;
use crate::tissue::GasTensions;
use crate::zhl16::COMPARTMENTS;

/// Tissue tensions after each exposure of a run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationOutputs {
    pub surface_pressures: Vec<f64>,
    pub tissues_per_exposure: Vec<[GasTensions; COMPARTMENTS]>,
}

impl SimulationOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, diver: &Diver) {
        self.surface_pressures.push(diver.surface_pressure());
        self.tissues_per_exposure
            .push(diver.compartments().map(|compartment| compartment.tensions()));
    }
}

/// Applies an ordered list of exposures to a diver.
#[derive(Debug, Clone, PartialEq)]
pub struct Processor {
    parameters: Parameters,
    exposures: Vec<Exposure>,
}

impl Processor {
    pub fn new(parameters: Parameters) -> Self {
        Processor {
            parameters,
            exposures: Vec::new(),
        }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn push(&mut self, exposure: Exposure) {
        self.exposures.push(exposure);
    }

    /// Exposures in order, dives carrying their schedule once `run` has been called.
    pub fn exposures(&self) -> &[Exposure] {
        &self.exposures
    }

    pub fn run(&mut self, diver: &mut Diver) -> Result<SimulationOutputs, DecoError> {
        simulate(diver, &mut self.exposures, &self.parameters)
    }
}

/// Applies `exposures` in order and stops at the first failure.
pub fn simulate(
    diver: &mut Diver,
    exposures: &mut [Exposure],
    params: &Parameters,
) -> Result<SimulationOutputs, DecoError> {
    params.validate()?;
    let mut outputs = SimulationOutputs::new();
    for exposure in exposures.iter_mut() {
        deco_trace!("applying {}", exposure.name());
        exposure.apply(diver, params)?;
        outputs.record(diver);
    }
    Ok(outputs)
}

#[test]
fn test_processor_records_each_exposure() {
    use crate::gas::GasMixture;
    use crate::units::Length;
    let params = Parameters::default();
    let mut diver = Diver::new(&params).unwrap();
    let mut processor = Processor::new(params);
    processor.push(Exposure::Saturation {
        gas: GasMixture::air(),
        height: Length::zero(),
    });
    processor.push(Exposure::SurfaceInterval { period: 30.0 });
    let outputs = processor.run(&mut diver).unwrap();
    assert_eq!(outputs.tissues_per_exposure.len(), 2);
    assert_eq!(outputs.surface_pressures.len(), 2);
    assert_eq!(outputs.tissues_per_exposure[1][0], diver.compartments()[0].tensions());
}
