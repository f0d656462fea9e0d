use alloc::vec::Vec;

use crate::deco::{Algorithm, AscentStart, DecoSchedule, DecoStages, Decompression};
use crate::diver::Diver;
use crate::error::{CalculationError, DecoError, IllegalActionError};
use crate::gas::GasMixture;
use crate::parameters::Parameters;
use crate::segment::ExposureSegment;
use crate::units::Length;

/// Bottom phase of a dive plus the model that takes the diver back up.
#[derive(Debug, Clone, PartialEq)]
pub struct Dive {
    segments: Vec<ExposureSegment>,
    stages: DecoStages,
    algorithm: Algorithm,
    schedule: Option<DecoSchedule>,
}

impl Dive {
    pub fn new(algorithm: Algorithm, stages: DecoStages) -> Self {
        Dive {
            segments: Vec::new(),
            stages,
            algorithm,
            schedule: None,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn stages(&self) -> &DecoStages {
        &self.stages
    }

    pub fn segments(&self) -> &[ExposureSegment] {
        &self.segments
    }

    /// The ascent computed by the last `apply`.
    pub fn schedule(&self) -> Option<&DecoSchedule> {
        self.schedule.as_ref()
    }

    pub fn depth(&self) -> Length {
        self.segments
            .last()
            .and_then(|segment| segment.end_depth())
            .unwrap_or_default()
    }

    pub fn run_time(&self) -> f64 {
        self.segments.last().map_or(0.0, |segment| segment.end_run_time())
    }

    /// Appends a bottom-phase segment, stamping run time and index.
    pub fn push_segment(&mut self, segment: ExposureSegment) {
        let segment = segment
            .with_run_time(self.run_time())
            .with_index(self.segments.len());
        self.segments.push(segment);
    }

    /// Change depth linearly from the current depth to `depth` over `period` minutes.
    pub fn travel(&mut self, depth: Length, period: f64, gas: GasMixture) -> Result<(), DecoError> {
        if depth.is_negative() {
            return Err(IllegalActionError::NegativeDepth.into());
        }
        let segment = ExposureSegment::varying_depth(self.depth(), depth, period, gas)?;
        self.push_segment(segment);
        Ok(())
    }

    /// Stay at the current depth for `period` minutes.
    pub fn stay(&mut self, period: f64, gas: GasMixture) -> Result<(), CalculationError> {
        let segment = ExposureSegment::constant_depth(self.depth(), period, gas)?;
        self.push_segment(segment);
        Ok(())
    }

    pub fn ascent_start(&self) -> AscentStart {
        AscentStart {
            depth: self.depth(),
            run_time: self.run_time(),
            segment_index: self.segments.len(),
        }
    }

    /// Runs the bottom phase on `diver`, then decompresses them.
    pub fn apply(&mut self, diver: &mut Diver, params: &Parameters) -> Result<&DecoSchedule, DecoError> {
        for segment in &self.segments {
            segment.expose_diver(diver, params)?;
        }
        let model = self.algorithm.model();
        deco_trace!("decompressing with {}", model.name());
        let schedule = model.decompress_diver(diver, self.ascent_start(), &self.stages, params)?;
        Ok(&*self.schedule.insert(schedule))
    }
}

/// One step of a diver's history.
#[derive(Debug, Clone, PartialEq)]
pub enum Exposure {
    /// Equilibrate on `gas` at `height` and start with fresh bubble nuclei.
    Saturation { gas: GasMixture, height: Length },
    Dive(Dive),
    /// Off-gas on air at the surface, then carry the excited nuclei into the
    /// next dive.
    SurfaceInterval { period: f64 },
    /// Travel to `height` and stay there for `stay_period` minutes.
    /// Acclimatised divers arrive already saturated.
    Acclimatisation {
        height: Length,
        ascent_period: f64,
        stay_period: f64,
        acclimatized: bool,
    },
}

impl Exposure {
    pub fn name(&self) -> &'static str {
        match self {
            Exposure::Saturation { .. } => "saturation",
            Exposure::Dive(_) => "dive",
            Exposure::SurfaceInterval { .. } => "surface interval",
            Exposure::Acclimatisation { .. } => "acclimatisation",
        }
    }

    pub fn apply(&mut self, diver: &mut Diver, params: &Parameters) -> Result<(), DecoError> {
        match self {
            Exposure::Saturation { gas, height } => {
                diver.set_height(*height, params);
                diver.saturate(gas, params);
                for compartment in diver.compartments_mut().iter_mut() {
                    compartment.reset_bubble_state(&params.vpm);
                }
            }
            Exposure::Dive(dive) => {
                dive.apply(diver, params)?;
            }
            Exposure::SurfaceInterval { period } => surface_interval(diver, *period, params)?,
            Exposure::Acclimatisation {
                height,
                ascent_period,
                stay_period,
                acclimatized,
            } => {
                if *ascent_period <= 0.0 {
                    return Err(IllegalActionError::NonPositiveAscentPeriod.into());
                }
                if *acclimatized {
                    diver.set_height(*height, params);
                    diver.saturate(&GasMixture::air(), params);
                } else {
                    acclimatise(diver, *height, *ascent_period, *stay_period, params)?;
                }
            }
        }
        Ok(())
    }
}

fn surface_interval(diver: &mut Diver, period: f64, params: &Parameters) -> Result<(), CalculationError> {
    let at_surface = ExposureSegment::constant_depth(Length::zero(), period, GasMixture::air())?;
    at_surface.expose_diver(diver, params)?;
    for compartment in diver.compartments_mut().iter_mut() {
        let max_actual_gradient = compartment.max_actual_gradient;
        for gas in [&mut compartment.n2, &mut compartment.he] {
            gas.nucleus.adjust_for_repetitive_dive(
                max_actual_gradient,
                gas.initial_allowable_gradient,
                gas.adjusted_crushing_pressure,
                period,
                &params.vpm,
            );
        }
        compartment.reset_dive_history();
    }
    Ok(())
}

/// Unacclimatised ascent to altitude: the supersaturation on arrival
/// resizes the nuclei before the stay.
fn acclimatise(
    diver: &mut Diver,
    height: Length,
    ascent_period: f64,
    stay_period: f64,
    params: &Parameters,
) -> Result<(), CalculationError> {
    let air = GasMixture::air();
    ExposureSegment::varying_height(diver.height(), height, ascent_period, air)?.expose_diver(diver, params)?;
    diver.set_height(height, params);

    let ambient = diver.surface_pressure();
    let other_gases = params.vpm.pressure_other_gases;
    for compartment in diver.compartments_mut().iter_mut() {
        let gradient = compartment.total_tension() + other_gases - ambient;
        for gas in [&mut compartment.n2, &mut compartment.he] {
            gas.nucleus.update_nucleus_at_height(gradient, stay_period, &params.vpm);
        }
    }
    ExposureSegment::constant_height(height, stay_period, air)?.expose_diver(diver, params)
}

#[cfg(test)]
fn air_dive(depth: f64, bottom_time: f64, algorithm: Algorithm) -> Dive {
    use crate::deco::DecoStage;
    let air = GasMixture::air();
    let stages = DecoStages::single(
        DecoStage::new(
            Length::from_meters(depth),
            Length::zero(),
            Length::from_meters(-9.0),
            air,
            Length::from_meters(3.0),
        )
        .unwrap(),
    );
    let mut dive = Dive::new(algorithm, stages);
    dive.travel(Length::from_meters(depth), depth / 18.0, air).unwrap();
    dive.stay(bottom_time - depth / 18.0, air).unwrap();
    dive
}

#[test]
fn test_dive_builder_tracks_depth_and_run_time() {
    let dive = air_dive(36.0, 25.0, Algorithm::BuhlmannC);
    assert_eq!(dive.depth(), Length::from_meters(36.0));
    assert!(libm::fabs(dive.run_time() - 25.0) < 1e-12);
    let start = dive.ascent_start();
    assert_eq!(start.segment_index, 2);
    assert_eq!(dive.segments()[1].index(), 1);
}

#[test]
fn test_travel_rejects_negative_depth() {
    let mut dive = air_dive(20.0, 20.0, Algorithm::BuhlmannC);
    assert_eq!(
        dive.travel(Length::from_meters(-1.0), 1.0, GasMixture::air()),
        Err(DecoError::IllegalAction(IllegalActionError::NegativeDepth))
    );
}

#[test]
fn test_surface_interval_resets_dive_history() {
    let params = Parameters::default();
    let mut diver = Diver::new(&params).unwrap();
    let mut dive = Exposure::Dive(air_dive(40.0, 25.0, Algorithm::VpmB));
    dive.apply(&mut diver, &params).unwrap();
    assert!(diver.compartments().iter().any(|c| c.max_actual_gradient > 0.0));

    Exposure::SurfaceInterval { period: 60.0 }.apply(&mut diver, &params).unwrap();
    for compartment in diver.compartments() {
        assert_eq!(compartment.max_actual_gradient, 0.0);
        assert_eq!(compartment.n2.max_crushing_pressure, 0.0);
        assert!(compartment.n2.nucleus.adjusted_radius() > 0.0);
    }
}

#[test]
fn test_acclimatisation_requires_positive_ascent_period() {
    let params = Parameters::default();
    let mut diver = Diver::new(&params).unwrap();
    let mut exposure = Exposure::Acclimatisation {
        height: Length::from_meters(1500.0),
        ascent_period: 0.0,
        stay_period: 120.0,
        acclimatized: false,
    };
    assert_eq!(
        exposure.apply(&mut diver, &params),
        Err(DecoError::IllegalAction(IllegalActionError::NonPositiveAscentPeriod))
    );
}
