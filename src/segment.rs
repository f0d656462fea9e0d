use defmt::Format;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::crushing;
use crate::diver::Diver;
use crate::error::CalculationError;
use crate::gas::GasMixture;
use crate::parameters::Parameters;
use crate::tissue::{AmbientProfile, GasTensions, TissueCompartment};
use crate::units::{barometric_pressure, Length, Pressure, BAR_PER_METER};

/// What the ambient pressure does during a segment. Depths are below the
/// diver's surface, heights above sea level.
#[derive(Debug, Format, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SegmentKind {
    ConstantDepth { depth: Length },
    VaryingDepth { start: Length, end: Length },
    ConstantHeight { height: Length },
    VaryingHeight { start: Length, end: Length },
}

/// One leg of an exposure: a constant or linearly changing ambient pressure
/// breathed on a single gas for `period` minutes.
#[derive(Debug, Format, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExposureSegment {
    kind: SegmentKind,
    period: f64, // min
    gas: GasMixture,
    run_time: f64, // min, at the start of the segment
    index: usize,
}

impl ExposureSegment {
    fn new(kind: SegmentKind, period: f64, gas: GasMixture) -> Result<Self, CalculationError> {
        if period < 0.0 {
            return Err(CalculationError::NegativeExposurePeriod);
        }
        Ok(ExposureSegment {
            kind,
            period,
            gas,
            run_time: 0.0,
            index: 0,
        })
    }

    pub fn constant_depth(
        depth: Length,
        period: f64,
        gas: GasMixture,
    ) -> Result<Self, CalculationError> {
        Self::new(SegmentKind::ConstantDepth { depth }, period, gas)
    }

    pub fn varying_depth(
        start: Length,
        end: Length,
        period: f64,
        gas: GasMixture,
    ) -> Result<Self, CalculationError> {
        Self::new(SegmentKind::VaryingDepth { start, end }, period, gas)
    }

    pub fn constant_height(
        height: Length,
        period: f64,
        gas: GasMixture,
    ) -> Result<Self, CalculationError> {
        Self::new(SegmentKind::ConstantHeight { height }, period, gas)
    }

    pub fn varying_height(
        start: Length,
        end: Length,
        period: f64,
        gas: GasMixture,
    ) -> Result<Self, CalculationError> {
        Self::new(SegmentKind::VaryingHeight { start, end }, period, gas)
    }

    pub fn with_run_time(mut self, run_time: f64) -> Self {
        self.run_time = run_time;
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn gas(&self) -> &GasMixture {
        &self.gas
    }

    pub fn run_time(&self) -> f64 {
        self.run_time
    }

    pub fn end_run_time(&self) -> f64 {
        self.run_time + self.period
    }

    pub fn set_run_time(&mut self, run_time: f64) {
        self.run_time = run_time;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    /// Depth at the end of a depth segment.
    pub fn end_depth(&self) -> Option<Length> {
        match self.kind {
            SegmentKind::ConstantDepth { depth } => Some(depth),
            SegmentKind::VaryingDepth { end, .. } => Some(end),
            _ => None,
        }
    }

    /// Ambient pressure profile (bar) for a diver whose surface is at
    /// `surface_pressure` bar.
    pub fn profile(&self, surface_pressure: f64, params: &Parameters) -> AmbientProfile {
        let at_depth = |depth: Length| surface_pressure + depth.meters() * BAR_PER_METER;
        let at_height = |height: Length| {
            barometric_pressure(height, Pressure::from_bar(params.surface_pressure)).bar()
        };
        match self.kind {
            SegmentKind::ConstantDepth { depth } => {
                AmbientProfile::constant(at_depth(depth), self.period)
            }
            SegmentKind::ConstantHeight { height } => {
                AmbientProfile::constant(at_height(height), self.period)
            }
            SegmentKind::VaryingDepth { start, end } => {
                self.linear_profile(at_depth(start), at_depth(end))
            }
            SegmentKind::VaryingHeight { start, end } => {
                self.linear_profile(at_height(start), at_height(end))
            }
        }
    }

    fn linear_profile(&self, start: f64, end: f64) -> AmbientProfile {
        let rate = if self.period > 0.0 {
            (end - start) / self.period
        } else {
            0.0
        };
        AmbientProfile {
            start,
            rate,
            period: self.period,
        }
    }

    pub fn start_ambient_pressure(&self, surface_pressure: f64, params: &Parameters) -> f64 {
        self.profile(surface_pressure, params).start
    }

    pub fn end_ambient_pressure(&self, surface_pressure: f64, params: &Parameters) -> f64 {
        self.profile(surface_pressure, params).end()
    }

    /// Ambient pressure change rate (bar/min).
    pub fn rate(&self, surface_pressure: f64, params: &Parameters) -> f64 {
        self.profile(surface_pressure, params).rate
    }

    pub fn expose_tissue_compartment(
        &self,
        compartment: &mut TissueCompartment,
        surface_pressure: f64,
        params: &Parameters,
    ) -> Result<(), CalculationError> {
        let initial = compartment.tensions();
        compartment.expose(self.profile(surface_pressure, params), &self.gas, params)?;
        self.crushing_pressure_update(compartment, initial, surface_pressure, params)
    }

    pub fn expose_diver(&self, diver: &mut Diver, params: &Parameters) -> Result<(), CalculationError> {
        let surface_pressure = diver.surface_pressure();
        for compartment in diver.compartments_mut().iter_mut() {
            self.expose_tissue_compartment(compartment, surface_pressure, params)?;
        }
        Ok(())
    }

    /// Descents compress the VPM nuclei. Anything else leaves the crushing
    /// history alone.
    pub fn crushing_pressure_update(
        &self,
        compartment: &mut TissueCompartment,
        initial: GasTensions,
        surface_pressure: f64,
        params: &Parameters,
    ) -> Result<(), CalculationError> {
        let profile = self.profile(surface_pressure, params);
        if profile.end() > profile.start {
            crushing::crushing_pressure_update(compartment, initial, profile, &self.gas, params)?;
        }
        Ok(())
    }
}

#[test]
fn test_negative_period_is_rejected() {
    let segment = ExposureSegment::constant_depth(Length::from_meters(10.0), -1.0, GasMixture::air());
    assert_eq!(segment, Err(CalculationError::NegativeExposurePeriod));
}

#[test]
fn test_zero_period_leaves_tensions_unchanged() {
    let params = Parameters::default();
    let mut diver = Diver::new(&params).unwrap();
    let before = diver.clone();
    let segment = ExposureSegment::constant_depth(Length::from_meters(40.0), 0.0, GasMixture::air()).unwrap();
    segment.expose_diver(&mut diver, &params).unwrap();
    for (a, b) in diver.compartments().iter().zip(before.compartments().iter()) {
        assert_eq!(a.tensions(), b.tensions());
    }
}

#[test]
fn test_descent_records_crushing_pressure() {
    let params = Parameters::default();
    let mut diver = Diver::new(&params).unwrap();
    let descent = ExposureSegment::varying_depth(
        Length::zero(),
        Length::from_meters(30.0),
        1.5,
        GasMixture::air(),
    )
    .unwrap();
    descent.expose_diver(&mut diver, &params).unwrap();
    for compartment in diver.compartments() {
        assert!(compartment.n2.max_crushing_pressure > 0.0);
    }

    let ascent = ExposureSegment::varying_depth(
        Length::from_meters(30.0),
        Length::from_meters(20.0),
        1.0,
        GasMixture::air(),
    )
    .unwrap();
    let crushed = diver.compartments()[0].n2.max_crushing_pressure;
    ascent.expose_diver(&mut diver, &params).unwrap();
    assert_eq!(diver.compartments()[0].n2.max_crushing_pressure, crushed);
}

#[test]
fn test_height_segment_uses_barometric_pressure() {
    let params = Parameters::default();
    let segment =
        ExposureSegment::constant_height(Length::from_meters(1500.0), 60.0, GasMixture::air()).unwrap();
    let ambient = segment.start_ambient_pressure(params.surface_pressure, &params);
    assert!(ambient < params.surface_pressure);
    assert_eq!(segment.rate(params.surface_pressure, &params), 0.0);
}
