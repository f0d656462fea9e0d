use alloc::vec::Vec;

use defmt::Format;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::diver::Diver;
use crate::error::{CalculationError, DecoError, IllegalActionError};
use crate::gas::GasMixture;
use crate::parameters::Parameters;
use crate::segment::{ExposureSegment, SegmentKind};
use crate::units::Length;
use crate::zhl16::ZhL16Variant;

pub mod buhlmann;
pub mod vpm;

pub use buhlmann::BuhlmannDecompression;
pub use vpm::VpmDecompression;

/// Depths (m) closer to the surface than this count as surfaced.
pub const SURFACE_EPSILON: f64 = 1.0e-3;
/// Longest single stop before a schedule is given up on (min).
pub const MAX_STOP_TIME: f64 = 1440.0;

/// A band of the ascent breathed on one gas, with its own ascent rate and
/// stop spacing.
#[derive(Debug, Format, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecoStage {
    start_depth: Length,
    end_depth: Length,
    ascent_rate: Length, // per minute, negative
    gas: GasMixture,
    step_size: Length,
}

impl DecoStage {
    pub fn new(
        start_depth: Length,
        end_depth: Length,
        ascent_rate: Length,
        gas: GasMixture,
        step_size: Length,
    ) -> Result<Self, IllegalActionError> {
        if end_depth.is_negative() {
            return Err(IllegalActionError::NegativeDepth);
        }
        if start_depth <= end_depth {
            return Err(IllegalActionError::StageNotAscending);
        }
        if ascent_rate.meters() >= 0.0 {
            return Err(IllegalActionError::AscentRateNotNegative);
        }
        if step_size.meters() <= 0.0 {
            return Err(IllegalActionError::NonPositiveStepSize);
        }
        Ok(DecoStage {
            start_depth,
            end_depth,
            ascent_rate,
            gas,
            step_size,
        })
    }

    /// Stage whose stops are spaced by the configured `deco_step_size`.
    pub fn with_default_step(
        start_depth: Length,
        end_depth: Length,
        ascent_rate: Length,
        gas: GasMixture,
        params: &Parameters,
    ) -> Result<Self, IllegalActionError> {
        Self::new(
            start_depth,
            end_depth,
            ascent_rate,
            gas,
            Length::from_meters(params.deco_step_size),
        )
    }

    pub fn start_depth(&self) -> Length {
        self.start_depth
    }

    pub fn end_depth(&self) -> Length {
        self.end_depth
    }

    pub fn ascent_rate(&self) -> Length {
        self.ascent_rate
    }

    pub fn gas(&self) -> &GasMixture {
        &self.gas
    }

    pub fn step_size(&self) -> Length {
        self.step_size
    }

    /// Minutes needed to ascend from `from` to `to` meters at this stage's rate.
    pub fn ascent_period(&self, from: f64, to: f64) -> f64 {
        ((from - to) / -self.ascent_rate.meters()).max(0.0)
    }

    /// Ascent segment from `from` to `to` meters on this stage's gas.
    pub fn ascent(&self, from: f64, to: f64) -> Result<ExposureSegment, CalculationError> {
        ExposureSegment::varying_depth(
            Length::from_meters(from),
            Length::from_meters(to),
            self.ascent_period(from, to),
            self.gas,
        )
    }
}

/// Ordered deco stages, deepest first.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoStages {
    stages: Vec<DecoStage>,
}

impl DecoStages {
    pub fn new(stages: Vec<DecoStage>) -> Result<Self, IllegalActionError> {
        if stages.is_empty() {
            return Err(IllegalActionError::NoDecoStages);
        }
        if stages
            .windows(2)
            .any(|pair| pair[1].start_depth >= pair[0].start_depth)
        {
            return Err(IllegalActionError::StageDepthsNotDecreasing);
        }
        Ok(DecoStages { stages })
    }

    pub fn single(stage: DecoStage) -> Self {
        DecoStages {
            stages: alloc::vec![stage],
        }
    }

    pub fn stages(&self) -> &[DecoStage] {
        &self.stages
    }

    /// Stage in use at `depth` meters: the shallowest stage that still
    /// starts at or below it. Depths below every stage use the first one.
    pub fn stage_for(&self, depth: f64) -> &DecoStage {
        self.stages
            .iter()
            .rev()
            .find(|stage| stage.start_depth.meters() >= depth - SURFACE_EPSILON)
            .unwrap_or(&self.stages[0])
    }
}

/// Where and when the bottom phase ended.
#[derive(Debug, Format, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AscentStart {
    pub depth: Length,
    pub run_time: f64,
    /// Index the first ascent segment gets.
    pub segment_index: usize,
}

/// A stop as a dive table would print it.
#[derive(Debug, Format, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecoStop {
    pub depth: Length,
    pub stop_time: f64,
    /// Run time when leaving the stop.
    pub run_time: f64,
    pub gas: GasMixture,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecoSchedule {
    pub segments: Vec<ExposureSegment>,
    pub deepest_possible_stop: Option<Length>,
    pub start_run_time: f64,
    pub run_time: f64,
    next_index: usize,
}

impl DecoSchedule {
    pub fn new(start: AscentStart) -> Self {
        DecoSchedule {
            segments: Vec::new(),
            deepest_possible_stop: None,
            start_run_time: start.run_time,
            run_time: start.run_time,
            next_index: start.segment_index,
        }
    }

    /// Appends `segment`, stamping it with the running time and index.
    pub fn push(&mut self, segment: ExposureSegment) {
        let segment = segment.with_run_time(self.run_time).with_index(self.next_index);
        self.run_time = segment.end_run_time();
        self.next_index += 1;
        self.segments.push(segment);
    }

    pub fn stops(&self) -> Vec<DecoStop> {
        self.segments
            .iter()
            .filter(|segment| segment.period() > 0.0)
            .filter_map(|segment| match segment.kind() {
                SegmentKind::ConstantDepth { depth } => Some(DecoStop {
                    depth,
                    stop_time: segment.period(),
                    run_time: segment.end_run_time(),
                    gas: *segment.gas(),
                }),
                _ => None,
            })
            .collect()
    }

    pub fn total_ascent_time(&self) -> f64 {
        self.run_time - self.start_run_time
    }

    pub fn total_stop_time(&self) -> f64 {
        self.stops().iter().map(|stop| stop.stop_time).sum()
    }
}

pub trait Decompression {
    fn name(&self) -> &'static str;

    /// Sets up whatever gradients the model starts its ascent with.
    fn calculate_initial_allowable_gradient(&self, diver: &mut Diver, params: &Parameters);

    /// Takes `diver` from `start` to the surface, returning the ascent.
    fn decompress_diver(
        &self,
        diver: &mut Diver,
        start: AscentStart,
        stages: &DecoStages,
        params: &Parameters,
    ) -> Result<DecoSchedule, DecoError>;
}

/// Decompression model selector.
#[derive(Debug, Format, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Algorithm {
    BuhlmannA,
    BuhlmannB,
    BuhlmannC,
    BuhlmannGradient(ZhL16Variant),
    Vpm,
    VpmB,
}

impl Algorithm {
    pub fn model(self) -> DecompressionModel {
        match self {
            Algorithm::BuhlmannA => {
                DecompressionModel::Buhlmann(BuhlmannDecompression::new(ZhL16Variant::A))
            }
            Algorithm::BuhlmannB => {
                DecompressionModel::Buhlmann(BuhlmannDecompression::new(ZhL16Variant::B))
            }
            Algorithm::BuhlmannC => {
                DecompressionModel::Buhlmann(BuhlmannDecompression::new(ZhL16Variant::C))
            }
            Algorithm::BuhlmannGradient(variant) => {
                DecompressionModel::Buhlmann(BuhlmannDecompression::with_gradient_factors(variant))
            }
            Algorithm::Vpm => DecompressionModel::Vpm(VpmDecompression::new(false)),
            Algorithm::VpmB => DecompressionModel::Vpm(VpmDecompression::new(true)),
        }
    }
}

#[derive(Debug, Format, Clone, Copy, PartialEq)]
pub enum DecompressionModel {
    Buhlmann(BuhlmannDecompression),
    Vpm(VpmDecompression),
}

impl Decompression for DecompressionModel {
    fn name(&self) -> &'static str {
        match self {
            DecompressionModel::Buhlmann(model) => model.name(),
            DecompressionModel::Vpm(model) => model.name(),
        }
    }

    fn calculate_initial_allowable_gradient(&self, diver: &mut Diver, params: &Parameters) {
        match self {
            DecompressionModel::Buhlmann(model) => {
                model.calculate_initial_allowable_gradient(diver, params)
            }
            DecompressionModel::Vpm(model) => model.calculate_initial_allowable_gradient(diver, params),
        }
    }

    fn decompress_diver(
        &self,
        diver: &mut Diver,
        start: AscentStart,
        stages: &DecoStages,
        params: &Parameters,
    ) -> Result<DecoSchedule, DecoError> {
        match self {
            DecompressionModel::Buhlmann(model) => model.decompress_diver(diver, start, stages, params),
            DecompressionModel::Vpm(model) => model.decompress_diver(diver, start, stages, params),
        }
    }
}

#[cfg(test)]
fn air_stage(start: f64, end: f64) -> DecoStage {
    DecoStage::new(
        Length::from_meters(start),
        Length::from_meters(end),
        Length::from_meters(-9.0),
        GasMixture::air(),
        Length::from_meters(3.0),
    )
    .unwrap()
}

#[test]
fn test_stage_validation() {
    let m = Length::from_meters;
    let air = GasMixture::air();
    assert_eq!(
        DecoStage::new(m(10.0), m(20.0), m(-9.0), air, m(3.0)),
        Err(IllegalActionError::StageNotAscending)
    );
    assert_eq!(
        DecoStage::new(m(30.0), m(0.0), m(9.0), air, m(3.0)),
        Err(IllegalActionError::AscentRateNotNegative)
    );
    assert_eq!(
        DecoStage::new(m(30.0), m(0.0), m(-9.0), air, m(0.0)),
        Err(IllegalActionError::NonPositiveStepSize)
    );
    assert_eq!(
        DecoStages::new(alloc::vec![air_stage(21.0, 6.0), air_stage(30.0, 0.0)]),
        Err(IllegalActionError::StageDepthsNotDecreasing)
    );
    assert_eq!(DecoStages::new(Vec::new()), Err(IllegalActionError::NoDecoStages));
}

#[test]
fn test_stage_takes_configured_step_size() {
    use crate::units::LengthUnit;
    let m = Length::from_meters;
    let air = GasMixture::air();
    let metric = DecoStage::with_default_step(m(30.0), m(0.0), m(-9.0), air, &Parameters::default()).unwrap();
    assert_eq!(metric.step_size(), m(3.0));

    let imperial = Parameters::default().with_deco_step_size(Length::from_feet(10.0));
    let stage = DecoStage::with_default_step(m(30.0), m(0.0), m(-9.0), air, &imperial).unwrap();
    assert!(libm::fabs(stage.step_size().value(LengthUnit::Feet) - 10.0) < 1e-9);

    let mut broken = Parameters::default();
    broken.deco_step_size = 0.0;
    assert_eq!(
        DecoStage::with_default_step(m(30.0), m(0.0), m(-9.0), air, &broken),
        Err(IllegalActionError::NonPositiveStepSize)
    );
}

#[test]
fn test_stage_lookup() {
    let stages = DecoStages::new(alloc::vec![
        air_stage(60.0, 21.0),
        air_stage(21.0, 6.0),
        air_stage(6.0, 0.0),
    ])
    .unwrap();
    assert_eq!(stages.stage_for(45.0).start_depth().meters(), 60.0);
    assert_eq!(stages.stage_for(21.0).start_depth().meters(), 21.0);
    assert_eq!(stages.stage_for(9.0).start_depth().meters(), 21.0);
    assert_eq!(stages.stage_for(3.0).start_depth().meters(), 6.0);
    assert_eq!(stages.stage_for(80.0).start_depth().meters(), 60.0);
}

#[test]
fn test_schedule_stamps_run_time_and_index() {
    let start = AscentStart {
        depth: Length::from_meters(30.0),
        run_time: 25.0,
        segment_index: 2,
    };
    let mut schedule = DecoSchedule::new(start);
    let stage = air_stage(30.0, 0.0);
    schedule.push(stage.ascent(30.0, 6.0).unwrap());
    schedule.push(ExposureSegment::constant_depth(Length::from_meters(6.0), 4.0, GasMixture::air()).unwrap());
    schedule.push(stage.ascent(6.0, 0.0).unwrap());
    assert_eq!(schedule.segments[1].index(), 3);
    assert!(libm::fabs(schedule.segments[1].run_time() - (25.0 + 24.0 / 9.0)) < 1e-12);
    let stops = schedule.stops();
    assert_eq!(stops.len(), 1);
    assert_eq!(stops[0].stop_time, 4.0);
    assert!(libm::fabs(schedule.total_ascent_time() - (30.0 / 9.0 + 4.0)) < 1e-12);
}
