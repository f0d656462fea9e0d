use defmt::Format;

use super::{AscentStart, DecoSchedule, DecoStage, DecoStages, Decompression, MAX_STOP_TIME, SURFACE_EPSILON};
use crate::ceiling::check_diver_safety;
use crate::diver::Diver;
use crate::error::{CalculationError, DecoError};
use crate::m_value::tolerated_tension;
use crate::parameters::{GradientFactors, Parameters};
use crate::segment::ExposureSegment;
use crate::tissue::{AmbientProfile, TissueCompartment};
use crate::units::Length;
use crate::zhl16::{ZhL16Coefficients, ZhL16Variant};

/// Bühlmann ZH-L16 stop finder. Without gradient factors it runs at
/// GF 1.0/1.0, i.e. straight against the M-values.
#[derive(Debug, Format, Clone, Copy, PartialEq)]
pub struct BuhlmannDecompression {
    variant: ZhL16Variant,
    use_gradient_factors: bool,
}

impl BuhlmannDecompression {
    pub fn new(variant: ZhL16Variant) -> Self {
        BuhlmannDecompression {
            variant,
            use_gradient_factors: false,
        }
    }

    pub fn with_gradient_factors(variant: ZhL16Variant) -> Self {
        BuhlmannDecompression {
            variant,
            use_gradient_factors: true,
        }
    }

    pub fn variant(&self) -> ZhL16Variant {
        self.variant
    }

    pub fn gradient_factors(&self, params: &Parameters) -> GradientFactors {
        if self.use_gradient_factors {
            params.gradient_factors
        } else {
            GradientFactors::new(1.0, 1.0)
        }
    }

    /// Deepest of the per-compartment first stops for an ascent from `depth`
    /// meters, searched from the surface downwards in `stage` steps. A
    /// compartment that clears no shallower step stays at `depth`, which must
    /// then lie on the step grid itself.
    pub fn first_stop(
        &self,
        diver: &Diver,
        depth: f64,
        stage: &DecoStage,
        gf_low: f64,
        params: &Parameters,
    ) -> Result<f64, CalculationError> {
        let coefficients = self.variant.coefficients();
        let step = stage.step_size().meters();
        let mut first_stop: f64 = 0.0;
        for compartment in diver.compartments() {
            let mut steps = 0;
            let compartment_stop = loop {
                let candidate = steps as f64 * step;
                if candidate >= depth - SURFACE_EPSILON {
                    if candidate > depth + SURFACE_EPSILON {
                        return Err(CalculationError::StepSizeTooLarge);
                    }
                    break depth;
                }
                let ascent = stage.ascent(depth, candidate)?;
                let profile = ascent.profile(diver.surface_pressure(), params);
                let limit_ambient = diver.ambient_pressure(candidate);
                if clears(compartment, profile, limit_ambient, stage, coefficients, gf_low, params)? {
                    break candidate;
                }
                steps += 1;
            };
            first_stop = first_stop.max(compartment_stop);
        }
        Ok(first_stop)
    }

    /// Shortest stay at `depth` after which the ascent to `next` meters
    /// stays within the limit at `next`.
    fn stop_time(
        &self,
        diver: &Diver,
        depth: f64,
        next: f64,
        stage: &DecoStage,
        gf_next: f64,
        params: &Parameters,
    ) -> Result<f64, CalculationError> {
        let coefficients = self.variant.coefficients();
        let surface_pressure = diver.surface_pressure();
        let ascent = stage.ascent(depth, next)?.profile(surface_pressure, params);
        let next_ambient = diver.ambient_pressure(next);

        let mut stay = params.minimum_deco_stop_time;
        while stay <= MAX_STOP_TIME {
            let stop = ExposureSegment::constant_depth(Length::from_meters(depth), stay, *stage.gas())?
                .profile(surface_pressure, params);
            let mut all_clear = true;
            for compartment in diver.compartments() {
                let mut projected = *compartment;
                projected.expose(stop, stage.gas(), params)?;
                if !clears(&projected, ascent, next_ambient, stage, coefficients, gf_next, params)? {
                    all_clear = false;
                    break;
                }
            }
            if all_clear {
                return Ok(stay);
            }
            stay += 1.0;
        }
        Err(CalculationError::StopTooLong { depth })
    }
}

/// Whether `compartment` is within its limit at `limit_ambient` bar after
/// going through `profile`.
fn clears(
    compartment: &TissueCompartment,
    profile: AmbientProfile,
    limit_ambient: f64,
    stage: &DecoStage,
    coefficients: &ZhL16Coefficients,
    gf: f64,
    params: &Parameters,
) -> Result<bool, CalculationError> {
    let tensions = compartment.loaded_tensions(profile, stage.gas(), params)?;
    let limit = tolerated_tension(limit_ambient, tensions, compartment.index, coefficients, gf);
    Ok(tensions.total() <= limit)
}

fn next_stop(depth: f64, step: f64) -> f64 {
    let next = depth - step;
    if next < SURFACE_EPSILON { 0.0 } else { next }
}

impl Decompression for BuhlmannDecompression {
    fn name(&self) -> &'static str {
        match (self.variant, self.use_gradient_factors) {
            (ZhL16Variant::A, false) => "ZH-L16A",
            (ZhL16Variant::B, false) => "ZH-L16B",
            (ZhL16Variant::C, false) => "ZH-L16C",
            (ZhL16Variant::A, true) => "ZH-L16A with gradient factors",
            (ZhL16Variant::B, true) => "ZH-L16B with gradient factors",
            (ZhL16Variant::C, true) => "ZH-L16C with gradient factors",
        }
    }

    /// Bühlmann has no bubble model to set up.
    fn calculate_initial_allowable_gradient(&self, _diver: &mut Diver, _params: &Parameters) {}

    fn decompress_diver(
        &self,
        diver: &mut Diver,
        start: AscentStart,
        stages: &DecoStages,
        params: &Parameters,
    ) -> Result<DecoSchedule, DecoError> {
        params.validate()?;
        let coefficients = self.variant.coefficients();
        let gf = self.gradient_factors(params);
        let mut schedule = DecoSchedule::new(start);
        let mut depth = start.depth.meters();

        let bottom_stage = *stages.stage_for(depth);
        let first_stop = self.first_stop(diver, depth, &bottom_stage, gf.low, params)?;
        deco_trace!("first stop at {} m", first_stop);
        let gf_at = |d: f64| {
            if first_stop > SURFACE_EPSILON {
                gf.high + (gf.low - gf.high) * d / first_stop
            } else {
                gf.high
            }
        };

        if first_stop < depth {
            let ascent = bottom_stage.ascent(depth, first_stop)?;
            ascent.expose_diver(diver, params)?;
            schedule.push(ascent);
            depth = first_stop;
            check_diver_safety(diver, depth, coefficients, gf_at(depth))?;
        }

        while depth > SURFACE_EPSILON {
            let stage = *stages.stage_for(depth);
            let next = next_stop(depth, stage.step_size().meters());
            let gf_next = gf_at(next);
            let stay = self.stop_time(diver, depth, next, &stage, gf_next, params)?;

            let stop = ExposureSegment::constant_depth(Length::from_meters(depth), stay, *stage.gas())?;
            stop.expose_diver(diver, params)?;
            schedule.push(stop);
            let ascent = stage.ascent(depth, next)?;
            ascent.expose_diver(diver, params)?;
            schedule.push(ascent);
            check_diver_safety(diver, next, coefficients, gf_next)?;

            deco_trace!("stop at {} m for {} min, run time {}", depth, stay, schedule.run_time);
            depth = next;
        }
        Ok(schedule)
    }
}

#[cfg(test)]
fn dive_to(depth: f64, bottom_time: f64, params: &Parameters) -> (Diver, AscentStart) {
    use crate::gas::GasMixture;
    let mut diver = Diver::new(params).unwrap();
    let descent_time = depth / 20.0;
    ExposureSegment::varying_depth(Length::zero(), Length::from_meters(depth), descent_time, GasMixture::air())
        .unwrap()
        .expose_diver(&mut diver, params)
        .unwrap();
    ExposureSegment::constant_depth(Length::from_meters(depth), bottom_time - descent_time, GasMixture::air())
        .unwrap()
        .expose_diver(&mut diver, params)
        .unwrap();
    let start = AscentStart {
        depth: Length::from_meters(depth),
        run_time: bottom_time,
        segment_index: 2,
    };
    (diver, start)
}

#[cfg(test)]
fn air_stages(depth: f64) -> DecoStages {
    use crate::gas::GasMixture;
    DecoStages::single(
        DecoStage::new(
            Length::from_meters(depth),
            Length::zero(),
            Length::from_meters(-9.0),
            GasMixture::air(),
            Length::from_meters(3.0),
        )
        .unwrap(),
    )
}

#[test]
fn test_short_shallow_dive_has_no_stops() {
    let params = Parameters::default();
    let (mut diver, start) = dive_to(12.0, 20.0, &params);
    let model = BuhlmannDecompression::new(ZhL16Variant::C);
    let schedule = model.decompress_diver(&mut diver, start, &air_stages(12.0), &params).unwrap();
    assert!(schedule.stops().is_empty());
    assert_eq!(schedule.segments.len(), 1);
}

#[test]
fn test_deco_dive_reaches_surface_with_whole_minute_stops() {
    let params = Parameters::default();
    let (mut diver, start) = dive_to(45.0, 30.0, &params);
    let model = BuhlmannDecompression::with_gradient_factors(ZhL16Variant::C);
    let schedule = model.decompress_diver(&mut diver, start, &air_stages(45.0), &params).unwrap();
    let stops = schedule.stops();
    assert!(!stops.is_empty());
    for pair in stops.windows(2) {
        assert!(pair[1].depth < pair[0].depth);
    }
    for stop in &stops {
        let multiple = stop.depth.meters() / 3.0;
        assert!(libm::fabs(multiple - libm::round(multiple)) < 1e-9);
        assert!(stop.stop_time >= params.minimum_deco_stop_time);
        assert_eq!(stop.stop_time, libm::round(stop.stop_time));
    }
    assert_eq!(schedule.segments.last().unwrap().end_depth(), Some(Length::zero()));
}

#[test]
fn test_gradient_factors_lengthen_the_ascent() {
    let params = Parameters::default();
    let stages = air_stages(45.0);

    let (mut diver, start) = dive_to(45.0, 30.0, &params);
    let plain = BuhlmannDecompression::new(ZhL16Variant::C)
        .decompress_diver(&mut diver, start, &stages, &params)
        .unwrap();
    let (mut diver, start) = dive_to(45.0, 30.0, &params);
    let conservative = BuhlmannDecompression::with_gradient_factors(ZhL16Variant::C)
        .decompress_diver(&mut diver, start, &stages, &params)
        .unwrap();
    assert!(conservative.total_ascent_time() > plain.total_ascent_time());
}

#[test]
fn test_first_stop_stays_on_the_step_grid() {
    use crate::gas::GasMixture;
    use crate::tissue::GasTensions;
    let params = Parameters::default();
    let mut diver = Diver::new(&params).unwrap();
    for compartment in diver.compartments_mut().iter_mut() {
        compartment.set_tensions(GasTensions { n2: 10.0, he: 0.0 });
    }
    let model = BuhlmannDecompression::with_gradient_factors(ZhL16Variant::C);
    let stage = |depth: f64| {
        DecoStage::new(
            Length::from_meters(depth),
            Length::zero(),
            Length::from_meters(-9.0),
            GasMixture::air(),
            Length::from_meters(3.0),
        )
        .unwrap()
    };

    // nothing clears, but 30 m is itself a stop depth
    assert_eq!(model.first_stop(&diver, 30.0, &stage(30.0), 0.3, &params), Ok(30.0));
    assert_eq!(
        model.first_stop(&diver, 31.0, &stage(31.0), 0.3, &params),
        Err(CalculationError::StepSizeTooLarge)
    );
}
