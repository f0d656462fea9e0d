use defmt::Format;

use super::{AscentStart, DecoSchedule, DecoStage, DecoStages, Decompression, MAX_STOP_TIME, SURFACE_EPSILON};
use crate::diver::Diver;
use crate::error::{CalculationError, DecoError};
use crate::gas::GasMixture;
use crate::parameters::Parameters;
use crate::root::{bisection, radius_root_finder};
use crate::segment::ExposureSegment;
use crate::tissue::{alveolar_pressure, AmbientProfile, BackupSlot, InertGas, PhaseVolumeTime, TissueCompartment};
use crate::units::{LengthUnit, Length, BAR_PER_METER, PASCAL_PER_BAR};

pub const MAX_CRITICAL_VOLUME_ITERATIONS: usize = 100;
/// Phase volume times closer than this (min) count as converged.
pub const PHASE_VOLUME_TIME_TOLERANCE: f64 = 1.0;

/// Varying Permeability Model with the critical volume algorithm. With
/// Boyle's-law compensation on this is VPM-B.
#[derive(Debug, Format, Clone, Copy, PartialEq)]
pub struct VpmDecompression {
    boyle_compensation: bool,
}

impl VpmDecompression {
    pub fn new(boyle_compensation: bool) -> Self {
        VpmDecompression { boyle_compensation }
    }

    /// Depth (m) at which the leading compartment's tension first reaches
    /// ambient pressure when ascending from `depth` at `stage`'s rate.
    pub fn start_of_deco_zone(
        &self,
        diver: &Diver,
        depth: f64,
        stage: &DecoStage,
        params: &Parameters,
    ) -> Result<f64, CalculationError> {
        let starting_ambient = diver.ambient_pressure(depth);
        let rate = stage.ascent_rate().meters() * BAR_PER_METER;
        // time to reach zero ambient pressure
        let high_bound = -starting_ambient / rate;
        let other_gases = params.vpm.pressure_other_gases;

        let mut zone: f64 = 0.0;
        for compartment in diver.compartments() {
            let gradient_at = |time: f64| -> Result<f64, CalculationError> {
                let profile = AmbientProfile {
                    start: starting_ambient,
                    rate,
                    period: time,
                };
                let tensions = compartment.loaded_tensions(profile, stage.gas(), params)?;
                Ok(tensions.total() + other_gases - profile.end())
            };
            let time = bisection(gradient_at, 0.0, high_bound)?;
            let ambient = starting_ambient + rate * time;
            zone = zone.max((ambient - diver.surface_pressure()) / BAR_PER_METER);
        }
        deco_trace!("start of deco zone at {} m", zone);
        Ok(zone)
    }

    /// First stop for an ascent from the start of the deco zone, already
    /// checked against on-gassing during the ascent.
    pub fn first_stop(
        &self,
        diver: &Diver,
        zone: f64,
        stage: &DecoStage,
        params: &Parameters,
    ) -> Result<f64, CalculationError> {
        let step = stage.step_size().meters();
        let ceiling = ascent_ceiling(diver, params)?;
        let stop = if ceiling <= 0.0 {
            0.0
        } else {
            libm::round(ceiling / step + 0.5) * step
        };
        if stop > zone {
            return Err(CalculationError::StepSizeTooLarge);
        }
        let stop = projected_ascent(diver, zone, stop, stage, params)?;
        if stop > zone {
            return Err(CalculationError::StepSizeTooLarge);
        }
        Ok(stop)
    }

    /// Ascends from `depth` through all stops to the surface, starting with
    /// `first_stop`, and returns the run time on surfacing. With a schedule
    /// the segments and maximum actual gradients are recorded.
    #[allow(clippy::too_many_arguments)]
    fn ascend_through_stops(
        &self,
        diver: &mut Diver,
        mut depth: f64,
        mut run_time: f64,
        first_stop: f64,
        stages: &DecoStages,
        params: &Parameters,
        mut schedule: Option<&mut DecoSchedule>,
    ) -> Result<f64, CalculationError> {
        let mut stage = *stages.stage_for(depth);
        let mut stop = first_stop;
        loop {
            let ascent = stage.ascent(depth, stop)?;
            ascent.expose_diver(diver, params)?;
            run_time += ascent.period();
            if let Some(schedule) = schedule.as_deref_mut() {
                schedule.push(ascent);
                record_max_actual_gradient(diver, stop, params);
            }
            if stop <= SURFACE_EPSILON {
                return Ok(run_time);
            }

            stage = *stages.stage_for(stop);
            let step = stage.step_size().meters();
            if self.boyle_compensation {
                boyles_law_compensation(diver, first_stop, stop, step, params)?;
            } else {
                for compartment in diver.compartments_mut().iter_mut() {
                    for gas in [&mut compartment.n2, &mut compartment.he] {
                        gas.deco_gradient = gas.allowable_gradient;
                    }
                }
            }
            let stop_time = decompression_stop(diver, run_time, stop, step, &stage, params)?;
            run_time += stop_time;
            if let Some(schedule) = schedule.as_deref_mut() {
                schedule.push(ExposureSegment::constant_depth(
                    Length::from_meters(stop),
                    stop_time,
                    *stage.gas(),
                )?);
                deco_trace!("stop at {} m for {} min, run time {}", stop, stop_time, run_time);
            }
            depth = stop;
            stop = next_stop(stop, step);
        }
    }
}

fn next_stop(depth: f64, step: f64) -> f64 {
    let next = depth - step;
    if next < SURFACE_EPSILON { 0.0 } else { next }
}

/// Deepest stop the schedule could start with: the start of the deco zone
/// rounded to a step no larger than 3 m (10 ft in imperial units).
pub fn deepest_possible_stop(zone: f64, step: f64, params: &Parameters) -> f64 {
    let cap = match params.depth_unit {
        LengthUnit::Meter => 3.0,
        LengthUnit::Feet => Length::from_feet(10.0).meters(),
    };
    let step = step.min(cap);
    libm::round(zone / step - 0.5) * step
}

fn ceiling_with(
    diver: &Diver,
    params: &Parameters,
    gradient: impl Fn(&InertGas) -> f64,
) -> Result<f64, CalculationError> {
    let other_gases = params.vpm.pressure_other_gases;
    let mut ceiling: f64 = 0.0;
    for compartment in diver.compartments() {
        let tensions = compartment.tensions();
        let weighted = compartment.weighted_gradient(tensions, &gradient);
        let tolerated = tensions.total() + other_gases - weighted;
        if !tolerated.is_finite() {
            return Err(CalculationError::NonFiniteTension {
                compartment: compartment.index,
            });
        }
        ceiling = ceiling.max((tolerated.max(0.0) - diver.surface_pressure()) / BAR_PER_METER);
    }
    Ok(ceiling)
}

/// Deepest tolerated depth (m) under the allowable gradients.
pub fn ascent_ceiling(diver: &Diver, params: &Parameters) -> Result<f64, CalculationError> {
    ceiling_with(diver, params, |gas| gas.allowable_gradient)
}

/// Deepest tolerated depth (m) under the deco gradients.
pub fn deco_ceiling(diver: &Diver, params: &Parameters) -> Result<f64, CalculationError> {
    ceiling_with(diver, params, |gas| gas.deco_gradient)
}

/// Deepens `stop` one step at a time until no compartment on-gasses past its
/// allowable gradient while ascending from `depth` to it.
fn projected_ascent(
    diver: &Diver,
    depth: f64,
    stop: f64,
    stage: &DecoStage,
    params: &Parameters,
) -> Result<f64, CalculationError> {
    let step = stage.step_size().meters();
    let other_gases = params.vpm.pressure_other_gases;
    let mut stop = stop;
    'search: while stop >= 0.0 && stop <= depth {
        let profile = stage.ascent(depth, stop)?.profile(diver.surface_pressure(), params);
        let ending_ambient = diver.ambient_pressure(stop);
        for compartment in diver.compartments() {
            let tensions = compartment.loaded_tensions(profile, stage.gas(), params)?;
            let weighted = compartment.weighted_gradient(tensions, |gas| gas.allowable_gradient);
            if tensions.total() > ending_ambient + weighted - other_gases {
                stop += step;
                continue 'search;
            }
        }
        break;
    }
    Ok(stop)
}

/// Deco gradients at `stop` for bubbles that grew by Boyle's law since the
/// first stop.
fn boyles_law_compensation(
    diver: &mut Diver,
    first_stop: f64,
    stop: f64,
    step: f64,
    params: &Parameters,
) -> Result<(), CalculationError> {
    let gamma = params.vpm.surface_tension_gamma;
    let first_stop_pressure = diver.ambient_pressure(first_stop) * PASCAL_PER_BAR;
    let next_stop_pressure = diver.ambient_pressure(next_stop(stop, step)) * PASCAL_PER_BAR;
    let expansion = libm::pow(first_stop_pressure / next_stop_pressure, 1.0 / 3.0);

    for compartment in diver.compartments_mut().iter_mut() {
        for gas in [&mut compartment.n2, &mut compartment.he] {
            let allowable_gradient = gas.allowable_gradient * PASCAL_PER_BAR;
            let first_stop_radius = 2.0 * gamma / allowable_gradient;
            let c = (first_stop_pressure + 2.0 * gamma / first_stop_radius)
                * first_stop_radius
                * first_stop_radius
                * first_stop_radius;
            let ending_radius = radius_root_finder(
                next_stop_pressure,
                -2.0 * gamma,
                c,
                first_stop_radius,
                first_stop_radius * expansion,
            )?;
            gas.deco_gradient = (2.0 * gamma / ending_radius) / PASCAL_PER_BAR;
        }
    }
    Ok(())
}

/// Stays at `stop` until the deco ceiling clears the next stop. Run time is
/// first rounded up to a whole multiple of the minimum stop time. Returns
/// the stop time.
fn decompression_stop(
    diver: &mut Diver,
    run_time: f64,
    stop: f64,
    step: f64,
    stage: &DecoStage,
    params: &Parameters,
) -> Result<f64, CalculationError> {
    let minimum_stop_time = params.minimum_deco_stop_time;
    let rounded_run_time = libm::round(run_time / minimum_stop_time + 0.5) * minimum_stop_time;
    let next = next_stop(stop, step);
    let gas = stage.gas();
    check_off_gassing(diver, stop, next, gas, params)?;

    let mut segment_time = rounded_run_time - run_time;
    let mut stop_time = segment_time;
    loop {
        ExposureSegment::constant_depth(Length::from_meters(stop), segment_time, *gas)?
            .expose_diver(diver, params)?;
        if deco_ceiling(diver, params)? <= next {
            return Ok(stop_time);
        }
        if stop_time + minimum_stop_time > MAX_STOP_TIME {
            return Err(CalculationError::StopTooLong { depth: stop });
        }
        segment_time = minimum_stop_time;
        stop_time += minimum_stop_time;
    }
}

/// Fails when breathing `gas` at `stop` meters can never bring a compartment
/// under the limit for `next`, i.e. the stop would never end. Deco gradients
/// are weighted by the inspired inert gas pressures; a gas without inert
/// components always off-gasses.
fn check_off_gassing(
    diver: &Diver,
    stop: f64,
    next: f64,
    gas: &GasMixture,
    params: &Parameters,
) -> Result<(), CalculationError> {
    let stop_ambient = diver.ambient_pressure(stop);
    let next_ambient = diver.ambient_pressure(next);
    let inspired_he = alveolar_pressure(stop_ambient, gas.he_fraction(), params);
    let inspired_n2 = alveolar_pressure(stop_ambient, gas.n2_fraction(), params);
    let inspired = inspired_he + inspired_n2;
    if inspired <= 0.0 {
        return Ok(());
    }
    for compartment in diver.compartments() {
        let weighted = (compartment.he.deco_gradient * inspired_he
            + compartment.n2.deco_gradient * inspired_n2)
            / inspired;
        if inspired + params.vpm.pressure_other_gases - weighted > next_ambient {
            return Err(CalculationError::OffGassingGradientTooSmall { depth: stop });
        }
    }
    Ok(())
}

/// Time-integrated supersaturation (min) a compartment keeps after surfacing
/// on air.
fn surface_phase_volume_time(compartment: &TissueCompartment, surface_inspired_n2: f64) -> f64 {
    let n2 = compartment.n2.tension;
    let he = compartment.he.tension;
    let (n2_k, he_k) = (compartment.n2.k, compartment.he.k);
    let excess = he + n2 - surface_inspired_n2;
    if n2 > surface_inspired_n2 {
        (he / he_k + (n2 - surface_inspired_n2) / n2_k) / excess
    } else if he > 0.0 && excess > 0.0 {
        let decay_time = 1.0 / (n2_k - he_k) * libm::log((surface_inspired_n2 - n2) / he);
        let integral = he / he_k * (1.0 - libm::exp(-he_k * decay_time))
            + (n2 - surface_inspired_n2) / n2_k * (1.0 - libm::exp(-n2_k * decay_time));
        integral / excess
    } else {
        0.0
    }
}

/// Relaxes the allowable gradients so the released gas volume just reaches
/// the critical volume over the last phase volume time.
fn apply_critical_volume(compartment: &mut TissueCompartment, params: &Parameters) {
    let vpm = &params.vpm;
    let gamma = vpm.surface_tension_gamma;
    let gamma_c = vpm.skin_compression_gamma_c;
    let phase_volume_time = compartment.phase_volume_time.total();
    let lambda = vpm.critical_volume_lambda * PASCAL_PER_BAR;

    for gas in [&mut compartment.n2, &mut compartment.he] {
        let adjusted_crushing_pressure = gas.adjusted_crushing_pressure * PASCAL_PER_BAR;
        let initial_allowable_gradient = gas.initial_allowable_gradient * PASCAL_PER_BAR;
        let b = initial_allowable_gradient + (lambda * gamma) / (gamma_c * phase_volume_time);
        let c = (gamma * (gamma * (lambda * adjusted_crushing_pressure)))
            / (gamma_c * (gamma_c * phase_volume_time));
        let new_allowable_gradient = (b + libm::sqrt((b * b - 4.0 * c).max(0.0))) / 2.0;
        gas.allowable_gradient = new_allowable_gradient / PASCAL_PER_BAR;
    }
}

fn record_max_actual_gradient(diver: &mut Diver, depth: f64, params: &Parameters) {
    let ambient = diver.ambient_pressure(depth);
    let other_gases = params.vpm.pressure_other_gases;
    for compartment in diver.compartments_mut().iter_mut() {
        let gradient = (compartment.total_tension() + other_gases - ambient).max(0.0);
        compartment.max_actual_gradient = compartment.max_actual_gradient.max(gradient);
    }
}

impl Decompression for VpmDecompression {
    fn name(&self) -> &'static str {
        if self.boyle_compensation { "VPM-B" } else { "VPM" }
    }

    fn calculate_initial_allowable_gradient(&self, diver: &mut Diver, params: &Parameters) {
        for compartment in diver.compartments_mut().iter_mut() {
            compartment.calculate_initial_allowable_gradient(&params.vpm);
        }
    }

    fn decompress_diver(
        &self,
        diver: &mut Diver,
        start: AscentStart,
        stages: &DecoStages,
        params: &Parameters,
    ) -> Result<DecoSchedule, DecoError> {
        params.validate()?;
        let start_depth = start.depth.meters();
        let bottom_stage = *stages.stage_for(start_depth);

        for compartment in diver.compartments_mut().iter_mut() {
            compartment.regenerate_nuclei(start.run_time, &params.vpm);
        }
        self.calculate_initial_allowable_gradient(diver, params);
        diver.backup(BackupSlot::StartOfAscent);

        let zone = self.start_of_deco_zone(diver, start_depth, &bottom_stage, params)?;
        let deepest_stop = Length::from_meters(deepest_possible_stop(
            zone,
            bottom_stage.step_size().meters(),
            params,
        ));
        let to_zone = bottom_stage.ascent(start_depth, zone)?;
        to_zone.expose_diver(diver, params)?;
        let zone_run_time = start.run_time + to_zone.period();
        diver.backup(BackupSlot::StartOfDecoZone);
        for compartment in diver.compartments_mut().iter_mut() {
            compartment.phase_volume_time = PhaseVolumeTime::default();
            compartment.max_actual_gradient = 0.0;
        }

        let surface_inspired_n2 = alveolar_pressure(
            diver.surface_pressure(),
            GasMixture::air().n2_fraction(),
            params,
        );
        for iteration in 0..MAX_CRITICAL_VOLUME_ITERATIONS {
            let first_stop = self.first_stop(diver, zone, &bottom_stage, params)?;
            if first_stop <= SURFACE_EPSILON {
                diver.restore(BackupSlot::StartOfAscent);
                let mut schedule = DecoSchedule::new(start);
                schedule.deepest_possible_stop = Some(deepest_stop);
                let ascent = bottom_stage.ascent(start_depth, 0.0)?;
                ascent.expose_diver(diver, params)?;
                schedule.push(ascent);
                record_max_actual_gradient(diver, 0.0, params);
                return Ok(schedule);
            }

            let surfacing_run_time =
                self.ascend_through_stops(diver, zone, zone_run_time, first_stop, stages, params, None)?;
            let deco_phase_volume_time = surfacing_run_time - zone_run_time;
            let mut converged = !params.vpm.critical_volume_algorithm;
            for compartment in diver.compartments_mut().iter_mut() {
                let surface = surface_phase_volume_time(compartment, surface_inspired_n2);
                let phase_volume_time = &mut compartment.phase_volume_time;
                phase_volume_time.in_water = deco_phase_volume_time;
                phase_volume_time.surface = surface;
                if libm::fabs(phase_volume_time.total() - phase_volume_time.last)
                    <= PHASE_VOLUME_TIME_TOLERANCE
                {
                    converged = true;
                }
            }

            if converged {
                deco_trace!("critical volume loop converged after {} iterations", iteration + 1);
                diver.restore(BackupSlot::StartOfAscent);
                let mut schedule = DecoSchedule::new(start);
                schedule.deepest_possible_stop = Some(deepest_stop);
                self.ascend_through_stops(
                    diver,
                    start_depth,
                    start.run_time,
                    first_stop,
                    stages,
                    params,
                    Some(&mut schedule),
                )?;
                return Ok(schedule);
            }

            for compartment in diver.compartments_mut().iter_mut() {
                apply_critical_volume(compartment, params);
                compartment.phase_volume_time.last = compartment.phase_volume_time.total();
            }
            diver.restore(BackupSlot::StartOfDecoZone);
        }
        Err(CalculationError::IterationLimitExceeded.into())
    }
}

#[test]
fn test_deepest_possible_stop_rounds_down() {
    let params = Parameters::default();
    assert_eq!(deepest_possible_stop(31.7, 3.0, &params), 30.0);
    assert_eq!(deepest_possible_stop(31.7, 6.0, &params), 30.0);
    let imperial = params.with_depth_unit(LengthUnit::Feet);
    let ten_feet = Length::from_feet(10.0).meters();
    let stop = deepest_possible_stop(Length::from_feet(173.0).meters(), ten_feet, &imperial);
    assert!(libm::fabs(Length::from_meters(stop).value(LengthUnit::Feet) - 170.0) < 1e-9);
}

#[test]
fn test_surface_phase_volume_time_without_excess_gas() {
    let params = Parameters::default();
    let diver = Diver::new(&params).unwrap();
    let surface_n2 = alveolar_pressure(diver.surface_pressure(), 0.79, &params);
    for compartment in diver.compartments() {
        assert_eq!(surface_phase_volume_time(compartment, surface_n2), 0.0);
    }
}

#[test]
fn test_boyle_compensation_lowers_deco_gradient() {
    let params = Parameters::default();
    let mut diver = Diver::new(&params).unwrap();
    let model = VpmDecompression::new(true);
    model.calculate_initial_allowable_gradient(&mut diver, &params);
    boyles_law_compensation(&mut diver, 30.0, 9.0, 3.0, &params).unwrap();
    for compartment in diver.compartments() {
        assert!(compartment.n2.deco_gradient < compartment.n2.allowable_gradient);
        assert!(compartment.he.deco_gradient < compartment.he.allowable_gradient);
    }
}

#[test]
fn test_no_deco_dive_ascends_directly() {
    let params = Parameters::default();
    let mut diver = Diver::new(&params).unwrap();
    let air = GasMixture::air();
    ExposureSegment::varying_depth(Length::zero(), Length::from_meters(12.0), 0.6, air)
        .unwrap()
        .expose_diver(&mut diver, &params)
        .unwrap();
    ExposureSegment::constant_depth(Length::from_meters(12.0), 9.4, air)
        .unwrap()
        .expose_diver(&mut diver, &params)
        .unwrap();
    let stage = DecoStage::new(
        Length::from_meters(12.0),
        Length::zero(),
        Length::from_meters(-9.0),
        air,
        Length::from_meters(3.0),
    )
    .unwrap();
    let start = AscentStart {
        depth: Length::from_meters(12.0),
        run_time: 10.0,
        segment_index: 2,
    };
    let schedule = VpmDecompression::new(true)
        .decompress_diver(&mut diver, start, &DecoStages::single(stage), &params)
        .unwrap();
    assert!(schedule.stops().is_empty());
    assert_eq!(schedule.segments.len(), 1);
}

#[cfg(test)]
fn loaded_diver(params: &Parameters, n2: f64, he: f64) -> Diver {
    use crate::tissue::GasTensions;
    let mut diver = Diver::new(params).unwrap();
    VpmDecompression::new(true).calculate_initial_allowable_gradient(&mut diver, params);
    for compartment in diver.compartments_mut().iter_mut() {
        compartment.set_tensions(GasTensions { n2, he });
    }
    diver
}

#[test]
fn test_projected_ascent_checks_surfacing() {
    let params = Parameters::default();
    let diver = loaded_diver(&params, 3.0, 0.0);
    let stage = DecoStage::new(
        Length::from_meters(30.0),
        Length::zero(),
        Length::from_meters(-9.0),
        GasMixture::air(),
        Length::from_meters(3.0),
    )
    .unwrap();
    let stop = projected_ascent(&diver, 30.0, 0.0, &stage, &params).unwrap();
    assert!(stop > 0.0);
    assert!(libm::fabs(stop / 3.0 - libm::round(stop / 3.0)) < 1e-9);
}

#[test]
fn test_off_gassing_check_weights_by_inspired_gas() {
    let params = Parameters::default();
    let air = GasMixture::air();
    // helium-loaded tissues decompressing on air: only the N2 gradient counts
    let mut diver = loaded_diver(&params, 0.0, 2.0);
    for compartment in diver.compartments_mut().iter_mut() {
        compartment.n2.deco_gradient = 1.5;
        compartment.he.deco_gradient = 0.0;
    }
    assert!(check_off_gassing(&diver, 30.0, 10.0, &air, &params).is_ok());

    for compartment in diver.compartments_mut().iter_mut() {
        compartment.n2.deco_gradient = 0.0;
    }
    assert_eq!(
        check_off_gassing(&diver, 30.0, 10.0, &air, &params),
        Err(CalculationError::OffGassingGradientTooSmall { depth: 30.0 })
    );

    let oxygen = GasMixture::new(1.0, 0.0).unwrap();
    assert!(check_off_gassing(&diver, 6.0, 0.0, &oxygen, &params).is_ok());
}

#[test]
fn test_non_finite_tension_is_reported() {
    use crate::tissue::GasTensions;
    let params = Parameters::default();
    let mut diver = loaded_diver(&params, 1.0, 0.0);
    diver.compartments_mut()[4].set_tensions(GasTensions { n2: f64::NAN, he: 0.0 });
    assert_eq!(
        ascent_ceiling(&diver, &params),
        Err(CalculationError::NonFiniteTension { compartment: 4 })
    );
    assert_eq!(
        deco_ceiling(&diver, &params),
        Err(CalculationError::NonFiniteTension { compartment: 4 })
    );
}

#[test]
fn test_zero_minimum_stop_time_is_rejected() {
    use crate::error::IllegalActionError;
    let params = Parameters::default();
    let mut diver = Diver::new(&params).unwrap();
    let air = GasMixture::air();
    ExposureSegment::varying_depth(Length::zero(), Length::from_meters(40.0), 40.0 / 18.0, air)
        .unwrap()
        .expose_diver(&mut diver, &params)
        .unwrap();
    ExposureSegment::constant_depth(Length::from_meters(40.0), 25.0 - 40.0 / 18.0, air)
        .unwrap()
        .expose_diver(&mut diver, &params)
        .unwrap();
    let stage = DecoStage::new(
        Length::from_meters(40.0),
        Length::zero(),
        Length::from_meters(-9.0),
        air,
        Length::from_meters(3.0),
    )
    .unwrap();
    let start = AscentStart {
        depth: Length::from_meters(40.0),
        run_time: 25.0,
        segment_index: 2,
    };
    let unbounded = params.with_minimum_deco_stop_time(0.0);
    assert_eq!(
        VpmDecompression::new(true).decompress_diver(&mut diver, start, &DecoStages::single(stage), &unbounded),
        Err(DecoError::IllegalAction(IllegalActionError::NonPositiveMinimumStopTime))
    );
}
