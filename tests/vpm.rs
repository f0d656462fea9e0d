use deco_engine::{
    ceiling::check_diver_safety,
    deco::{vpm::VpmDecompression, Algorithm, DecoSchedule, DecoStage, DecoStages, Decompression},
    diver::Diver,
    exposure::{Dive, Exposure},
    gas::GasMixture,
    parameters::Parameters,
    simulate::simulate,
    units::{Length, LengthUnit},
    zhl16::ZHL16_C,
};

fn ft(depth: f64) -> Length {
    Length::from_feet(depth)
}

fn air_dive(algorithm: Algorithm, depth: f64, bottom_time: f64) -> Dive {
    let air = GasMixture::air();
    let m = Length::from_meters;
    let stages = DecoStages::single(DecoStage::new(m(depth), m(0.0), m(-9.0), air, m(3.0)).unwrap());
    let mut dive = Dive::new(algorithm, stages);
    dive.travel(m(depth), depth / 18.0, air).unwrap();
    dive.stay(bottom_time - depth / 18.0, air).unwrap();
    dive
}

fn ascent_of(exposures: &[Exposure], at: usize) -> &DecoSchedule {
    match &exposures[at] {
        Exposure::Dive(dive) => dive.schedule().unwrap(),
        other => panic!("expected a dive, got {}", other.name()),
    }
}

// 260 fsw for 30 minutes on trimix 15/45 with EAN36 and oxygen for deco,
// descending at 75 fsw/min
#[test]
fn test_trimix_dive_in_feet() {
    let params = Parameters::default().with_depth_unit(LengthUnit::Feet);
    let trimix = GasMixture::from_percentages(15.0, 45.0).unwrap();
    let ean36 = GasMixture::from_percentages(36.0, 0.0).unwrap().with_index(1);
    let oxygen = GasMixture::from_percentages(100.0, 0.0).unwrap().with_index(2);
    let stages = DecoStages::new(vec![
        DecoStage::new(ft(260.0), ft(110.0), ft(-30.0), trimix, ft(10.0)).unwrap(),
        DecoStage::new(ft(110.0), ft(20.0), ft(-30.0), ean36, ft(10.0)).unwrap(),
        DecoStage::new(ft(20.0), ft(0.0), ft(-10.0), oxygen, ft(20.0)).unwrap(),
    ])
    .unwrap();
    let mut dive = Dive::new(Algorithm::VpmB, stages);
    dive.travel(ft(260.0), 260.0 / 75.0, trimix).unwrap();
    dive.stay(30.0 - 260.0 / 75.0, trimix).unwrap();

    let mut replay = Diver::new(&params).unwrap();
    for segment in dive.segments() {
        segment.expose_diver(&mut replay, &params).unwrap();
    }
    let mut diver = Diver::new(&params).unwrap();
    dive.apply(&mut diver, &params).unwrap();
    let schedule = dive.schedule().unwrap();
    let stops = schedule.stops();
    assert!(stops.len() > 10);

    for pair in stops.windows(2) {
        assert!(pair[1].depth < pair[0].depth);
    }
    for stop in &stops {
        let stage = dive.stages().stage_for(stop.depth.meters());
        let steps = stop.depth.value(LengthUnit::Feet) / stage.step_size().value(LengthUnit::Feet);
        assert!((steps - steps.round()).abs() < 1e-6, "stop at {} fsw", stop.depth.value(LengthUnit::Feet));
        assert_eq!(stop.gas.index, stage.gas().index);
        // stops end on whole minutes of run time
        assert!((stop.run_time - stop.run_time.round()).abs() < 1e-6);
    }

    let last = stops.last().unwrap();
    assert!((last.depth.value(LengthUnit::Feet) - 20.0).abs() < 1e-6);
    assert_eq!(last.gas.index, 2);
    assert_eq!(schedule.segments.last().unwrap().end_depth(), Some(Length::zero()));

    let deepest = schedule.deepest_possible_stop.unwrap();
    assert!(deepest >= stops[0].depth);
    let steps = deepest.value(LengthUnit::Feet) / 10.0;
    assert!((steps - steps.round()).abs() < 1e-6);

    // every stop stays within the ZH-L16C M-values
    for segment in &schedule.segments {
        segment.expose_diver(&mut replay, &params).unwrap();
        let depth = segment.end_depth().unwrap().meters();
        if depth > 0.0 {
            assert_eq!(check_diver_safety(&replay, depth, &ZHL16_C, 1.0), Ok(()), "at {} m", depth);
        }
    }
}

#[test]
fn test_boyle_compensation_lengthens_the_ascent() {
    let params = Parameters::default();
    let mut vpm = air_dive(Algorithm::Vpm, 40.0, 25.0);
    let mut vpm_b = air_dive(Algorithm::VpmB, 40.0, 25.0);
    vpm.apply(&mut Diver::new(&params).unwrap(), &params).unwrap();
    vpm_b.apply(&mut Diver::new(&params).unwrap(), &params).unwrap();
    assert!(vpm_b.schedule().unwrap().total_ascent_time() > vpm.schedule().unwrap().total_ascent_time());
}

#[test]
fn test_critical_volume_algorithm_shortens_the_ascent() {
    let params = Parameters::default();
    let without = params.with_critical_volume_algorithm(false);
    let mut relaxed = air_dive(Algorithm::VpmB, 40.0, 25.0);
    let mut strict = air_dive(Algorithm::VpmB, 40.0, 25.0);
    relaxed.apply(&mut Diver::new(&params).unwrap(), &params).unwrap();
    strict.apply(&mut Diver::new(&without).unwrap(), &without).unwrap();
    assert!(strict.schedule().unwrap().total_ascent_time() > relaxed.schedule().unwrap().total_ascent_time());
}

#[test]
fn test_repetitive_dive_needs_more_deco() {
    let params = Parameters::default();
    let mut diver = Diver::new(&params).unwrap();
    let mut exposures = vec![
        Exposure::Saturation {
            gas: GasMixture::air(),
            height: Length::zero(),
        },
        Exposure::Dive(air_dive(Algorithm::VpmB, 40.0, 25.0)),
        Exposure::SurfaceInterval { period: 60.0 },
        Exposure::Dive(air_dive(Algorithm::VpmB, 40.0, 25.0)),
    ];
    let outputs = simulate(&mut diver, &mut exposures, &params).unwrap();
    assert_eq!(outputs.tissues_per_exposure.len(), 4);

    let first = ascent_of(&exposures, 1).total_ascent_time();
    let second = ascent_of(&exposures, 3).total_ascent_time();
    assert!(second > first, "first {} min, second {} min", first, second);
}

#[test]
fn test_surface_interval_excites_nuclei() {
    let params = Parameters::default();
    let mut diver = Diver::new(&params).unwrap();
    let mut exposures = vec![
        Exposure::Dive(air_dive(Algorithm::VpmB, 40.0, 25.0)),
        Exposure::SurfaceInterval { period: 60.0 },
    ];
    simulate(&mut diver, &mut exposures, &params).unwrap();
    let fastest = &diver.compartments()[0].n2.nucleus;
    assert!(fastest.adjusted_radius() > params.vpm.initial_critical_radius_n2);
}

#[test]
fn test_unacclimatised_diver_at_altitude() {
    let params = Parameters::default();
    let mut at_sea_level = air_dive(Algorithm::VpmB, 30.0, 25.0);
    at_sea_level.apply(&mut Diver::new(&params).unwrap(), &params).unwrap();

    let mut diver = Diver::new(&params).unwrap();
    let mut exposures = vec![
        Exposure::Acclimatisation {
            height: Length::from_meters(1500.0),
            ascent_period: 60.0,
            stay_period: 120.0,
            acclimatized: false,
        },
        Exposure::Dive(air_dive(Algorithm::VpmB, 30.0, 25.0)),
    ];
    let outputs = simulate(&mut diver, &mut exposures, &params).unwrap();
    assert!(outputs.surface_pressures[0] < params.surface_pressure);
    assert_eq!(diver.height(), Length::from_meters(1500.0));

    let at_altitude = ascent_of(&exposures, 1).total_ascent_time();
    assert!(at_altitude > at_sea_level.schedule().unwrap().total_ascent_time());
}

#[test]
fn test_model_names() {
    assert_eq!(VpmDecompression::new(true).name(), "VPM-B");
    assert_eq!(Algorithm::Vpm.model().name(), "VPM");
}
