use deco_engine::{
    ceiling::max_ceiling,
    deco::{buhlmann::BuhlmannDecompression, Algorithm, DecoStage, DecoStages, Decompression},
    diver::Diver,
    exposure::{Dive, Exposure},
    gas::GasMixture,
    parameters::Parameters,
    simulate::Processor,
    units::Length,
    zhl16::ZhL16Variant,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn m(depth: f64) -> Length {
    Length::from_meters(depth)
}

fn air_dive(algorithm: Algorithm, depth: f64, bottom_time: f64) -> Dive {
    let air = GasMixture::air();
    let stage = DecoStage::with_default_step(m(depth), m(0.0), m(-9.0), air, &Parameters::default()).unwrap();
    let mut dive = Dive::new(algorithm, DecoStages::single(stage));
    dive.travel(m(depth), depth / 20.0, air).unwrap();
    dive.stay(bottom_time - depth / 20.0, air).unwrap();
    dive
}

fn run(dive: &mut Dive, params: &Parameters) -> Diver {
    let mut diver = Diver::new(params).unwrap();
    dive.apply(&mut diver, params).unwrap();
    diver
}

#[test]
fn test_trimix_dive_switches_gas_at_stage_depths() {
    let params = Parameters::default();
    let trimix = GasMixture::from_percentages(18.0, 45.0).unwrap();
    let ean50 = GasMixture::from_percentages(50.0, 0.0).unwrap().with_index(1);
    let oxygen = GasMixture::from_percentages(100.0, 0.0).unwrap().with_index(2);
    let stages = DecoStages::new(vec![
        DecoStage::new(m(60.0), m(21.0), m(-9.0), trimix, m(3.0)).unwrap(),
        DecoStage::new(m(21.0), m(6.0), m(-9.0), ean50, m(3.0)).unwrap(),
        DecoStage::new(m(6.0), m(0.0), m(-3.0), oxygen, m(3.0)).unwrap(),
    ])
    .unwrap();

    let mut dive = Dive::new(Algorithm::BuhlmannGradient(ZhL16Variant::C), stages);
    dive.travel(m(60.0), 3.0, trimix).unwrap();
    dive.stay(17.0, trimix).unwrap();
    let diver = run(&mut dive, &params);

    let schedule = dive.schedule().unwrap();
    let stops = schedule.stops();
    assert!(stops.len() > 5);
    for stop in &stops {
        let expected = dive.stages().stage_for(stop.depth.meters()).gas();
        assert_eq!(stop.gas.index, expected.index, "stop at {:?}", stop.depth);
    }
    assert!(stops.iter().any(|s| s.gas.index == 1 && (s.depth.meters() - 21.0).abs() < 1e-6));
    assert!(stops.iter().any(|s| s.gas.index == 2 && (s.depth.meters() - 6.0).abs() < 1e-6));
    assert_eq!(schedule.segments.last().unwrap().end_depth(), Some(Length::zero()));
    assert_eq!(schedule.segments[0].index(), 2);

    // on the surface the diver is within the GF high limit
    let (ceiling, _) = max_ceiling(&diver, ZhL16Variant::C.coefficients(), params.gradient_factors.high);
    assert_eq!(ceiling, 0.0);
}

#[test]
fn test_gradient_factors_add_deep_stops() {
    let params = Parameters::default();
    let mut plain = air_dive(Algorithm::BuhlmannC, 45.0, 30.0);
    let mut gradient = air_dive(Algorithm::BuhlmannGradient(ZhL16Variant::C), 45.0, 30.0);
    run(&mut plain, &params);
    run(&mut gradient, &params);

    let plain = plain.schedule().unwrap();
    let gradient = gradient.schedule().unwrap();
    assert!(gradient.stops()[0].depth > plain.stops()[0].depth);
    assert!(gradient.total_ascent_time() > plain.total_ascent_time());
    assert!(gradient.total_stop_time() > plain.total_stop_time());
}

#[test]
fn test_a_series_is_most_permissive() {
    let params = Parameters::default();
    let mut a = air_dive(Algorithm::BuhlmannA, 45.0, 30.0);
    let mut c = air_dive(Algorithm::BuhlmannC, 45.0, 30.0);
    run(&mut a, &params);
    run(&mut c, &params);
    assert!(a.schedule().unwrap().total_stop_time() < c.schedule().unwrap().total_stop_time());
}

#[test]
fn test_ascent_start_equals_bottom_run_time() {
    let params = Parameters::default();
    let mut dive = air_dive(Algorithm::BuhlmannC, 30.0, 25.0);
    run(&mut dive, &params);
    let schedule = dive.schedule().unwrap();
    assert!((schedule.start_run_time - 25.0).abs() < 1e-12);
    assert!((schedule.segments[0].run_time() - 25.0).abs() < 1e-12);
    for pair in schedule.segments.windows(2) {
        assert!((pair[0].end_run_time() - pair[1].run_time()).abs() < 1e-9);
        assert_eq!(pair[0].index() + 1, pair[1].index());
    }
}

#[test]
fn test_model_names() {
    assert_eq!(BuhlmannDecompression::new(ZhL16Variant::B).name(), "ZH-L16B");
    assert_eq!(
        BuhlmannDecompression::with_gradient_factors(ZhL16Variant::C).name(),
        "ZH-L16C with gradient factors"
    );
    assert_eq!(Algorithm::BuhlmannA.model().name(), "ZH-L16A");
}

#[test]
fn test_processor_keeps_schedule() {
    let params = Parameters::default();
    let mut diver = Diver::new(&params).unwrap();
    let mut processor = Processor::new(params);
    processor.push(Exposure::Dive(air_dive(Algorithm::BuhlmannGradient(ZhL16Variant::C), 40.0, 20.0)));
    let outputs = processor.run(&mut diver).unwrap();
    assert_eq!(outputs.tissues_per_exposure.len(), 1);
    match &processor.exposures()[0] {
        Exposure::Dive(dive) => assert!(!dive.schedule().unwrap().stops().is_empty()),
        other => panic!("unexpected exposure {}", other.name()),
    }
}

#[cfg(feature = "std")]
#[test]
fn test_schedule_to_csv() {
    use csv::Writer;
    let params = Parameters::default();
    let mut dive = air_dive(Algorithm::BuhlmannGradient(ZhL16Variant::C), 45.0, 30.0);
    run(&mut dive, &params);
    let stops = dive.schedule().unwrap().stops();

    let mut wtr = Writer::from_writer(vec![]);
    wtr.write_record(["depth_m", "stop_min", "run_time_min", "o2_percent"]).unwrap();
    for stop in &stops {
        wtr.write_record(&[
            stop.depth.meters().to_string(),
            stop.stop_time.to_string(),
            stop.run_time.to_string(),
            stop.gas.o2_percentage().to_string(),
        ])
        .unwrap();
    }
    let data = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
    assert_eq!(data.lines().count(), stops.len() + 1);
    assert!(data.lines().last().unwrap().starts_with("3,"));
}

#[test]
fn test_higher_gradient_factor_never_deepens_first_stop() {
    let params = Parameters::default();
    let model = BuhlmannDecompression::with_gradient_factors(ZhL16Variant::C);
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..40 {
        let depth = 3.0 * rng.random_range(8..21) as f64;
        let bottom_time = rng.random_range(10.0..45.0);
        let dive = air_dive(Algorithm::BuhlmannGradient(ZhL16Variant::C), depth, bottom_time);
        let mut diver = Diver::new(&params).unwrap();
        for segment in dive.segments() {
            segment.expose_diver(&mut diver, &params).unwrap();
        }
        let stage = dive.stages().stage_for(depth);

        let gf_low = rng.random_range(0.1..1.0);
        let gf_high = rng.random_range(gf_low..1.0);
        let deep = model.first_stop(&diver, depth, stage, gf_low, &params).unwrap();
        let shallow = model.first_stop(&diver, depth, stage, gf_high, &params).unwrap();
        assert!(
            deep >= shallow,
            "{} m for {} min: gf {} stops at {} m, gf {} at {} m",
            depth, bottom_time, gf_low, deep, gf_high, shallow
        );
    }
}
