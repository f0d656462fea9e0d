use criterion::{criterion_group, criterion_main, Criterion};
use deco_engine::{
    ceiling::{ceiling, max_ceiling},
    deco::{buhlmann::BuhlmannDecompression, Algorithm, DecoStage, DecoStages},
    diver::Diver,
    exposure::Dive,
    gas::GasMixture,
    ndl::no_deco_limit,
    parameters::Parameters,
    segment::ExposureSegment,
    tissue::{AmbientProfile, GasTensions, TissueCompartment},
    units::Length,
    zhl16::{ZhL16Variant, ZHL16_C},
};

fn air_dive(algorithm: Algorithm, depth: f64, bottom_time: f64) -> Dive {
    let air = GasMixture::air();
    let m = Length::from_meters;
    let stages = DecoStages::single(DecoStage::new(m(depth), m(0.0), m(-9.0), air, m(3.0)).unwrap());
    let mut dive = Dive::new(algorithm, stages);
    dive.travel(m(depth), depth / 18.0, air).unwrap();
    dive.stay(bottom_time - depth / 18.0, air).unwrap();
    dive
}

fn benchmark_tissue_calculations(c: &mut Criterion) {
    let mut group = c.benchmark_group("tissue_calculations");
    let params = Parameters::default();
    let air = GasMixture::air();
    let mut tissue = TissueCompartment::new(0, &params);
    tissue.saturate(params.surface_pressure, &air, &params);

    // Benchmark tissue calculation (saturation)
    group.bench_function("tissue_saturation", |b| {
        b.iter(|| tissue.loaded_tensions(AmbientProfile::constant(3.0, 1.0 / 60.0), &air, &params))
    });

    // Benchmark tissue calculation (descent)
    group.bench_function("tissue_descent", |b| {
        let profile = AmbientProfile {
            start: 1.0,
            rate: 1.8,
            period: 1.0,
        };
        b.iter(|| tissue.loaded_tensions(profile, &air, &params))
    });

    // Whole diver, including the crushing pressure update
    group.bench_function("diver_descent", |b| {
        let descent =
            ExposureSegment::varying_depth(Length::zero(), Length::from_meters(40.0), 2.0, air).unwrap();
        b.iter(|| {
            let mut diver = Diver::new(&params).unwrap();
            descent.expose_diver(&mut diver, &params)
        })
    });

    group.finish();
}

fn benchmark_ceiling_calculations(c: &mut Criterion) {
    let mut group = c.benchmark_group("ceiling_calculations");
    let params = Parameters::default();
    let mut tissue = TissueCompartment::new(0, &params);
    tissue.set_tensions(GasTensions { n2: 3.0, he: 0.0 });

    group.bench_function("single_tissue_ceiling", |b| {
        b.iter(|| ceiling(&tissue, &ZHL16_C, 0.85, params.surface_pressure))
    });

    group.bench_function("max_ceiling", |b| {
        let mut diver = Diver::new(&params).unwrap();
        for (i, compartment) in diver.compartments_mut().iter_mut().enumerate() {
            compartment.set_tensions(GasTensions {
                n2: 1.0 + (i as f64 * 0.1),
                he: 0.0,
            });
        }
        b.iter(|| max_ceiling(&diver, &ZHL16_C, 0.85))
    });

    group.finish();
}

fn benchmark_ndl_calculations(c: &mut Criterion) {
    let mut group = c.benchmark_group("ndl_calculations");
    let params = Parameters::default();
    let diver = Diver::new(&params).unwrap();
    let model = BuhlmannDecompression::new(ZhL16Variant::C);
    let air = GasMixture::air();

    group.bench_function("ndl_30m", |b| {
        b.iter(|| no_deco_limit(&diver, Length::from_meters(30.0), &air, &model, &params))
    });

    group.bench_function("ndl_18m", |b| {
        b.iter(|| no_deco_limit(&diver, Length::from_meters(18.0), &air, &model, &params))
    });

    group.finish();
}

fn benchmark_decompression(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompression");
    let params = Parameters::default();

    for (name, algorithm) in [
        ("zhl16c_gf_45m_30min", Algorithm::BuhlmannGradient(ZhL16Variant::C)),
        ("vpm_b_45m_30min", Algorithm::VpmB),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut diver = Diver::new(&params).unwrap();
                let mut dive = air_dive(algorithm, 45.0, 30.0);
                dive.apply(&mut diver, &params).map(|schedule| schedule.total_ascent_time())
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_tissue_calculations,
    benchmark_ceiling_calculations,
    benchmark_ndl_calculations,
    benchmark_decompression
);
criterion_main!(benches);
