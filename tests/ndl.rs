use deco_engine::{
    deco::buhlmann::BuhlmannDecompression,
    diver::Diver,
    exposure::Exposure,
    gas::GasMixture,
    ndl::{no_deco_limit, MAX_NDL},
    parameters::Parameters,
    units::Length,
    zhl16::ZhL16Variant,
};

struct TableNdl {
    depth: f64,
    ndl: u32,
}

// ZH-L16C on air from a surface-saturated diver, computed by hand from the
// Haldane equation and the M-value ceiling at each whole minute
#[test]
fn test_ndl_matches_hand_computed_table() {
    let params = Parameters::default();
    let diver = Diver::new(&params).unwrap();
    let air = GasMixture::air();

    let plain = [
        TableNdl { depth: 18.0, ndl: 59 },
        TableNdl { depth: 21.0, ndl: 41 },
        TableNdl { depth: 24.0, ndl: 29 },
        TableNdl { depth: 30.0, ndl: 17 },
        TableNdl { depth: 40.0, ndl: 9 },
        TableNdl { depth: 50.0, ndl: 6 },
    ];
    let model = BuhlmannDecompression::new(ZhL16Variant::C);
    for row in plain.iter() {
        let ndl = no_deco_limit(&diver, Length::from_meters(row.depth), &air, &model, &params).unwrap();
        assert_eq!(ndl, row.ndl, "Depth: {}m", row.depth);
    }

    // GF high 0.85
    let conservative = [
        TableNdl { depth: 18.0, ndl: 43 },
        TableNdl { depth: 30.0, ndl: 13 },
        TableNdl { depth: 40.0, ndl: 7 },
    ];
    let model = BuhlmannDecompression::with_gradient_factors(ZhL16Variant::C);
    for row in conservative.iter() {
        let ndl = no_deco_limit(&diver, Length::from_meters(row.depth), &air, &model, &params).unwrap();
        assert_eq!(ndl, row.ndl, "Depth: {}m", row.depth);
    }
}

#[test]
fn test_ndl_leaves_diver_untouched() {
    let params = Parameters::default();
    let diver = Diver::new(&params).unwrap();
    let before = diver.clone();
    let model = BuhlmannDecompression::new(ZhL16Variant::C);
    no_deco_limit(&diver, Length::from_meters(30.0), &GasMixture::air(), &model, &params).unwrap();
    assert_eq!(diver, before);
}

#[test]
fn test_ndl_is_zero_in_deco() {
    let params = Parameters::default();
    let mut diver = Diver::new(&params).unwrap();
    let model = BuhlmannDecompression::new(ZhL16Variant::C);
    let depth = Length::from_meters(40.0);
    let bottom = deco_engine::segment::ExposureSegment::constant_depth(depth, 25.0, GasMixture::air()).unwrap();
    bottom.expose_diver(&mut diver, &params).unwrap();
    assert_eq!(no_deco_limit(&diver, depth, &GasMixture::air(), &model, &params).unwrap(), 0);
}

#[test]
fn test_ndl_is_capped_in_the_shallows() {
    let params = Parameters::default();
    let diver = Diver::new(&params).unwrap();
    let model = BuhlmannDecompression::new(ZhL16Variant::A);
    let ndl = no_deco_limit(&diver, Length::from_meters(5.0), &GasMixture::air(), &model, &params).unwrap();
    assert_eq!(ndl, MAX_NDL);
}

#[test]
fn test_ndl_at_altitude() {
    let params = Parameters::default();
    let mut diver = Diver::new(&params).unwrap();
    Exposure::Acclimatisation {
        height: Length::from_meters(1500.0),
        ascent_period: 60.0,
        stay_period: 0.0,
        acclimatized: true,
    }
    .apply(&mut diver, &params)
    .unwrap();

    let model = BuhlmannDecompression::new(ZhL16Variant::C);
    let air = GasMixture::air();
    assert_eq!(no_deco_limit(&diver, Length::from_meters(18.0), &air, &model, &params).unwrap(), 51);
    assert_eq!(no_deco_limit(&diver, Length::from_meters(30.0), &air, &model, &params).unwrap(), 15);
}
