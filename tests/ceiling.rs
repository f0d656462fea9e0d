use deco_engine::{
    ceiling::{ceiling, check_diver_safety, max_ceiling, tolerated_ambient_pressure},
    diver::Diver,
    error::CalculationError,
    parameters::Parameters,
    tissue::{GasTensions, TissueCompartment},
    zhl16::{ZHL16_A, ZHL16_C},
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn loaded(index: usize, n2: f64, he: f64) -> TissueCompartment {
    let mut tissue = TissueCompartment::new(index, &Parameters::default());
    tissue.set_tensions(GasTensions { n2, he });
    tissue
}

#[test]
fn test_ceiling_with_high_n2_load() {
    let result = ceiling(&loaded(2, 5.0, 0.0), &ZHL16_C, 1.0, 1.01325);
    assert!(result > 0.0, "Ceiling should be greater than 0 for high N2 load");
}

#[test]
fn test_ceiling_with_high_he_load() {
    let result = ceiling(&loaded(3, 0.0, 5.0), &ZHL16_C, 1.0, 1.01325);
    assert!(result > 0.0, "Ceiling should be greater than 0 for high He load");
}

#[test]
fn test_ceiling_hand_computed() {
    // compartment 5 of ZH-L16C: a = 0.6200, b = 0.8126
    let tissue = loaded(4, 3.0, 0.0);
    let expected_bar = (3.0 - 0.62) * 0.8126;
    assert!((tolerated_ambient_pressure(&tissue, &ZHL16_C, 1.0) - expected_bar).abs() < 1e-12);
    let expected_m = (expected_bar - 1.01325) / 0.1;
    assert!((ceiling(&tissue, &ZHL16_C, 1.0, 1.01325) - expected_m).abs() < 1e-9);
}

#[test]
fn test_ceiling_never_above_surface() {
    let result = ceiling(&loaded(0, 0.5, 0.0), &ZHL16_A, 0.3, 1.01325);
    assert_eq!(result, 0.0);
}

#[test]
fn test_lower_gradient_factor_never_raises_ceiling() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let index = rng.random_range(0..16);
        let tissue = loaded(index, rng.random_range(0.5..5.0), rng.random_range(0.0..3.0));
        let gf_low = rng.random_range(0.1..1.0);
        let gf_high = rng.random_range(gf_low..1.0);
        let deep = ceiling(&tissue, &ZHL16_C, gf_low, 1.01325);
        let shallow = ceiling(&tissue, &ZHL16_C, gf_high, 1.01325);
        assert!(deep >= shallow, "gf {} gave {} m, gf {} gave {} m", gf_low, deep, gf_high, shallow);
    }
}

#[test]
fn test_max_ceiling_with_multiple_tissues() {
    let params = Parameters::default();
    let mut diver = Diver::new(&params).unwrap();
    diver.compartments_mut()[3].set_tensions(GasTensions { n2: 3.0, he: 0.5 });
    diver.compartments_mut()[10].set_tensions(GasTensions { n2: 2.0, he: 0.0 });

    let (depth, leading) = max_ceiling(&diver, &ZHL16_C, 1.0);
    assert_eq!(leading, 3);
    let expected = ceiling(&diver.compartments()[3], &ZHL16_C, 1.0, diver.surface_pressure());
    assert_eq!(depth, expected);
    assert!(depth > ceiling(&diver.compartments()[10], &ZHL16_C, 1.0, diver.surface_pressure()));
}

#[test]
fn test_diver_above_ceiling_gets_bends() {
    let params = Parameters::default();
    let mut diver = Diver::new(&params).unwrap();
    diver.compartments_mut()[6].set_tensions(GasTensions { n2: 3.5, he: 0.0 });
    let (depth, _) = max_ceiling(&diver, &ZHL16_C, 0.85);

    assert!(check_diver_safety(&diver, depth + 0.5, &ZHL16_C, 0.85).is_ok());
    assert_eq!(
        check_diver_safety(&diver, depth - 0.5, &ZHL16_C, 0.85),
        Err(CalculationError::DiverGetsBends {
            compartment: 6,
            depth: depth - 0.5
        })
    );
}
