use approx::assert_relative_eq;
use deco_engine::{
    gas::GasMixture,
    parameters::Parameters,
    tissue::{haldane, schreiner, AmbientProfile, BackupSlot, GasTensions, TissueCompartment, LN_2},
};

#[test]
fn test_haldane_matches_hand_computed_value() {
    let params = Parameters::default();
    let mut compartment = TissueCompartment::new(2, &params);
    compartment.saturate(params.surface_pressure, &GasMixture::air(), &params);
    let initial = compartment.n2.tension;

    // 20 minutes at 30 m on air, 12.5 min half-time
    let ambient = params.surface_pressure + 3.0;
    compartment
        .expose(AmbientProfile::constant(ambient, 20.0), &GasMixture::air(), &params)
        .unwrap();

    let inspired = (ambient - params.alveolar_correction()) * 0.79;
    let expected = inspired + (initial - inspired) * (-LN_2 / 12.5 * 20.0_f64).exp();
    assert_relative_eq!(compartment.n2.tension, expected, epsilon = 1e-9);
    assert_eq!(compartment.he.tension, 0.0);
}

#[test]
fn test_calculate_tissue_no_change() {
    let params = Parameters::default();
    let mut compartment = TissueCompartment::new(0, &params);
    compartment.set_tensions(GasTensions { n2: 2.0, he: 1.0 });
    compartment
        .expose(AmbientProfile::constant(4.0, 0.0), &GasMixture::air(), &params)
        .unwrap();
    assert_eq!(compartment.tensions(), GasTensions { n2: 2.0, he: 1.0 });
}

#[test]
fn test_helium_off_gasses_on_nitrox() {
    let params = Parameters::default();
    let mut compartment = TissueCompartment::new(0, &params);
    compartment.set_tensions(GasTensions { n2: 2.0, he: 1.0 });
    let ean32 = GasMixture::from_percentages(32.0, 0.0).unwrap();
    compartment
        .expose(AmbientProfile::constant(4.0, 1.0), &ean32, &params)
        .unwrap();
    assert!(compartment.n2.tension > 2.0);
    assert!(compartment.he.tension < 1.0);
}

#[test]
fn test_schreiner_is_continuous_in_time() {
    // splitting a descent in two gives the same tension as doing it at once
    let params = Parameters::default();
    let air = GasMixture::air();
    let mut whole = TissueCompartment::new(4, &params);
    whole.saturate(params.surface_pressure, &air, &params);
    let mut split = whole;

    let profile = AmbientProfile {
        start: params.surface_pressure,
        rate: 1.8,
        period: 2.0,
    };
    whole.expose(profile, &air, &params).unwrap();
    split
        .expose(AmbientProfile { period: 0.8, ..profile }, &air, &params)
        .unwrap();
    split
        .expose(
            AmbientProfile {
                start: profile.start + profile.rate * 0.8,
                period: 1.2,
                ..profile
            },
            &air,
            &params,
        )
        .unwrap();
    assert_relative_eq!(whole.n2.tension, split.n2.tension, epsilon = 1e-12);
}

#[test]
fn test_backup_restore_round_trip() {
    let params = Parameters::default();
    let mut compartment = TissueCompartment::new(9, &params);
    compartment.set_tensions(GasTensions { n2: 2.345678, he: 0.123456 });
    compartment.backup(BackupSlot::StartOfAscent);
    compartment.set_tensions(GasTensions { n2: 1.0, he: 0.0 });
    compartment.backup(BackupSlot::StartOfDecoZone);
    compartment.set_tensions(GasTensions { n2: 0.5, he: 0.5 });

    compartment.restore(BackupSlot::StartOfAscent);
    assert_eq!(compartment.tensions(), GasTensions { n2: 2.345678, he: 0.123456 });
    compartment.restore(BackupSlot::StartOfDecoZone);
    assert_eq!(compartment.tensions(), GasTensions { n2: 1.0, he: 0.0 });
}

#[test]
fn test_schreiner_tends_to_initial_tension() {
    let k = LN_2 / 5.0;
    let initial = 0.75;
    // descent at 18 m/min on air
    let inspired = 1.5;
    let rate = 1.8 * 0.79;
    assert_relative_eq!(schreiner(inspired, rate, 0.0, k, initial).unwrap(), initial, epsilon = 1e-12);
    assert_relative_eq!(haldane(initial, inspired, k, 0.0).unwrap(), initial, epsilon = 1e-12);
    for period in [1e-3, 1e-6, 1e-9] {
        let tension = schreiner(inspired, rate, period, k, initial).unwrap();
        assert!((tension - initial).abs() < 10.0 * period, "{} after {} min", tension, period);
    }
}
