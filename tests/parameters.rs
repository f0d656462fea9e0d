#![cfg(feature = "serde")]

use deco_engine::{
    deco::{Algorithm, DecoSchedule, DecoStage, DecoStages},
    diver::Diver,
    exposure::Dive,
    error::IllegalActionError,
    gas::GasMixture,
    parameters::Parameters,
    units::{Length, LengthUnit},
    zhl16::ZhL16Variant,
};

#[test]
fn test_partial_json_config_keeps_defaults() {
    let json = r#"{
        "gradient_factors": { "low": 0.4, "high": 0.8 },
        "depth_unit": "Feet",
        "vpm": { "initial_critical_radius_n2": 0.6e-6, "critical_volume_algorithm": false }
    }"#;
    let params = Parameters::from_json(json).unwrap();
    let defaults = Parameters::default();

    assert_eq!(params.gradient_factors.low, 0.4);
    assert_eq!(params.gradient_factors.high, 0.8);
    assert_eq!(params.depth_unit, LengthUnit::Feet);
    assert_eq!(params.vpm.initial_critical_radius_n2, 0.6e-6);
    assert!(!params.vpm.critical_volume_algorithm);
    assert_eq!(params.vpm.initial_critical_radius_he, defaults.vpm.initial_critical_radius_he);
    assert_eq!(params.surface_pressure, defaults.surface_pressure);
    assert_eq!(params.n2_half_times, defaults.n2_half_times);
    assert!(params.validate().is_ok());
}

#[test]
fn test_invalid_config_is_caught_by_diver() {
    let params = Parameters::from_json(r#"{ "gradient_factors": { "low": 0.9, "high": 0.5 } }"#).unwrap();
    assert_eq!(Diver::new(&params), Err(IllegalActionError::InvalidGradientFactors));
}

#[test]
fn test_malformed_json_is_an_error() {
    assert!(Parameters::from_json(r#"{ "surface_pressure": "high" }"#).is_err());
}

#[test]
fn test_schedule_serializes_to_json() {
    let params = Parameters::default();
    let air = GasMixture::air();
    let m = Length::from_meters;
    let stages = DecoStages::single(DecoStage::new(m(40.0), m(0.0), m(-9.0), air, m(3.0)).unwrap());
    let mut dive = Dive::new(Algorithm::BuhlmannGradient(ZhL16Variant::C), stages);
    dive.travel(m(40.0), 2.0, air).unwrap();
    dive.stay(18.0, air).unwrap();
    dive.apply(&mut Diver::new(&params).unwrap(), &params).unwrap();

    let schedule = dive.schedule().unwrap();
    let json = serde_json::to_string(schedule).unwrap();
    let parsed: DecoSchedule = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.segments.len(), schedule.segments.len());
    assert_eq!(parsed.stops().len(), schedule.stops().len());
    assert!((parsed.total_ascent_time() - schedule.total_ascent_time()).abs() < 1e-9);
}
