use approx::assert_relative_eq;
use deco_engine::{
    m_value::{blended_coefficients, calculate_m_value, tolerated_tension},
    tissue::GasTensions,
    zhl16::{ZhL16Variant, ZHL16_C},
};

#[test]
fn test_calculate_m_values() {
    let tensions = GasTensions { n2: 3.0, he: 0.0 };
    let result = calculate_m_value(5.0, tensions, 15, &ZHL16_C);
    assert_relative_eq!(result, 5.412436869367037, epsilon = 1e-12);
}

#[test]
fn test_trimix_blends_coefficients_by_tension() {
    let tensions = GasTensions { n2: 2.0, he: 1.0 };
    let (a, b) = blended_coefficients(tensions, 0, &ZHL16_C);
    assert_relative_eq!(a, 1.3193666666666666, epsilon = 1e-12);
    assert_relative_eq!(b, 0.5308666666666667, epsilon = 1e-12);
    assert_relative_eq!(calculate_m_value(4.0, tensions, 0, &ZHL16_C), 8.854215341789107, epsilon = 1e-9);
    assert_relative_eq!(tolerated_tension(4.0, tensions, 0, &ZHL16_C, 0.5), 6.427107670894554, epsilon = 1e-9);
}

#[test]
fn test_empty_compartment_uses_nitrogen_coefficients() {
    let (a, b) = blended_coefficients(GasTensions::default(), 7, &ZHL16_C);
    assert_eq!(a, ZHL16_C.n2_a[7]);
    assert_eq!(b, ZHL16_C.n2_b[7]);
}

#[test]
fn test_c_series_is_most_conservative() {
    let tensions = GasTensions { n2: 2.5, he: 0.0 };
    for i in 0..16 {
        let a = calculate_m_value(3.0, tensions, i, ZhL16Variant::A.coefficients());
        let b = calculate_m_value(3.0, tensions, i, ZhL16Variant::B.coefficients());
        let c = calculate_m_value(3.0, tensions, i, ZhL16Variant::C.coefficients());
        assert!(c <= b && b <= a, "compartment {}", i + 1);
    }
}

#[cfg(feature = "std")]
#[test]
fn plot_m_values() {
    use csv::Writer;
    use std::string::ToString;
    let mut wtr = Writer::from_writer(vec![]);
    let mut header = vec!["amb_pressure".to_string()];
    header.extend((1..=16).map(|i| format!("m_value_{}", i)));
    wtr.write_record(&header).unwrap();

    // iterate for pressures in step of 0.5 bar
    let tensions = GasTensions { n2: 1.0, he: 0.0 };
    for press in 2..9 {
        let amb_pressure = press as f64 / 2.0;
        let mut row = vec![amb_pressure.to_string()];
        row.extend((0..16).map(|i| calculate_m_value(amb_pressure, tensions, i, &ZHL16_C).to_string()));
        wtr.write_record(&row).unwrap();
    }
    let data = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
    assert_eq!(data.lines().count(), 8);
    assert!(data.starts_with("amb_pressure,m_value_1,"));
}
