use crate::tissue::GasTensions;
use crate::zhl16::ZhL16Coefficients;

/// Tension-weighted a/b coefficients of one compartment. A compartment
/// without inert gas uses the nitrogen coefficients.
pub fn blended_coefficients(
    tensions: GasTensions,
    tissue_index: usize,
    coefficients: &ZhL16Coefficients,
) -> (f64, f64) {
    let total = tensions.total();
    if total <= 0.0 {
        return (coefficients.n2_a[tissue_index], coefficients.n2_b[tissue_index]);
    }
    let a = (coefficients.n2_a[tissue_index] * tensions.n2
        + coefficients.he_a[tissue_index] * tensions.he)
        / total;
    let b = (coefficients.n2_b[tissue_index] * tensions.n2
        + coefficients.he_b[tissue_index] * tensions.he)
        / total;
    (a, b)
}

/// Bühlmann M-value: `Pamb / b + a`.
pub fn calculate_m_value(
    amb_pressure: f64,
    tensions: GasTensions,
    tissue_index: usize,
    coefficients: &ZhL16Coefficients,
) -> f64 {
    let (a, b) = blended_coefficients(tensions, tissue_index, coefficients);
    amb_pressure / b + a
}

/// Largest tolerated tension at `amb_pressure` under gradient factor `gf`:
/// `Pamb * (gf / b - gf + 1) + a * gf`. With `gf == 1` this is the M-value.
pub fn tolerated_tension(
    amb_pressure: f64,
    tensions: GasTensions,
    tissue_index: usize,
    coefficients: &ZhL16Coefficients,
    gf: f64,
) -> f64 {
    let (a, b) = blended_coefficients(tensions, tissue_index, coefficients);
    amb_pressure * (gf / b - gf + 1.0) + a * gf
}

#[test]
fn test_full_gradient_factor_is_m_value() {
    use crate::zhl16::ZHL16_C;
    let tensions = GasTensions { n2: 2.4, he: 0.9 };
    for i in 0..16 {
        let m = calculate_m_value(4.0, tensions, i, &ZHL16_C);
        let t = tolerated_tension(4.0, tensions, i, &ZHL16_C, 1.0);
        assert!(libm::fabs(m - t) < 1e-12);
    }
}

#[test]
fn test_zero_gradient_factor_tolerates_ambient() {
    use crate::zhl16::ZHL16_C;
    let tensions = GasTensions { n2: 1.0, he: 0.0 };
    assert_eq!(tolerated_tension(2.5, tensions, 7, &ZHL16_C, 0.0), 2.5);
}
