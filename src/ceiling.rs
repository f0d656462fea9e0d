use crate::diver::Diver;
use crate::error::CalculationError;
use crate::m_value::{blended_coefficients, tolerated_tension};
use crate::tissue::TissueCompartment;
use crate::units::BAR_PER_METER;
use crate::zhl16::ZhL16Coefficients;

/// Tolerated ambient pressure (bar) of one compartment under gradient factor `gf`.
pub fn tolerated_ambient_pressure(
    tissue: &TissueCompartment,
    coefficients: &ZhL16Coefficients,
    gf: f64,
) -> f64 {
    let tensions = tissue.tensions();
    let (a, b) = blended_coefficients(tensions, tissue.index, coefficients);
    ((tensions.total() - a * gf) / (gf / b - gf + 1.0)).max(0.0)
}

/// Ceiling depth in meters, never above the surface.
pub fn ceiling(
    tissue: &TissueCompartment,
    coefficients: &ZhL16Coefficients,
    gf: f64,
    surface_pressure: f64,
) -> f64 {
    let result_bar = tolerated_ambient_pressure(tissue, coefficients, gf);
    ((result_bar - surface_pressure) / BAR_PER_METER).max(0.0)
}

/// Deepest ceiling across the diver and the index of the leading compartment.
pub fn max_ceiling(diver: &Diver, coefficients: &ZhL16Coefficients, gf: f64) -> (f64, usize) {
    let mut max_ceiling = 0.0;
    let mut tissue_index = 0;
    for tissue in diver.compartments() {
        let tentative_max_ceiling = ceiling(tissue, coefficients, gf, diver.surface_pressure());
        if tentative_max_ceiling > max_ceiling {
            max_ceiling = tentative_max_ceiling;
            tissue_index = tissue.index;
        }
    }
    (max_ceiling, tissue_index)
}

/// Fails when any compartment holds more gas than it tolerates at `depth`
/// meters. Stop finding guarantees this never happens, so a failure here is
/// a fault in the schedule, not a recoverable condition.
pub fn check_diver_safety(
    diver: &Diver,
    depth: f64,
    coefficients: &ZhL16Coefficients,
    gf: f64,
) -> Result<(), CalculationError> {
    let amb_pressure = diver.ambient_pressure(depth);
    for tissue in diver.compartments() {
        let tensions = tissue.tensions();
        let limit = tolerated_tension(amb_pressure, tensions, tissue.index, coefficients, gf);
        if tensions.total() > limit {
            return Err(CalculationError::DiverGetsBends {
                compartment: tissue.index,
                depth,
            });
        }
    }
    Ok(())
}

#[test]
fn test_saturated_surface_diver_has_no_ceiling() {
    use crate::parameters::Parameters;
    use crate::zhl16::ZHL16_C;
    let diver = Diver::new(&Parameters::default()).unwrap();
    let (depth, _) = max_ceiling(&diver, &ZHL16_C, 0.3);
    assert_eq!(depth, 0.0);
    assert!(check_diver_safety(&diver, 0.0, &ZHL16_C, 0.3).is_ok());
}

#[test]
fn test_overloaded_diver_gets_the_bends() {
    use crate::parameters::Parameters;
    use crate::tissue::GasTensions;
    use crate::zhl16::ZHL16_C;
    let mut diver = Diver::new(&Parameters::default()).unwrap();
    diver.compartments_mut()[15].set_tensions(GasTensions { n2: 3.0, he: 0.0 });
    let (depth, index) = max_ceiling(&diver, &ZHL16_C, 1.0);
    assert_eq!(index, 15);
    assert!(depth > 0.0);
    assert_eq!(
        check_diver_safety(&diver, 0.0, &ZHL16_C, 1.0),
        Err(CalculationError::DiverGetsBends {
            compartment: 15,
            depth: 0.0
        })
    );
}
