use crate::ceiling::max_ceiling;
use crate::deco::buhlmann::BuhlmannDecompression;
use crate::diver::Diver;
use crate::error::CalculationError;
use crate::gas::GasMixture;
use crate::parameters::Parameters;
use crate::segment::ExposureSegment;
use crate::units::Length;

/// Longest no-decompression limit reported, in minutes.
pub const MAX_NDL: u32 = 999;

/// Whole minutes `diver` can stay at `depth` breathing `gas` before a direct
/// ascent needs a stop. The diver itself is left untouched.
pub fn no_deco_limit(
    diver: &Diver,
    depth: Length,
    gas: &GasMixture,
    model: &BuhlmannDecompression,
    params: &Parameters,
) -> Result<u32, CalculationError> {
    let coefficients = model.variant().coefficients();
    let gf_high = model.gradient_factors(params).high;
    let minute = ExposureSegment::constant_depth(depth, 1.0, *gas)?;

    let mut projected = diver.clone();
    let mut bottom_time = 0;
    // while the ceiling is at the surface keep loading
    loop {
        let (ceiling, leading) = max_ceiling(&projected, coefficients, gf_high);
        if ceiling > 0.0 {
            deco_trace!("NDL {} min at {} m, compartment {} leading", bottom_time, depth.meters(), leading + 1);
            return Ok(bottom_time);
        }
        if bottom_time >= MAX_NDL {
            return Ok(MAX_NDL);
        }
        minute.expose_diver(&mut projected, params)?;
        bottom_time += 1;
    }
}

#[test]
fn test_ndl_shrinks_with_depth() {
    use crate::zhl16::ZhL16Variant;
    let params = Parameters::default();
    let diver = Diver::new(&params).unwrap();
    let model = BuhlmannDecompression::new(ZhL16Variant::C);
    let air = GasMixture::air();

    let ndl_18 = no_deco_limit(&diver, Length::from_meters(18.0), &air, &model, &params).unwrap();
    let ndl_30 = no_deco_limit(&diver, Length::from_meters(30.0), &air, &model, &params).unwrap();
    let ndl_40 = no_deco_limit(&diver, Length::from_meters(40.0), &air, &model, &params).unwrap();
    assert!(ndl_18 > ndl_30);
    assert!(ndl_30 > ndl_40);
    assert!(ndl_40 > 0);
}

#[test]
fn test_shallow_ndl_is_capped() {
    use crate::zhl16::ZhL16Variant;
    let params = Parameters::default();
    let diver = Diver::new(&params).unwrap();
    let model = BuhlmannDecompression::new(ZhL16Variant::C);
    let ndl = no_deco_limit(&diver, Length::from_meters(3.0), &GasMixture::air(), &model, &params).unwrap();
    assert_eq!(ndl, MAX_NDL);
}
