use crate::error::CalculationError;
use crate::gas::GasMixture;
use crate::parameters::Parameters;
use crate::root::{bisection, radius_root_finder};
use crate::tissue::{AmbientProfile, GasTensions, ImpermeabilityOnset, TissueCompartment};
use crate::units::PASCAL_PER_BAR;

/// Updates the maximum crushing pressure of `compartment` after it went
/// through the descent `profile`. `initial` holds the tensions from before
/// the descent; the compartment already carries the tensions after it.
pub fn crushing_pressure_update(
    compartment: &mut TissueCompartment,
    initial: GasTensions,
    profile: AmbientProfile,
    gas: &GasMixture,
    params: &Parameters,
) -> Result<(), CalculationError> {
    let vpm = &params.vpm;
    let gradient_onset = vpm.gradient_onset_of_impermeability;
    let starting_ambient = profile.start;
    let ending_ambient = profile.end();

    let starting_gas_tension = initial.total() + vpm.pressure_other_gases;
    let starting_gradient = starting_ambient - starting_gas_tension;
    let ending_gas_tension = compartment.total_tension() + vpm.pressure_other_gases;
    let ending_gradient = ending_ambient - ending_gas_tension;

    if ending_gradient <= gradient_onset {
        // permeable: the nucleus is crushed by the plain pressure gradient
        for gas_state in [&mut compartment.n2, &mut compartment.he] {
            gas_state.max_crushing_pressure = gas_state.max_crushing_pressure.max(ending_gradient);
        }
        return Ok(());
    }

    let onset = if starting_gradient < gradient_onset {
        onset_of_impermeability(compartment, initial, profile, gas, params)?
    } else if starting_gradient == gradient_onset || compartment.impermeability_onset.is_none() {
        ImpermeabilityOnset {
            ambient_pressure: starting_ambient,
            gas_tension: starting_gas_tension,
        }
    } else {
        compartment.impermeability_onset.unwrap_or_default()
    };
    compartment.impermeability_onset = Some(onset);

    let skin = 2.0 * (vpm.skin_compression_gamma_c - vpm.surface_tension_gamma);
    let ending_ambient_pa = ending_ambient * PASCAL_PER_BAR;
    let onset_ambient_pa = onset.ambient_pressure * PASCAL_PER_BAR;
    let onset_tension_pa = onset.gas_tension * PASCAL_PER_BAR;
    let gradient_onset_pa = gradient_onset * PASCAL_PER_BAR;

    for gas_state in [&mut compartment.n2, &mut compartment.he] {
        let radius_onset = gas_state.nucleus.radius_onset_of_impermeability(vpm);
        let radius_onset_cubed = radius_onset * radius_onset * radius_onset;
        let a = ending_ambient_pa - onset_ambient_pa + onset_tension_pa + skin / radius_onset;
        let c = onset_tension_pa * radius_onset_cubed;
        let ending_radius = radius_root_finder(a, skin, c, skin / a, radius_onset)?;
        let ending_radius_cubed = ending_radius * ending_radius * ending_radius;

        let crushing_pressure_pa = gradient_onset_pa + ending_ambient_pa - onset_ambient_pa
            + onset_tension_pa * (1.0 - radius_onset_cubed / ending_radius_cubed);
        gas_state.max_crushing_pressure = gas_state
            .max_crushing_pressure
            .max(crushing_pressure_pa / PASCAL_PER_BAR);
    }
    Ok(())
}

/// Finds where along the descent the gradient first reaches the onset of
/// impermeability.
fn onset_of_impermeability(
    compartment: &TissueCompartment,
    initial: GasTensions,
    profile: AmbientProfile,
    gas: &GasMixture,
    params: &Parameters,
) -> Result<ImpermeabilityOnset, CalculationError> {
    let vpm = &params.vpm;
    let mut start_of_descent = *compartment;
    start_of_descent.set_tensions(initial);

    let gradient_at = |time: f64| -> Result<(f64, f64, f64), CalculationError> {
        let ambient = profile.start + profile.rate * time;
        let tensions = start_of_descent.loaded_tensions(
            AmbientProfile {
                period: time,
                ..profile
            },
            gas,
            params,
        )?;
        let gas_tension = tensions.total() + vpm.pressure_other_gases;
        Ok((ambient - gas_tension - vpm.gradient_onset_of_impermeability, ambient, gas_tension))
    };

    let time = bisection(|t| gradient_at(t).map(|(f, _, _)| f), 0.0, profile.period)?;
    let (_, ambient_pressure, gas_tension) = gradient_at(time)?;
    Ok(ImpermeabilityOnset {
        ambient_pressure,
        gas_tension,
    })
}

#[test]
fn test_shallow_descent_is_permeable() {
    let params = Parameters::default();
    let mut c = TissueCompartment::new(0, &params);
    let air = GasMixture::air();
    c.saturate(params.surface_pressure, &air, &params);
    let initial = c.tensions();
    let profile = AmbientProfile {
        start: params.surface_pressure,
        rate: 2.0,
        period: 1.5,
    };
    c.expose(profile, &air, &params).unwrap();
    crushing_pressure_update(&mut c, initial, profile, &air, &params).unwrap();
    let expected = profile.end() - (c.total_tension() + params.vpm.pressure_other_gases);
    assert_eq!(c.n2.max_crushing_pressure, expected);
    assert_eq!(c.he.max_crushing_pressure, expected);
}

#[test]
fn test_deep_descent_reaches_impermeability() {
    let params = Parameters::default();
    let mut c = TissueCompartment::new(15, &params);
    let air = GasMixture::air();
    c.saturate(params.surface_pressure, &air, &params);
    let initial = c.tensions();
    // 120 m in 6 minutes
    let profile = AmbientProfile {
        start: params.surface_pressure,
        rate: 2.0,
        period: 6.0,
    };
    c.expose(profile, &air, &params).unwrap();
    crushing_pressure_update(&mut c, initial, profile, &air, &params).unwrap();
    let onset = c.impermeability_onset.unwrap();
    assert!(onset.ambient_pressure > params.surface_pressure);
    assert!(onset.ambient_pressure < profile.end());
    // an impermeable skin shields the nucleus from part of the gradient
    let permeable = profile.end() - (c.total_tension() + params.vpm.pressure_other_gases);
    assert!(c.n2.max_crushing_pressure > params.vpm.gradient_onset_of_impermeability);
    assert!(c.n2.max_crushing_pressure < permeable);
}
