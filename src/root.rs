use crate::error::CalculationError;

pub const MAX_ITERATIONS: usize = 100;
pub const BISECTION_TOLERANCE: f64 = 1.0e-3;
pub const RADIUS_TOLERANCE: f64 = 1.0e-12;

/// Bisection search for the crossing of `function` between `low_bound` and
/// `high_bound`. Returns the point on the non-positive side of the crossing,
/// within `BISECTION_TOLERANCE` of it.
pub fn bisection<F>(mut function: F, low_bound: f64, high_bound: f64) -> Result<f64, CalculationError>
where
    F: FnMut(f64) -> Result<f64, CalculationError>,
{
    let function_at_low_bound = function(low_bound)?;
    let function_at_high_bound = function(high_bound)?;
    if function_at_low_bound * function_at_high_bound >= 0.0 {
        return Err(CalculationError::RootNotWithinBrackets);
    }

    let (mut root, mut differential_change) = if function_at_low_bound < 0.0 {
        (low_bound, high_bound - low_bound)
    } else {
        (high_bound, low_bound - high_bound)
    };

    for _ in 0..MAX_ITERATIONS {
        differential_change *= 0.5;
        let mid_range = root + differential_change;
        let function_at_mid_range = function(mid_range)?;
        if function_at_mid_range <= 0.0 {
            root = mid_range;
        }
        if libm::fabs(differential_change) < BISECTION_TOLERANCE || function_at_mid_range == 0.0 {
            return Ok(root);
        }
    }
    Err(CalculationError::IterationLimitExceeded)
}

fn cubic(a: f64, b: f64, c: f64, radius: f64) -> f64 {
    radius * (radius * (a * radius - b)) - c
}

fn cubic_derivative(a: f64, b: f64, radius: f64) -> f64 {
    radius * (radius * 3.0 * a - 2.0 * b)
}

/// Solves `A·r³ - B·r² - C = 0` for the bubble radius inside
/// `[low_bound, high_bound]`, taking Newton-Raphson steps while they stay in
/// the bracket and converge, bisecting otherwise.
pub fn radius_root_finder(
    a: f64,
    b: f64,
    c: f64,
    low_bound: f64,
    high_bound: f64,
) -> Result<f64, CalculationError> {
    let function_at_low_bound = cubic(a, b, c, low_bound);
    let function_at_high_bound = cubic(a, b, c, high_bound);
    if (function_at_low_bound > 0.0 && function_at_high_bound > 0.0)
        || (function_at_low_bound < 0.0 && function_at_high_bound < 0.0)
    {
        return Err(CalculationError::RootNotWithinBrackets);
    }
    if function_at_low_bound == 0.0 {
        return Ok(low_bound);
    }
    if function_at_high_bound == 0.0 {
        return Ok(high_bound);
    }

    // radius_at_low keeps the negative side of the bracket
    let (mut radius_at_low, mut radius_at_high) = if function_at_low_bound < 0.0 {
        (low_bound, high_bound)
    } else {
        (high_bound, low_bound)
    };

    let mut ending_radius = 0.5 * (low_bound + high_bound);
    let mut last_differential_change = libm::fabs(high_bound - low_bound);
    let mut differential_change = last_differential_change;
    let mut function = cubic(a, b, c, ending_radius);
    let mut derivative = cubic_derivative(a, b, ending_radius);

    for _ in 0..MAX_ITERATIONS {
        let newton_leaves_bracket = ((ending_radius - radius_at_high) * derivative - function)
            * ((ending_radius - radius_at_low) * derivative - function)
            >= 0.0;
        let newton_too_slow =
            libm::fabs(2.0 * function) > libm::fabs(last_differential_change * derivative);

        if newton_leaves_bracket || newton_too_slow {
            last_differential_change = differential_change;
            differential_change = 0.5 * (radius_at_high - radius_at_low);
            ending_radius = radius_at_low + differential_change;
            if radius_at_low == ending_radius {
                return Ok(ending_radius);
            }
        } else {
            last_differential_change = differential_change;
            differential_change = function / derivative;
            let last_ending_radius = ending_radius;
            ending_radius -= differential_change;
            if last_ending_radius == ending_radius {
                return Ok(ending_radius);
            }
        }
        if libm::fabs(differential_change) < RADIUS_TOLERANCE {
            return Ok(ending_radius);
        }
        function = cubic(a, b, c, ending_radius);
        derivative = cubic_derivative(a, b, ending_radius);
        if function < 0.0 {
            radius_at_low = ending_radius;
        } else {
            radius_at_high = ending_radius;
        }
    }
    Err(CalculationError::IterationLimitExceeded)
}

#[test]
fn test_bisection_finds_square_root() {
    let root = bisection(|x| Ok(x * x - 2.0), 0.0, 2.0).unwrap();
    assert!(libm::fabs(root - libm::sqrt(2.0)) < BISECTION_TOLERANCE);
    assert!(root * root - 2.0 <= 0.0);
}

#[test]
fn test_bisection_decreasing_function() {
    let root = bisection(|x| Ok(3.0 - x), 0.0, 10.0).unwrap();
    assert!(libm::fabs(root - 3.0) < BISECTION_TOLERANCE);
    assert!(root >= 3.0);
}

#[test]
fn test_bisection_requires_sign_change() {
    assert_eq!(
        bisection(|x| Ok(x * x + 1.0), -1.0, 1.0),
        Err(CalculationError::RootNotWithinBrackets)
    );
}

#[test]
fn test_radius_root_finder_known_cubic() {
    // r^3 - r^2 - 4 = (r - 2)(r^2 + r + 2)
    let r = radius_root_finder(1.0, 1.0, 4.0, 1.0, 3.0).unwrap();
    assert!(libm::fabs(r - 2.0) < 1e-10);
}

#[test]
fn test_radius_root_finder_rejects_bad_bracket() {
    assert_eq!(
        radius_root_finder(1.0, 1.0, 4.0, 2.5, 3.0),
        Err(CalculationError::RootNotWithinBrackets)
    );
}

#[test]
fn test_bisection_stays_inside_the_bracket() {
    use rand::{rngs::StdRng, Rng, SeedableRng};
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..500 {
        let low = rng.random_range(-100.0..100.0);
        let high = low + rng.random_range(0.1..50.0);
        let crossing = rng.random_range(low + 0.01..high - 0.01);
        let slope = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let root = bisection(|x| Ok(slope * (x - crossing)), low, high).unwrap();
        assert!(root >= low && root <= high, "{} outside [{}, {}]", root, low, high);
        assert!(libm::fabs(root - crossing) < BISECTION_TOLERANCE);
    }
}
