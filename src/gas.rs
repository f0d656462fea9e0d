use defmt::Format;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::IllegalActionError;

const FRACTION_TOLERANCE: f64 = 1e-9;

/// Breathing gas. Nitrogen makes up whatever oxygen and helium leave.
#[derive(Debug, Format, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GasMixture {
    o2: f64,
    he: f64,
    n2: f64,
    /// Position in the caller's gas list, used for reporting only.
    pub index: usize,
}

impl GasMixture {
    pub fn new(o2: f64, he: f64) -> Result<Self, IllegalActionError> {
        let in_range = |f: f64| (0.0..=1.0).contains(&f);
        if !in_range(o2) || !in_range(he) {
            return Err(IllegalActionError::GasFractionOutOfRange);
        }
        if o2 + he > 1.0 + FRACTION_TOLERANCE {
            return Err(IllegalActionError::GasFractionsExceedOne);
        }
        Ok(GasMixture {
            o2,
            he,
            n2: (1.0 - o2 - he).max(0.0),
            index: 0,
        })
    }

    pub fn from_percentages(o2: f64, he: f64) -> Result<Self, IllegalActionError> {
        Self::new(o2 / 100.0, he / 100.0)
    }

    pub fn air() -> Self {
        GasMixture {
            o2: 0.21,
            he: 0.0,
            n2: 0.79,
            index: 0,
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn o2_fraction(&self) -> f64 {
        self.o2
    }

    pub fn he_fraction(&self) -> f64 {
        self.he
    }

    pub fn n2_fraction(&self) -> f64 {
        self.n2
    }

    pub fn o2_percentage(&self) -> f64 {
        self.o2 * 100.0
    }

    pub fn he_percentage(&self) -> f64 {
        self.he * 100.0
    }

    pub fn n2_percentage(&self) -> f64 {
        self.n2 * 100.0
    }
}

#[test]
fn test_gas_rejects_overfull_mixture() {
    assert_eq!(
        GasMixture::new(0.5, 0.6),
        Err(IllegalActionError::GasFractionsExceedOne)
    );
    assert_eq!(
        GasMixture::new(-0.1, 0.0),
        Err(IllegalActionError::GasFractionOutOfRange)
    );
}

#[test]
fn test_pure_oxygen_has_no_inert_gas() {
    let o2 = GasMixture::new(1.0, 0.0).unwrap();
    assert_eq!(o2.n2_fraction(), 0.0);
    assert_eq!(o2.he_fraction(), 0.0);
}

#[test]
fn test_percentages_add_up_to_one_hundred() {
    use rand::{rngs::StdRng, Rng, SeedableRng};
    let mut rng = StdRng::seed_from_u64(21);
    for _ in 0..200 {
        let o2 = rng.random_range(5.0..100.0);
        let he = rng.random_range(0.0..100.0 - o2);
        let gas = GasMixture::from_percentages(o2, he).unwrap();
        let total = gas.o2_percentage() + gas.he_percentage() + gas.n2_percentage();
        assert!(libm::fabs(total - 100.0) < 1e-9, "{} / {} sums to {}", o2, he, total);
        assert!(libm::fabs(gas.o2_percentage() - o2) < 1e-9);
        assert!(libm::fabs(gas.he_percentage() - he) < 1e-9);
    }
}
