use defmt::Format;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const COMPARTMENTS: usize = 16;

/// ZH-L16 "1b" half-times in minutes.
pub const N2_HALF_TIMES: [f64; COMPARTMENTS] = [
    5.0, 8.0, 12.5, 18.5, 27.0, 38.3, 54.3, 77.0, 109.0, 146.0, 187.0, 239.0, 305.0, 390.0, 498.0,
    635.0,
];

pub const HE_HALF_TIMES: [f64; COMPARTMENTS] = [
    1.88, 3.02, 4.72, 6.99, 10.21, 14.48, 20.53, 29.11, 41.20, 55.19, 70.69, 90.34, 115.29, 147.42,
    188.24, 240.03,
];

const N2_B: [f64; COMPARTMENTS] = [
    0.5578, 0.6514, 0.7222, 0.7825, 0.8126, 0.8434, 0.8693, 0.8910, 0.9092, 0.9222, 0.9319, 0.9403,
    0.9477, 0.9544, 0.9602, 0.9653,
];

const HE_A: [f64; COMPARTMENTS] = [
    1.6189, 1.3830, 1.1919, 1.0458, 0.9220, 0.8205, 0.7305, 0.6502, 0.5950, 0.5545, 0.5333, 0.5189,
    0.5181, 0.5176, 0.5172, 0.5119,
];

const HE_B: [f64; COMPARTMENTS] = [
    0.4770, 0.5747, 0.6527, 0.7223, 0.7582, 0.7957, 0.8279, 0.8553, 0.8757, 0.8903, 0.8997, 0.9073,
    0.9122, 0.9171, 0.9217, 0.9267,
];

/// Bühlmann a/b coefficients (a in bar) for one series.
#[derive(Debug, Format, Clone, Copy, PartialEq)]
pub struct ZhL16Coefficients {
    pub n2_a: [f64; COMPARTMENTS],
    pub n2_b: [f64; COMPARTMENTS],
    pub he_a: [f64; COMPARTMENTS],
    pub he_b: [f64; COMPARTMENTS],
}

pub const ZHL16_A: ZhL16Coefficients = ZhL16Coefficients {
    n2_a: [
        1.1696, 1.0000, 0.8618, 0.7562, 0.6667, 0.5933, 0.5282, 0.4701, 0.4187, 0.3798, 0.3497,
        0.3223, 0.2971, 0.2737, 0.2523, 0.2327,
    ],
    n2_b: N2_B,
    he_a: HE_A,
    he_b: HE_B,
};

pub const ZHL16_B: ZhL16Coefficients = ZhL16Coefficients {
    n2_a: [
        1.1696, 1.0000, 0.8618, 0.7562, 0.6667, 0.5600, 0.4947, 0.4500, 0.4187, 0.3798, 0.3497,
        0.3223, 0.2850, 0.2737, 0.2523, 0.2327,
    ],
    n2_b: N2_B,
    he_a: HE_A,
    he_b: HE_B,
};

pub const ZHL16_C: ZhL16Coefficients = ZhL16Coefficients {
    n2_a: [
        1.1696, 1.0000, 0.8618, 0.7562, 0.6200, 0.5043, 0.4410, 0.4000, 0.3750, 0.3500, 0.3295,
        0.3065, 0.2835, 0.2610, 0.2480, 0.2327,
    ],
    n2_b: N2_B,
    he_a: HE_A,
    he_b: HE_B,
};

#[derive(Debug, Format, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ZhL16Variant {
    A,
    B,
    C,
}

impl ZhL16Variant {
    pub fn coefficients(self) -> &'static ZhL16Coefficients {
        match self {
            ZhL16Variant::A => &ZHL16_A,
            ZhL16Variant::B => &ZHL16_B,
            ZhL16Variant::C => &ZHL16_C,
        }
    }
}

#[test]
fn test_series_only_differ_in_nitrogen_a() {
    let a = ZhL16Variant::A.coefficients();
    let c = ZhL16Variant::C.coefficients();
    assert_eq!(a.n2_b, c.n2_b);
    assert_eq!(a.he_a, c.he_a);
    // C is the most conservative series for the middle compartments
    for i in 4..12 {
        assert!(c.n2_a[i] <= a.n2_a[i]);
    }
}
