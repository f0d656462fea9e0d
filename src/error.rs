use core::fmt;

use defmt::Format;

/// Misuse of the engine at construction time: bad gas fractions, malformed
/// deco stages, inconsistent configuration.
#[derive(Debug, Format, Clone, Copy, PartialEq)]
pub enum IllegalActionError {
    GasFractionOutOfRange,
    GasFractionsExceedOne,
    AscentRateNotNegative,
    StageNotAscending,
    StageDepthsNotDecreasing,
    NonPositiveStepSize,
    NonPositiveMinimumStopTime,
    NoDecoStages,
    NonPositiveAscentPeriod,
    InvalidGradientFactors,
    NonPositiveHalfTime,
    NonPositiveRadius,
    NegativeDepth,
}

impl fmt::Display for IllegalActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GasFractionOutOfRange => write!(f, "gas fractions must be between 0.0 and 1.0"),
            Self::GasFractionsExceedOne => write!(f, "gas fractions (O2 + He) exceed 1.0"),
            Self::AscentRateNotNegative => write!(f, "deco stage ascent rate must be negative"),
            Self::StageNotAscending => write!(f, "deco stage must start deeper than it ends"),
            Self::StageDepthsNotDecreasing => {
                write!(f, "deco stage start depths must decrease monotonically")
            }
            Self::NonPositiveStepSize => write!(f, "deco step size must be positive"),
            Self::NonPositiveMinimumStopTime => write!(f, "minimum deco stop time must be positive"),
            Self::NoDecoStages => write!(f, "at least one deco stage is required"),
            Self::NonPositiveAscentPeriod => write!(f, "ascent period must be positive"),
            Self::InvalidGradientFactors => {
                write!(f, "gradient factors must be in (0, 1.5] with low <= high")
            }
            Self::NonPositiveHalfTime => write!(f, "compartment half-times must be positive"),
            Self::NonPositiveRadius => write!(f, "critical nucleus radii must be positive"),
            Self::NegativeDepth => write!(f, "depth must not be negative"),
        }
    }
}

/// Numerical or physiological failure during a calculation run. Always fatal
/// to the run in progress; the diver state must be discarded or restored.
#[derive(Debug, Format, Clone, Copy, PartialEq)]
pub enum CalculationError {
    NegativeExposurePeriod,
    RootNotWithinBrackets,
    IterationLimitExceeded,
    /// Depth in meters of the stop that cannot off-gas.
    OffGassingGradientTooSmall { depth: f64 },
    /// Depth in meters of the stop that exceeded the stop-time cap.
    StopTooLong { depth: f64 },
    StepSizeTooLarge,
    DiverGetsBends { compartment: usize, depth: f64 },
    /// A tissue tension or allowable gradient went NaN or infinite.
    NonFiniteTension { compartment: usize },
}

impl fmt::Display for CalculationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeExposurePeriod => write!(f, "exposure period must not be negative"),
            Self::RootNotWithinBrackets => write!(f, "ERROR! ROOT IS NOT WITHIN BRACKETS"),
            Self::IterationLimitExceeded => {
                write!(f, "ERROR! ROOT SEARCH EXCEEDED MAXIMUM ITERATIONS")
            }
            Self::OffGassingGradientTooSmall { depth } => write!(
                f,
                "ERROR! OFF-GASSING GRADIENT IS TOO SMALL TO DECOMPRESS AT THE STOP ({depth} m)"
            ),
            Self::StopTooLong { depth } => {
                write!(f, "decompression stop at {depth} m exceeds 24 hours")
            }
            Self::StepSizeTooLarge => write!(f, "ERROR! STEP SIZE IS TOO LARGE TO DECOMPRESS"),
            Self::DiverGetsBends { compartment, depth } => write!(
                f,
                "diver gets the bends: compartment {} over its limit at {depth} m",
                compartment + 1
            ),
            Self::NonFiniteTension { compartment } => write!(
                f,
                "compartment {} has a non-finite tension or gradient",
                compartment + 1
            ),
        }
    }
}

#[derive(Debug, Format, Clone, Copy, PartialEq)]
pub enum DecoError {
    IllegalAction(IllegalActionError),
    Calculation(CalculationError),
}

impl fmt::Display for DecoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IllegalAction(e) => write!(f, "illegal action: {e}"),
            Self::Calculation(e) => write!(f, "calculation error: {e}"),
        }
    }
}

impl From<IllegalActionError> for DecoError {
    fn from(e: IllegalActionError) -> Self {
        Self::IllegalAction(e)
    }
}

impl From<CalculationError> for DecoError {
    fn from(e: CalculationError) -> Self {
        Self::Calculation(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IllegalActionError {}

#[cfg(feature = "std")]
impl std::error::Error for CalculationError {}

#[cfg(feature = "std")]
impl std::error::Error for DecoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IllegalAction(e) => Some(e),
            Self::Calculation(e) => Some(e),
        }
    }
}
