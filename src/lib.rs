#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

/// Traces to the console under `std` and to defmt everywhere.
macro_rules! deco_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "std")]
        ::std::println!($($arg)*);
        defmt::debug!($($arg)*);
    }};
}

pub mod units;
pub mod error;
pub mod zhl16;
pub mod parameters;
pub mod gas;
pub mod nucleus;
pub mod tissue;
pub mod m_value;
pub mod ceiling;
pub mod root;
pub mod crushing;
pub mod segment;
pub mod diver;
pub mod deco;
pub mod exposure;
pub mod simulate;
pub mod ndl;

pub use deco::buhlmann::BuhlmannDecompression;
pub use deco::vpm::VpmDecompression;
pub use deco::{
    Algorithm, AscentStart, DecoSchedule, DecoStage, DecoStages, DecoStop, Decompression,
    DecompressionModel,
};
pub use diver::Diver;
pub use error::{CalculationError, DecoError, IllegalActionError};
pub use exposure::{Dive, Exposure};
pub use gas::GasMixture;
pub use parameters::{GradientFactors, Parameters, VpmParameters};
pub use segment::ExposureSegment;
pub use simulate::{simulate, Processor, SimulationOutputs};
pub use units::{Length, LengthUnit, Pressure, PressureUnit};
pub use zhl16::ZhL16Variant;
