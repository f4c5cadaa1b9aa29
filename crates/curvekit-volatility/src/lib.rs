//! # Curvekit Volatility
//!
//! Volatility term structures and surfaces for the Curvekit pricing-structure
//! library.
//!
//! - **Options**: [`OptionAsset`], quoted in Black volatility or premium
//! - **Volatility curves**: [`VolatilityCurveBootstrapper`] builds an
//!   expiry to volatility [`curvekit_curves::InterpolatedSpace`]
//! - **Market grids**: [`VolatilitySurfaceBootstrapper`] groups options into
//!   expiry slices and answers (expiry, strike) queries from the raw quotes
//! - **SABR**: Hagan's smile and a per-slice [`SabrCalibrator`] producing a
//!   [`VolatilitySurface`]
//!
//! ## Quick Start
//!
//! ```rust
//! use curvekit_core::Date;
//! use curvekit_volatility::prelude::*;
//!
//! let base = Date::from_ymd(2025, 1, 2).unwrap();
//! let truth = SabrParameters::new(0.035, 0.5, -0.25, 0.5).unwrap();
//! let forward = 0.04;
//!
//! let mut bootstrapper = VolatilitySurfaceBootstrapper::new(base);
//! for (days, t) in [(365, 1.0), (730, 2.0)] {
//!     for strike in [0.02, 0.03, 0.04, 0.05, 0.06] {
//!         let vol = truth.hagan_volatility(forward, strike, t);
//!         let id = format!("{days}D-{strike}");
//!         bootstrapper = bootstrapper
//!             .add_option(OptionAsset::from_volatility(id, base.add_days(days), strike, forward, vol));
//!     }
//! }
//!
//! let grid = bootstrapper.bootstrap().unwrap();
//! let surface = SabrCalibrator::default().calibrate(&grid).unwrap();
//!
//! let vol = surface.value(base.add_days(547), 0.045).unwrap();
//! assert!(vol > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]

pub mod curve;
pub mod error;
pub mod grid;
pub mod option;
pub mod sabr;
pub mod surface;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::curve::{VolatilityCurve, VolatilityCurveBootstrapper};
    pub use crate::error::{VolatilityError, VolatilityResult};
    pub use crate::grid::{ExcludedOption, VolatilityGrid, VolatilitySlice, VolatilitySurfaceBootstrapper};
    pub use crate::option::{OptionAsset, OptionQuote};
    pub use crate::sabr::{
        SabrCalibrationConfig, SabrCalibrationReport, SabrCalibrator, SabrFit, SabrParameters,
        SabrSmile, SliceOutcome,
    };
    pub use crate::surface::VolatilitySurface;
}

// Re-export commonly used types at crate root
pub use curve::{VolatilityCurve, VolatilityCurveBootstrapper};
pub use error::{VolatilityError, VolatilityResult};
pub use grid::{VolatilityGrid, VolatilitySurfaceBootstrapper};
pub use option::{OptionAsset, OptionQuote};
pub use sabr::{SabrCalibrationConfig, SabrCalibrator, SabrParameters, SabrSmile};
pub use surface::VolatilitySurface;
