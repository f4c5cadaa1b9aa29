//! # Curvekit Curves
//!
//! Term structures and curve bootstrapping for the Curvekit pricing-structure
//! library.
//!
//! This crate provides:
//!
//! - **Term Curves**: [`TermCurve`], an ordered, de-duplicated date/value
//!   sequence tagged with a [`CurveValueType`]
//! - **Interpolated Spaces**: [`InterpolatedSpace`], a term curve bound to a
//!   base date, day count, interpolation method and extrapolation policy
//! - **Assets**: deposits, FRAs, rate futures, swaps, spreads over a base
//!   curve, exchange futures, FX forwards and caps/floors that can reprice
//!   themselves off a curve
//! - **Bootstrap**: the sequential [`Bootstrapper`], with repricing reports
//! - **Conversion**: discount factor / zero rate / forward rate curve
//!   conversions
//!
//! ## Quick Start
//!
//! ```rust
//! use curvekit_core::prelude::*;
//! use curvekit_curves::prelude::*;
//!
//! let base = Date::from_ymd(2025, 1, 2).unwrap();
//! let built = Bootstrapper::new(base)
//!     .add_asset(Deposit::new("DEP-1Y", base, base.add_days(365), 0.04))
//!     .add_asset(Swap::new("SWP-3Y", base, base.add_days(1095), 0.042))
//!     .bootstrap()
//!     .unwrap();
//!
//! let zeros = to_zero_curve(
//!     built.term_curve(),
//!     base,
//!     Compounding::Continuous,
//!     DayCountConvention::Act365Fixed,
//! )
//! .unwrap();
//! assert_eq!(zeros.len(), built.term_curve().len());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::uninlined_format_args)]

pub mod assets;
pub mod black;
pub mod bootstrap;
pub mod conversion;
pub mod error;
pub mod repricing;
pub mod space;
pub mod term_curve;
pub mod traits;
pub mod value_type;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::assets::{
        AssetFamily, CapFloor, CapFloorKind, ComputesImpliedQuote, ConvexityAdjustment, Deposit,
        ExchangeFuture, Fra, FxForward, HasMarketQuote, HasMaturity, PriceableAsset, RateAsset,
        RateFuture, RateSpread, SolveStrategy, Swap,
    };
    pub use crate::black::{black_price, black_vega, OptionKind};
    pub use crate::bootstrap::{
        bootstrap_many, BootstrapConfig, BootstrappedCurve, Bootstrapper, ExcludedAsset,
        ExclusionReason,
    };
    pub use crate::conversion::{to_discount_curve, to_forward_curve, to_zero_curve};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::repricing::{tolerances, RepricingCheck, RepricingReport};
    pub use crate::space::InterpolatedSpace;
    pub use crate::term_curve::{TermCurve, TermPoint};
    pub use crate::traits::CurveView;
    pub use crate::value_type::CurveValueType;

    pub use curvekit_math::interpolation::{Extrapolation, InterpolationMethod};
}

// Re-export commonly used types at crate root
pub use bootstrap::{BootstrapConfig, BootstrappedCurve, Bootstrapper};
pub use error::{CurveError, CurveResult};
pub use space::InterpolatedSpace;
pub use term_curve::{TermCurve, TermPoint};
pub use traits::CurveView;
pub use value_type::CurveValueType;
