//! # Curvekit Core
//!
//! Dates, calendars, day counts and compounding arithmetic for the Curvekit
//! pricing-structure library.
//!
//! This crate provides the leaf building blocks used by the curve and
//! volatility crates:
//!
//! - **Types**: [`Date`], [`Tenor`](types::Tenor), [`Frequency`](types::Frequency),
//!   [`Compounding`](types::Compounding)
//! - **Day Count Conventions**: signed year fractions as `Decimal`
//! - **Business Day Calendars**: weekend and holiday calendars
//! - **Rates**: discount factor / zero rate / forward rate conversions
//! - **Collections**: the insert-if-absent ordered map every bootstrapper
//!   uses to deduplicate its inputs
//!
//! ## Example
//!
//! ```rust
//! use curvekit_core::prelude::*;
//!
//! let base = Date::from_ymd(2025, 1, 15).unwrap();
//! let maturity = Tenor::years(2).advance(base).unwrap();
//! let t = DayCountConvention::Act365Fixed.year_fraction_f64(base, maturity);
//! let df = zero_rate_to_discount_factor(0.04, t, Compounding::Continuous).unwrap();
//! assert!(df < 1.0);
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
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::uninlined_format_args)]

pub mod calendars;
pub mod collections;
pub mod daycounts;
pub mod error;
pub mod rates;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{Calendar, HolidayCalendar, WeekendCalendar};
    pub use crate::collections::InsertIfAbsentMap;
    pub use crate::daycounts::{year_fraction, DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::rates::{
        discount_factor_to_zero_rate, simple_discount_factor, simple_forward_rate,
        zero_rate_to_discount_factor,
    };
    pub use crate::types::{Compounding, Date, Frequency, Tenor, TenorUnit};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::Date;
