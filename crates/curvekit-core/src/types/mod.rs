//! Domain types for curve construction.
//!
//! - [`Date`]: Calendar date for knots and maturities
//! - [`Tenor`]: Period such as `3M` or `10Y`
//! - [`Frequency`]: Payment frequency
//! - [`Compounding`]: Interest compounding convention

mod date;
mod frequency;
mod tenor;

pub use date::Date;
pub use frequency::{Compounding, Frequency};
pub use tenor::{Tenor, TenorUnit};
