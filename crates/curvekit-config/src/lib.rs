//! Curvekit Configuration Layer
//!
//! Serde-backed settings for curve and volatility surface builds. Settings
//! are loaded from TOML or JSON documents, validated, and converted into the
//! typed configurations the builders consume.
//!
//! # Features
//!
//! - **Solver Settings**: tolerance, iteration cap, wall-clock limit
//! - **Curve Configuration**: curve kind, interpolation, extrapolation, day count, compounding
//! - **Surface Configuration**: SABR beta, optimiser, expiry interpolation
//! - **Documents**: named curve and surface configurations in one file
//!
//! # Example
//!
//! ```rust
//! use curvekit_config::{CurveBuildConfig, CurveKind, PricingStructureConfig};
//! use curvekit_core::types::Compounding;
//!
//! let doc = PricingStructureConfig::standard()
//!     .with_curve("EUR.ZERO", CurveBuildConfig::new(CurveKind::Zero).with_compounding(Compounding::Annual));
//!
//! let text = doc.to_toml_string().unwrap();
//! let reloaded = PricingStructureConfig::from_toml_str(&text).unwrap();
//! assert_eq!(reloaded, doc);
//!
//! let config = reloaded.bootstrap_config("EUR.ZERO").unwrap();
//! assert!(config.validate().is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod curve;
mod document;
mod error;
mod solver;
mod surface;

// Re-export core types
pub use curve::{CurveBuildConfig, CurveKind};
pub use document::PricingStructureConfig;
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use solver::SolverSettings;
pub use surface::SurfaceBuildConfig;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::curve::{CurveBuildConfig, CurveKind};
    pub use crate::document::PricingStructureConfig;
    pub use crate::error::{ConfigError, ConfigResult, Validate};
    pub use crate::solver::SolverSettings;
    pub use crate::surface::SurfaceBuildConfig;
}
