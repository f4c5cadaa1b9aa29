//! Configuration documents grouping named curve and surface builds.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use curvekit_core::daycounts::DayCountConvention;
use curvekit_curves::BootstrapConfig;
use curvekit_volatility::SabrCalibrationConfig;

use crate::curve::{CurveBuildConfig, CurveKind};
use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};
use crate::surface::SurfaceBuildConfig;

/// A document of named curve and surface build settings.
///
/// Loaded from TOML or JSON; both sections are optional.
///
/// # Example
///
/// ```rust
/// use curvekit_config::PricingStructureConfig;
///
/// let doc = PricingStructureConfig::from_toml_str(r#"
///     [curves."USD.DISCOUNT"]
///     kind = "Discount"
///     day_count = "Act360"
///
///     [curves."USD.DISCOUNT".solver]
///     tolerance = 1e-11
///
///     [surfaces."USD.SWAPTION"]
///     beta = 0.5
///     optimizer = "NelderMead"
/// "#).unwrap();
///
/// let bootstrap = doc.bootstrap_config("USD.DISCOUNT").unwrap();
/// assert_eq!(bootstrap.budget.tolerance, 1e-11);
/// assert!(doc.calibration_config("USD.SWAPTION").is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingStructureConfig {
    /// Curve builds by name.
    pub curves: BTreeMap<String, CurveBuildConfig>,
    /// Surface builds by name.
    pub surfaces: BTreeMap<String, SurfaceBuildConfig>,
}

impl PricingStructureConfig {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard configurations for USD discounting, zero rates, caplet
    /// volatilities and swaption smiles.
    pub fn standard() -> Self {
        Self::new()
            .with_curve(
                "USD.DISCOUNT",
                CurveBuildConfig::new(CurveKind::Discount)
                    .with_day_count(DayCountConvention::Act360)
                    .with_description("USD discount factors, log-linear"),
            )
            .with_curve(
                "USD.ZERO",
                CurveBuildConfig::new(CurveKind::Zero).with_description("USD continuous zero rates"),
            )
            .with_curve(
                "USD.CAPLET.VOL",
                CurveBuildConfig::new(CurveKind::CapletVolatility)
                    .with_day_count(DayCountConvention::Act360)
                    .with_description("USD caplet volatilities stripped from caps"),
            )
            .with_surface(
                "USD.SWAPTION.SABR",
                SurfaceBuildConfig::default().with_description("USD swaption smiles, beta 0.5"),
            )
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// `Parse` for malformed TOML, validation errors for invalid settings.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let doc: Self = toml::from_str(text)?;
        doc.loaded("toml")
    }

    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// `Parse` for malformed JSON, validation errors for invalid settings.
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let doc: Self = serde_json::from_str(text)?;
        doc.loaded("json")
    }

    /// Reads a document, choosing the format from the extension (`.json`
    /// is JSON, anything else TOML).
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as for the string parsers.
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_toml_str(&text)
        }
    }

    fn loaded(self, format: &'static str) -> ConfigResult<Self> {
        self.validate_or_error()?;
        tracing::info!(
            format,
            curves = self.curves.len(),
            surfaces = self.surfaces.len(),
            "Loaded pricing structure configuration"
        );
        Ok(self)
    }

    /// Serialises to TOML.
    ///
    /// # Errors
    ///
    /// `Parse` if a value has no TOML representation.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Serialises to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// `Parse` if a value has no JSON representation.
    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Adds or replaces a curve configuration.
    pub fn with_curve(mut self, name: impl Into<String>, config: CurveBuildConfig) -> Self {
        self.curves.insert(name.into(), config);
        self
    }

    /// Adds or replaces a surface configuration.
    pub fn with_surface(mut self, name: impl Into<String>, config: SurfaceBuildConfig) -> Self {
        self.surfaces.insert(name.into(), config);
        self
    }

    /// Looks up a curve configuration.
    ///
    /// # Errors
    ///
    /// `NotFound` if no curve has that name.
    pub fn curve(&self, name: &str) -> ConfigResult<&CurveBuildConfig> {
        self.curves.get(name).ok_or_else(|| ConfigError::not_found(name))
    }

    /// Looks up a surface configuration.
    ///
    /// # Errors
    ///
    /// `NotFound` if no surface has that name.
    pub fn surface(&self, name: &str) -> ConfigResult<&SurfaceBuildConfig> {
        self.surfaces.get(name).ok_or_else(|| ConfigError::not_found(name))
    }

    /// Typed bootstrap settings of the named curve.
    ///
    /// # Errors
    ///
    /// `NotFound`, or validation errors of that curve.
    pub fn bootstrap_config(&self, name: &str) -> ConfigResult<BootstrapConfig> {
        self.curve(name)?.to_bootstrap_config()
    }

    /// Typed calibration settings of the named surface.
    ///
    /// # Errors
    ///
    /// `NotFound`, or validation errors of that surface.
    pub fn calibration_config(&self, name: &str) -> ConfigResult<SabrCalibrationConfig> {
        self.surface(name)?.to_calibration_config()
    }
}

impl Validate for PricingStructureConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for (name, curve) in &self.curves {
            if name.is_empty() {
                errors.push(ValidationError::new("curves", "Name cannot be empty"));
            }
            let parent = format!("curves.{name}");
            errors.extend(curve.validate().into_iter().map(|e| e.nested(&parent)));
        }

        for (name, surface) in &self.surfaces {
            if name.is_empty() {
                errors.push(ValidationError::new("surfaces", "Name cannot be empty"));
            }
            let parent = format!("surfaces.{name}");
            errors.extend(surface.validate().into_iter().map(|e| e.nested(&parent)));
        }

        errors
    }
}
