//! Loading documents and driving builds from them.

use std::path::PathBuf;

use approx::assert_relative_eq;
use curvekit_config::prelude::*;
use curvekit_core::daycounts::DayCountConvention;
use curvekit_core::Date;
use curvekit_curves::assets::Deposit;
use curvekit_curves::{Bootstrapper, CurveView};
use curvekit_math::interpolation::{Extrapolation, InterpolationMethod};
use curvekit_math::optimization::OptimizerKind;
use curvekit_volatility::{OptionAsset, SabrCalibrator, SabrParameters};
use proptest::prelude::*;

const DOCUMENT: &str = r#"
[curves."USD.ZERO"]
description = "Simple zero rates"
kind = "Zero"
compounding = "Simple"
extrapolation = "Linear"

[curves."USD.ZERO".solver]
root_solver = "Brent"
tolerance = 1e-12
max_iterations = 200

[surfaces."USD.SWAPTION"]
beta = 0.5
optimizer = "LevenbergMarquardt"
expiry_interpolation = "Linear"
extrapolation = "Flat"

[surfaces."USD.SWAPTION".calibration]
tolerance = 1e-16
max_iterations = 500
time_budget_ms = 5000
"#;

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("curvekit-config-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn toml_document_loads_with_defaults_filled() {
    let doc = PricingStructureConfig::from_toml_str(DOCUMENT).unwrap();

    let curve = doc.curve("USD.ZERO").unwrap();
    assert_eq!(curve.kind, CurveKind::Zero);
    assert_eq!(curve.day_count, DayCountConvention::Act365Fixed);
    assert_eq!(curve.solver.max_iterations, 200);
    assert_eq!(curve.effective_interpolation(), InterpolationMethod::Linear);

    let surface = doc.surface("USD.SWAPTION").unwrap();
    assert_eq!(surface.calibration.time_budget_ms, Some(5000));
    assert_eq!(surface.premium_solver, SolverSettings::default());
}

#[test]
fn json_and_toml_agree() {
    let from_toml = PricingStructureConfig::from_toml_str(DOCUMENT).unwrap();
    let json = from_toml.to_json_string().unwrap();
    let from_json = PricingStructureConfig::from_json_str(&json).unwrap();
    assert_eq!(from_json, from_toml);
}

#[test]
fn files_load_by_extension() {
    let toml_path = scratch_file("doc.toml", DOCUMENT);
    let json_text = PricingStructureConfig::standard().to_json_string().unwrap();
    let json_path = scratch_file("doc.json", &json_text);

    let from_toml = PricingStructureConfig::from_path(&toml_path).unwrap();
    let from_json = PricingStructureConfig::from_path(&json_path).unwrap();

    assert!(from_toml.curves.contains_key("USD.ZERO"));
    assert_eq!(from_json, PricingStructureConfig::standard());

    let _ = std::fs::remove_file(toml_path);
    let _ = std::fs::remove_file(json_path);
}

#[test]
fn missing_file_is_io_error() {
    let path = std::env::temp_dir().join("curvekit-config-does-not-exist.toml");
    let err = PricingStructureConfig::from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn several_problems_reported_together() {
    let err = PricingStructureConfig::from_toml_str(
        r#"
        [surfaces.BAD]
        beta = 2.0

        [surfaces.BAD.calibration]
        max_iterations = 0
        "#,
    )
    .unwrap_err();

    match err {
        ConfigError::MultipleValidationErrors(errors) => {
            let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
            assert_eq!(fields, vec!["surfaces.BAD.beta", "surfaces.BAD.calibration.max_iterations"]);
        }
        other => panic!("expected several validation errors, got {other:?}"),
    }
}

// ============================================================================
// Driving builds
// ============================================================================

#[test]
fn configured_zero_curve_bootstraps() {
    let doc = PricingStructureConfig::from_toml_str(DOCUMENT).unwrap();
    let config = doc.bootstrap_config("USD.ZERO").unwrap();
    assert_eq!(config.extrapolation, Extrapolation::Linear);

    let base = Date::from_ymd(2025, 1, 1).unwrap();
    let built = Bootstrapper::new(base)
        .with_config(config)
        .add_asset(Deposit::new("DEP-1Y", base, base.add_days(365), 0.05).with_day_count(DayCountConvention::Act365Fixed))
        .add_asset(Deposit::new("DEP-2Y", base, base.add_days(730), 0.05).with_day_count(DayCountConvention::Act365Fixed))
        .bootstrap()
        .unwrap();

    assert_relative_eq!(built.space.value(base.add_days(547)).unwrap(), 0.05, epsilon = 1e-8);
}

#[test]
fn configured_surface_calibrates() {
    let doc = PricingStructureConfig::from_toml_str(DOCUMENT).unwrap();
    let surface_config = doc.surface("USD.SWAPTION").unwrap();
    let base = Date::from_ymd(2025, 1, 1).unwrap();

    let truth = SabrParameters::new(0.035, 0.5, -0.25, 0.5).unwrap();
    let options = [0.02, 0.03, 0.04, 0.05, 0.06].map(|k| {
        let vol = truth.hagan_volatility(0.04, k, 1.0);
        OptionAsset::from_volatility(format!("K{k}"), base.add_days(365), k, 0.04, vol)
    });
    let grid = surface_config
        .grid_bootstrapper(base)
        .unwrap()
        .add_options(options)
        .bootstrap()
        .unwrap();

    let calibration = doc.calibration_config("USD.SWAPTION").unwrap();
    assert_eq!(calibration.optimizer, OptimizerKind::LevenbergMarquardt);
    let surface = SabrCalibrator::new(calibration).calibrate(&grid).unwrap();

    assert_relative_eq!(
        surface.value(base.add_days(365), 0.03).unwrap(),
        truth.hagan_volatility(0.04, 0.03, 1.0),
        epsilon = 1e-6
    );
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn solver_settings_validity_matches_budget_checks(
        exponent in -19i32..=-5,
        max_iterations in 1u32..=10_000,
    ) {
        let settings = SolverSettings::new(10f64.powi(exponent), max_iterations);
        prop_assert!(settings.is_valid());

        let config = CurveBuildConfig::new(CurveKind::Discount).with_solver(settings);
        let bootstrap = config.to_bootstrap_config().unwrap();
        prop_assert!(bootstrap.validate().is_ok());
        prop_assert_eq!(bootstrap.budget.max_iterations, max_iterations);
    }
}
