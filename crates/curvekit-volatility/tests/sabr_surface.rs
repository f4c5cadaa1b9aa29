//! End-to-end checks: option quotes to grid to SABR surface.

use approx::assert_relative_eq;
use curvekit_core::Date;
use curvekit_curves::black::{black_price, OptionKind};
use curvekit_math::optimization::OptimizerKind;
use curvekit_math::solvers::SolveBudget;
use curvekit_math::CancellationToken;
use curvekit_volatility::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn base() -> Date {
    Date::from_ymd(2025, 1, 1).unwrap()
}

const FORWARD: f64 = 0.04;
const STRIKES: [f64; 7] = [0.02, 0.03, 0.035, 0.04, 0.045, 0.05, 0.06];

fn truth_1y() -> SabrParameters {
    SabrParameters::new(0.035, 0.5, -0.25, 0.5).unwrap()
}

fn truth_2y() -> SabrParameters {
    SabrParameters::new(0.032, 0.5, -0.35, 0.4).unwrap()
}

fn slice_options(params: SabrParameters, days: i64, strikes: &[f64]) -> Vec<OptionAsset> {
    let t = days as f64 / 365.0;
    strikes
        .iter()
        .map(|&k| {
            let vol = params.hagan_volatility(FORWARD, k, t);
            OptionAsset::from_volatility(format!("{days}D-{k}"), base().add_days(days), k, FORWARD, vol)
        })
        .collect()
}

fn two_expiry_grid() -> VolatilityGrid {
    VolatilitySurfaceBootstrapper::new(base())
        .add_options(slice_options(truth_1y(), 365, &STRIKES))
        .add_options(slice_options(truth_2y(), 730, &STRIKES))
        .bootstrap()
        .unwrap()
}

// ============================================================================
// Recovery
// ============================================================================

#[test]
fn sabr_surface_reprices_generating_smiles() {
    init_tracing();
    let surface = SabrCalibrator::default().calibrate(&two_expiry_grid()).unwrap();

    assert_eq!(surface.calibrated_expiries().len(), 2);
    for (days, truth) in [(365, truth_1y()), (730, truth_2y())] {
        let t = days as f64 / 365.0;
        for k in STRIKES {
            let market = truth.hagan_volatility(FORWARD, k, t);
            let model = surface.value(base().add_days(days), k).unwrap();
            assert_relative_eq!(model, market, epsilon = 1e-6);
        }
    }
    for report in surface.reports() {
        let fit = report.fit().unwrap();
        assert!(fit.rms_error < 1e-6);
        assert_eq!(fit.params.beta, 0.5);
    }
}

#[test]
fn surface_interpolates_between_expiries() {
    let surface = SabrCalibrator::default().calibrate(&two_expiry_grid()).unwrap();
    let v1 = surface.value(base().add_days(365), 0.045).unwrap();
    let v2 = surface.value(base().add_days(730), 0.045).unwrap();
    let mid = surface.value_at(1.5, 0.045).unwrap();
    assert_relative_eq!(mid, 0.5 * (v1 + v2), epsilon = 1e-12);

    // Off-grid strikes come from the smile, not the flat grid rows
    let wing = surface.value(base().add_days(365), 0.01).unwrap();
    let grid_wing = two_expiry_grid().value(base().add_days(365), 0.01).unwrap();
    assert!(wing > grid_wing);
}

#[test]
fn nelder_mead_fits_the_same_smile() {
    let config = SabrCalibrationConfig::default()
        .with_optimizer(OptimizerKind::NelderMead)
        .with_budget(SolveBudget::new(1e-14, 5000));
    let grid = two_expiry_grid();
    let fit = SabrCalibrator::new(config).calibrate_slice(&grid.slices()[0]).unwrap();
    assert!(fit.rms_error < 1e-5);
}

#[test]
fn premium_quotes_calibrate_like_volatilities() {
    let mut options = Vec::new();
    for k in STRIKES {
        let vol = truth_1y().hagan_volatility(FORWARD, k, 1.0);
        let kind = if k < FORWARD { OptionKind::Put } else { OptionKind::Call };
        let df = 0.96;
        let premium = df * black_price(kind, FORWARD, k, vol, 1.0);
        options.push(OptionAsset::from_premium(format!("P{k}"), base().add_days(365), k, FORWARD, kind, premium, df));
    }
    let grid = VolatilitySurfaceBootstrapper::new(base())
        .with_budget(SolveBudget::new(1e-15, 100))
        .add_options(options)
        .bootstrap()
        .unwrap();

    let fit = SabrCalibrator::default().calibrate_slice(&grid.slices()[0]).unwrap();
    assert_relative_eq!(fit.params.rho, truth_1y().rho, epsilon = 1e-3);
    assert_relative_eq!(fit.params.nu, truth_1y().nu, epsilon = 1e-3);
}

// ============================================================================
// Failure isolation
// ============================================================================

#[test]
fn failed_slice_does_not_invalidate_others() {
    init_tracing();
    let grid = VolatilitySurfaceBootstrapper::new(base())
        .add_options(slice_options(truth_1y(), 365, &STRIKES))
        .add_options(slice_options(truth_2y(), 730, &[0.03, 0.05]))
        .bootstrap()
        .unwrap();

    let surface = SabrCalibrator::default().calibrate(&grid).unwrap();

    assert_eq!(surface.reports().len(), 2);
    assert!(surface.reports()[0].is_calibrated());
    assert!(matches!(
        surface.reports()[1].outcome,
        SliceOutcome::Failed(VolatilityError::SliceCalibration { .. })
    ));
    assert_eq!(surface.calibrated_expiries(), vec![base().add_days(365)]);
    assert!(surface.smile(base().add_days(730)).is_none());

    // Only the 1y smile remains, so the surface is flat in expiry
    let one_year = surface.value(base().add_days(365), 0.045).unwrap();
    assert_eq!(surface.value(base().add_days(730), 0.045).unwrap(), one_year);
}

#[test]
fn no_calibrated_slice_is_an_error() {
    let grid = VolatilitySurfaceBootstrapper::new(base())
        .add_options(slice_options(truth_1y(), 365, &[0.03, 0.05]))
        .add_options(slice_options(truth_2y(), 730, &[0.03, 0.05]))
        .bootstrap()
        .unwrap();

    let result = SabrCalibrator::default().calibrate(&grid);
    assert!(matches!(result, Err(VolatilityError::NoCalibratedSlices { attempted: 2 })));
}

#[test]
fn cancelled_calibration_fails_every_slice() {
    let token = CancellationToken::new();
    token.cancel();
    let config = SabrCalibrationConfig::default().with_budget(SolveBudget::new(1e-14, 500).with_cancellation(token));

    let result = SabrCalibrator::new(config).calibrate(&two_expiry_grid());
    assert!(matches!(result, Err(VolatilityError::NoCalibratedSlices { .. })));
}

#[test]
fn invalid_beta_rejected_before_fitting() {
    let config = SabrCalibrationConfig::default().with_beta(-0.1);
    let result = SabrCalibrator::new(config).calibrate(&two_expiry_grid());
    assert!(matches!(result, Err(VolatilityError::InvalidParameters { .. })));
}

// ============================================================================
// Grid
// ============================================================================

#[test]
fn duplicate_expiry_and_strike_first_seen_wins() {
    let expiry = base().add_days(365);
    let grid = VolatilitySurfaceBootstrapper::new(base())
        .add_option(OptionAsset::from_volatility("A", expiry, 0.04, FORWARD, 0.20))
        .add_option(OptionAsset::from_volatility("B", expiry, 0.04, 0.05, 0.30))
        .add_option(OptionAsset::from_volatility("C", expiry, 0.05, FORWARD, 0.22))
        .bootstrap()
        .unwrap();

    assert_eq!(grid.slices()[0].volatilities(), &[0.20, 0.22]);
    assert_eq!(grid.slices()[0].forward(), FORWARD);
    assert_eq!(grid.excluded().len(), 1);
    assert_eq!(grid.excluded()[0].kept, "A");
}

#[test]
fn outputs_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<VolatilityGrid>();
    assert_send_sync::<VolatilitySurface>();
    assert_send_sync::<VolatilityCurve>();
}
