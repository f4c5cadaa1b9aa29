//! End-to-end bootstrap scenarios.
//!
//! Each test builds a curve from market assets through the public API only and
//! checks the finished curve against hand-computed values.

use std::sync::Arc;

use approx::assert_relative_eq;
use proptest::prelude::*;

use curvekit_core::daycounts::DayCountConvention;
use curvekit_core::types::Compounding;
use curvekit_core::Date;
use curvekit_curves::prelude::*;
use curvekit_math::solvers::SolveBudget;
use curvekit_math::CancellationToken;

// =============================================================================
// HELPERS
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// 2025 and 2026 are not leap years, so ACT/365F times are whole years.
fn base() -> Date {
    Date::from_ymd(2025, 1, 1).unwrap()
}

fn years(n: i64) -> Date {
    base().add_days(365 * n)
}

fn deposit(id: &str, years_out: i64, rate: f64) -> Deposit {
    Deposit::new(id, base(), years(years_out), rate).with_day_count(DayCountConvention::Act365Fixed)
}

fn simple_zero_config() -> BootstrapConfig {
    BootstrapConfig::zero_curve(Compounding::Simple)
        .with_method(InterpolationMethod::Linear)
        .with_extrapolation(Extrapolation::Linear)
}

fn usd_discount_curve(config: BootstrapConfig) -> CurveResult<BootstrappedCurve> {
    let base = base();
    Bootstrapper::new(base)
        .with_config(config)
        .add_asset(Deposit::new("DEP-6M", base, base.add_days(182), 0.0430))
        .add_asset(Deposit::new("DEP-1Y", base, years(1), 0.0415))
        .add_asset(Swap::new("SWP-2Y", base, years(2), 0.0398))
        .add_asset(Swap::new("SWP-3Y", base, years(3), 0.0391))
        .add_asset(Swap::new("SWP-5Y", base, years(5), 0.0389))
        .bootstrap()
}

// =============================================================================
// MARKET SCENARIOS
// =============================================================================

#[test]
fn flat_deposits_give_flat_zero_curve() {
    init_tracing();
    let curve = Bootstrapper::new(base())
        .with_config(simple_zero_config())
        .add_asset(deposit("DEP-1Y", 1, 0.05))
        .add_asset(deposit("DEP-2Y", 2, 0.05))
        .bootstrap()
        .unwrap();

    for t in [0.5, 1.5, 2.5] {
        assert_relative_eq!(curve.space.value_at_time(t).unwrap(), 0.05, epsilon = 1e-8);
    }
    assert!(curve.is_valid());
}

#[test]
fn sloped_deposits_interpolate_and_extrapolate_linearly() {
    let curve = Bootstrapper::new(base())
        .with_config(simple_zero_config())
        .add_asset(deposit("DEP-1Y", 1, 0.05))
        .add_asset(deposit("DEP-2Y", 2, 0.075))
        .bootstrap()
        .unwrap();

    let space = &curve.space;
    assert_relative_eq!(space.value_at_time(1.5).unwrap(), 0.0625, epsilon = 1e-10);
    // The 1Y-2Y segment rises 2.5bp per 0.1y
    assert_relative_eq!(space.value_at_time(2.5).unwrap(), 0.0875, epsilon = 1e-10);
    assert_relative_eq!(space.value_at_time(3.0).unwrap(), 0.1, epsilon = 1e-10);
}

#[test]
fn duplicate_maturity_keeps_first_seen_asset() {
    init_tracing();
    let curve = Bootstrapper::new(base())
        .with_config(simple_zero_config())
        .add_asset(deposit("DEP-1Y", 1, 0.03))
        .add_asset(deposit("DEP-3Y-A", 3, 0.04))
        .add_asset(deposit("DEP-3Y-B", 3, 0.06))
        .bootstrap()
        .unwrap();

    assert_eq!(curve.term_curve().len(), 2);
    assert_relative_eq!(curve.term_curve().get(years(3)).unwrap(), 0.04, epsilon = 1e-12);

    assert_eq!(
        curve.excluded,
        vec![ExcludedAsset {
            id: "DEP-3Y-B".to_string(),
            maturity: years(3),
            reason: ExclusionReason::DuplicateMaturity {
                kept: "DEP-3Y-A".to_string(),
            },
        }]
    );
    // Only the kept asset is repriced
    assert_eq!(curve.repricing_report.checks().len(), 2);
    assert!(curve.is_valid());
}

#[test]
fn zero_conversion_fills_base_date_knot() {
    let curve = usd_discount_curve(BootstrapConfig::discount_curve()).unwrap();
    let dfs = curve.term_curve();
    assert_eq!(dfs.first().unwrap().date, base());

    let zeros = to_zero_curve(dfs, base(), Compounding::Continuous, DayCountConvention::Act365Fixed)
        .unwrap();
    let rates = zeros.values();

    assert!(rates[0].is_finite());
    assert_eq!(rates[0], rates[1]);
    assert_eq!(zeros.dates(), dfs.dates());
}

// =============================================================================
// CURVE PROPERTIES
// =============================================================================

#[test]
fn swap_curve_reprices_every_asset() {
    init_tracing();
    let curve = usd_discount_curve(BootstrapConfig::discount_curve()).unwrap();

    assert!(curve.is_valid(), "{}", curve.repricing_report);
    assert!(curve.repricing_report.max_error() < 1e-9);
    assert_eq!(curve.sweeps, 0);
    assert!(curve.excluded.is_empty());

    // Anchor plus one knot per asset
    let dfs = curve.term_curve().values();
    assert_eq!(dfs.len(), 6);
    assert_eq!(dfs[0], 1.0);
    assert!(dfs.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn knots_are_reproduced_exactly() {
    let curve = usd_discount_curve(BootstrapConfig::discount_curve()).unwrap();
    for point in curve.term_curve().points() {
        assert_eq!(curve.space.value(point.date).unwrap(), point.value);
    }
}

#[test]
fn bootstrap_is_idempotent() {
    let first = usd_discount_curve(BootstrapConfig::discount_curve()).unwrap();
    let second = usd_discount_curve(BootstrapConfig::discount_curve()).unwrap();

    assert_eq!(first.term_curve().dates(), second.term_curve().dates());
    for (a, b) in first.term_curve().values().iter().zip(second.term_curve().values()) {
        assert_relative_eq!(*a, b, epsilon = 1e-15);
    }
}

#[test]
fn spline_curve_settles_after_sweeps() {
    let config = BootstrapConfig::discount_curve()
        .with_method(InterpolationMethod::CubicSpline)
        .with_repricing_tolerance(tolerances::RELAXED);
    let curve = usd_discount_curve(config).unwrap();

    assert!(curve.sweeps >= 1);
    assert!(curve.is_valid(), "{}", curve.repricing_report);
}

#[test]
fn zero_curve_matches_discount_curve() {
    let dfs = usd_discount_curve(BootstrapConfig::discount_curve()).unwrap();
    let zeros = usd_discount_curve(BootstrapConfig::zero_curve(Compounding::Continuous)).unwrap();
    assert!(zeros.is_valid(), "{}", zeros.repricing_report);

    // Deposit knots depend only on their own quote
    for date in [base().add_days(182), years(1)] {
        assert_relative_eq!(
            dfs.space.discount_factor(date).unwrap(),
            zeros.space.discount_factor(date).unwrap(),
            epsilon = 1e-12
        );
    }
    // Coupon dates interpolate differently, so swap knots differ slightly
    // but each swap reprices on both curves
    for (n, quote) in [(2, 0.0398), (3, 0.0391), (5, 0.0389)] {
        let swap = Swap::new(format!("SWP-{n}Y"), base(), years(n), quote);
        assert_relative_eq!(swap.implied_quote(&dfs.space).unwrap(), quote, epsilon = 1e-9);
        assert_relative_eq!(swap.implied_quote(&zeros.space).unwrap(), quote, epsilon = 1e-9);
        assert_relative_eq!(
            dfs.space.discount_factor(years(n)).unwrap(),
            zeros.space.discount_factor(years(n)).unwrap(),
            epsilon = 1e-3
        );
    }
}

#[test]
fn swap_only_zero_curve_reprices_every_swap() {
    init_tracing();
    // Semi-annual coupons fall before the first knot, on the extrapolated front
    let curve = Bootstrapper::new(base())
        .with_config(BootstrapConfig::zero_curve(Compounding::Continuous))
        .add_asset(Swap::new("SWP-1Y", base(), years(1), 0.040))
        .add_asset(Swap::new("SWP-2Y", base(), years(2), 0.042))
        .add_asset(Swap::new("SWP-3Y", base(), years(3), 0.043))
        .bootstrap_validated_strict()
        .unwrap();

    assert!(curve.sweeps >= 1);
    assert!(curve.repricing_report.max_error() < 1e-9, "{}", curve.repricing_report);
}

#[test]
fn flat_front_zero_curve_needs_no_sweeps() {
    let curve = Bootstrapper::new(base())
        .with_config(BootstrapConfig::zero_curve(Compounding::Continuous).with_extrapolation(Extrapolation::Flat))
        .add_asset(Swap::new("SWP-1Y", base(), years(1), 0.040))
        .add_asset(Swap::new("SWP-2Y", base(), years(2), 0.042))
        .bootstrap()
        .unwrap();

    assert_eq!(curve.sweeps, 0);
    assert!(curve.is_valid(), "{}", curve.repricing_report);
}

#[test]
fn forward_curve_from_discount_curve() {
    let curve = usd_discount_curve(BootstrapConfig::discount_curve()).unwrap();
    let forwards = to_forward_curve(&curve.space, curvekit_core::types::Tenor::months(3)).unwrap();

    assert_eq!(forwards.len(), curve.term_curve().len());
    assert!(forwards.values().iter().all(|f| f.is_finite() && *f > 0.0));
}

#[test]
fn strict_bootstrap_rejects_tolerance_misses() {
    // A loose solver tolerance leaves the swaps visibly off their quotes
    let config = BootstrapConfig::discount_curve()
        .with_budget(SolveBudget::new(1e-3, 100))
        .with_repricing_tolerance(1e-14);

    match usd_discount_curve(config.clone()) {
        Ok(curve) => assert!(!curve.is_valid()),
        Err(err) => panic!("loose bootstrap failed: {err}"),
    }

    let strict = Bootstrapper::new(base())
        .with_config(config)
        .add_asset(Deposit::new("DEP-1Y", base(), years(1), 0.0415))
        .add_asset(Swap::new("SWP-2Y", base(), years(2), 0.0398))
        .bootstrap_validated_strict();
    assert!(matches!(strict, Err(CurveError::RepricingFailed { .. })));
}

// =============================================================================
// OTHER VALUE SPACES
// =============================================================================

#[test]
fn caplet_volatilities_recover_flat_vol() {
    let discount: Arc<dyn CurveView> =
        Arc::new(usd_discount_curve(BootstrapConfig::discount_curve()).unwrap().into_space());
    let flat_vol = InterpolatedSpace::new(
        TermCurve::new(
            CurveValueType::Volatility,
            [TermPoint::new(years(1), 0.2), TermPoint::new(years(3), 0.2)],
        ),
        base(),
        DayCountConvention::Act365Fixed,
        InterpolationMethod::Linear,
        Extrapolation::Flat,
    )
    .unwrap();

    let caps: Vec<CapFloor> = [1, 2, 3]
        .into_iter()
        .map(|n| {
            let quote = CapFloor::new(
                format!("CAP-{n}Y"),
                CapFloorKind::Cap,
                base(),
                years(n),
                0.04,
                0.0,
                Arc::clone(&discount),
            )
            .premium_on(&flat_vol)
            .unwrap();
            CapFloor::new(
                format!("CAP-{n}Y"),
                CapFloorKind::Cap,
                base(),
                years(n),
                0.04,
                quote,
                Arc::clone(&discount),
            )
        })
        .collect();

    let curve = Bootstrapper::new(base())
        .with_config(BootstrapConfig::caplet_volatility_curve())
        .add_assets(caps)
        .bootstrap()
        .unwrap();

    assert!(curve.is_valid(), "{}", curve.repricing_report);
    for vol in curve.term_curve().values() {
        assert_relative_eq!(vol, 0.2, epsilon = 1e-6);
    }
    assert!(matches!(
        curve.space.discount_factor(years(1)),
        Err(CurveError::IncompatibleValueType { .. })
    ));
}

#[test]
fn exchange_futures_copy_settlement_prices() {
    let curve = Bootstrapper::new(base())
        .with_config(BootstrapConfig::price_curve())
        .add_asset(ExchangeFuture::new("CL-Z25", years(1), 71.25))
        .add_asset(ExchangeFuture::new("CL-Z26", years(2), 69.80))
        .bootstrap()
        .unwrap();

    assert_eq!(curve.term_curve().values(), vec![71.25, 69.80]);
    assert_relative_eq!(curve.space.value_at_time(1.5).unwrap(), 70.525, epsilon = 1e-12);
    assert_relative_eq!(curve.space.value_at_time(4.0).unwrap(), 69.80, epsilon = 1e-12);
}

#[test]
fn spread_curve_sits_over_its_base() {
    init_tracing();
    let base_curve: Arc<dyn CurveView> =
        Arc::new(usd_discount_curve(BootstrapConfig::discount_curve()).unwrap().into_space());
    let spreads = [(182, 0.0020), (365, 0.0025), (730, 0.0031), (1095, 0.0034)];

    let curve = Bootstrapper::new(base())
        .with_config(BootstrapConfig::discount_curve())
        .add_assets(spreads.map(|(days, spread)| {
            RateSpread::new(format!("SPR-{days}D"), base_curve.clone(), base(), base().add_days(days), spread)
        }))
        .bootstrap_validated_strict()
        .unwrap();

    assert_eq!(curve.sweeps, 0);
    assert!(curve.repricing_report.max_error() < 1e-9, "{}", curve.repricing_report);
    for (days, spread) in spreads {
        let maturity = base().add_days(days);
        let tau = days as f64 / 360.0;
        let base_rate = base_curve.forward_rate(base(), maturity, DayCountConvention::Act360).unwrap();
        assert_relative_eq!(
            curve.space.discount_factor(maturity).unwrap(),
            1.0 / (1.0 + (base_rate + spread) * tau),
            epsilon = 1e-12
        );
        assert!(curve.space.discount_factor(maturity).unwrap() < base_curve.discount_factor(maturity).unwrap());
    }
}

#[test]
fn zero_spreads_reproduce_the_base_curve() {
    let base_curve: Arc<dyn CurveView> =
        Arc::new(usd_discount_curve(BootstrapConfig::discount_curve()).unwrap().into_space());
    let curve = Bootstrapper::new(base())
        .with_config(BootstrapConfig::discount_curve())
        .add_asset(RateSpread::new("SPR-1Y", base_curve.clone(), base(), years(1), 0.0))
        .add_asset(RateSpread::new("SPR-2Y", base_curve.clone(), base(), years(2), 0.0))
        .bootstrap()
        .unwrap();

    for date in [years(1), years(2)] {
        assert_relative_eq!(
            curve.space.discount_factor(date).unwrap(),
            base_curve.discount_factor(date).unwrap(),
            epsilon = 1e-12
        );
    }
}

#[test]
fn fx_forward_curve_runs_from_spot() {
    let spot = 1.0850;
    let curve = Bootstrapper::new(base())
        .with_config(BootstrapConfig::fx_forward_curve(spot))
        .add_asset(FxForward::new("EURUSD-TOD", base(), spot))
        .add_asset(FxForward::from_points("EURUSD-3M", base().add_days(90), spot, 21.0, 1e-4).unwrap())
        .add_asset(FxForward::from_points("EURUSD-6M", base().add_days(181), spot, 42.5, 1e-4).unwrap())
        .add_asset(FxForward::from_points("EURUSD-1Y", years(1), spot, 88.0, 1e-4).unwrap())
        .bootstrap_validated_strict()
        .unwrap();

    assert_eq!(curve.excluded.len(), 1);
    assert!(matches!(curve.excluded[0].reason, ExclusionReason::AnchorDate));
    assert_eq!(curve.term_curve().value_type(), CurveValueType::FxForward);
    assert_eq!(curve.space.value(base()).unwrap(), spot);
    assert_relative_eq!(curve.space.value(years(1)).unwrap(), 1.0938, epsilon = 1e-12);
    // Halfway between the 3M and 6M outrights
    assert_relative_eq!(
        curve.space.value_at_time(135.5 / 365.0).unwrap(),
        (1.0871 + 1.089_25) / 2.0,
        epsilon = 1e-12
    );
    assert!(curve.space.discount_factor(years(1)).is_err());
}

// =============================================================================
// FAILURES
// =============================================================================

#[test]
fn empty_input_is_rejected() {
    let result = Bootstrapper::new(base()).bootstrap();
    assert!(matches!(result, Err(CurveError::Input { .. })));
}

#[test]
fn asset_maturing_before_base_is_rejected() {
    let result = Bootstrapper::new(base())
        .add_asset(Deposit::new("OLD", base().add_days(-30), base().add_days(-10), 0.05))
        .bootstrap();
    assert!(matches!(result, Err(CurveError::Input { .. })));
}

#[test]
fn maturities_sharing_a_curve_time_are_rejected() {
    let saturday = Date::from_ymd(2025, 1, 4).unwrap();
    let sunday = Date::from_ymd(2025, 1, 5).unwrap();
    let result = Bootstrapper::new(base())
        .with_config(simple_zero_config().with_day_count(DayCountConvention::Business252))
        .add_asset(Deposit::new("DEP-SAT", base(), saturday, 0.05))
        .add_asset(Deposit::new("DEP-SUN", base(), sunday, 0.05))
        .add_asset(deposit("DEP-1Y", 1, 0.05))
        .bootstrap();

    match result {
        Err(CurveError::Input { reason }) => {
            assert!(reason.contains("DEP-SAT") && reason.contains("DEP-SUN"), "{reason}");
        }
        other => panic!("expected an input error, got {other:?}"),
    }
}

#[test]
fn single_knot_curve_is_rejected() {
    let result = Bootstrapper::new(base())
        .with_config(simple_zero_config())
        .add_asset(deposit("DEP-1Y", 1, 0.05))
        .bootstrap();
    assert!(matches!(
        result,
        Err(CurveError::InsufficientPoints { required: 2, got: 1 })
    ));
}

#[test]
fn cancelled_solve_names_the_asset() {
    let token = CancellationToken::new();
    token.cancel();
    let config = BootstrapConfig::discount_curve()
        .with_budget(SolveBudget::new(1e-12, 100).with_cancellation(token));

    match usd_discount_curve(config) {
        Err(CurveError::CalibrationFailure { instrument, .. }) => assert_eq!(instrument, "SWP-2Y"),
        other => panic!("expected a calibration failure, got {other:?}"),
    }
}

#[test]
fn many_curves_build_independently() {
    let good = Bootstrapper::new(base())
        .with_config(simple_zero_config())
        .add_asset(deposit("DEP-1Y", 1, 0.05))
        .add_asset(deposit("DEP-2Y", 2, 0.05));
    let empty = Bootstrapper::new(base());
    let sloped = Bootstrapper::new(base())
        .with_config(simple_zero_config())
        .add_asset(deposit("DEP-1Y", 1, 0.05))
        .add_asset(deposit("DEP-2Y", 2, 0.075));

    let results = bootstrap_many(&[good, empty, sloped]);

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    let sloped = results[2].as_ref().unwrap();
    assert_relative_eq!(sloped.space.value_at_time(1.5).unwrap(), 0.0625, epsilon = 1e-10);
}

#[test]
fn finished_curves_are_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BootstrappedCurve>();
    assert_send_sync::<Bootstrapper>();
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn deposit_curves_are_ordered_and_deduplicated(
        quotes in proptest::collection::vec((30i64..3650, 0.005f64..0.08), 2..20)
    ) {
        let mut unique: Vec<i64> = quotes.iter().map(|&(days, _)| days).collect();
        unique.sort_unstable();
        unique.dedup();
        prop_assume!(unique.len() >= 2);

        let assets = quotes.iter().enumerate().map(|(i, &(days, rate))| {
            Deposit::new(format!("DEP-{i}"), base(), base().add_days(days), rate)
                .with_day_count(DayCountConvention::Act365Fixed)
        });
        let curve = Bootstrapper::new(base())
            .with_config(simple_zero_config())
            .add_assets(assets)
            .bootstrap()
            .unwrap();

        let dates = curve.term_curve().dates();
        prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(dates.len(), unique.len());
        prop_assert_eq!(curve.excluded.len(), quotes.len() - unique.len());
        prop_assert!(curve.repricing_report.max_error() < 1e-9);
    }
}
