//! Curve bootstrapping from priceable assets.
//!
//! The [`Bootstrapper`] turns an unordered set of assets into a
//! self-consistent curve:
//!
//! 1. Deduplicate by maturity; the first asset seen for a date wins and the
//!    rest are logged and listed in [`BootstrappedCurve::excluded`].
//! 2. Walk the assets in maturity order, solving one knot per asset: direct
//!    quotes are copied, closed forms are applied once the asset's start is
//!    covered, everything else goes to the configured root finder.
//! 3. Sweep over all knots again until they settle when a knot depends on
//!    later ones: under non-local interpolation, or when an unanchored
//!    curve extrapolates its front linearly and some asset reads it there.
//! 4. Wrap the knots in an [`InterpolatedSpace`] and reprice every asset.
//!
//! Any failure aborts the build; no partial curve is returned.
//!
//! # Example
//!
//! ```rust
//! use curvekit_core::daycounts::DayCountConvention;
//! use curvekit_core::Date;
//! use curvekit_curves::prelude::*;
//!
//! let base = Date::from_ymd(2025, 1, 2).unwrap();
//! let curve = Bootstrapper::new(base)
//!     .add_asset(Deposit::new("DEP-6M", base, base.add_days(182), 0.045))
//!     .add_asset(Deposit::new("DEP-1Y", base, base.add_days(365), 0.046))
//!     .add_asset(Swap::new("SWP-2Y", base, base.add_days(730), 0.044))
//!     .bootstrap()
//!     .unwrap();
//!
//! assert!(curve.is_valid());
//! let df = curve.space.discount_factor(base.add_days(500)).unwrap();
//! assert!(df < 1.0);
//! ```

mod config;
mod trial;

pub use config::BootstrapConfig;

use std::time::{Duration, Instant};

use curvekit_core::collections::InsertIfAbsentMap;
use curvekit_core::Date;
use curvekit_math::interpolation::Extrapolation;
use curvekit_math::solvers::Solver;
use rayon::prelude::*;

use crate::assets::{PriceableAsset, SolveStrategy};
use crate::error::{CurveError, CurveResult};
use crate::repricing::{RepricingCheck, RepricingReport};
use crate::space::InterpolatedSpace;
use crate::term_curve::{TermCurve, TermPoint};
use trial::TrialCurve;

/// Why an asset did not contribute a knot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    /// An earlier asset already occupies the maturity.
    DuplicateMaturity {
        /// Id of the asset that was kept.
        kept: String,
    },
    /// The asset matures on the base date, where the anchor sits.
    AnchorDate,
}

/// An asset dropped before solving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedAsset {
    /// Asset identifier.
    pub id: String,
    /// Its maturity.
    pub maturity: Date,
    /// Why it was dropped.
    pub reason: ExclusionReason,
}

/// A finished curve with its audit trail.
#[derive(Debug, Clone)]
pub struct BootstrappedCurve {
    /// The queryable curve.
    pub space: InterpolatedSpace,
    /// Assets that did not contribute a knot.
    pub excluded: Vec<ExcludedAsset>,
    /// Repricing of every contributing asset.
    pub repricing_report: RepricingReport,
    /// Full sweeps run after the sequential pass.
    pub sweeps: u32,
    /// Wall-clock build time.
    pub build_duration: Duration,
}

impl BootstrappedCurve {
    /// The solved knots.
    #[must_use]
    pub fn term_curve(&self) -> &TermCurve {
        self.space.term_curve()
    }

    /// Returns true if every asset repriced within tolerance.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.repricing_report.is_valid()
    }

    /// Consumes the result, returning the curve.
    #[must_use]
    pub fn into_space(self) -> InterpolatedSpace {
        self.space
    }
}

/// Builds one curve from a set of priceable assets.
#[derive(Debug)]
pub struct Bootstrapper {
    base_date: Date,
    config: BootstrapConfig,
    assets: Vec<Box<dyn PriceableAsset>>,
}

impl Bootstrapper {
    /// Creates a bootstrapper for a discount curve on `base_date`.
    #[must_use]
    pub fn new(base_date: Date) -> Self {
        Self {
            base_date,
            config: BootstrapConfig::default(),
            assets: Vec::new(),
        }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: BootstrapConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds an asset.
    #[must_use]
    pub fn add_asset<A: PriceableAsset + 'static>(mut self, asset: A) -> Self {
        self.assets.push(Box::new(asset));
        self
    }

    /// Adds several assets, keeping their order.
    #[must_use]
    pub fn add_assets<A: PriceableAsset + 'static>(mut self, assets: impl IntoIterator<Item = A>) -> Self {
        for asset in assets {
            self.assets.push(Box::new(asset));
        }
        self
    }

    /// Adds an already boxed asset.
    #[must_use]
    pub fn add_boxed(mut self, asset: Box<dyn PriceableAsset>) -> Self {
        self.assets.push(asset);
        self
    }

    /// The curve's base date.
    #[must_use]
    pub fn base_date(&self) -> Date {
        self.base_date
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Builds the curve.
    ///
    /// The result carries a repricing report but is returned even when some
    /// asset misses tolerance; see
    /// [`bootstrap_validated_strict`](Self::bootstrap_validated_strict).
    ///
    /// # Errors
    ///
    /// - `Input` for an invalid configuration, no assets, an asset maturing
    ///   before the base date, or two maturities at the same curve time
    /// - `CalibrationFailure` naming the asset whose knot could not be solved
    /// - `InsufficientPoints` if fewer than two knots result
    pub fn bootstrap(&self) -> CurveResult<BootstrappedCurve> {
        let started = Instant::now();
        self.config.validate()?;
        if self.assets.is_empty() {
            return Err(CurveError::input("no assets supplied to bootstrap"));
        }

        let (assets, excluded) = self.select_assets()?;
        if assets.is_empty() {
            return Err(CurveError::input("every asset was excluded before solving"));
        }

        let mut knots: Vec<(Date, f64)> = self
            .config
            .anchor
            .map(|value| (self.base_date, value))
            .into_iter()
            .collect();
        let offset = knots.len();

        for &(maturity, asset) in &assets {
            let value = self.solve_sequential(asset, maturity, &knots)?;
            tracing::debug!(
                instrument_id = asset.id(),
                maturity = %maturity,
                value,
                "Solved knot"
            );
            knots.push((maturity, value));
        }

        let sweeps = if self.needs_sweeps(&assets) {
            self.sweep(&assets, &mut knots, offset)?
        } else {
            0
        };

        let term_curve = TermCurve::new(
            self.config.value_type,
            knots.iter().map(|&(date, value)| TermPoint::new(date, value)),
        );
        let space = InterpolatedSpace::new(
            term_curve,
            self.base_date,
            self.config.day_count,
            self.config.method,
            self.config.extrapolation,
        )?;

        let checks = assets
            .iter()
            .map(|&(_, asset)| RepricingCheck::from_asset(asset, &space, self.config.repricing_tolerance))
            .collect::<CurveResult<Vec<_>>>()?;
        let repricing_report = RepricingReport::new(checks);
        let build_duration = started.elapsed();

        tracing::info!(
            value_type = %self.config.value_type,
            knots = space.term_curve().len(),
            excluded = excluded.len(),
            sweeps,
            max_error = repricing_report.max_error(),
            elapsed_us = build_duration.as_micros() as u64,
            "Curve bootstrapped"
        );

        Ok(BootstrappedCurve {
            space,
            excluded,
            repricing_report,
            sweeps,
            build_duration,
        })
    }

    /// Builds the curve and fails unless every asset reprices within
    /// tolerance.
    ///
    /// # Errors
    ///
    /// Everything [`bootstrap`](Self::bootstrap) returns, plus
    /// `RepricingFailed` listing the assets out of tolerance.
    pub fn bootstrap_validated_strict(&self) -> CurveResult<BootstrappedCurve> {
        let result = self.bootstrap()?;
        let report = &result.repricing_report;
        if !report.is_valid() {
            return Err(CurveError::repricing_failed(
                report.failed_count(),
                report.max_error(),
                report.failed_instruments().into_iter().map(String::from).collect(),
            ));
        }
        Ok(result)
    }

    /// Dedups by maturity (first seen wins) and orders by maturity.
    #[allow(clippy::type_complexity)]
    fn select_assets(&self) -> CurveResult<(Vec<(Date, &dyn PriceableAsset)>, Vec<ExcludedAsset>)> {
        let mut selected: InsertIfAbsentMap<Date, &dyn PriceableAsset> = InsertIfAbsentMap::new();
        let mut excluded = Vec::new();

        for asset in &self.assets {
            let maturity = asset.maturity();
            if maturity < self.base_date {
                return Err(CurveError::input(format!(
                    "{} matures on {maturity}, before the base date {}",
                    asset.id(),
                    self.base_date
                )));
            }
            if maturity == self.base_date && self.config.anchor.is_some() {
                tracing::warn!(
                    instrument_id = asset.id(),
                    maturity = %maturity,
                    "Dropping asset maturing on the anchor date"
                );
                excluded.push(ExcludedAsset {
                    id: asset.id().to_string(),
                    maturity,
                    reason: ExclusionReason::AnchorDate,
                });
                continue;
            }
            if let Err(rejected) = selected.insert(maturity, asset.as_ref()) {
                let kept = selected
                    .get(&maturity)
                    .map(|a| a.id().to_string())
                    .unwrap_or_default();
                tracing::warn!(
                    instrument_id = rejected.id(),
                    kept_id = %kept,
                    maturity = %maturity,
                    "Dropping asset with duplicate maturity"
                );
                excluded.push(ExcludedAsset {
                    id: rejected.id().to_string(),
                    maturity,
                    reason: ExclusionReason::DuplicateMaturity { kept },
                });
            }
        }

        let selected = selected.into_vec();
        for pair in selected.windows(2) {
            let (earlier, first) = pair[0];
            let (later, second) = pair[1];
            let day_count = self.config.day_count;
            if day_count.year_fraction_f64(self.base_date, later) <= day_count.year_fraction_f64(self.base_date, earlier)
            {
                return Err(CurveError::input(format!(
                    "{} ({earlier}) and {} ({later}) fall at the same time under {day_count}",
                    first.id(),
                    second.id()
                )));
            }
        }

        Ok((selected, excluded))
    }

    /// Returns true if a sequentially solved knot can move once later knots
    /// exist.
    ///
    /// A lone knot is flat while it is solved; with linear front
    /// extrapolation the finished curve re-slopes the stretch before the
    /// first knot, so assets reading that stretch must be re-solved.
    fn needs_sweeps(&self, assets: &[(Date, &dyn PriceableAsset)]) -> bool {
        if !self.config.method.is_local() {
            return true;
        }
        if self.config.anchor.is_some() || self.config.extrapolation != Extrapolation::Linear {
            return false;
        }
        let Some(&(first_knot, _)) = assets.first() else {
            return false;
        };
        assets.iter().any(|&(_, asset)| {
            asset.solve_strategy() != SolveStrategy::DirectQuote
                && asset
                    .earliest_curve_date(self.base_date)
                    .is_some_and(|date| date < first_knot)
        })
    }

    /// Solves the knot at `maturity` given the knots before it.
    fn solve_sequential(
        &self,
        asset: &dyn PriceableAsset,
        maturity: Date,
        knots: &[(Date, f64)],
    ) -> CurveResult<f64> {
        match asset.solve_strategy() {
            SolveStrategy::DirectQuote => return Ok(asset.market_quote()),
            SolveStrategy::ClosedForm => {
                let solved = TrialCurve::new(&self.config, self.base_date, knots)?;
                if let Some(value) = asset.closed_form_value(&solved) {
                    let value = value.map_err(|e| CurveError::calibration_failed(asset.id(), e.to_string()))?;
                    if !value.is_finite() {
                        return Err(CurveError::calibration_failed(
                            asset.id(),
                            format!("closed form gave {value}"),
                        ));
                    }
                    return Ok(value);
                }
            }
            SolveStrategy::Iterative => {}
        }

        let t = self.config.day_count.year_fraction_f64(self.base_date, maturity);
        let solved = if self.config.anchor.is_some() { &knots[1..] } else { knots };
        let previous = solved.last().map(|&(_, value)| value);
        let mut trial = knots.to_vec();
        trial.push((maturity, self.config.initial_guess(t, previous)));
        let index = trial.len() - 1;
        self.solve_iterative(asset, &trial, index)
    }

    /// Root-searches knot `index` of `knots` with every other knot fixed.
    fn solve_iterative(&self, asset: &dyn PriceableAsset, knots: &[(Date, f64)], index: usize) -> CurveResult<f64> {
        let target = asset.market_quote();
        let objective = |x: f64| {
            let mut trial = knots.to_vec();
            trial[index].1 = x;
            TrialCurve::new(&self.config, self.base_date, &trial)
                .and_then(|curve| asset.implied_quote(&curve))
                .map_or(f64::NAN, |quote| quote - target)
        };

        let result = self
            .config
            .solver
            .solve(
                objective,
                None::<fn(f64) -> f64>,
                knots[index].1,
                self.config.solve_bounds(),
                &self.config.budget,
            )
            .map_err(|e| CurveError::calibration_failed(asset.id(), e.to_string()))?;

        if !result.root.is_finite() || !result.residual.is_finite() {
            return Err(CurveError::calibration_failed(
                asset.id(),
                format!("solver returned {} with residual {}", result.root, result.residual),
            ));
        }
        Ok(result.root)
    }

    /// Re-solves every knot against the full curve until the largest change
    /// is within the sweep tolerance. Returns the number of sweeps run.
    fn sweep(
        &self,
        assets: &[(Date, &dyn PriceableAsset)],
        knots: &mut [(Date, f64)],
        offset: usize,
    ) -> CurveResult<u32> {
        for sweep in 1..=self.config.max_sweeps {
            let mut max_change = 0.0_f64;
            for (i, &(_, asset)) in assets.iter().enumerate() {
                if asset.solve_strategy() == SolveStrategy::DirectQuote {
                    continue;
                }
                let index = offset + i;
                let value = self.solve_iterative(asset, knots, index)?;
                max_change = max_change.max((value - knots[index].1).abs());
                knots[index].1 = value;
            }
            tracing::debug!(sweep, max_change, "Completed bootstrap sweep");
            if max_change <= self.config.sweep_tolerance {
                return Ok(sweep);
            }
        }
        Err(CurveError::calibration_failed(
            "curve",
            format!(
                "knots did not settle within {} sweeps of {} interpolation",
                self.config.max_sweeps, self.config.method
            ),
        ))
    }
}

/// Builds independent curves in parallel on the rayon pool.
///
/// Results are returned in input order; one failing build does not affect
/// the others.
#[must_use]
pub fn bootstrap_many(bootstrappers: &[Bootstrapper]) -> Vec<CurveResult<BootstrappedCurve>> {
    bootstrappers.par_iter().map(Bootstrapper::bootstrap).collect()
}
