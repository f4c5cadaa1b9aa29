//! At-the-money style volatility term structures.

use curvekit_core::collections::InsertIfAbsentMap;
use curvekit_core::daycounts::DayCountConvention;
use curvekit_core::Date;
use curvekit_curves::bootstrap::{ExcludedAsset, ExclusionReason};
use curvekit_curves::{CurveValueType, CurveView, InterpolatedSpace, TermCurve, TermPoint};
use curvekit_math::interpolation::{Extrapolation, InterpolationMethod};
use curvekit_math::solvers::SolveBudget;

use crate::error::{VolatilityError, VolatilityResult};
use crate::option::OptionAsset;

/// A volatility curve with the options that did not contribute to it.
#[derive(Debug, Clone)]
pub struct VolatilityCurve {
    /// The queryable curve, in [`CurveValueType::Volatility`].
    pub space: InterpolatedSpace,
    /// Options dropped because an earlier option shares their expiry.
    pub excluded: Vec<ExcludedAsset>,
}

impl VolatilityCurve {
    /// Volatility at `date`.
    ///
    /// # Errors
    ///
    /// `Curve(OutOfRange)` beyond the knots when extrapolation is disabled.
    pub fn volatility(&self, date: Date) -> VolatilityResult<f64> {
        Ok(self.space.value(date)?)
    }

    /// The expiry-ordered knots.
    #[must_use]
    pub fn term_curve(&self) -> &TermCurve {
        self.space.term_curve()
    }
}

/// Fails if two ascending `expiries` fall at the same time under `day_count`.
///
/// Business/252 maps a weekend expiry onto the preceding Friday's time.
pub(crate) fn ensure_distinct_times(
    base_date: Date,
    day_count: DayCountConvention,
    expiries: impl IntoIterator<Item = Date>,
) -> VolatilityResult<()> {
    let mut previous: Option<(Date, f64)> = None;
    for expiry in expiries {
        let t = day_count.year_fraction_f64(base_date, expiry);
        if let Some((earlier, t_earlier)) = previous {
            if t <= t_earlier {
                return Err(VolatilityError::input(format!(
                    "expiries {earlier} and {expiry} both fall at t = {t} under {day_count}"
                )));
            }
        }
        previous = Some((expiry, t));
    }
    Ok(())
}

/// Builds an expiry to volatility curve from one option per expiry.
///
/// Options are keyed by expiry; the first option seen for an expiry wins and
/// later ones are logged and listed in [`VolatilityCurve::excluded`].
///
/// # Example
///
/// ```rust
/// use curvekit_core::Date;
/// use curvekit_volatility::{OptionAsset, VolatilityCurveBootstrapper};
///
/// let base = Date::from_ymd(2025, 1, 2).unwrap();
/// let curve = VolatilityCurveBootstrapper::new(base)
///     .add_option(OptionAsset::from_volatility("6M", base.add_days(182), 100.0, 100.0, 0.22))
///     .add_option(OptionAsset::from_volatility("1Y", base.add_days(365), 100.0, 100.0, 0.20))
///     .bootstrap()
///     .unwrap();
///
/// assert_eq!(curve.term_curve().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct VolatilityCurveBootstrapper {
    base_date: Date,
    day_count: DayCountConvention,
    method: InterpolationMethod,
    extrapolation: Extrapolation,
    budget: SolveBudget,
    options: Vec<OptionAsset>,
}

impl VolatilityCurveBootstrapper {
    /// Creates a linear, flat-extrapolated ACT/365F bootstrapper.
    #[must_use]
    pub fn new(base_date: Date) -> Self {
        Self {
            base_date,
            day_count: DayCountConvention::Act365Fixed,
            method: InterpolationMethod::Linear,
            extrapolation: Extrapolation::Flat,
            budget: SolveBudget::new(1e-12, 100),
            options: Vec::new(),
        }
    }

    /// Sets the day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Sets the interpolation method along expiry.
    #[must_use]
    pub fn with_method(mut self, method: InterpolationMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the extrapolation policy.
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Sets the budget for premium inversion.
    #[must_use]
    pub fn with_budget(mut self, budget: SolveBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Adds an option.
    #[must_use]
    pub fn add_option(mut self, option: OptionAsset) -> Self {
        self.options.push(option);
        self
    }

    /// Adds several options, keeping their order.
    #[must_use]
    pub fn add_options(mut self, options: impl IntoIterator<Item = OptionAsset>) -> Self {
        self.options.extend(options);
        self
    }

    /// Builds the curve.
    ///
    /// # Errors
    ///
    /// `Input` without options or for an option expiring on or before the
    /// base date or for two expiries at the same time under the day count,
    /// the option's own error if its quote cannot be turned into a
    /// volatility, and `Curve(InsufficientPoints)` with fewer than two
    /// distinct expiries.
    pub fn bootstrap(&self) -> VolatilityResult<VolatilityCurve> {
        if self.options.is_empty() {
            return Err(VolatilityError::input("no options supplied to bootstrap"));
        }

        let mut selected: InsertIfAbsentMap<Date, &OptionAsset> = InsertIfAbsentMap::new();
        let mut excluded = Vec::new();
        for option in &self.options {
            if option.expiry() <= self.base_date {
                return Err(VolatilityError::input(format!(
                    "{} expires on {}, not after the base date {}",
                    option.id(),
                    option.expiry(),
                    self.base_date
                )));
            }
            if let Err(rejected) = selected.insert(option.expiry(), option) {
                let kept = selected
                    .get(&option.expiry())
                    .map(|o| o.id().to_string())
                    .unwrap_or_default();
                tracing::warn!(
                    option_id = rejected.id(),
                    kept_id = %kept,
                    expiry = %rejected.expiry(),
                    "Dropping option with duplicate expiry"
                );
                excluded.push(ExcludedAsset {
                    id: rejected.id().to_string(),
                    maturity: rejected.expiry(),
                    reason: ExclusionReason::DuplicateMaturity { kept },
                });
            }
        }

        ensure_distinct_times(self.base_date, self.day_count, selected.keys().copied())?;

        let mut points = Vec::with_capacity(selected.len());
        for (expiry, option) in selected.iter() {
            let volatility = option.implied_volatility(self.base_date, self.day_count, &self.budget)?;
            tracing::debug!(option_id = option.id(), expiry = %expiry, volatility, "Solved volatility knot");
            points.push(TermPoint::new(*expiry, volatility));
        }

        let space = InterpolatedSpace::new(
            TermCurve::new(CurveValueType::Volatility, points),
            self.base_date,
            self.day_count,
            self.method,
            self.extrapolation,
        )?;

        tracing::info!(
            knots = space.term_curve().len(),
            excluded = excluded.len(),
            "Volatility curve bootstrapped"
        );

        Ok(VolatilityCurve { space, excluded })
    }
}
