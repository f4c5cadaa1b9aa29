//! Market volatility grids: option quotes grouped by expiry and strike.

use std::cmp::Ordering;

use curvekit_core::collections::InsertIfAbsentMap;
use curvekit_core::daycounts::DayCountConvention;
use curvekit_core::Date;
use curvekit_math::interpolation::{
    Extrapolation, InterpolationMethod, Interpolator, LinearInterpolator, Point2D, SurfaceInterpolator,
};
use curvekit_math::solvers::SolveBudget;
use serde::Serialize;

use crate::error::{VolatilityError, VolatilityResult};
use crate::option::OptionAsset;

/// Strike as a map key; ordered by `f64::total_cmp`.
#[derive(Debug, Clone, Copy)]
struct StrikeKey(f64);

impl PartialEq for StrikeKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for StrikeKey {}

impl PartialOrd for StrikeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StrikeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Market volatilities observed at one expiry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilitySlice {
    expiry: Date,
    time: f64,
    forward: f64,
    strikes: Vec<f64>,
    volatilities: Vec<f64>,
}

impl VolatilitySlice {
    /// Expiry date.
    #[must_use]
    pub fn expiry(&self) -> Date {
        self.expiry
    }

    /// Years from the grid's base date to expiry.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Forward of the first option seen at this expiry.
    #[must_use]
    pub fn forward(&self) -> f64 {
        self.forward
    }

    /// Ascending strikes.
    #[must_use]
    pub fn strikes(&self) -> &[f64] {
        &self.strikes
    }

    /// Volatilities matching [`strikes`](Self::strikes).
    #[must_use]
    pub fn volatilities(&self) -> &[f64] {
        &self.volatilities
    }

    /// Volatility of the strike nearest the forward.
    #[must_use]
    pub fn atm_volatility(&self) -> f64 {
        self.strikes
            .iter()
            .zip(&self.volatilities)
            .min_by(|(a, _), (b, _)| (*a - self.forward).abs().total_cmp(&(*b - self.forward).abs()))
            .map_or(f64::NAN, |(_, vol)| *vol)
    }
}

/// An option dropped because an earlier one has the same expiry and strike.
#[derive(Debug, Clone, PartialEq)]
pub struct ExcludedOption {
    /// Identifier of the dropped option.
    pub id: String,
    /// Its expiry.
    pub expiry: Date,
    /// Its strike.
    pub strike: f64,
    /// Identifier of the option that was kept.
    pub kept: String,
}

/// The market matrix of volatilities by expiry and strike.
///
/// Point queries interpolate linearly along strike inside each expiry
/// (flat beyond the quoted strikes), then along expiry with the configured
/// method.
#[derive(Debug, Clone)]
pub struct VolatilityGrid {
    base_date: Date,
    day_count: DayCountConvention,
    slices: Vec<VolatilitySlice>,
    excluded: Vec<ExcludedOption>,
    interpolator: SurfaceInterpolator,
}

impl VolatilityGrid {
    /// The date at which expiry time is zero.
    #[must_use]
    pub fn base_date(&self) -> Date {
        self.base_date
    }

    /// Day count for expiry times.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Expiry slices in ascending order.
    #[must_use]
    pub fn slices(&self) -> &[VolatilitySlice] {
        &self.slices
    }

    /// Options dropped as duplicates.
    #[must_use]
    pub fn excluded(&self) -> &[ExcludedOption] {
        &self.excluded
    }

    /// Volatility at (`expiry`, `strike`).
    ///
    /// # Errors
    ///
    /// Propagates interpolation errors.
    pub fn value(&self, expiry: Date, strike: f64) -> VolatilityResult<f64> {
        self.value_at(self.day_count.year_fraction_f64(self.base_date, expiry), strike)
    }

    /// Volatility at expiry time `t` and `strike`.
    ///
    /// # Errors
    ///
    /// Propagates interpolation errors.
    pub fn value_at(&self, t: f64, strike: f64) -> VolatilityResult<f64> {
        Ok(self.interpolator.value(Point2D::new(t, strike))?)
    }
}

/// Groups options into a [`VolatilityGrid`].
///
/// Options are keyed by (expiry, strike); the first one seen wins and later
/// duplicates are logged and listed in [`VolatilityGrid::excluded`]. Each
/// slice takes its forward from the first option seen at that expiry.
#[derive(Debug, Clone)]
pub struct VolatilitySurfaceBootstrapper {
    base_date: Date,
    day_count: DayCountConvention,
    expiry_method: InterpolationMethod,
    extrapolation: Extrapolation,
    budget: SolveBudget,
    options: Vec<OptionAsset>,
}

impl VolatilitySurfaceBootstrapper {
    /// Creates an ACT/365F bootstrapper, linear and flat along expiry.
    #[must_use]
    pub fn new(base_date: Date) -> Self {
        Self {
            base_date,
            day_count: DayCountConvention::Act365Fixed,
            expiry_method: InterpolationMethod::Linear,
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

    /// Sets the interpolation along expiry.
    #[must_use]
    pub fn with_expiry_method(mut self, method: InterpolationMethod) -> Self {
        self.expiry_method = method;
        self
    }

    /// Sets the extrapolation along expiry.
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

    /// Builds the grid.
    ///
    /// # Errors
    ///
    /// `Input` without options, for an option expiring on or before the base
    /// date, for an expiry with a single strike, or for two expiries that fall
    /// at the same time under the day count; the option's own error if its
    /// quote cannot be turned into a volatility.
    pub fn bootstrap(&self) -> VolatilityResult<VolatilityGrid> {
        if self.options.is_empty() {
            return Err(VolatilityError::input("no options supplied to bootstrap"));
        }

        let mut selected: InsertIfAbsentMap<(Date, StrikeKey), &OptionAsset> = InsertIfAbsentMap::new();
        let mut forwards: InsertIfAbsentMap<Date, f64> = InsertIfAbsentMap::new();
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
            let key = (option.expiry(), StrikeKey(option.strike()));
            match selected.insert(key, option) {
                Ok(()) => {
                    let _ = forwards.insert(option.expiry(), option.forward());
                }
                Err(rejected) => {
                    let kept = selected.get(&key).map(|o| o.id().to_string()).unwrap_or_default();
                    tracing::warn!(
                        option_id = rejected.id(),
                        kept_id = %kept,
                        expiry = %rejected.expiry(),
                        strike = rejected.strike(),
                        "Dropping option with duplicate expiry and strike"
                    );
                    excluded.push(ExcludedOption {
                        id: rejected.id().to_string(),
                        expiry: rejected.expiry(),
                        strike: rejected.strike(),
                        kept,
                    });
                }
            }
        }
        crate::curve::ensure_distinct_times(self.base_date, self.day_count, forwards.keys().copied())?;

        let mut slices: Vec<VolatilitySlice> = Vec::new();
        for ((expiry, strike), option) in selected.iter() {
            let volatility = option.implied_volatility(self.base_date, self.day_count, &self.budget)?;
            match slices.last_mut() {
                Some(slice) if slice.expiry == *expiry => {
                    slice.strikes.push(strike.0);
                    slice.volatilities.push(volatility);
                }
                _ => slices.push(VolatilitySlice {
                    expiry: *expiry,
                    time: self.day_count.year_fraction_f64(self.base_date, *expiry),
                    forward: forwards.get(expiry).copied().unwrap_or_else(|| option.forward()),
                    strikes: vec![strike.0],
                    volatilities: vec![volatility],
                }),
            }
        }

        let rows = slices
            .iter()
            .map(|slice| {
                if slice.strikes.len() < 2 {
                    return Err(VolatilityError::input(format!(
                        "expiry {} has a single strike; a grid row needs at least two",
                        slice.expiry
                    )));
                }
                let row = LinearInterpolator::new(slice.strikes.clone(), slice.volatilities.clone())?
                    .with_extrapolation(Extrapolation::Flat);
                Ok((slice.time, Box::new(row) as Box<dyn Interpolator>))
            })
            .collect::<VolatilityResult<Vec<_>>>()?;
        let interpolator = SurfaceInterpolator::new(rows, self.expiry_method, self.extrapolation)?;

        tracing::info!(
            slices = slices.len(),
            options = selected.len(),
            excluded = excluded.len(),
            "Volatility grid built"
        );

        Ok(VolatilityGrid {
            base_date: self.base_date,
            day_count: self.day_count,
            slices,
            excluded,
            interpolator,
        })
    }
}
