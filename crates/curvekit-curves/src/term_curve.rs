//! Ordered, deduplicated (date, value) knots.

use curvekit_core::collections::InsertIfAbsentMap;
use curvekit_core::daycounts::DayCountConvention;
use curvekit_core::Date;
use serde::Serialize;

use crate::value_type::CurveValueType;

/// A single knot of a term curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TermPoint {
    /// Knot date.
    pub date: Date,
    /// Value at the knot, interpreted through the curve's [`CurveValueType`].
    pub value: f64,
}

impl TermPoint {
    /// Creates a knot.
    #[must_use]
    pub const fn new(date: Date, value: f64) -> Self {
        Self { date, value }
    }
}

/// An ordered sequence of knots with strictly increasing dates.
///
/// When several points share a date the first one supplied is kept.
///
/// # Example
///
/// ```rust
/// use curvekit_core::Date;
/// use curvekit_curves::term_curve::{TermCurve, TermPoint};
/// use curvekit_curves::value_type::CurveValueType;
///
/// let d1 = Date::from_ymd(2026, 1, 1).unwrap();
/// let d2 = Date::from_ymd(2027, 1, 1).unwrap();
/// let curve = TermCurve::new(
///     CurveValueType::Volatility,
///     [TermPoint::new(d2, 0.22), TermPoint::new(d1, 0.20), TermPoint::new(d2, 0.30)],
/// );
/// assert_eq!(curve.dates(), vec![d1, d2]);
/// assert_eq!(curve.get(d2), Some(0.22));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermCurve {
    value_type: CurveValueType,
    points: Vec<TermPoint>,
}

impl TermCurve {
    /// Builds a curve from points in any order.
    pub fn new(value_type: CurveValueType, points: impl IntoIterator<Item = TermPoint>) -> Self {
        let mut map = InsertIfAbsentMap::new();
        for point in points {
            // Later points on an occupied date are dropped.
            let _ = map.insert(point.date, point.value);
        }
        Self::from_map(value_type, map)
    }

    /// Builds a curve from an already deduplicated map.
    #[must_use]
    pub fn from_map(value_type: CurveValueType, map: InsertIfAbsentMap<Date, f64>) -> Self {
        let points = map
            .into_iter()
            .map(|(date, value)| TermPoint { date, value })
            .collect();
        Self { value_type, points }
    }

    /// The kind of value stored at each knot.
    #[must_use]
    pub fn value_type(&self) -> CurveValueType {
        self.value_type
    }

    /// All knots, in date order.
    #[must_use]
    pub fn points(&self) -> &[TermPoint] {
        &self.points
    }

    /// Knot dates.
    #[must_use]
    pub fn dates(&self) -> Vec<Date> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Knot values.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Knot dates as year fractions from `base_date`.
    #[must_use]
    pub fn times(&self, base_date: Date, day_count: DayCountConvention) -> Vec<f64> {
        self.points
            .iter()
            .map(|p| day_count.year_fraction_f64(base_date, p.date))
            .collect()
    }

    /// Value stored exactly at `date`, if any.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<f64> {
        self.points
            .binary_search_by(|p| p.date.cmp(&date))
            .ok()
            .map(|i| self.points[i].value)
    }

    /// Number of knots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the curve has no knots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First knot.
    #[must_use]
    pub fn first(&self) -> Option<&TermPoint> {
        self.points.first()
    }

    /// Last knot.
    #[must_use]
    pub fn last(&self) -> Option<&TermPoint> {
        self.points.last()
    }
}
