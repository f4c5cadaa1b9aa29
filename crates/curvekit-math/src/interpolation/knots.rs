//! Validated knot storage shared by the 1-D interpolators.

use std::cmp::Ordering;

use crate::error::{MathError, MathResult};

/// Where a query abscissa falls relative to the knots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Exactly on knot `i`.
    Knot(usize),
    /// Strictly inside segment `[x_i, x_{i+1}]`.
    Inside(usize),
    /// Left of the first knot.
    Below,
    /// Right of the last knot.
    Above,
}

/// Strictly ascending abscissas with their ordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Knots {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Knots {
    /// Validates and stores the knots.
    ///
    /// # Errors
    ///
    /// - `InsufficientData` with fewer than `min_points` knots
    /// - `InvalidInput` for mismatched lengths or non-finite values
    /// - `DuplicateAbscissa` if two knots share an abscissa
    /// - `NotAscending` if the abscissas decrease
    pub fn new(xs: Vec<f64>, ys: Vec<f64>, min_points: usize) -> MathResult<Self> {
        if xs.len() != ys.len() {
            return Err(MathError::invalid_input(format!(
                "xs and ys must have same length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < min_points {
            return Err(MathError::insufficient_data(min_points, xs.len()));
        }
        if let Some(bad) = xs.iter().chain(ys.iter()).find(|v| !v.is_finite()) {
            return Err(MathError::invalid_input(format!("non-finite knot value {bad}")));
        }

        for (i, pair) in xs.windows(2).enumerate() {
            match pair[1].partial_cmp(&pair[0]) {
                Some(Ordering::Greater) => {}
                Some(Ordering::Equal) => return Err(MathError::DuplicateAbscissa { x: pair[0] }),
                _ => {
                    return Err(MathError::NotAscending {
                        index: i + 1,
                        previous: pair[0],
                        value: pair[1],
                    })
                }
            }
        }

        Ok(Self { xs, ys })
    }

    /// Abscissas.
    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Ordinates.
    #[must_use]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Number of knots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Always false for validated knots; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// First abscissa.
    #[must_use]
    pub fn min_x(&self) -> f64 {
        self.xs[0]
    }

    /// Last abscissa.
    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }

    /// Index of the last segment.
    #[must_use]
    pub fn last_segment(&self) -> usize {
        self.xs.len() - 2
    }

    /// Locates `x` by binary search.
    #[must_use]
    pub fn locate(&self, x: f64) -> Location {
        if x < self.min_x() {
            return Location::Below;
        }
        if x > self.max_x() {
            return Location::Above;
        }
        match self
            .xs
            .binary_search_by(|knot| knot.partial_cmp(&x).unwrap_or(Ordering::Less))
        {
            Ok(i) => Location::Knot(i),
            Err(i) => Location::Inside(i - 1),
        }
    }

    /// Error for a query outside the knot range.
    #[must_use]
    pub fn out_of_range(&self, x: f64) -> MathError {
        MathError::OutOfRange {
            x,
            min: self.min_x(),
            max: self.max_x(),
        }
    }
}
