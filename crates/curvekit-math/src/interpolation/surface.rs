//! Two-dimensional interpolation over a grid of 1-D rows.

use serde::{Deserialize, Serialize};

use super::knots::Knots;
use super::{Extrapolation, InterpolationMethod, Interpolator};
use crate::error::MathResult;

/// A point on a surface: `x` is time to expiry, `y` is strike.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// Time coordinate (years to expiry).
    pub x: f64,
    /// Strike coordinate.
    pub y: f64,
}

impl Point2D {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Two-pass surface interpolation.
///
/// The surface is a set of rows, one per time coordinate, each holding a 1-D
/// interpolator along strike. A query evaluates every row at the query strike
/// (first pass) and then interpolates those values along time with the
/// configured method (second pass). Rows may have different strikes.
#[derive(Debug, Clone)]
pub struct SurfaceInterpolator {
    row_xs: Vec<f64>,
    rows: Vec<Box<dyn Interpolator>>,
    across: InterpolationMethod,
    extrapolation: Extrapolation,
}

impl SurfaceInterpolator {
    /// Creates a surface from `(time, row)` pairs.
    ///
    /// `across` and `extrapolation` govern the second pass along time.
    ///
    /// # Errors
    ///
    /// `InsufficientData` without rows, `DuplicateAbscissa` or `NotAscending`
    /// if row times are not strictly ascending.
    pub fn new(
        rows: Vec<(f64, Box<dyn Interpolator>)>,
        across: InterpolationMethod,
        extrapolation: Extrapolation,
    ) -> MathResult<Self> {
        let (row_xs, rows): (Vec<f64>, Vec<Box<dyn Interpolator>>) = rows.into_iter().unzip();
        Knots::new(row_xs.clone(), vec![0.0; row_xs.len()], 1)?;
        Ok(Self {
            row_xs,
            rows,
            across,
            extrapolation,
        })
    }

    /// Time coordinates of the rows.
    #[must_use]
    pub fn row_times(&self) -> &[f64] {
        &self.row_xs
    }

    /// Value at `point`.
    ///
    /// A surface with a single row is flat along time.
    ///
    /// # Errors
    ///
    /// Propagates range and domain errors from either pass.
    pub fn value(&self, point: Point2D) -> MathResult<f64> {
        let slice: Vec<f64> = self
            .rows
            .iter()
            .map(|row| row.interpolate(point.y))
            .collect::<MathResult<_>>()?;

        if slice.len() == 1 {
            return Ok(slice[0]);
        }

        self.across
            .build(self.row_xs.clone(), slice, self.extrapolation)?
            .interpolate(point.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::LinearInterpolator;
    use approx::assert_relative_eq;

    fn row(strikes: &[f64], vols: &[f64]) -> Box<dyn Interpolator> {
        Box::new(
            LinearInterpolator::new(strikes.to_vec(), vols.to_vec())
                .unwrap()
                .with_extrapolation(Extrapolation::Flat),
        )
    }

    #[test]
    fn test_bilinear_grid() {
        let surface = SurfaceInterpolator::new(
            vec![
                (1.0, row(&[90.0, 110.0], &[0.20, 0.30])),
                (2.0, row(&[90.0, 110.0], &[0.30, 0.40])),
            ],
            InterpolationMethod::Linear,
            Extrapolation::Flat,
        )
        .unwrap();

        assert_relative_eq!(surface.value(Point2D::new(1.5, 100.0)).unwrap(), 0.30, epsilon = 1e-12);
        assert_relative_eq!(surface.value(Point2D::new(1.0, 90.0)).unwrap(), 0.20, epsilon = 1e-12);
        assert_relative_eq!(surface.value(Point2D::new(3.0, 90.0)).unwrap(), 0.30, epsilon = 1e-12);
    }

    #[test]
    fn test_ragged_rows() {
        let surface = SurfaceInterpolator::new(
            vec![
                (0.5, row(&[95.0, 100.0, 105.0], &[0.25, 0.20, 0.22])),
                (1.0, row(&[80.0, 120.0], &[0.30, 0.26])),
            ],
            InterpolationMethod::Linear,
            Extrapolation::None,
        )
        .unwrap();
        // First row at 100 is 0.20, second row at 100 is 0.28
        assert_relative_eq!(surface.value(Point2D::new(0.75, 100.0)).unwrap(), 0.24, epsilon = 1e-12);
        assert!(surface.value(Point2D::new(2.0, 100.0)).is_err());
    }

    #[test]
    fn test_single_row_is_flat_in_time() {
        let surface = SurfaceInterpolator::new(
            vec![(1.0, row(&[90.0, 110.0], &[0.2, 0.3]))],
            InterpolationMethod::Linear,
            Extrapolation::None,
        )
        .unwrap();
        assert_relative_eq!(surface.value(Point2D::new(7.0, 100.0)).unwrap(), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_unsorted_rows() {
        let result = SurfaceInterpolator::new(
            vec![
                (2.0, row(&[90.0, 110.0], &[0.2, 0.3])),
                (1.0, row(&[90.0, 110.0], &[0.2, 0.3])),
            ],
            InterpolationMethod::Linear,
            Extrapolation::None,
        );
        assert!(result.is_err());
    }
}
