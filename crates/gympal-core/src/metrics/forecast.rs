//! Linear trend forecast over a weekly series.

use super::estimate::round2;

/// Number of weeks projected when the caller does not say otherwise.
pub const DEFAULT_WEEKS_AHEAD: usize = 4;

/// Longest horizon the forecaster projects (ten years of weeks).
pub const MAX_WEEKS_AHEAD: usize = 520;

/// Minimum number of points needed to fit a line.
pub const MIN_POINTS: usize = 2;

/// Fitted least-squares line over positional indices `0..n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    /// Number of points the line was fitted on.
    pub n: usize,
}

impl TrendLine {
    /// Fit `y = intercept + slope * x` with `x` the index of each value.
    ///
    /// Returns `None` for fewer than [`MIN_POINTS`] values.
    pub fn fit(values: &[f64]) -> Option<Self> {
        let n = values.len();
        if n < MIN_POINTS {
            return None;
        }

        let count = n as f64;
        let x_mean = (0..n).map(|i| i as f64).sum::<f64>() / count;
        let y_mean = values.iter().sum::<f64>() / count;

        let (num, den) = values
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(num, den), (i, &y)| {
                let dx = i as f64 - x_mean;
                (num + dx * (y - y_mean), den + dx * dx)
            });
        // Only reachable with a single distinct x, which n >= 2 rules out.
        let den = if den == 0.0 { 1.0 } else { den };

        let slope = num / den;
        Some(Self {
            slope,
            intercept: y_mean - slope * x_mean,
            n,
        })
    }

    pub fn value_at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Project `weeks_ahead` values at `x = n + 1 ..= n + weeks_ahead`.
    ///
    /// `weeks_ahead` is capped at [`MAX_WEEKS_AHEAD`].
    pub fn project(&self, weeks_ahead: usize) -> Vec<f64> {
        (1..=weeks_ahead.min(MAX_WEEKS_AHEAD))
            .map(|i| round2(self.value_at(self.n.saturating_add(i) as f64)))
            .collect()
    }
}

/// Project a series forward by `weeks_ahead` values using OLS.
///
/// Returns an empty vec for fewer than two input values; otherwise exactly
/// `weeks_ahead` values (at most [`MAX_WEEKS_AHEAD`]) rounded to 2 decimals.
pub fn linear_forecast(values: &[f64], weeks_ahead: usize) -> Vec<f64> {
    TrendLine::fit(values)
        .map(|line| line.project(weeks_ahead))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_needs_two_points() {
        assert!(linear_forecast(&[], DEFAULT_WEEKS_AHEAD).is_empty());
        assert!(linear_forecast(&[200.0], DEFAULT_WEEKS_AHEAD).is_empty());
        assert_eq!(linear_forecast(&[200.0, 210.0], DEFAULT_WEEKS_AHEAD).len(), 4);
    }

    #[test]
    fn test_forecast_increasing_trend() {
        let fc = linear_forecast(&[200.0, 210.0, 220.0], DEFAULT_WEEKS_AHEAD);
        assert!(fc[0] >= 220.0);
        assert!(fc.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_fit_exact_line() {
        let line = TrendLine::fit(&[10.0, 12.0, 14.0, 16.0]).unwrap();
        assert!((line.slope - 2.0).abs() < 1e-9);
        assert!((line.intercept - 10.0).abs() < 1e-9);
        assert_eq!(line.n, 4);
    }

    #[test]
    fn test_projection_continues_after_n() {
        // slope 10, intercept 200, n = 3: x = 4, 5
        assert_eq!(linear_forecast(&[200.0, 210.0, 220.0], 2), vec![240.0, 250.0]);
    }

    #[test]
    fn test_flat_series_projects_flat() {
        assert_eq!(linear_forecast(&[150.0, 150.0, 150.0], 3), vec![150.0; 3]);
    }

    #[test]
    fn test_decreasing_series_projects_down() {
        let fc = linear_forecast(&[300.0, 290.0, 280.0], 1);
        assert!(fc[0] < 280.0);
    }

    #[test]
    fn test_zero_weeks_ahead_is_empty() {
        assert!(linear_forecast(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn test_huge_horizon_is_capped() {
        let fc = linear_forecast(&[1.0, 2.0], usize::MAX);
        assert_eq!(fc.len(), MAX_WEEKS_AHEAD);
        assert_eq!(fc[0], 3.0);
    }

    #[test]
    fn test_output_is_rounded() {
        let fc = linear_forecast(&[245.0, 256.67], 1);
        assert_eq!(fc, vec![280.01]);
    }
}
