//! Numerical helpers.

/// Returns the population variance of `n` values from their sum and sum of squares.
pub fn variance(sum: f64, sum_sq: f64, n: f64) -> f64 {
    (sum_sq - sum * sum / n) / n
}

/// Returns the sum of `sqrt(x_i * x_j)` over all pairs `i < j`.
pub fn sum_sqrt_products(values: &[f64]) -> f64 {
    values
        .iter()
        .enumerate()
        .flat_map(|(i, x)| values[i + 1..].iter().map(move |y| (x * y).sqrt()))
        .sum()
}

/// A mean and its standard error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    /// The sample mean.
    pub mean: f64,
    /// The standard error of the mean, using the sample standard deviation.
    ///
    /// Zero for a single value.
    pub std_error: f64,
}

impl Summary {
    /// Summarises values, returning `None` if there are none.
    pub fn new(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        let std_error = if values.len() > 1 {
            let ss = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
            (ss / (n - 1.0)).sqrt() / n.sqrt()
        } else {
            0.0
        };

        Some(Self { mean, std_error })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variance() {
        let values = [1.0f64, 2.0, 3.0, 4.0];
        let sum: f64 = values.iter().sum();
        let sum_sq: f64 = values.iter().map(|x| x * x).sum();

        assert_approx_eq!(variance(sum, sum_sq, 4.0), 1.25);
        assert_approx_eq!(variance(6.0, 12.0, 3.0), 0.0);
    }

    #[test]
    fn test_sum_sqrt_products() {
        assert_approx_eq!(sum_sqrt_products(&[1.0, 4.0, 9.0]), 2.0 + 3.0 + 6.0);
        assert_approx_eq!(sum_sqrt_products(&[2.0]), 0.0);
    }

    #[test]
    fn test_summary() {
        let summary = Summary::new(&[2.0, 4.0, 4.0, 6.0]).unwrap();

        assert_approx_eq!(summary.mean, 4.0);
        assert_approx_eq!(summary.std_error, (8.0f64 / 3.0).sqrt() / 2.0);

        assert_eq!(
            Summary::new(&[3.0]),
            Some(Summary {
                mean: 3.0,
                std_error: 0.0
            })
        );
        assert_eq!(Summary::new(&[]), None);
    }
}
