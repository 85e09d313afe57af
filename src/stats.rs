//! Statistical utility functions shared across modules
//!
//! Contains the -log10 transform used for Manhattan-style scaling and the
//! ordinary least squares fit used for cross-cohort scatter summaries.

use statrs::distribution::{ContinuousCDF, StudentsT};

/// The -log10 transform applied to p-values before plotting.
///
/// Smaller p-values map to larger magnitudes. Inputs come from validated
/// records, so p is in (0, 1] and the result is finite and non-negative.
pub fn neg_log10(p: f64) -> f64 {
    -p.log10()
}

/// Ordinary least squares fit of y on x.
///
/// `p_value` is the two-sided significance of the slope under a t
/// distribution with n - 2 degrees of freedom. Degenerate inputs (fewer
/// than three points, or zero variance in x) produce NaN estimates.
#[derive(Debug, Clone, Copy)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub p_value: f64,
    pub n: usize,
}

impl LinearFit {
    pub fn fit(xs: &[f64], ys: &[f64]) -> Self {
        let n = xs.len().min(ys.len());
        if n < 3 {
            return Self::degenerate(n);
        }

        let nf = n as f64;
        let mean_x = xs[..n].iter().sum::<f64>() / nf;
        let mean_y = ys[..n].iter().sum::<f64>() / nf;

        let mut sxx = 0.0;
        let mut sxy = 0.0;
        let mut syy = 0.0;
        for i in 0..n {
            let dx = xs[i] - mean_x;
            let dy = ys[i] - mean_y;
            sxx += dx * dx;
            sxy += dx * dy;
            syy += dy * dy;
        }

        if sxx == 0.0 {
            return Self::degenerate(n);
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        let r_squared = if syy == 0.0 {
            f64::NAN
        } else {
            (sxy * sxy) / (sxx * syy)
        };

        // Residual sum of squares; clamp tiny negatives from cancellation.
        let residual_ss = (syy - slope * sxy).max(0.0);
        let df = nf - 2.0;
        let se = (residual_ss / df / sxx).sqrt();

        let p_value = if se == 0.0 {
            // Perfect fit: a nonzero slope is unambiguous evidence.
            if slope == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            let t = slope / se;
            let dist = StudentsT::new(0.0, 1.0, df).unwrap();
            2.0 * (1.0 - dist.cdf(t.abs()))
        };

        Self {
            slope,
            intercept,
            r_squared,
            p_value,
            n,
        }
    }

    fn degenerate(n: usize) -> Self {
        Self {
            slope: f64::NAN,
            intercept: f64::NAN,
            r_squared: f64::NAN,
            p_value: f64::NAN,
            n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neg_log10() {
        assert!((neg_log10(0.01) - 2.0).abs() < 1e-12);
        assert!((neg_log10(1.0)).abs() < 1e-12);
        assert!((neg_log10(1e-8) - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_fit_recovers_exact_line() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [3.0, 5.0, 7.0, 9.0]; // y = 2x + 1

        let fit = LinearFit::fit(&xs, &ys);
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
        assert!(fit.p_value < 1e-9);
    }

    #[test]
    fn test_fit_with_noise() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let ys = [1.1, 1.9, 3.2, 3.8, 5.1, 5.9];

        let fit = LinearFit::fit(&xs, &ys);
        assert!((fit.slope - 1.0).abs() < 0.1);
        assert!(fit.r_squared > 0.95);
        assert!(fit.p_value < 0.01);
    }

    #[test]
    fn test_flat_relationship_is_not_significant() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let ys = [2.0, 5.0, 1.0, 4.0, 3.0, 5.0, 2.0, 4.0];

        let fit = LinearFit::fit(&xs, &ys);
        assert!(fit.p_value > 0.05);
    }

    #[test]
    fn test_degenerate_inputs() {
        let fit = LinearFit::fit(&[1.0, 2.0], &[1.0, 2.0]);
        assert!(fit.slope.is_nan());
        assert_eq!(fit.n, 2);

        // Zero variance in x
        let fit = LinearFit::fit(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]);
        assert!(fit.slope.is_nan());
    }
}
