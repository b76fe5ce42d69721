//! Pareto Sampler
//!
//! Inverse-transform sampling of heavy-tailed sojourn durations. With
//! `U ~ Uniform[0, 1)`, the value `xm * (1 - U)^(-1/alpha)` follows a
//! Pareto(alpha, xm) distribution. Using `1 - U` keeps the base in `(0, 1]`
//! so the power never sees zero.

use rand::Rng;

use crate::ss_error::SimError;

/// Draw one Pareto(alpha, xm) sample from `rng`
///
/// Every returned value is `>= xm`. The same stream state always yields the
/// same sample.
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let x = selfsim::ss_pareto::sample(1.5, 2.0, &mut rng).unwrap();
/// assert!(x >= 2.0);
/// ```
pub fn sample<R: Rng + ?Sized>(alpha: f64, xm: f64, rng: &mut R) -> Result<f64, SimError> {
    let params = ParetoParams::new(alpha, xm)?;
    Ok(params.sample(rng))
}

/// Validated shape/scale pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParetoParams {
    alpha: f64,
    xm: f64,
}

impl ParetoParams {
    pub fn new(alpha: f64, xm: f64) -> Result<Self, SimError> {
        // written as negations so NaN is rejected too
        if !(alpha > 0.0) || !alpha.is_finite() {
            return Err(SimError::invalid(
                "alpha",
                format!("shape must be > 0, got {}", alpha),
            ));
        }
        if !(xm > 0.0) || !xm.is_finite() {
            return Err(SimError::invalid(
                "xm",
                format!("scale must be > 0, got {}", xm),
            ));
        }
        Ok(Self { alpha, xm })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn xm(&self) -> f64 {
        self.xm
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u = 1.0 - rng.gen::<f64>();
        self.xm * u.powf(-1.0 / self.alpha)
    }

    /// Distribution mean, infinite for `alpha <= 1`
    pub fn mean(&self) -> f64 {
        if self.alpha <= 1.0 {
            f64::INFINITY
        } else {
            self.alpha * self.xm / (self.alpha - 1.0)
        }
    }

    pub fn median(&self) -> f64 {
        self.xm * 2f64.powf(1.0 / self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rejects_non_positive_parameters() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            sample(0.0, 1.0, &mut rng),
            Err(SimError::InvalidParameter { name: "alpha", .. })
        ));
        assert!(matches!(
            sample(1.5, -2.0, &mut rng),
            Err(SimError::InvalidParameter { name: "xm", .. })
        ));
        assert!(sample(f64::NAN, 1.0, &mut rng).is_err());
    }

    #[test]
    fn test_samples_never_below_scale() {
        let mut rng = StdRng::seed_from_u64(42);
        for &(alpha, xm) in &[(0.5, 0.1), (1.1, 1.0), (2.5, 3.0), (10.0, 0.01)] {
            let p = ParetoParams::new(alpha, xm).unwrap();
            for _ in 0..10_000 {
                assert!(p.sample(&mut rng) >= xm);
            }
        }
    }

    #[test]
    fn test_empirical_mean_converges() {
        let p = ParetoParams::new(2.0, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(2024);
        let n = 500_000;
        let sum: f64 = (0..n).map(|_| p.sample(&mut rng)).sum();
        let mean = sum / n as f64;
        let expected = p.mean();
        assert_eq!(expected, 2.0);
        assert!(
            (mean - expected).abs() / expected < 0.05,
            "mean {} too far from {}",
            mean,
            expected
        );
    }

    #[test]
    fn test_empirical_median_converges() {
        let p = ParetoParams::new(1.5, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        let mut values: Vec<f64> = (0..200_000).map(|_| p.sample(&mut rng)).collect();
        values.sort_by(|a, b| a.total_cmp(b));
        let median = values[values.len() / 2];
        let expected = p.median();
        assert!(
            (median - expected).abs() / expected < 0.05,
            "median {} too far from {}",
            median,
            expected
        );
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = StdRng::seed_from_u64(100);
        let mut b = StdRng::seed_from_u64(100);
        for _ in 0..1000 {
            assert_eq!(
                sample(2.0, 1.0, &mut a).unwrap(),
                sample(2.0, 1.0, &mut b).unwrap()
            );
        }
    }
}
