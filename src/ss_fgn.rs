//! Fractional Gaussian Noise Generator
//!
//! Builds a fixed table of `N` correlated Gaussian samples whose
//! autocovariance is that of fractional Gaussian noise with Hurst exponent
//! `H`:
//!
//! ```text
//! γ(k) = 0.5 · (|k+1|^2H − 2|k|^2H + |k−1|^2H)
//! ```
//!
//! Two constructions are available:
//!
//! - **Hosking** (Durbin–Levinson recursion): exact, `O(N²)` time. Each
//!   sample is drawn from its Gaussian conditional distribution given all
//!   previous samples. Only two coefficient buffers are kept and swapped.
//! - **Davies–Harte** (circulant embedding): exact whenever the embedding is
//!   non-negative definite, `O(N log N)` time via FFT.
//!
//! The table is generated once. `next()` walks it round-robin, so call
//! `N + k` returns the same value as call `k`.

use std::f64::consts::PI;

use rand::Rng;
use rand_distr::StandardNormal;

use crate::ss_error::SimError;

/// Lower bound applied to variances before taking square roots
const VARIANCE_FLOOR: f64 = 1e-12;

/// Construction algorithm for the sample table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FgnMethod {
    #[default]
    Hosking,
    DaviesHarte,
}

/// Autocovariance of unit-variance fractional Gaussian noise at lag `k`
pub fn autocovariance(k: usize, hurst: f64) -> f64 {
    let k = k as f64;
    let h2 = 2.0 * hurst;
    0.5 * ((k + 1.0).powf(h2) - 2.0 * k.powf(h2) + (k - 1.0).abs().powf(h2))
}

/// Cyclic source of fractional Gaussian noise samples
#[derive(Debug, Clone)]
pub struct FgnGenerator {
    hurst: f64,
    method: FgnMethod,
    samples: Vec<f64>,
    cursor: usize,
}

impl FgnGenerator {
    /// Generate `len` samples with the Hosking recursion
    ///
    /// ```
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    /// use selfsim::FgnGenerator;
    ///
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let mut fgn = FgnGenerator::new(8, 0.8, &mut rng).unwrap();
    /// let first = fgn.next();
    /// for _ in 1..8 {
    ///     fgn.next();
    /// }
    /// assert_eq!(fgn.next(), first);
    /// ```
    pub fn new<R: Rng + ?Sized>(len: usize, hurst: f64, rng: &mut R) -> Result<Self, SimError> {
        Self::with_method(len, hurst, FgnMethod::Hosking, rng)
    }

    pub fn with_method<R: Rng + ?Sized>(
        len: usize,
        hurst: f64,
        method: FgnMethod,
        rng: &mut R,
    ) -> Result<Self, SimError> {
        if len == 0 {
            return Err(SimError::invalid("length", "FGN length must be >= 1"));
        }
        if !(hurst > 0.0 && hurst < 1.0) {
            return Err(SimError::invalid(
                "hurst",
                format!("must lie in (0, 1), got {}", hurst),
            ));
        }

        let samples = match method {
            FgnMethod::Hosking => hosking(len, hurst, rng),
            FgnMethod::DaviesHarte => davies_harte(len, hurst, rng),
        };

        Ok(Self {
            hurst,
            method,
            samples,
            cursor: 0,
        })
    }

    /// Next sample, wrapping to the start of the table after `len()` calls
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> f64 {
        let value = self.samples[self.cursor];
        self.cursor = (self.cursor + 1) % self.samples.len();
        value
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn hurst(&self) -> f64 {
        self.hurst
    }

    pub fn method(&self) -> FgnMethod {
        self.method
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}

fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.sample(StandardNormal)
}

/// Durbin–Levinson recursion
///
/// `phi_prev` holds the order `k-1` predictor coefficients (1-based), `phi`
/// receives order `k`; the buffers swap roles every step.
fn hosking<R: Rng + ?Sized>(n: usize, hurst: f64, rng: &mut R) -> Vec<f64> {
    let gamma: Vec<f64> = (0..n).map(|k| autocovariance(k, hurst)).collect();

    let mut x = vec![0.0; n];
    let mut phi = vec![0.0; n];
    let mut phi_prev = vec![0.0; n];

    let mut variance = gamma[0].max(VARIANCE_FLOOR);
    x[0] = variance.sqrt() * standard_normal(rng);

    for k in 1..n {
        let mut acc = gamma[k];
        for j in 1..k {
            acc -= phi_prev[j] * gamma[k - j];
        }
        let phi_kk = acc / variance;

        for j in 1..k {
            phi[j] = phi_prev[j] - phi_kk * phi_prev[k - j];
        }
        phi[k] = phi_kk;

        variance = (variance * (1.0 - phi_kk * phi_kk)).max(VARIANCE_FLOOR);

        let mean: f64 = (1..=k).map(|j| phi[j] * x[k - j]).sum();
        x[k] = mean + variance.sqrt() * standard_normal(rng);

        std::mem::swap(&mut phi, &mut phi_prev);
    }

    x
}

/// Circulant embedding
fn davies_harte<R: Rng + ?Sized>(n: usize, hurst: f64, rng: &mut R) -> Vec<f64> {
    let m = (2 * n).next_power_of_two();
    let half = m / 2;
    let scale = m as f64;

    // first row of the symmetric circulant matrix
    let mut lambda: Vec<f64> = (0..m)
        .map(|k| autocovariance(if k <= half { k } else { m - k }, hurst))
        .collect();
    let mut lambda_im = vec![0.0; m];
    fft(&mut lambda, &mut lambda_im);
    // negative eigenvalues mean the embedding is not valid; clamp them
    for l in lambda.iter_mut() {
        *l = l.max(0.0);
    }

    let mut re = vec![0.0; m];
    let mut im = vec![0.0; m];
    re[0] = (lambda[0] / scale).sqrt() * standard_normal(rng);
    re[half] = (lambda[half] / scale).sqrt() * standard_normal(rng);
    for k in 1..half {
        let s = (lambda[k] / (2.0 * scale)).sqrt();
        let a = s * standard_normal(rng);
        let b = s * standard_normal(rng);
        re[k] = a;
        im[k] = b;
        re[m - k] = a;
        im[m - k] = -b;
    }

    // Hermitian spectrum, so the transform is real
    fft(&mut re, &mut im);
    re.truncate(n);
    re
}

/// In-place iterative radix-2 FFT, forward direction (`e^{-2πijk/n}`)
///
/// `re.len()` must be a power of two and equal to `im.len()`.
pub(crate) fn fft(re: &mut [f64], im: &mut [f64]) {
    let n = re.len();
    debug_assert!(n.is_power_of_two());
    debug_assert_eq!(n, im.len());

    let mut j = 0;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;
        if i < j {
            re.swap(i, j);
            im.swap(i, j);
        }
    }

    let mut len = 2;
    while len <= n {
        let (w_im, w_re) = (-2.0 * PI / len as f64).sin_cos();
        for start in (0..n).step_by(len) {
            let mut cur_re = 1.0;
            let mut cur_im = 0.0;
            for k in 0..len / 2 {
                let a = start + k;
                let b = a + len / 2;
                let t_re = re[b] * cur_re - im[b] * cur_im;
                let t_im = re[b] * cur_im + im[b] * cur_re;
                re[b] = re[a] - t_re;
                im[b] = im[a] - t_im;
                re[a] += t_re;
                im[a] += t_im;
                let next_re = cur_re * w_re - cur_im * w_im;
                cur_im = cur_re * w_im + cur_im * w_re;
                cur_re = next_re;
            }
        }
        len <<= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn lag_one_correlation(x: &[f64]) -> f64 {
        let num: f64 = x.windows(2).map(|w| w[0] * w[1]).sum();
        let den: f64 = x.iter().map(|v| v * v).sum();
        num / den
    }

    #[test]
    fn test_autocovariance_values() {
        assert!((autocovariance(0, 0.8) - 1.0).abs() < 1e-12);
        // H = 0.5 is white noise
        assert!(autocovariance(1, 0.5).abs() < 1e-12);
        assert!(autocovariance(7, 0.5).abs() < 1e-12);
        let expected = 0.5 * (2f64.powf(1.6) - 2.0);
        assert!((autocovariance(1, 0.8) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(FgnGenerator::new(0, 0.7, &mut rng).is_err());
        assert!(FgnGenerator::new(10, 0.0, &mut rng).is_err());
        assert!(FgnGenerator::new(10, 1.0, &mut rng).is_err());
        assert!(FgnGenerator::new(10, f64::NAN, &mut rng).is_err());
    }

    #[test]
    fn test_next_wraps_around() {
        for method in [FgnMethod::Hosking, FgnMethod::DaviesHarte] {
            let n = 5;
            let mut rng = StdRng::seed_from_u64(1);
            let mut fgn = FgnGenerator::with_method(n, 0.7, method, &mut rng).unwrap();

            let first_pass: Vec<f64> = (0..n).map(|_| fgn.next()).collect();
            let second_pass: Vec<f64> = (0..n).map(|_| fgn.next()).collect();
            assert_eq!(first_pass, second_pass);
            assert_eq!(first_pass.as_slice(), fgn.samples());
        }
    }

    #[test]
    fn test_values_are_finite() {
        for method in [FgnMethod::Hosking, FgnMethod::DaviesHarte] {
            for &h in &[0.05, 0.3, 0.5, 0.75, 0.95, 0.999] {
                let mut rng = StdRng::seed_from_u64(99);
                let mut fgn = FgnGenerator::with_method(64, h, method, &mut rng).unwrap();
                for _ in 0..128 {
                    assert!(fgn.next().is_finite(), "H={} method={:?}", h, method);
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_table() {
        let a = FgnGenerator::new(32, 0.8, &mut StdRng::seed_from_u64(123)).unwrap();
        let b = FgnGenerator::new(32, 0.8, &mut StdRng::seed_from_u64(123)).unwrap();
        assert_eq!(a.samples(), b.samples());

        let c = FgnGenerator::new(32, 0.8, &mut StdRng::seed_from_u64(124)).unwrap();
        assert_ne!(a.samples(), c.samples());
    }

    #[test]
    fn test_single_sample_table() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut fgn = FgnGenerator::with_method(1, 0.6, FgnMethod::DaviesHarte, &mut rng).unwrap();
        let v = fgn.next();
        assert_eq!(fgn.next(), v);
        assert_eq!(fgn.len(), 1);
    }

    #[test]
    fn test_lag_one_correlation_matches_theory() {
        let hurst = 0.8;
        let expected = autocovariance(1, hurst);

        for method in [FgnMethod::Hosking, FgnMethod::DaviesHarte] {
            let runs = 20;
            let mut total = 0.0;
            for seed in 0..runs {
                let mut rng = StdRng::seed_from_u64(1000 + seed);
                let fgn = FgnGenerator::with_method(2048, hurst, method, &mut rng).unwrap();
                total += lag_one_correlation(fgn.samples());
            }
            let mean = total / runs as f64;
            assert!(
                (mean - expected).abs() < 0.1,
                "{:?}: lag-1 correlation {} expected {}",
                method,
                mean,
                expected
            );
        }
    }

    #[test]
    fn test_white_noise_case_is_uncorrelated() {
        let mut rng = StdRng::seed_from_u64(5);
        let fgn = FgnGenerator::new(4096, 0.5, &mut rng).unwrap();
        let rho = lag_one_correlation(fgn.samples());
        assert!(rho.abs() < 0.06, "rho = {}", rho);
    }

    #[test]
    fn test_fft_matches_naive_dft() {
        let mut rng = StdRng::seed_from_u64(11);
        let n = 16;
        let input_re: Vec<f64> = (0..n).map(|_| rng.gen::<f64>() - 0.5).collect();
        let input_im: Vec<f64> = (0..n).map(|_| rng.gen::<f64>() - 0.5).collect();

        let mut re = input_re.clone();
        let mut im = input_im.clone();
        fft(&mut re, &mut im);

        for k in 0..n {
            let mut sum_re = 0.0;
            let mut sum_im = 0.0;
            for j in 0..n {
                let angle = -2.0 * PI * (j * k) as f64 / n as f64;
                let (s, c) = angle.sin_cos();
                sum_re += input_re[j] * c - input_im[j] * s;
                sum_im += input_re[j] * s + input_im[j] * c;
            }
            assert!((re[k] - sum_re).abs() < 1e-9);
            assert!((im[k] - sum_im).abs() < 1e-9);
        }
    }
}
