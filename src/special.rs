//! Special mathematical functions.
//!
//! Numerical approximations backing the theoretical densities and
//! coverage probabilities in [`distributions`](crate::distributions) and
//! [`simulation`](crate::simulation).

/// 1/√(2π) ≈ 0.3989422804014327
const FRAC_1_SQRT_2PI: f64 = 0.3989422804014326779399460599343818684758586311649;

/// Approximation of the standard normal CDF Φ(x) = P(Z ≤ x) for Z ~ N(0,1).
///
/// # Algorithm
/// Abramowitz & Stegun formula 26.2.17, polynomial approximation with
/// Horner evaluation.
///
/// Reference: Abramowitz & Stegun (1964), *Handbook of Mathematical
/// Functions*, formula 26.2.17, p. 932.
///
/// # Accuracy
/// Maximum absolute error < 7.5 × 10⁻⁸.
///
/// # Examples
/// ```
/// use prob_laws::special::standard_normal_cdf;
/// assert!((standard_normal_cdf(0.0) - 0.5).abs() < 1e-7);
/// assert!((standard_normal_cdf(1.96) - 0.975).abs() < 1e-3);
/// ```
pub fn standard_normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x == f64::INFINITY {
        return 1.0;
    }
    if x == f64::NEG_INFINITY {
        return 0.0;
    }

    // Use symmetry: Φ(-x) = 1 - Φ(x)
    let abs_x = x.abs();
    let k = 1.0 / (1.0 + 0.2316419 * abs_x);

    // φ(x) = (1/√(2π)) exp(-x²/2)
    let phi = FRAC_1_SQRT_2PI * (-0.5 * abs_x * abs_x).exp();

    // Horner evaluation of the polynomial
    // a₅ = 1.330274429, a₄ = -1.821255978, a₃ = 1.781477937,
    // a₂ = -0.356563782, a₁ = 0.319381530
    let poly = k
        * (0.319381530
            + k * (-0.356563782 + k * (1.781477937 + k * (-1.821255978 + k * 1.330274429))));

    let cdf_abs = 1.0 - phi * poly;

    if x >= 0.0 {
        cdf_abs
    } else {
        1.0 - cdf_abs
    }
}

/// Standard normal PDF φ(x) = (1/√(2π)) exp(-x²/2).
///
/// # Examples
/// ```
/// use prob_laws::special::standard_normal_pdf;
/// let peak = standard_normal_pdf(0.0);
/// assert!((peak - 0.3989422804014327).abs() < 1e-15);
/// ```
pub fn standard_normal_pdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Lanczos approximation of ln Γ(x).
///
/// Reference: Lanczos (1964), "A Precision Approximation of the Gamma
/// Function", *SIAM Journal on Numerical Analysis* 1(1).
///
/// # Accuracy
/// Relative error < 2 × 10⁻¹⁰ for x > 0.
///
/// # Examples
/// ```
/// use prob_laws::special::ln_gamma;
/// // Γ(5) = 24
/// assert!((ln_gamma(5.0) - 24.0_f64.ln()).abs() < 1e-10);
/// ```
pub fn ln_gamma(x: f64) -> f64 {
    #[allow(clippy::excessive_precision)]
    const COEFFICIENTS: [f64; 9] = [
        0.99999999999980993,
        676.5203681218851,
        -1259.1392167224028,
        771.32342877765313,
        -176.61502916214059,
        12.507343278686905,
        -0.13857109526572012,
        9.9843695780195716e-6,
        1.5056327351493116e-7,
    ];
    const G: f64 = 7.0;

    if x < 0.5 {
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut sum = COEFFICIENTS[0];
    for (i, &c) in COEFFICIENTS[1..].iter().enumerate() {
        sum += c / (x + i as f64 + 1.0);
    }

    let t = x + G + 0.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + sum.ln()
}

/// Natural log of the binomial coefficient C(n, k), via `ln_gamma`.
///
/// Returns `f64::NEG_INFINITY` when `k > n` (the coefficient is zero).
pub fn ln_binomial_coefficient(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    let (n, k) = (n as f64, k as f64);
    ln_gamma(n + 1.0) - ln_gamma(k + 1.0) - ln_gamma(n - k + 1.0)
}

/// PDF of the chi-squared distribution with `df` degrees of freedom.
///
/// # Formula
/// ```text
/// f(x; k) = x^(k/2 − 1) · e^(−x/2) / (2^(k/2) · Γ(k/2)),  x > 0
/// ```
///
/// # Returns
/// - `f64::NAN` if `x` or `df` is NaN, or `df ≤ 0`.
/// - `0.0` for `x < 0`, and at `x = 0` unless `df ≤ 2`
///   (`0.5` for `df = 2`, `+∞` for `df < 2`).
pub fn chi_squared_pdf(x: f64, df: f64) -> f64 {
    if x.is_nan() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if x < 0.0 {
        return 0.0;
    }
    let half_df = df / 2.0;
    if x == 0.0 {
        return match half_df.partial_cmp(&1.0) {
            Some(std::cmp::Ordering::Less) => f64::INFINITY,
            Some(std::cmp::Ordering::Equal) => 0.5,
            _ => 0.0,
        };
    }
    let log_pdf = (half_df - 1.0) * x.ln()
        - x / 2.0
        - half_df * std::f64::consts::LN_2
        - ln_gamma(half_df);
    log_pdf.exp()
}

/// PDF of Student's t-distribution.
///
/// # Formula
/// ```text
/// f(t; df) = Γ((df+1)/2) / (√(df·π) · Γ(df/2)) · (1 + t²/df)^(−(df+1)/2)
/// ```
///
/// Approaches [`standard_normal_pdf`] as `df` grows.
pub fn t_distribution_pdf(t: f64, df: f64) -> f64 {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    let half_df = df / 2.0;
    let log_pdf = ln_gamma(half_df + 0.5)
        - 0.5 * (df * std::f64::consts::PI).ln()
        - ln_gamma(half_df)
        - (half_df + 0.5) * (1.0 + t * t / df).ln();
    log_pdf.exp()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // --- standard_normal_cdf ---

    #[test]
    fn test_cdf_at_zero() {
        assert!((standard_normal_cdf(0.0) - 0.5).abs() < 1e-7);
    }

    #[test]
    fn test_cdf_symmetry() {
        for &x in &[0.5, 1.0, 1.5, 2.0, 2.5, 3.0] {
            let sum = standard_normal_cdf(x) + standard_normal_cdf(-x);
            assert!(
                (sum - 1.0).abs() < 1e-7,
                "Φ({x}) + Φ(-{x}) = {sum}, expected 1.0"
            );
        }
    }

    #[test]
    fn test_cdf_sigma_rule() {
        // 68-95-99.7
        let within = |k: f64| 2.0 * standard_normal_cdf(k) - 1.0;
        assert!((within(1.0) - 0.6827).abs() < 1e-3);
        assert!((within(2.0) - 0.9545).abs() < 1e-3);
        assert!((within(3.0) - 0.9973).abs() < 1e-3);
    }

    #[test]
    fn test_cdf_extremes() {
        assert_eq!(standard_normal_cdf(f64::INFINITY), 1.0);
        assert_eq!(standard_normal_cdf(f64::NEG_INFINITY), 0.0);
        assert!(standard_normal_cdf(f64::NAN).is_nan());
    }

    // --- standard_normal_pdf ---

    #[test]
    fn test_pdf_peak_and_symmetry() {
        assert!((standard_normal_pdf(0.0) - 0.3989422804014327).abs() < 1e-15);
        assert_eq!(standard_normal_pdf(1.3), standard_normal_pdf(-1.3));
    }

    // --- ln_gamma ---

    #[test]
    fn test_ln_gamma_factorials() {
        let mut fact = 1.0_f64;
        for n in 1..=10 {
            fact *= n as f64;
            let lg = ln_gamma(n as f64 + 1.0);
            assert!((lg - fact.ln()).abs() < 1e-9, "ln Γ({}) = {lg}", n + 1);
        }
    }

    // --- chi_squared_pdf ---

    #[test]
    fn test_chi_squared_pdf_known_values() {
        // df = 2 is Exp(1/2): f(x) = e^(−x/2) / 2
        for &x in &[0.5, 1.0, 3.0, 7.5] {
            let expected = (-x / 2.0_f64).exp() / 2.0;
            assert!((chi_squared_pdf(x, 2.0) - expected).abs() < 1e-12);
        }
        // scipy.stats.chi2.pdf(5, 5) = 0.12204152134938738
        assert!((chi_squared_pdf(5.0, 5.0) - 0.12204152134938738).abs() < 1e-10);
        // scipy.stats.chi2.pdf(1, 1) = 0.24197072451914337
        assert!((chi_squared_pdf(1.0, 1.0) - 0.24197072451914337).abs() < 1e-10);
    }

    #[test]
    fn test_chi_squared_pdf_edges() {
        assert_eq!(chi_squared_pdf(-1.0, 5.0), 0.0);
        assert_eq!(chi_squared_pdf(0.0, 5.0), 0.0);
        assert_eq!(chi_squared_pdf(0.0, 2.0), 0.5);
        assert_eq!(chi_squared_pdf(0.0, 1.0), f64::INFINITY);
        assert!(chi_squared_pdf(1.0, 0.0).is_nan());
        assert!(chi_squared_pdf(f64::NAN, 3.0).is_nan());
    }

    // --- t_distribution_pdf ---

    #[test]
    fn test_t_pdf_known_values() {
        // df = 1 is Cauchy: f(t) = 1 / (π (1 + t²))
        for &t in &[0.0, 0.5, 2.0] {
            let expected = 1.0 / (std::f64::consts::PI * (1.0 + t * t));
            assert!((t_distribution_pdf(t, 1.0) - expected).abs() < 1e-12);
        }
        // scipy.stats.t.pdf(0, 5) = 0.3796066898224944
        assert!((t_distribution_pdf(0.0, 5.0) - 0.3796066898224944).abs() < 1e-10);
        assert_eq!(t_distribution_pdf(1.7, 5.0), t_distribution_pdf(-1.7, 5.0));
        assert!(t_distribution_pdf(0.0, -1.0).is_nan());
    }

    #[test]
    fn test_t_pdf_heavier_tails_than_normal() {
        assert!(t_distribution_pdf(0.0, 5.0) < standard_normal_pdf(0.0));
        assert!(t_distribution_pdf(3.0, 5.0) > standard_normal_pdf(3.0));
        // df → ∞ recovers N(0, 1)
        assert!((t_distribution_pdf(1.0, 1e6) - standard_normal_pdf(1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_ln_binomial_coefficient() {
        // C(20, 6) = 38760
        assert!((ln_binomial_coefficient(20, 6) - 38760.0_f64.ln()).abs() < 1e-8);
        assert!(ln_binomial_coefficient(5, 0).abs() < 1e-10);
        assert_eq!(ln_binomial_coefficient(3, 4), f64::NEG_INFINITY);
    }
}
