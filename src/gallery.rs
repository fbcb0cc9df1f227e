//! Theoretical density curves for the distribution gallery.
//!
//! The gallery shows eight fixed distributions, each evaluated on its own
//! plotting domain. Besides the sampling families of
//! [`DistributionSpec`], it covers three shapes that are only ever drawn
//! as curves:
//!
//! | Shape | Parameters | Mean |
//! |---|---|---|
//! | Log-normal | μ, σ of ln X | exp(μ + σ²/2) |
//! | Chi-squared | k | k |
//! | Student's t | ν | 0 for ν > 1, undefined otherwise |
//!
//! The t curve carries N(0, 1) as a reference overlay.
//!
//! ```
//! use prob_laws::gallery::{curve, GalleryEntry};
//!
//! let t = curve(GalleryEntry::StudentT, 201).unwrap();
//! assert_eq!(t.xs.len(), 201);
//! assert!(t.reference.is_some());
//! ```

use serde::Serialize;

use crate::distributions::DistributionSpec;
use crate::error::{Result, SimulationError};
use crate::special;

/// A density that can be drawn in the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum GalleryShape {
    /// One of the sampling families.
    Standard { spec: DistributionSpec },
    /// X with ln X ~ N(μ, σ²).
    LogNormal { mu: f64, sigma: f64 },
    /// Chi-squared with `df` degrees of freedom.
    ChiSquared { df: f64 },
    /// Student's t with `df` degrees of freedom.
    StudentT { df: f64 },
}

impl GalleryShape {
    /// # Errors
    /// [`SimulationError::InvalidParameter`] for a non-finite μ, σ ≤ 0,
    /// df ≤ 0, or an invalid underlying spec.
    pub fn validate(&self) -> Result<()> {
        match *self {
            GalleryShape::Standard { spec } => spec.validate(),
            GalleryShape::LogNormal { mu, sigma } => {
                if !mu.is_finite() || !sigma.is_finite() || sigma <= 0.0 {
                    return Err(SimulationError::invalid(format!(
                        "LogNormal requires finite μ and σ > 0, got μ={mu}, σ={sigma}"
                    )));
                }
                Ok(())
            }
            GalleryShape::ChiSquared { df } | GalleryShape::StudentT { df } => {
                if !df.is_finite() || df <= 0.0 {
                    return Err(SimulationError::invalid(format!(
                        "degrees of freedom must be finite and > 0, got df={df}"
                    )));
                }
                Ok(())
            }
        }
    }

    /// PDF (or PMF for discrete specs) at `x`.
    pub fn density(&self, x: f64) -> f64 {
        match *self {
            GalleryShape::Standard { spec } => spec.density(x),
            GalleryShape::LogNormal { mu, sigma } => lognormal_pdf(x, mu, sigma),
            GalleryShape::ChiSquared { df } => special::chi_squared_pdf(x, df),
            GalleryShape::StudentT { df } => special::t_distribution_pdf(x, df),
        }
    }

    /// Theoretical mean, `None` where it does not exist (t with ν ≤ 1).
    pub fn mean(&self) -> Option<f64> {
        match *self {
            GalleryShape::Standard { spec } => Some(spec.mean()),
            GalleryShape::LogNormal { mu, sigma } => Some((mu + sigma * sigma / 2.0).exp()),
            GalleryShape::ChiSquared { df } => Some(df),
            GalleryShape::StudentT { df } => (df > 1.0).then_some(0.0),
        }
    }

    /// Whether the curve should be drawn as bars.
    pub fn is_discrete(&self) -> bool {
        matches!(self, GalleryShape::Standard { spec } if spec.is_discrete())
    }
}

/// (1/(xσ√(2π))) · exp(−(ln x − μ)²/(2σ²)) for x > 0.
fn lognormal_pdf(x: f64, mu: f64, sigma: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    let z = (x.ln() - mu) / sigma;
    special::standard_normal_pdf(z) / (x * sigma)
}

/// Where a gallery curve is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Domain {
    /// `resolution` evenly spaced points from `start` to `end`, both included.
    Continuous { start: f64, end: f64 },
    /// Every integer from `first` to `last`, both included.
    Discrete { first: u64, last: u64 },
}

impl Domain {
    /// Evaluation points. `resolution` is ignored for discrete domains.
    ///
    /// # Errors
    /// [`SimulationError::InvalidParameter`] if a continuous domain is
    /// asked for fewer than 2 points.
    pub fn points(&self, resolution: usize) -> Result<Vec<f64>> {
        match *self {
            Domain::Continuous { start, end } => {
                if resolution < 2 {
                    return Err(SimulationError::invalid(format!(
                        "a continuous curve needs at least 2 points, got {resolution}"
                    )));
                }
                let step = (end - start) / (resolution - 1) as f64;
                let mut xs: Vec<f64> = (0..resolution).map(|i| start + step * i as f64).collect();
                // Pin the right edge against accumulated rounding.
                xs[resolution - 1] = end;
                Ok(xs)
            }
            Domain::Discrete { first, last } => Ok((first..=last).map(|k| k as f64).collect()),
        }
    }
}

/// The gallery's fixed distributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GalleryEntry {
    /// N(0, 1) on [−4, 4].
    Normal,
    /// U(0, 2) on [−0.5, 2.5].
    Uniform,
    /// B(20, 0.3) on 0..=20.
    Binomial,
    /// Poisson(5) on 0..=14.
    Poisson,
    /// Exponential(λ = 1) on [0, 5].
    Exponential,
    /// LogNormal(0, 0.5) on [0.01, 5].
    LogNormal,
    /// χ²(5) on [0.01, 15].
    ChiSquared,
    /// t(5) on [−4, 4], against N(0, 1).
    StudentT,
}

const STANDARD_NORMAL: DistributionSpec = DistributionSpec::Normal {
    mean: 0.0,
    std_dev: 1.0,
};

impl GalleryEntry {
    /// Gallery order.
    pub const ALL: [GalleryEntry; 8] = [
        GalleryEntry::Normal,
        GalleryEntry::Uniform,
        GalleryEntry::Binomial,
        GalleryEntry::Poisson,
        GalleryEntry::Exponential,
        GalleryEntry::LogNormal,
        GalleryEntry::ChiSquared,
        GalleryEntry::StudentT,
    ];

    /// The density drawn for this entry.
    pub fn shape(self) -> GalleryShape {
        let standard = |spec| GalleryShape::Standard { spec };
        match self {
            GalleryEntry::Normal => standard(STANDARD_NORMAL),
            GalleryEntry::Uniform => standard(DistributionSpec::Uniform {
                low: 0.0,
                high: 2.0,
            }),
            GalleryEntry::Binomial => standard(DistributionSpec::Binomial {
                trials: 20,
                success_prob: 0.3,
            }),
            GalleryEntry::Poisson => standard(DistributionSpec::Poisson { rate: 5.0 }),
            GalleryEntry::Exponential => standard(DistributionSpec::Exponential { scale: 1.0 }),
            GalleryEntry::LogNormal => GalleryShape::LogNormal {
                mu: 0.0,
                sigma: 0.5,
            },
            GalleryEntry::ChiSquared => GalleryShape::ChiSquared { df: 5.0 },
            GalleryEntry::StudentT => GalleryShape::StudentT { df: 5.0 },
        }
    }

    /// Plotting window.
    pub fn domain(self) -> Domain {
        match self {
            GalleryEntry::Normal | GalleryEntry::StudentT => Domain::Continuous {
                start: -4.0,
                end: 4.0,
            },
            GalleryEntry::Uniform => Domain::Continuous {
                start: -0.5,
                end: 2.5,
            },
            GalleryEntry::Binomial => Domain::Discrete { first: 0, last: 20 },
            GalleryEntry::Poisson => Domain::Discrete { first: 0, last: 14 },
            GalleryEntry::Exponential => Domain::Continuous {
                start: 0.0,
                end: 5.0,
            },
            GalleryEntry::LogNormal => Domain::Continuous {
                start: 0.01,
                end: 5.0,
            },
            GalleryEntry::ChiSquared => Domain::Continuous {
                start: 0.01,
                end: 15.0,
            },
        }
    }

    /// Curve drawn underneath for comparison, if any.
    pub fn reference(self) -> Option<GalleryShape> {
        match self {
            GalleryEntry::StudentT => Some(GalleryShape::Standard {
                spec: STANDARD_NORMAL,
            }),
            _ => None,
        }
    }
}

/// A gallery curve ready to plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryCurve {
    pub entry: GalleryEntry,
    pub shape: GalleryShape,
    pub xs: Vec<f64>,
    pub density: Vec<f64>,
    /// Reference density at the same `xs`.
    pub reference: Option<Vec<f64>>,
    /// Marker position; `None` where the mean is undefined.
    pub mean: Option<f64>,
}

/// Evaluates `shape` at each of `xs`.
///
/// # Errors
/// [`SimulationError::InvalidParameter`] if the shape's parameters are invalid.
pub fn density_curve(shape: &GalleryShape, xs: &[f64]) -> Result<Vec<f64>> {
    shape.validate()?;
    Ok(xs.iter().map(|&x| shape.density(x)).collect())
}

/// Builds the plotted curve for `entry` with `resolution` points on a
/// continuous domain.
///
/// # Errors
/// [`SimulationError::InvalidParameter`] if `resolution < 2` for a
/// continuous entry.
pub fn curve(entry: GalleryEntry, resolution: usize) -> Result<GalleryCurve> {
    let shape = entry.shape();
    let xs = entry.domain().points(resolution)?;
    let density = density_curve(&shape, &xs)?;
    let reference = entry
        .reference()
        .map(|reference| density_curve(&reference, &xs))
        .transpose()?;
    Ok(GalleryCurve {
        entry,
        shape,
        mean: shape.mean(),
        xs,
        density,
        reference,
    })
}

// ============================================================================
// Tests
// ============================================================================
