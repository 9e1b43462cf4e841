//! Envelope interpolation strategies
//!
//! The sifter only needs something that can be fitted through a sparse set
//! of knots and evaluated at any real abscissa, including slightly outside
//! the knot range. Two strategies ship with the crate:
//!
//! | Strategy | Smoothness | Overshoot | Outside the knots          |
//! |----------|------------|-----------|----------------------------|
//! | Linear   | C0         | None      | extends the edge segment   |
//! | PCHIP    | C1         | None      | extends the edge cubic     |
//!
//! PCHIP uses Fritsch-Carlson slopes: the weighted harmonic mean of adjacent
//! secants where they share a sign, zero otherwise, and a shape-preserving
//! one-sided formula at both ends.
//!
//! Any `Fn(&[f64], &[f64]) -> EmdResult<C>` with `C: Interpolant` is also an
//! [`Interpolation`], so ad-hoc strategies can be injected as closures.

use emd_core::{interpolation_error, EmdResult};
use serde::{Deserialize, Serialize};

/// A fitted curve that can be evaluated at arbitrary `x`
pub trait Interpolant {
    fn evaluate(&self, x: f64) -> f64;
}

/// Factory fitting an [`Interpolant`] through `(xs, ys)` knots
///
/// `xs` must be strictly increasing and as long as `ys`.
pub trait Interpolation {
    type Curve: Interpolant;

    fn fit(&self, xs: &[f64], ys: &[f64]) -> EmdResult<Self::Curve>;
}

impl<F, C> Interpolation for F
where
    F: Fn(&[f64], &[f64]) -> EmdResult<C>,
    C: Interpolant,
{
    type Curve = C;

    fn fit(&self, xs: &[f64], ys: &[f64]) -> EmdResult<C> {
        self(xs, ys)
    }
}

/// Check knot shape shared by all shipped strategies
fn validate_knots(xs: &[f64], ys: &[f64], context: &str) -> EmdResult<()> {
    if xs.len() != ys.len() {
        return Err(interpolation_error!(
            "{}: {} x-coordinates but {} values",
            context,
            xs.len(),
            ys.len()
        ));
    }

    if xs.len() < 2 {
        return Err(interpolation_error!(
            "{}: need at least 2 knots, got {}",
            context,
            xs.len()
        ));
    }

    // `!(a < b)` also rejects NaN
    if let Some(pos) = xs.windows(2).position(|w| !(w[0] < w[1])) {
        return Err(interpolation_error!(
            "{}: x-coordinates not strictly increasing at knot {}",
            context,
            pos + 1
        ));
    }

    Ok(())
}

/// Segment whose polynomial is used at `x`; edge segments cover the outside
#[inline]
fn segment_index(xs: &[f64], x: f64) -> usize {
    xs.partition_point(|&knot| knot <= x)
        .saturating_sub(1)
        .min(xs.len() - 2)
}

/// Piecewise-linear interpolation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinearInterpolation;

/// Piecewise-linear curve through validated knots
#[derive(Debug, Clone)]
pub struct LinearSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearSpline {
    pub fn new(xs: &[f64], ys: &[f64]) -> EmdResult<Self> {
        validate_knots(xs, ys, "linear spline")?;
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }
}

impl Interpolant for LinearSpline {
    fn evaluate(&self, x: f64) -> f64 {
        let i = segment_index(&self.xs, x);
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);

        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}

impl Interpolation for LinearInterpolation {
    type Curve = LinearSpline;

    fn fit(&self, xs: &[f64], ys: &[f64]) -> EmdResult<LinearSpline> {
        LinearSpline::new(xs, ys)
    }
}

/// Shape-preserving piecewise cubic Hermite interpolation (PCHIP)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PchipInterpolation;

/// PCHIP curve: knots plus Fritsch-Carlson slopes
#[derive(Debug, Clone)]
pub struct PchipSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    slopes: Vec<f64>,
}

impl PchipSpline {
    pub fn new(xs: &[f64], ys: &[f64]) -> EmdResult<Self> {
        validate_knots(xs, ys, "pchip spline")?;
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            slopes: Self::compute_slopes(xs, ys),
        })
    }

    /// Slope at each knot
    pub fn slopes(&self) -> &[f64] {
        &self.slopes
    }

    fn compute_slopes(x: &[f64], y: &[f64]) -> Vec<f64> {
        let n = x.len();
        let mut slopes = vec![0.0; n];

        if n == 2 {
            let secant = (y[1] - y[0]) / (x[1] - x[0]);
            slopes[0] = secant;
            slopes[1] = secant;
            return slopes;
        }

        let secants: Vec<f64> = (0..n - 1)
            .map(|i| (y[i + 1] - y[i]) / (x[i + 1] - x[i]))
            .collect();

        for i in 1..n - 1 {
            let s0 = secants[i - 1];
            let s1 = secants[i];

            if s0 * s1 <= 0.0 {
                slopes[i] = 0.0;
            } else {
                let h0 = x[i] - x[i - 1];
                let h1 = x[i + 1] - x[i];
                let w1 = 2.0 * h1 + h0;
                let w2 = h1 + 2.0 * h0;
                slopes[i] = (w1 + w2) / (w1 / s0 + w2 / s1);
            }
        }

        slopes[0] = Self::endpoint_slope(secants[0], secants[1], x[1] - x[0], x[2] - x[1]);
        slopes[n - 1] = Self::endpoint_slope(
            secants[n - 2],
            secants[n - 3],
            x[n - 1] - x[n - 2],
            x[n - 2] - x[n - 3],
        );

        slopes
    }

    /// One-sided three-point slope, clipped to keep the end segment monotone
    fn endpoint_slope(s1: f64, s2: f64, h1: f64, h2: f64) -> f64 {
        let d = ((2.0 * h1 + h2) * s1 - h1 * s2) / (h1 + h2);

        if d * s1 <= 0.0 {
            0.0
        } else if s1 * s2 < 0.0 && d.abs() > 3.0 * s1.abs() {
            3.0 * s1
        } else {
            d
        }
    }
}

impl Interpolant for PchipSpline {
    fn evaluate(&self, x: f64) -> f64 {
        let i = segment_index(&self.xs, x);
        let h = self.xs[i + 1] - self.xs[i];
        let t = (x - self.xs[i]) / h;
        let t2 = t * t;
        let t3 = t2 * t;

        // Hermite basis
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        h00 * self.ys[i]
            + h10 * h * self.slopes[i]
            + h01 * self.ys[i + 1]
            + h11 * h * self.slopes[i + 1]
    }
}

impl Interpolation for PchipInterpolation {
    type Curve = PchipSpline;

    fn fit(&self, xs: &[f64], ys: &[f64]) -> EmdResult<PchipSpline> {
        PchipSpline::new(xs, ys)
    }
}

/// Strategy selector usable from configuration files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationKind {
    Linear,
    #[default]
    Pchip,
}

/// Curve fitted by an [`InterpolationKind`]
#[derive(Debug, Clone)]
pub enum Spline {
    Linear(LinearSpline),
    Pchip(PchipSpline),
}

impl Interpolant for Spline {
    fn evaluate(&self, x: f64) -> f64 {
        match self {
            Spline::Linear(spline) => spline.evaluate(x),
            Spline::Pchip(spline) => spline.evaluate(x),
        }
    }
}

impl Interpolation for InterpolationKind {
    type Curve = Spline;

    fn fit(&self, xs: &[f64], ys: &[f64]) -> EmdResult<Spline> {
        match self {
            InterpolationKind::Linear => LinearSpline::new(xs, ys).map(Spline::Linear),
            InterpolationKind::Pchip => PchipSpline::new(xs, ys).map(Spline::Pchip),
        }
    }
}

impl std::fmt::Display for InterpolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterpolationKind::Linear => write!(f, "linear"),
            InterpolationKind::Pchip => write!(f, "pchip"),
        }
    }
}

impl std::str::FromStr for InterpolationKind {
    type Err = emd_core::EmdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(InterpolationKind::Linear),
            "pchip" | "cubic" => Ok(InterpolationKind::Pchip),
            other => Err(emd_core::config_error!(
                "unknown interpolation '{}', expected 'linear' or 'pchip'",
                other
            )),
        }
    }
}
