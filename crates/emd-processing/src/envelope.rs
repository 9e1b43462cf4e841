//! One sifting iteration: envelopes, local mean and convergence statistic
//!
//! Upper and lower envelopes are fitted through the signal's maxima and
//! minima, each extended by one synthetic knot at both ends of the domain so
//! the curves cover every sample without diverging at the edges.

use crate::extrema::{find_extrema, Extrema, Extremum};
use crate::interpolation::{Interpolant, Interpolation};
use emd_core::EmdResult;
use tracing::trace;

/// Fewest maxima and fewest minima needed before envelopes are fitted
pub const MIN_ENVELOPE_EXTREMA: usize = 3;

/// Result of a single sift
#[derive(Debug, Clone, PartialEq)]
pub struct SiftOutcome {
    /// Sum over samples of `(mean / next)^2`; may be non-finite
    pub statistic: f64,
    /// Candidate with the local mean removed
    pub signal: Vec<f64>,
}

/// Knot coordinates for one envelope
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Knots {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl Knots {
    fn from_extrema(extrema: &[Extremum]) -> Self {
        Self {
            xs: extrema.iter().map(|e| e.index as f64).collect(),
            ys: extrema.iter().map(|e| e.value).collect(),
        }
    }

    fn prepend(&mut self, x: f64, y: f64) {
        self.xs.insert(0, x);
        self.ys.insert(0, y);
    }

    fn append(&mut self, x: f64, y: f64) {
        self.xs.push(x);
        self.ys.push(y);
    }

    /// Next index after the last one, continuing the last spacing
    fn extrapolated_x(&self) -> f64 {
        let n = self.xs.len();
        2.0 * self.xs[n - 1] - self.xs[n - 2]
    }

    fn first_y(&self) -> f64 {
        self.ys[0]
    }

    fn last_y(&self) -> f64 {
        self.ys[self.ys.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

/// Extrema extended with synthetic boundary knots
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeKnots {
    pub upper: Knots,
    pub lower: Knots,
}

impl EnvelopeKnots {
    /// Extend `extrema` of `h` at both boundaries
    ///
    /// Returns `None` when either list holds fewer than
    /// [`MIN_ENVELOPE_EXTREMA`] entries; `h` then counts as a finished IMF.
    pub fn extend(h: &[f64], extrema: &Extrema) -> Option<Self> {
        if extrema.maxima.len() < MIN_ENVELOPE_EXTREMA
            || extrema.minima.len() < MIN_ENVELOPE_EXTREMA
        {
            return None;
        }

        let len = h.len();
        let (first, last) = (h[0], h[len - 1]);

        let mut upper = Knots::from_extrema(&extrema.maxima);
        let mut lower = Knots::from_extrema(&extrema.minima);

        // Left edge: the sample itself joins the envelope it is heading away from
        if h[0] > h[1] {
            upper.prepend(0.0, first);
            let y = lower.first_y();
            lower.prepend(0.0, y);
        } else {
            let y = upper.first_y();
            upper.prepend(0.0, y);
            lower.prepend(0.0, first);
        }

        // Right edge: the other envelope continues its last spacing
        if h[len - 1] > h[len - 2] {
            upper.append(len as f64, last);
            let (x, y) = (lower.extrapolated_x(), lower.last_y());
            lower.append(x, y);
        } else {
            let (x, y) = (upper.extrapolated_x(), upper.last_y());
            upper.append(x, y);
            lower.append(len as f64, last);
        }

        Some(Self { upper, lower })
    }
}

/// Remove the local envelope mean from `h` once
///
/// A candidate without enough extrema for both envelopes is returned
/// unchanged with a statistic of exactly zero.
pub fn sift_once<I>(h: &[f64], interpolation: &I) -> EmdResult<SiftOutcome>
where
    I: Interpolation + ?Sized,
{
    let extrema = find_extrema(h);

    let Some(knots) = EnvelopeKnots::extend(h, &extrema) else {
        trace!(
            maxima = extrema.maxima.len(),
            minima = extrema.minima.len(),
            "too few extrema for envelopes, candidate is final"
        );
        return Ok(SiftOutcome {
            statistic: 0.0,
            signal: h.to_vec(),
        });
    };

    let upper = interpolation.fit(&knots.upper.xs, &knots.upper.ys)?;
    let lower = interpolation.fit(&knots.lower.xs, &knots.lower.ys)?;

    let mut signal = Vec::with_capacity(h.len());
    let mut statistic = 0.0;

    for (i, &value) in h.iter().enumerate() {
        let x = i as f64;
        let mean = 0.5 * (upper.evaluate(x) + lower.evaluate(x));
        let next = value - mean;

        // Zero `next` makes this term non-finite; left to propagate
        statistic += (mean / next).powi(2);
        signal.push(next);
    }

    Ok(SiftOutcome { statistic, signal })
}
