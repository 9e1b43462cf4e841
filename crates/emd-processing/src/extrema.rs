//! Local extrema detection
//!
//! Plateaus are tolerated on one side only: a sample equal to one neighbour
//! must be strictly above (or below) the other to count, so no sample is
//! ever classified as both a maximum and a minimum.

/// A located extremum: sample index and value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremum {
    pub index: usize,
    pub value: f64,
}

/// Local maxima and minima of a signal, each strictly increasing in index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extrema {
    pub maxima: Vec<Extremum>,
    pub minima: Vec<Extremum>,
}

impl Extrema {
    /// Total number of extrema of either kind
    pub fn len(&self) -> usize {
        self.maxima.len() + self.minima.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maxima.is_empty() && self.minima.is_empty()
    }
}

#[inline]
fn is_maximum(prev: f64, cur: f64, next: f64) -> bool {
    (prev < cur && next <= cur) || (prev <= cur && next < cur)
}

#[inline]
fn is_minimum(prev: f64, cur: f64, next: f64) -> bool {
    (prev >= cur && next > cur) || (prev > cur && next >= cur)
}

/// Classify every interior sample of `x`
pub fn find_extrema(x: &[f64]) -> Extrema {
    let mut extrema = Extrema::default();

    for (offset, window) in x.windows(3).enumerate() {
        let (prev, cur, next) = (window[0], window[1], window[2]);
        let index = offset + 1;

        if is_maximum(prev, cur, next) {
            extrema.maxima.push(Extremum { index, value: cur });
        } else if is_minimum(prev, cur, next) {
            extrema.minima.push(Extremum { index, value: cur });
        }
    }

    extrema
}

/// Count interior extrema of either kind
pub fn count_extrema(x: &[f64]) -> usize {
    x.windows(3)
        .filter(|w| is_maximum(w[0], w[1], w[2]) || is_minimum(w[0], w[1], w[2]))
        .count()
}

/// True when `x` has zero or one interior extremum
///
/// Stops scanning as soon as a second extremum is seen.
pub fn has_at_most_one_extremum(x: &[f64]) -> bool {
    let mut extremum_count = 0;

    for w in x.windows(3) {
        if is_maximum(w[0], w[1], w[2]) || is_minimum(w[0], w[1], w[2]) {
            extremum_count += 1;
        }

        if extremum_count > 1 {
            return false;
        }
    }

    true
}
