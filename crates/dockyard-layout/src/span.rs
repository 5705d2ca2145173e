// Weighted spans: the translation between pixel extents and the
// dimensionless weights siblings share. A container with N children keeps
// weights that sum to N, so a balanced child has weight 1.

/// Drift tolerated between a weight sum and the child count before a solve
/// pass renormalizes.
pub(crate) const WEIGHT_EPSILON: f32 = 1e-4;

/// One child's share of its container along the container's axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedSpan {
    pub weight: f32,
    pub count: usize,
    /// Smallest pixel extent the child may be dragged down to.
    pub min: f32,
}

impl WeightedSpan {
    pub fn new(weight: f32, count: usize) -> Self {
        Self { weight, count, min: 0.0 }
    }

    pub fn with_min(self, min: f32) -> Self {
        Self { min, ..self }
    }

    /// Share of the available size, in `0..=1`.
    pub fn fraction(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        self.weight / self.count as f32
    }

    pub fn to_pixels(&self, available: f32) -> f32 {
        available * self.fraction()
    }

    /// Weight that gives `pixels` out of `available` among `count` siblings.
    pub fn from_pixels(pixels: f32, available: f32, count: usize) -> Option<Self> {
        if !(available > 0.0) || count == 0 {
            return None;
        }
        Some(Self::new(pixels / available * count as f32, count))
    }

    /// Weight change equivalent to moving a boundary by `delta` pixels.
    pub fn delta_weight(delta: f32, available: f32, count: usize) -> f32 {
        if !(available > 0.0) {
            return 0.0;
        }
        delta / available * count as f32
    }

    /// True if a child currently `pixels` long can absorb `delta` and stay
    /// at or above its minimum.
    pub fn admits(&self, pixels: f32, delta: f32) -> bool {
        pixels + delta >= self.min
    }

    /// Display form, rounded to four decimals. The stored weight is untouched.
    pub fn fr(&self) -> String {
        format!("{:.4}fr", self.weight)
    }
}

pub(crate) fn is_valid_weight(w: f32) -> bool {
    w.is_finite() && w > 0.0
}

/// Scale `weights` so they sum to their count. Any invalid entry resets the
/// whole array to balanced, since proportions can't be recovered from it.
pub(crate) fn normalize(weights: &mut [f32]) {
    let count = weights.len();
    if count == 0 {
        return;
    }
    if count == 1 || !weights.iter().copied().all(is_valid_weight) {
        weights.iter_mut().for_each(|w| *w = 1.0);
        return;
    }
    let sum: f32 = weights.iter().sum();
    if (sum - count as f32).abs() <= WEIGHT_EPSILON {
        return;
    }
    let scale = count as f32 / sum;
    weights.iter_mut().for_each(|w| *w *= scale);
}

/// Remove the weight at `index`, folding it into the next sibling (or the
/// previous one when `index` was last), then renormalize.
pub(crate) fn fold_removed(weights: &mut Vec<f32>, index: usize) {
    let removed = weights.remove(index);
    if weights.is_empty() {
        return;
    }
    let neighbor = if index < weights.len() { index } else { index - 1 };
    weights[neighbor] += removed;
    normalize(weights);
}

/// Halve the weight at `index` and insert the other half beside it
/// (`before` puts it at `index`, otherwise at `index + 1`), then renormalize.
/// Returns the index the new weight landed at.
pub(crate) fn split_at(weights: &mut Vec<f32>, index: usize, before: bool) -> usize {
    let half = weights[index] / 2.0;
    weights[index] = half;
    let at = if before { index } else { index + 1 };
    weights.insert(at, half);
    normalize(weights);
    at
}

/// Re-derive weights from measured extents: `extent / total × count`.
pub(crate) fn rederive(extents: &[f32], total: f32) -> Option<Vec<f32>> {
    let count = extents.len();
    if count == 0 || !(total > 0.0) {
        return None;
    }
    if count == 1 {
        return Some(vec![1.0]);
    }
    let weights: Vec<f32> = extents
        .iter()
        .map(|&e| e / total * count as f32)
        .collect();
    if !weights.iter().copied().all(is_valid_weight) {
        return None;
    }
    Some(weights)
}
