//! Categorical sampling over a weight sequence.

/// Returns the index selected by `draw` from a categorical distribution.
///
/// Walks `weights` in order, subtracting each from `draw` until the
/// running value goes non-positive, and returns that index. `draw` is
/// expected to be uniform in `[0, sum(weights))`; callers normalizing to
/// probabilities pass a uniform draw in `[0, 1)`.
///
/// If rounding makes the walk overrun the final weight, the last index is
/// returned instead of failing.
///
/// ### Panics
/// Panics if `weights` is empty.
pub fn categorical_index(weights: &[f32], mut draw: f32) -> usize {
    assert!(!weights.is_empty(), "cannot sample from zero weights");
    for (idx, &w) in weights.iter().enumerate() {
        draw -= w;
        if draw <= 0.0 {
            return idx;
        }
    }
    weights.len() - 1
}
