use crate::embedding::EmbeddingVector;

/// Cosine of the angle between `a` and `b`, in `[-1, 1]`.
///
/// Returns `0.0` when either vector has zero norm (e.g. an answer made only of stop words).
///
/// # Panics
///
/// Panics if the dimensions differ. Both vectors must come from the same embedder.
pub fn cosine_similarity(a: &EmbeddingVector, b: &EmbeddingVector) -> f32 {
    assert_eq!(
        a.dim(),
        b.dim(),
        "cosine_similarity called with vectors of different dimension"
    );

    if a.is_zero() || b.is_zero() {
        return 0.0;
    }

    // f64 so that very large or very small components neither overflow nor vanish.
    let (dot, norm_a, norm_b) = a.as_slice().iter().zip(b.as_slice()).fold(
        (0.0f64, 0.0f64, 0.0f64),
        |(dot, na, nb), (&x, &y)| {
            let (x, y) = (f64::from(x), f64::from(y));
            (dot + x * y, na + x * x, nb + y * y)
        },
    );

    (dot / (norm_a.sqrt() * norm_b.sqrt())) as f32
}

/// Floors negative similarity at 0 and caps float overshoot at 1. NaN becomes 0.
#[inline]
pub fn clamp_similarity(raw: f32) -> f32 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, 1.0)
}

/// Similarity as a percentage rounded to two decimal places, as shown to graders.
#[inline]
pub fn normalized_score(similarity: f32) -> f64 {
    (f64::from(similarity) * 100.0 * 100.0).round() / 100.0
}
