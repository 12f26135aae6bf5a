//! Euclidean distance helpers.

/// Squared Euclidean distance between two equal-length vectors.
///
/// Dispatches to an unrolled path for the common 2D case.
///
/// # Panics
///
/// Debug-asserts that `a.len() == b.len()`.
#[inline]
pub fn sq_euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    match a.len() {
        2 => {
            let d0 = a[0] - b[0];
            let d1 = a[1] - b[1];
            d0 * d0 + d1 * d1
        }
        _ => a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| {
                let d = x - y;
                d * d
            })
            .sum(),
    }
}

/// Euclidean distance between two equal-length vectors.
#[inline]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    sq_euclidean(a, b).sqrt()
}
