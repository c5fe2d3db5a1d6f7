/// Generate a random `f64` in the range `[low, high]`.
///
/// Interpolates between the ends instead of scaling the width, so boxes
/// wider than `f64::MAX` do not overflow.
#[inline]
pub(crate) fn f64_range(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    let u = rng.f64();
    (low * (1.0 - u) + high * u).clamp(low, high)
}

/// Build a generator from an optional seed, falling back to entropy.
pub(crate) fn seeded(seed: Option<u64>) -> fastrand::Rng {
    seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed)
}
