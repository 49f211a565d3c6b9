//! Random helpers shared by the generators.
//!
//! All of them draw from a caller-supplied [`Rng`], so a generator seeded
//! the same way makes the same map.

use rand::{Rng, RngExt};

use crate::GenError;

/// One standard normal draw (Box–Muller).
fn standard_normal(rng: &mut impl Rng) -> f64 {
    // 1 - [0, 1) is (0, 1], so the logarithm stays finite.
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// A normal draw with mean `mu` and standard deviation `sigma`.
pub fn gauss(rng: &mut impl Rng, mu: f64, sigma: f64) -> f64 {
    mu + sigma * standard_normal(rng)
}

/// A normally distributed integer, rounded and clamped to `µ ± 2σ`.
///
/// Rolls beyond two standard deviations happen about 4% of the time; those
/// land on the nearest bound.
pub fn random_normal_int(rng: &mut impl Rng, mu: f64, sigma: f64) -> i32 {
    let lb = (mu - 2.0 * sigma).ceil() as i32;
    let ub = (mu + 2.0 * sigma).floor() as i32;
    let ret = (gauss(rng, mu, sigma) + 0.5).floor() as i32;
    if lb > ub {
        // σ too small for any integer to fit; µ rounded is the only answer.
        return (mu + 0.5).floor() as i32;
    }
    ret.clamp(lb, ub)
}

/// A normally distributed integer in `[lb, ub]`, clustered around the
/// midpoint. The bounds are taken to be 4σ apart and anything past them is
/// clamped.
pub fn random_normal_range(rng: &mut impl Rng, lb: i32, ub: i32) -> i32 {
    assert!(lb <= ub, "random_normal_range: {lb} > {ub}");
    let mu = (lb + ub) as f64 / 2.0;
    let sigma = (ub - lb) as f64 / 4.0;
    let ret = (gauss(rng, mu, sigma) + 0.5).floor() as i32;
    ret.clamp(lb, ub)
}

/// Like [`random_normal_range`], without rounding.
pub fn random_normal_f64(rng: &mut impl Rng, lb: f64, ub: f64) -> f64 {
    assert!(lb <= ub, "random_normal_f64: {lb} > {ub}");
    let mu = (lb + ub) / 2.0;
    let sigma = (ub - lb) / 4.0;
    gauss(rng, mu, sigma).clamp(lb, ub)
}

/// `n` distinct elements of `items`, in random order.
pub fn sample<T: Clone>(rng: &mut impl Rng, items: &[T], n: usize) -> Result<Vec<T>, GenError> {
    if n > items.len() {
        return Err(GenError::SampleTooLarge {
            wanted: n,
            available: items.len(),
        });
    }
    // Partial Fisher–Yates over an index table.
    let mut idx: Vec<usize> = (0..items.len()).collect();
    for i in 0..n {
        let j = rng.random_range(i..idx.len());
        idx.swap(i, j);
    }
    Ok(idx[..n].iter().map(|&i| items[i].clone()).collect())
}

/// One element of `items`, or `None` if it is empty.
pub fn choose<'a, T>(rng: &mut impl Rng, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.random_range(0..items.len()))
}
