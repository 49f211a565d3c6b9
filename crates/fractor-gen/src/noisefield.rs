//! Coherent noise sampled onto a grid.
//!
//! A [`NoiseField`] is evaluated once, when it is built, and is read-only
//! afterwards. `resolution` is how many noise cells span the longer side of
//! the domain; each extra octave doubles the frequency and halves the
//! amplitude.

use fractor_core::{Point, Range};
use noise::{NoiseFn, Perlin};
use rand::{Rng, RngExt};

/// Largest value a field can hold; fields live in `[0, 1)`.
const MAX_VALUE: f64 = 1.0 - f64::EPSILON;

/// Precomputed Perlin noise over a rectangle, normalized to `[0, 1)`.
#[derive(Clone, Debug)]
pub struct NoiseField {
    domain: Range,
    values: Vec<f64>,
}

impl NoiseField {
    /// Sample noise over `domain`. The noise seed is drawn from `rng`.
    pub fn new(rng: &mut impl Rng, domain: Range, resolution: u32, octaves: u32) -> Self {
        assert!(resolution > 0, "NoiseField: resolution must be positive");
        assert!(octaves > 0, "NoiseField: need at least one octave");
        let perlin = Perlin::new(rng.random::<u32>());
        let span = domain.width().max(domain.height()).max(1) as f64;
        let scale = resolution as f64 / span;

        let values = domain
            .iter()
            .map(|p| {
                // Sample at cell centers so integer lattice points (where
                // Perlin noise is always zero) are never hit exactly.
                let x = (p.x - domain.min.x) as f64 + 0.5;
                let y = (p.y - domain.min.y) as f64 + 0.5;
                let mut total = 0.0;
                let mut norm = 0.0;
                let mut amplitude = 1.0;
                let mut frequency = scale;
                for _ in 0..octaves {
                    total += perlin.get([x * frequency, y * frequency]) * amplitude;
                    norm += amplitude;
                    amplitude /= 2.0;
                    frequency *= 2.0;
                }
                ((total / norm + 1.0) / 2.0).clamp(0.0, MAX_VALUE)
            })
            .collect();

        log::trace!("noise field over {domain}: resolution {resolution}, {octaves} octave(s)");
        Self { domain, values }
    }

    /// One-dimensional noise over `0..len`, read with [`at_line`](Self::at_line).
    pub fn line(rng: &mut impl Rng, len: i32, resolution: u32, octaves: u32) -> Self {
        Self::new(rng, Range::new(0, 0, len.max(0), 1), resolution, octaves)
    }

    pub fn domain(&self) -> Range {
        self.domain
    }

    /// Noise value at `p`, or `None` outside the domain.
    pub fn get(&self, p: Point) -> Option<f64> {
        if !self.domain.contains(p) {
            return None;
        }
        let x = (p.x - self.domain.min.x) as usize;
        let y = (p.y - self.domain.min.y) as usize;
        Some(self.values[y * self.domain.width() as usize + x])
    }

    /// Noise value at `p`. Panics outside the domain.
    pub fn at(&self, p: Point) -> f64 {
        match self.get(p) {
            Some(v) => v,
            None => panic!("NoiseField: {p} outside {}", self.domain),
        }
    }

    /// Value `i` of a field built with [`line`](Self::line).
    pub fn at_line(&self, i: i32) -> f64 {
        self.at(Point::new(self.domain.min.x + i, self.domain.min.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn values_are_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(5);
        let field = NoiseField::new(&mut rng, Range::new(0, 0, 40, 30), 6, 3);
        for p in field.domain().iter() {
            let v = field.at(p);
            assert!((0.0..1.0).contains(&v), "{v} at {p}");
        }
    }

    #[test]
    fn same_seed_same_field() {
        let domain = Range::new(3, 4, 23, 19);
        let a = NoiseField::new(&mut StdRng::seed_from_u64(9), domain, 6, 2);
        let b = NoiseField::new(&mut StdRng::seed_from_u64(9), domain, 6, 2);
        for p in domain.iter() {
            assert_eq!(a.at(p), b.at(p));
        }
    }

    #[test]
    fn field_is_not_flat() {
        let mut rng = StdRng::seed_from_u64(21);
        let field = NoiseField::new(&mut rng, Range::new(0, 0, 50, 50), 6, 1);
        let (lo, hi) = field
            .domain()
            .iter()
            .map(|p| field.at(p))
            .fold((1.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        assert!(hi - lo > 0.1);
    }

    #[test]
    fn line_fields() {
        let mut rng = StdRng::seed_from_u64(2);
        let line = NoiseField::line(&mut rng, 25, 3, 1);
        assert_eq!(line.domain().size(), Point::new(25, 1));
        assert!((0.0..1.0).contains(&line.at_line(24)));
        assert_eq!(line.get(Point::new(25, 0)), None);
    }
}
