//! Initial population layouts in the unit hypercube.

use nalgebra::DVector;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::domain::InitMethod;

/// Build `members` points in `[0, 1)^dim` using the chosen layout.
pub fn init_population<R: Rng + ?Sized>(
    method: InitMethod,
    rng: &mut R,
    members: usize,
    dim: usize,
) -> Vec<DVector<f64>> {
    match method {
        InitMethod::LatinHypercube => latin_hypercube(rng, members, dim),
        InitMethod::Random => (0..members)
            .map(|_| DVector::from_fn(dim, |_, _| rng.r#gen::<f64>()))
            .collect(),
    }
}

/// Latin hypercube: along every dimension, each of the `members` equal-width
/// strata holds exactly one point.
pub fn latin_hypercube<R: Rng + ?Sized>(rng: &mut R, members: usize, dim: usize) -> Vec<DVector<f64>> {
    let mut out = vec![DVector::zeros(dim); members];
    if members == 0 {
        return out;
    }
    let segment = 1.0 / members as f64;
    let mut strata: Vec<usize> = (0..members).collect();

    for j in 0..dim {
        strata.shuffle(rng);
        for (member, &stratum) in out.iter_mut().zip(strata.iter()) {
            member[j] = (stratum as f64 + rng.r#gen::<f64>()) * segment;
        }
    }
    out
}
