//! Lagrange interpolation and Reed-Solomon decoding.
//!
//! `interpolate` recovers the unique lowest-degree polynomial through a set
//! of points with distinct abscissas. `decode` extends that to received
//! words containing erasures and corrupted values, using the Berlekamp-Welch
//! reduction to an extended GCD.

extern crate alloc;
use alloc::{vec, vec::Vec};

use crate::mpc::polynomial::{egcd, Polynomial, Ring};
use crate::mpc::MathError;

/// Lagrange interpolation through `points`.
///
/// Builds `L(x) = sum_j y_j * prod_{i != j} (x - x_i)/(x_j - x_i)`, dividing
/// each basis polynomial by its scalar denominator as it is formed. Repeated
/// abscissas make a denominator vanish and surface as `NotInvertible`.
pub fn interpolate<R: Ring>(points: &[(R, R)]) -> Result<Polynomial<R>, MathError> {
    assert!(!points.is_empty(), "interpolation needs a point");
    let zero = points[0].0.zero_like();
    let one = points[0].0.one_like();
    let mut acc = Polynomial::zero(&zero);
    for (j, &(xj, yj)) in points.iter().enumerate() {
        let mut basis = Polynomial::constant(one);
        let mut denominator = one;
        for (i, &(xi, _)) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            basis = &basis * &Polynomial::new(vec![zero - xi, one]);
            denominator = denominator * (xj - xi);
        }
        acc = &acc + &basis.scale(yj * denominator.invert()?);
    }
    Ok(acc)
}

/// Berlekamp-Welch decoding of a Reed-Solomon word.
///
/// `points` holds one entry per evaluation position, with `None` marking an
/// erasure. `k` is the message length: the decoded polynomial has fewer than
/// `k` coefficients. With `n` surviving points and `d` erasures the decoder
/// corrects up to `(n - k - d)/2` corrupted survivors; anything beyond that
/// is reported as `DecodingFailed`.
pub fn decode<R: Ring>(points: &[(R, Option<R>)], k: usize) -> Result<Polynomial<R>, MathError> {
    assert!(k >= 1, "message length must be positive");
    let survivors: Vec<(R, R)> = points
        .iter()
        .filter_map(|&(x, y)| y.map(|y| (x, y)))
        .collect();
    let erased = points.len() - survivors.len();
    let n = survivors.len();
    if n < k || n + k < erased + 1 {
        return Err(MathError::DecodingFailed);
    }
    let zero = survivors[0].0.zero_like();
    let one = survivors[0].0.one_like();

    // locator of the surviving positions: g0(x) = prod (x - x_p)
    let mut g0 = Polynomial::constant(one);
    for &(x, _) in &survivors {
        g0 = &g0 * &Polynomial::new(vec![zero - x, one]);
    }
    // the word itself, as the interpolant through every survivor
    let g1 = interpolate(&survivors)?;

    let stop = (n + k - erased - 1) / 2;
    let seq = egcd(&g0, &g1, stop)?;
    let (r, _, v) = &seq[seq.len() - 1];
    if v.is_zero() {
        return Err(MathError::DecodingFailed);
    }
    let (q, rem) = r.divmod(v)?;
    if !rem.is_zero() || q.degree() >= k {
        return Err(MathError::DecodingFailed);
    }
    Ok(q)
}
