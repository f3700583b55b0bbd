//! Berlekamp-Welch decoding of Reed-Solomon style evaluations.
//!
//! Given `n` points of which at most `e` carry a wrong y-value, recovers the
//! message polynomial `f` with `deg f < k` as long as `n >= k + 2e`.
//!
//! Unknowns are an error locator `E(x)` of degree `e`, fixed monic, and
//! `Q(x) = f(x) * E(x)` of degree `< k + e`. Every point contributes
//!
//! ```text
//! sum_j q_j x_i^j - y_i * sum_{j<e} e_j x_i^j = y_i * x_i^e
//! ```
//!
//! and `f = Q / E` once the system is solved.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::{linalg, FieldContext, Polynomial, Share, SharingError};

/// Recovers the message polynomial (`deg < k`) from `points`, tolerating up
/// to `e` corrupted y-values.
///
/// Fails with [`SharingError::InsufficientData`] when fewer than `k + 2e`
/// points are given, [`SharingError::DecodeError`] on duplicate x-coordinates
/// or when the data holds more errors than `e` allows, and
/// [`SharingError::InvalidParameters`] for `k == 0` or points outside `field`.
pub fn decode(
    points: &[Share],
    k: usize,
    e: usize,
    field: &FieldContext,
) -> Result<Polynomial, SharingError> {
    if k == 0 {
        return Err(SharingError::InvalidParameters(
            "message degree bound k must be at least 1".to_string(),
        ));
    }
    if points
        .iter()
        .any(|s| !field.contains(&s.x) || !field.contains(&s.y))
    {
        return Err(SharingError::InvalidParameters(format!(
            "decoding points must belong to GF({})",
            field.modulus()
        )));
    }

    let n = points.len();
    let required = k + 2 * e;
    if n < required {
        return Err(SharingError::InsufficientData {
            required,
            available: n,
        });
    }

    let mut seen = HashSet::with_capacity(n);
    if !points.iter().all(|s| seen.insert(s.x.value())) {
        return Err(SharingError::DecodeError(
            "duplicate x-coordinate among points".to_string(),
        ));
    }

    let num_q = k + e;
    let mut matrix = Vec::with_capacity(n);
    let mut rhs = Vec::with_capacity(n);
    for Share { x, y } in points {
        let mut row = Vec::with_capacity(num_q + e);
        let mut x_pow = field.one();
        for _ in 0..num_q {
            row.push(x_pow.clone());
            x_pow *= x;
        }

        let neg_y = -y;
        let mut x_pow = field.one();
        for _ in 0..e {
            row.push(&neg_y * &x_pow);
            x_pow *= x;
        }

        matrix.push(row);
        rhs.push(y * &x.pow(e as u64));
    }

    let solution = linalg::solve(field, matrix, rhs)?.ok_or_else(|| {
        warn!(n, k, e, "berlekamp-welch system is inconsistent");
        SharingError::DecodeError("linear system has no solution".to_string())
    })?;

    let q = Polynomial::new(field, solution[..num_q].to_vec());
    let mut locator = solution[num_q..].to_vec();
    locator.push(field.one());
    let locator = Polynomial::new(field, locator);

    let (message, remainder) = q.div_rem(&locator)?;
    if !remainder.is_zero() {
        warn!(n, k, e, "error locator does not divide Q");
        return Err(SharingError::DecodeError(
            "errors exceed correction capacity".to_string(),
        ));
    }

    debug!(n, k, e, degree = ?message.degree(), "decoded message polynomial");
    Ok(message)
}
