use num_bigint::BigUint;
use tracing::debug;

use crate::{FieldContext, FieldElement, Share, SharingError};

/// Performs a Lagrange interpolation in GF(p) at `target_x` for the
/// polynomial of degree `< points.len()` passing through `points`.
///
/// With at least `t` uncorrupted shares of one sharing and `target_x = 0`
/// the result is the secret. With fewer shares the value is well defined but
/// says nothing about the secret; callers compare the point count against
/// the threshold themselves.
///
/// Two points with the same x-coordinate make a basis denominator vanish and
/// yield [`SharingError::DivisionByZero`].
pub fn interpolate_at(
    points: &[Share],
    target_x: &FieldElement,
    field: &FieldContext,
) -> Result<FieldElement, SharingError> {
    if !field.contains(target_x)
        || points
            .iter()
            .any(|s| !field.contains(&s.x) || !field.contains(&s.y))
    {
        return Err(SharingError::InvalidParameters(format!(
            "interpolation points must belong to GF({})",
            field.modulus()
        )));
    }

    let mut acc = field.zero();
    for (i, share_i) in points.iter().enumerate() {
        let mut num = field.one();
        let mut den = field.one();

        for (j, share_j) in points.iter().enumerate() {
            if i != j {
                num *= &(target_x - &share_j.x);
                den *= &(&share_i.x - &share_j.x);
            }
        }
        acc += &(&share_i.y * &num.checked_div(&den)?);
    }

    debug!(points = points.len(), "interpolated");
    Ok(acc)
}

/// Recovers the constant term from `shares` and converts it out of the field.
pub fn reconstruct_secret(shares: &[Share], field: &FieldContext) -> Result<BigUint, SharingError> {
    interpolate_at(shares, &field.zero(), field).map(|s| s.to_biguint())
}
