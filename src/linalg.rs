//! Exact linear algebra over GF(p).

use crate::{FieldContext, FieldElement, SharingError};

/// Solves `matrix * u = rhs` by Gauss-Jordan elimination with row interchange.
///
/// The system may be square, over- or underdetermined. A consistent system
/// yields one solution with every free unknown set to zero; an inconsistent
/// one yields `None`.
pub fn solve(
    field: &FieldContext,
    mut matrix: Vec<Vec<FieldElement>>,
    mut rhs: Vec<FieldElement>,
) -> Result<Option<Vec<FieldElement>>, SharingError> {
    let rows = matrix.len();
    if rhs.len() != rows {
        return Err(SharingError::InvalidParameters(format!(
            "{} equations but {} right-hand sides",
            rows,
            rhs.len()
        )));
    }
    let cols = matrix.first().map_or(0, |r| r.len());
    if matrix.iter().any(|r| r.len() != cols) {
        return Err(SharingError::InvalidParameters(
            "ragged coefficient matrix".to_string(),
        ));
    }

    let mut pivots = Vec::with_capacity(cols.min(rows));
    let mut row = 0;
    for col in 0..cols {
        if row == rows {
            break;
        }
        let Some(pivot_row) = (row..rows).find(|&r| !matrix[r][col].is_zero()) else {
            continue;
        };
        matrix.swap(row, pivot_row);
        rhs.swap(row, pivot_row);

        let pivot_inv = matrix[row][col].inv()?;
        for entry in matrix[row].iter_mut().skip(col) {
            *entry *= &pivot_inv;
        }
        rhs[row] *= &pivot_inv;

        for r in 0..rows {
            if r == row || matrix[r][col].is_zero() {
                continue;
            }
            let factor = matrix[r][col].clone();
            for c in col..cols {
                let delta = &factor * &matrix[row][c];
                matrix[r][c] -= &delta;
            }
            let delta = &factor * &rhs[row];
            rhs[r] -= &delta;
        }

        pivots.push(col);
        row += 1;
    }

    // Rows without a pivot read 0 = rhs.
    if rhs[row..].iter().any(|b| !b.is_zero()) {
        return Ok(None);
    }

    let mut solution = vec![field.zero(); cols];
    for (r, &col) in pivots.iter().enumerate() {
        solution[col] = rhs[r].clone();
    }
    Ok(Some(solution))
}
