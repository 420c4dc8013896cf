use num::{BigRational, Zero};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EliminationError {
    #[error("system is inconsistent, an equation reduces to 0 = {0}")]
    Inconsistent(BigRational),

    #[error("system has rank {rank}, {unknowns} needed for a unique solution")]
    Underdetermined { rank: usize, unknowns: usize },
}

/// Gauss-Jordan elimination over exact rationals.
///
/// Each row is an augmented equation `a_0 .. a_{n-1} | b` with `n = unknowns`.
/// More rows than unknowns are fine as long as the extra ones are consistent.
pub fn solve_exact(
    mut rows: Vec<Vec<BigRational>>,
    unknowns: usize,
) -> Result<Vec<BigRational>, EliminationError> {
    let mut rank = 0;

    for col in 0..unknowns {
        let Some(pivot) = (rank..rows.len()).find(|&r| !rows[r][col].is_zero()) else {
            continue;
        };
        rows.swap(rank, pivot);

        let lead = rows[rank][col].clone();
        for v in rows[rank].iter_mut() {
            *v = &*v / &lead;
        }

        let pivot_row = rows[rank].clone();
        for (r, row) in rows.iter_mut().enumerate() {
            if r == rank || row[col].is_zero() {
                continue;
            }
            let factor = row[col].clone();
            for (v, p) in row.iter_mut().zip(pivot_row.iter()) {
                *v -= &factor * p;
            }
        }

        rank += 1;
    }

    // rows past the rank have only zero coefficients left
    if let Some(rhs) = rows
        .iter()
        .skip(rank)
        .map(|row| &row[unknowns])
        .find(|rhs| !rhs.is_zero())
    {
        return Err(EliminationError::Inconsistent(rhs.clone()));
    }

    if rank < unknowns {
        return Err(EliminationError::Underdetermined { rank, unknowns });
    }

    Ok(rows
        .into_iter()
        .take(unknowns)
        .map(|mut row| row.swap_remove(unknowns))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rational;

    fn system(rows: &[&[i64]]) -> Vec<Vec<BigRational>> {
        rows.iter()
            .map(|row| row.iter().copied().map(rational).collect())
            .collect()
    }

    #[test]
    fn unique_solution() {
        // x + y = 3, x - y = 1
        let res = solve_exact(system(&[&[1, 1, 3], &[1, -1, 1]]), 2);
        assert_eq!(res, Ok(vec![rational(2), rational(1)]));
    }

    #[test]
    fn needs_row_swap() {
        // y = 4, 2x = 3
        let res = solve_exact(system(&[&[0, 1, 4], &[2, 0, 3]]), 2);
        assert_eq!(
            res,
            Ok(vec![BigRational::new(3.into(), 2.into()), rational(4)])
        );
    }

    #[test]
    fn overdetermined_consistent() {
        let res = solve_exact(system(&[&[1, 1, 3], &[1, -1, 1], &[2, 2, 6]]), 2);
        assert_eq!(res, Ok(vec![rational(2), rational(1)]));
    }

    #[test]
    fn overdetermined_inconsistent() {
        let res = solve_exact(system(&[&[1, 1, 3], &[1, -1, 1], &[1, 0, 5]]), 2);
        assert_eq!(res, Err(EliminationError::Inconsistent(rational(3))));
    }

    #[test]
    fn underdetermined() {
        let res = solve_exact(system(&[&[1, 1, 3], &[2, 2, 6]]), 2);
        assert_eq!(
            res,
            Err(EliminationError::Underdetermined {
                rank: 1,
                unknowns: 2
            })
        );
    }
}
