/// Entries with an absolute value below this are treated as zero.
pub const TOLERANCE: f64 = 1e-10;

/// Transforms an augmented matrix into reduced row echelon form by Gauss-Jordan elimination.
///
/// The last column holds the constants and never becomes a pivot column.
/// Columns without a usable pivot are skipped, leaving rows of zeros at the bottom
/// of rank-deficient matrices.
pub fn gauss_jordan(mat: &mut [Vec<f64>]) {
    let row_n = mat.len();
    let col_n = match mat.first() {
        Some(row) => row.len(),
        None => return,
    };

    let mut row_i = 0;

    for col_i in 0..col_n.saturating_sub(1) {
        if row_i == row_n {
            break;
        }

        // Locate a pivot with the greatest absolute value.
        let (pivot_i, pivot) = mat
            .iter()
            .map(|row| row[col_i])
            .enumerate()
            .skip(row_i)
            .fold((row_i, 0.0), |max, cur| {
                if cur.1.abs() > f64::abs(max.1) {
                    cur
                } else {
                    max
                }
            });

        if pivot.abs() < TOLERANCE {
            continue;
        }

        mat.swap(row_i, pivot_i);
        mat[row_i].iter_mut().for_each(|n| *n /= pivot);

        let pivot_row = mat[row_i].clone();
        for (i, cur_row) in mat.iter_mut().enumerate() {
            let cur = cur_row[col_i];
            if i == row_i || cur.abs() <= TOLERANCE {
                continue;
            }
            row_mul_sub(cur_row, &pivot_row, cur);
        }

        row_i += 1;
    }
}

/// Returns the rank of a matrix.
///
/// Works on a private copy by plain elimination without scaling rows,
/// independently of [`gauss_jordan`].
pub fn rank(mat: &[Vec<f64>]) -> usize {
    let mut mat = mat.to_vec();
    let row_n = mat.len();
    let col_n = mat.first().map_or(0, Vec::len);

    let mut rank = 0;

    for col_i in 0..col_n {
        if rank == row_n {
            break;
        }

        let pivot_i = match (rank..row_n).find(|&i| mat[i][col_i].abs() > TOLERANCE) {
            Some(i) => i,
            // All zero.
            None => continue,
        };

        mat.swap(rank, pivot_i);
        let pivot_row = mat[rank].clone();
        let pivot = pivot_row[col_i];

        for (i, cur_row) in mat.iter_mut().enumerate() {
            let cur = cur_row[col_i];
            if i == rank || cur.abs() <= TOLERANCE {
                continue;
            }
            row_mul_sub(cur_row, &pivot_row, cur / pivot);
        }

        rank += 1;
    }
    rank
}

/// Returns the index of the first entry of a row above the tolerance.
pub fn pivot_col(row: &[f64]) -> Option<usize> {
    row.iter().position(|n| n.abs() > TOLERANCE)
}

/// Counts the rows of a reduced matrix with a pivot among their first `col_n` entries.
pub fn pivot_count(reduced: &[Vec<f64>], col_n: usize) -> usize {
    reduced
        .iter()
        .filter(|row| pivot_col(&row[..col_n]).is_some())
        .count()
}

fn row_mul_sub(dest: &mut [f64], src: &[f64], src_m: f64) {
    dest.iter_mut().zip(src.iter()).for_each(|(dest, src)| {
        *dest -= *src * src_m;
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_rref(mat: &[Vec<f64>]) -> bool {
        let col_n = mat[0].len() - 1;
        let mut last_pivot = None;
        for row in mat {
            let pivot = match pivot_col(&row[..col_n]) {
                Some(p) => p,
                None => continue,
            };
            if last_pivot.map_or(false, |last| pivot <= last) {
                return false;
            }
            if (row[pivot] - 1.0).abs() > 1e-9 {
                return false;
            }
            let others = mat
                .iter()
                .filter(|other| !std::ptr::eq(*other, row))
                .any(|other| other[pivot].abs() > TOLERANCE);
            if others {
                return false;
            }
            last_pivot = Some(pivot);
        }
        true
    }

    #[test]
    fn reduces_unique_system() {
        let mut mat = vec![vec![2.0, 3.0, 7.0], vec![1.0, -1.0, 1.0]];
        gauss_jordan(&mut mat);
        assert!(is_rref(&mat));
        assert!((mat[0][2] - 2.0).abs() < 1e-12);
        assert!((mat[1][2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn picks_largest_pivot() {
        let mut mat = vec![vec![1.0, 2.0, 3.0], vec![4.0, 1.0, 6.0]];
        gauss_jordan(&mut mat);
        assert!(is_rref(&mat));
        // The second row moved to the top before scaling.
        assert!((mat[0][0] - 1.0).abs() < 1e-12);
        assert!(mat[1][0].abs() < 1e-12);
    }

    #[test]
    fn leaves_zero_rows_for_dependent_rows() {
        let mut mat = vec![vec![2.0, 4.0, 6.0], vec![1.0, 2.0, 3.0]];
        gauss_jordan(&mut mat);
        assert_eq!(mat, vec![vec![1.0, 2.0, 3.0], vec![0.0, 0.0, 0.0]]);
    }

    #[test]
    fn skips_free_columns_without_consuming_rows() {
        // x is absent everywhere; y and z are independent.
        let mut mat = vec![
            vec![0.0, 2.0, 3.0, 8.0],
            vec![0.0, 0.0, 1.0, 2.0],
            vec![0.0, 0.0, 0.0, 0.0],
        ];
        gauss_jordan(&mut mat);
        assert!(is_rref(&mat));
        assert_eq!(pivot_col(&mat[0][..3]), Some(1));
        assert_eq!(pivot_col(&mat[1][..3]), Some(2));
        assert!((mat[0][3] - 1.0).abs() < 1e-12);
        assert!((mat[1][3] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn reduction_is_idempotent() {
        let mut mat = vec![
            vec![1.0, 2.0, -1.0, 3.0, 4.0],
            vec![2.0, 4.0, 1.0, 0.0, 5.0],
            vec![3.0, 6.0, 0.0, 3.0, 9.0],
        ];
        gauss_jordan(&mut mat);
        let once = mat.clone();
        gauss_jordan(&mut mat);
        assert_eq!(mat, once);
    }

    #[test]
    fn handles_empty_matrix() {
        let mut mat: Vec<Vec<f64>> = vec![];
        gauss_jordan(&mut mat);
        assert_eq!(rank(&mat), 0);
    }

    #[test]
    fn rank_does_not_touch_input() {
        let mat = vec![vec![2.0, 4.0], vec![1.0, 2.0]];
        let copy = mat.clone();
        assert_eq!(rank(&mat), 1);
        assert_eq!(mat, copy);
    }

    #[test]
    fn rank_of_augmented_exceeds_inconsistent_coefficients() {
        let coefs = vec![vec![1.0, 1.0], vec![1.0, 1.0]];
        let aug = vec![vec![1.0, 1.0, 1.0], vec![1.0, 1.0, 2.0]];
        assert_eq!(rank(&coefs), 1);
        assert_eq!(rank(&aug), 2);
    }

    #[test]
    fn rank_agrees_with_reduction() {
        let mats = vec![
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0], vec![7.0, 8.0, 9.0]],
            vec![vec![0.0, 0.0, 1.0], vec![0.0, 0.0, 2.0]],
            vec![vec![0.5, 1.0, 1.5], vec![1.0, 2.0, 3.0]],
            vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]],
        ];
        for mat in mats {
            // Reduce with an extra zero column so every original column may pivot.
            let mut reduced: Vec<Vec<f64>> = mat
                .iter()
                .map(|row| row.iter().copied().chain([0.0]).collect())
                .collect();
            gauss_jordan(&mut reduced);
            let col_n = mat[0].len();
            assert_eq!(
                rank(&mat),
                pivot_count(&reduced, col_n),
                "rank mismatch for {mat:?}"
            );
        }
    }
}
