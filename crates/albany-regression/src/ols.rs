//! Ordinary least squares via Householder QR.
//!
//! Solves `argmin_beta ||y - X beta||^2` by factoring the design matrix
//! `X = QR` and back-substituting `R beta = Q^T y`. Working on `X` directly
//! (rather than forming `X^T X`) keeps the condition number unsquared.
//!
//! Rank deficiency is detected column by column: after the earlier columns
//! have been projected out, the remaining norm of column `k` is `|R_kk|`.
//! If that is at most `tolerance * ||x_k||` the column adds nothing new and
//! the fit is rejected.

use crate::error::{RegressionError, Result};
use ndarray::{Array1, ArrayView1, ArrayView2, s};

/// Default relative tolerance for rank detection
pub const DEFAULT_RANK_TOLERANCE: f64 = 1e-10;

/// Solve an ordinary least squares problem.
///
/// # Arguments
/// * `x` - Design matrix (n x p), one row per observation
/// * `y` - Response vector (n,)
/// * `tolerance` - Relative threshold for rank detection
///
/// # Returns
/// * Coefficient vector (p,)
///
/// # Errors
/// * [`RegressionError::DimensionMismatch`] if `y` and `x` disagree
/// * [`RegressionError::InsufficientData`] if `n < p`
/// * [`RegressionError::NonFinite`] if any input is `NaN` or infinite
/// * [`RegressionError::RankDeficient`] if the columns are dependent
pub fn least_squares(
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
    tolerance: f64,
) -> Result<Array1<f64>> {
    let (n, p) = x.dim();
    if y.len() != n {
        return Err(RegressionError::DimensionMismatch {
            expected: n,
            actual: y.len(),
        });
    }
    if n < p {
        return Err(RegressionError::InsufficientData {
            required: p,
            actual: n,
        });
    }
    if !x.iter().chain(y.iter()).all(|v| v.is_finite()) {
        return Err(RegressionError::NonFinite);
    }

    let mut a = x.to_owned();
    let mut b = y.to_owned();
    let column_norms: Vec<f64> = (0..p).map(|j| a.column(j).dot(&a.column(j)).sqrt()).collect();

    for k in 0..p {
        let tail_norm = {
            let tail = a.slice(s![k.., k]);
            tail.dot(&tail).sqrt()
        };
        if tail_norm <= tolerance * column_norms[k] {
            return Err(RegressionError::RankDeficient { column: k });
        }

        // Reflect a[k.., k] onto -sign(a_kk) * ||a[k.., k]|| * e_1
        let r_kk = if a[[k, k]] >= 0.0 {
            -tail_norm
        } else {
            tail_norm
        };
        let mut v = a.slice(s![k.., k]).to_owned();
        v[0] -= r_kk;
        let v_norm_sq = v.dot(&v);

        for j in k..p {
            let proj = 2.0 * v.dot(&a.slice(s![k.., j])) / v_norm_sq;
            a.slice_mut(s![k.., j]).scaled_add(-proj, &v);
        }
        let proj = 2.0 * v.dot(&b.slice(s![k..])) / v_norm_sq;
        b.slice_mut(s![k..]).scaled_add(-proj, &v);
    }

    let mut beta = Array1::<f64>::zeros(p);
    for k in (0..p).rev() {
        let mut acc = b[k];
        for j in (k + 1)..p {
            acc -= a[[k, j]] * beta[j];
        }
        beta[k] = acc / a[[k, k]];
    }

    Ok(beta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, array};

    #[test]
    fn test_exact_line() {
        // y = 2 + 3x on x = [0, 1, 2]
        let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0]];
        let y = array![2.0, 5.0, 8.0];

        let beta = least_squares(x.view(), y.view(), DEFAULT_RANK_TOLERANCE).unwrap();
        assert_abs_diff_eq!(beta[0], 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(beta[1], 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_overdetermined_fit() {
        // Least squares line through (0,1), (1,3), (2,2), (3,5): slope 1.1, intercept 1.1
        let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0], [1.0, 3.0]];
        let y = array![1.0, 3.0, 2.0, 5.0];

        let beta = least_squares(x.view(), y.view(), DEFAULT_RANK_TOLERANCE).unwrap();
        assert_abs_diff_eq!(beta[0], 1.1, epsilon = 1e-10);
        assert_abs_diff_eq!(beta[1], 1.1, epsilon = 1e-10);
    }

    #[test]
    fn test_intercept_only_is_mean() {
        let x = Array2::<f64>::ones((4, 1));
        let y = array![0.01, -0.02, 0.03, 0.06];

        let beta = least_squares(x.view(), y.view(), DEFAULT_RANK_TOLERANCE).unwrap();
        assert_abs_diff_eq!(beta[0], 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_duplicate_columns_rank_deficient() {
        let x = array![
            [1.0, 0.5, 0.5],
            [1.0, -0.2, -0.2],
            [1.0, 0.1, 0.1],
            [1.0, 0.7, 0.7]
        ];
        let y = array![1.0, 2.0, 3.0, 4.0];

        let err = least_squares(x.view(), y.view(), DEFAULT_RANK_TOLERANCE).unwrap_err();
        assert!(matches!(err, RegressionError::RankDeficient { column: 2 }));
    }

    #[test]
    fn test_constant_factor_collinear_with_intercept() {
        let x = array![[1.0, 0.3], [1.0, 0.3], [1.0, 0.3]];
        let y = array![1.0, 2.0, 3.0];

        assert!(matches!(
            least_squares(x.view(), y.view(), DEFAULT_RANK_TOLERANCE),
            Err(RegressionError::RankDeficient { column: 1 })
        ));
    }

    #[test]
    fn test_underdetermined() {
        let x = array![[1.0, 0.1, 0.2]];
        let y = array![1.0];

        assert!(matches!(
            least_squares(x.view(), y.view(), DEFAULT_RANK_TOLERANCE),
            Err(RegressionError::InsufficientData {
                required: 3,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_missing_value() {
        let x = array![[1.0, 0.1], [1.0, f64::NAN], [1.0, 0.3]];
        let y = array![1.0, 2.0, 3.0];

        assert!(matches!(
            least_squares(x.view(), y.view(), DEFAULT_RANK_TOLERANCE),
            Err(RegressionError::NonFinite)
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let x = Array2::<f64>::ones((3, 1));
        let y = array![1.0, 2.0];

        assert!(matches!(
            least_squares(x.view(), y.view(), DEFAULT_RANK_TOLERANCE),
            Err(RegressionError::DimensionMismatch { .. })
        ));
    }
}
