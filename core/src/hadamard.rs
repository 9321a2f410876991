//! Sylvester-construction Hadamard matrices, the Walsh code basis used by
//! the modulator and demodulator. Row `k` of `hadamard_matrix(n)` is the
//! Walsh code assigned to symbol value `k`.

use crate::error::{ModemError, Result};

/// Builds the `n x n` Hadamard matrix via the Sylvester recursion:
/// `H(1) = [1]`, `H(2k) = [[H(k), H(k)], [H(k), -H(k)]]`. `n` must be a
/// power of two.
pub fn hadamard_matrix(n: usize) -> Result<Vec<Vec<i8>>> {
    if !n.is_power_of_two() {
        return Err(ModemError::InvalidConfig(format!(
            "hadamard_matrix requires a power-of-two size, got {n}"
        )));
    }

    let mut h = vec![vec![1i8]];
    while h.len() < n {
        let k = h.len();
        let mut next = vec![vec![0i8; 2 * k]; 2 * k];
        for (r, row) in h.iter().enumerate() {
            for (c, &val) in row.iter().enumerate() {
                next[r][c] = val;
                next[r][c + k] = val;
                next[r + k][c] = val;
                next[r + k][c + k] = -val;
            }
        }
        h = next;
    }
    Ok(h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_one() {
        let h = hadamard_matrix(1).unwrap();
        assert_eq!(h, vec![vec![1]]);
    }

    #[test]
    fn size_two() {
        let h = hadamard_matrix(2).unwrap();
        assert_eq!(h, vec![vec![1, 1], vec![1, -1]]);
    }

    #[test]
    fn size_four_matches_sylvester_construction() {
        let h = hadamard_matrix(4).unwrap();
        assert_eq!(
            h,
            vec![
                vec![1, 1, 1, 1],
                vec![1, -1, 1, -1],
                vec![1, 1, -1, -1],
                vec![1, -1, -1, 1],
            ]
        );
    }

    #[test]
    fn rows_are_orthogonal() {
        for n in [2usize, 4, 8, 16, 32] {
            let h = hadamard_matrix(n).unwrap();
            for i in 0..n {
                for j in 0..n {
                    let dot: i32 = h[i]
                        .iter()
                        .zip(h[j].iter())
                        .map(|(&a, &b)| a as i32 * b as i32)
                        .sum();
                    if i == j {
                        assert_eq!(dot, n as i32);
                    } else {
                        assert_eq!(dot, 0, "rows {i} and {j} of H({n}) are not orthogonal");
                    }
                }
            }
        }
    }

    #[test]
    fn non_power_of_two_is_rejected() {
        assert!(hadamard_matrix(3).is_err());
        assert!(hadamard_matrix(0).is_err());
    }
}
