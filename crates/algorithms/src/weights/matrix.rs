//! Binary spatial weight matrix

use ndarray::{Array2, ArrayView1};
use hotspot_core::{Error, Result};

/// Square 0/1 neighbor matrix over the regions of one analysis.
///
/// Entry `(i, j) == 1` means region `j` is a neighbor of region `i`.
/// The diagonal is always zero. Rows need not mirror columns: k-nearest
/// neighbor matrices are generally asymmetric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightMatrix {
    data: Array2<u8>,
}

impl WeightMatrix {
    /// An `n x n` matrix with no links.
    pub fn zeros(n: usize) -> Self {
        Self {
            data: Array2::zeros((n, n)),
        }
    }

    /// Wrap an existing array, checking shape, values and diagonal.
    pub fn from_array(data: Array2<u8>) -> Result<Self> {
        let (rows, cols) = data.dim();
        if rows != cols {
            return Err(Error::InvalidParameter {
                name: "weights",
                value: format!("{}x{}", rows, cols),
                reason: "matrix must be square".into(),
            });
        }
        if data.iter().any(|&v| v > 1) {
            return Err(Error::InvalidParameter {
                name: "weights",
                value: "non-binary entry".into(),
                reason: "entries must be 0 or 1".into(),
            });
        }
        if (0..rows).any(|i| data[(i, i)] != 0) {
            return Err(Error::InvalidParameter {
                name: "weights",
                value: "non-zero diagonal".into(),
                reason: "a region cannot neighbor itself".into(),
            });
        }
        Ok(Self { data })
    }

    /// Number of regions
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Weight of the link `i -> j`
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> u8 {
        self.data[(i, j)]
    }

    #[inline]
    pub fn has_link(&self, i: usize, j: usize) -> bool {
        self.data[(i, j)] != 0
    }

    /// Mark `j` as a neighbor of `i`. Self links are ignored.
    pub(crate) fn link(&mut self, i: usize, j: usize) {
        if i != j {
            self.data[(i, j)] = 1;
        }
    }

    /// Mark `i` and `j` as mutual neighbors.
    pub(crate) fn link_both(&mut self, i: usize, j: usize) {
        self.link(i, j);
        self.link(j, i);
    }

    /// Row `i` as a view
    pub fn row(&self, i: usize) -> ArrayView1<'_, u8> {
        self.data.row(i)
    }

    /// Column indices of the neighbors of `i`, ascending
    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.data
            .row(i)
            .into_iter()
            .enumerate()
            .filter(|&(_, &w)| w != 0)
            .map(|(j, _)| j)
    }

    /// Neighbor count of `i` (row sum)
    pub fn degree(&self, i: usize) -> usize {
        self.data.row(i).iter().filter(|&&w| w != 0).count()
    }

    /// Whether region `i` has no neighbors
    pub fn is_isolated(&self, i: usize) -> bool {
        self.degree(i) == 0
    }

    /// Number of regions with an all-zero row
    pub fn isolated_count(&self) -> usize {
        (0..self.len()).filter(|&i| self.is_isolated(i)).count()
    }

    /// Total number of links (sum of all entries)
    pub fn link_count(&self) -> usize {
        self.data.iter().filter(|&&w| w != 0).count()
    }

    /// Mean neighbor count per region
    pub fn mean_degree(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.link_count() as f64 / self.len() as f64
        }
    }

    pub fn is_symmetric(&self) -> bool {
        self.data == self.data.t()
    }

    /// Each row divided by its sum; rows without neighbors stay zero.
    pub fn row_standardized(&self) -> Array2<f64> {
        let mut out = self.data.mapv(f64::from);
        for mut row in out.rows_mut() {
            let sum: f64 = row.sum();
            if sum > 0.0 {
                row /= sum;
            }
        }
        out
    }

    /// Element-wise OR of two matrices of the same size.
    pub fn union(&self, other: &WeightMatrix) -> Result<WeightMatrix> {
        if self.len() != other.len() {
            return Err(Error::Algorithm(format!(
                "weight matrix size mismatch: {} vs {}",
                self.len(),
                other.len()
            )));
        }
        Ok(Self {
            data: ndarray::Zip::from(&self.data)
                .and(&other.data)
                .map_collect(|&a, &b| a | b),
        })
    }

    /// Underlying array
    pub fn as_array(&self) -> &Array2<u8> {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_zeros_are_isolated() {
        let w = WeightMatrix::zeros(3);
        assert_eq!(w.len(), 3);
        assert_eq!(w.isolated_count(), 3);
        assert!(w.is_symmetric());
    }

    #[test]
    fn test_link_ignores_diagonal() {
        let mut w = WeightMatrix::zeros(2);
        w.link(0, 0);
        assert_eq!(w.get(0, 0), 0);
        w.link(0, 1);
        assert!(w.has_link(0, 1));
        assert!(!w.has_link(1, 0));
        assert!(!w.is_symmetric());
    }

    #[test]
    fn test_from_array_validation() {
        assert!(WeightMatrix::from_array(array![[0, 1], [1, 0]]).is_ok());
        assert!(WeightMatrix::from_array(array![[1, 0], [0, 0]]).is_err());
        assert!(WeightMatrix::from_array(array![[0, 2], [0, 0]]).is_err());
        assert!(WeightMatrix::from_array(Array2::zeros((2, 3))).is_err());
    }

    #[test]
    fn test_row_standardized() {
        let w = WeightMatrix::from_array(array![[0, 1, 1], [1, 0, 0], [0, 0, 0]]).unwrap();
        let rs = w.row_standardized();
        assert_relative_eq!(rs[(0, 1)], 0.5);
        assert_relative_eq!(rs[(0, 2)], 0.5);
        assert_relative_eq!(rs[(1, 0)], 1.0);
        assert_relative_eq!(rs.row(2).sum(), 0.0);
        assert_eq!(w.degree(0), 2);
        assert_eq!(w.neighbors(0).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(w.isolated_count(), 1);
        assert_relative_eq!(w.mean_degree(), 1.0);
    }

    #[test]
    fn test_union() {
        let a = WeightMatrix::from_array(array![[0, 1, 0], [1, 0, 0], [0, 0, 0]]).unwrap();
        let b = WeightMatrix::from_array(array![[0, 0, 0], [0, 0, 1], [0, 1, 0]]).unwrap();
        let u = a.union(&b).unwrap();
        assert_eq!(u.link_count(), 4);
        assert!(u.is_symmetric());
        assert!(a.union(&WeightMatrix::zeros(2)).is_err());
    }
}
