//! Grid of `(m, n)` inputs.

use std::ops::RangeInclusive;

/// Rectangular grid of `(m, n)` points, enumerated row by row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMatrix {
    ms: RangeInclusive<u64>,
    ns: RangeInclusive<u64>,
}

impl ParameterMatrix {
    /// Every point in `0..=max_m` x `0..=max_n`.
    #[must_use]
    pub fn new(max_m: u64, max_n: u64) -> Self {
        Self {
            ms: 0..=max_m,
            ns: 0..=max_n,
        }
    }

    /// The single point `(m, n)`.
    #[must_use]
    pub fn single(m: u64, n: u64) -> Self {
        Self {
            ms: m..=m,
            ns: n..=n,
        }
    }

    /// All points, `m` outermost.
    pub fn points(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.ms
            .clone()
            .flat_map(move |m| self.ns.clone().map(move |n| (m, n)))
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points().count()
    }

    /// Whether the grid has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ms.is_empty() || self.ns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_order() {
        let points: Vec<_> = ParameterMatrix::new(1, 2).points().collect();
        assert_eq!(points, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn single_point() {
        let matrix = ParameterMatrix::single(3, 3);
        assert_eq!(matrix.points().collect::<Vec<_>>(), vec![(3, 3)]);
        assert_eq!(matrix.len(), 1);
        assert!(!matrix.is_empty());
    }

    #[test]
    fn full_grid_len() {
        assert_eq!(ParameterMatrix::new(3, 3).len(), 16);
        assert_eq!(ParameterMatrix::new(0, 0).len(), 1);
    }
}
