//! Dense 2D and 3D arrays with bounds-checked slicing and concatenation
//!
//! The splice routine cuts stamp data along chunk boundaries with these
//! operations, so every window is checked against the source extents and
//! reported as an error instead of being clamped.

use terrastamp_core::{Result, TerrastampError};

fn check_window(axis: usize, base: usize, len: usize, extent: usize) -> Result<()> {
    if base + len > extent {
        return Err(TerrastampError::IndexOutOfRange {
            axis,
            base,
            len,
            extent,
        });
    }
    Ok(())
}

fn check_match(axis: usize, left: usize, right: usize) -> Result<()> {
    if left != right {
        return Err(TerrastampError::DimensionMismatch { axis, left, right });
    }
    Ok(())
}

/// Row-major 2D array. Axis 0 is rows, axis 1 is columns.
#[derive(Clone, Debug, PartialEq)]
pub struct Array2<T> {
    data: Vec<T>,
    len0: usize,
    len1: usize,
}

impl<T: Clone> Array2<T> {
    /// Create an array filled with `value`
    pub fn filled(len0: usize, len1: usize, value: T) -> Self {
        Self {
            data: vec![value; len0 * len1],
            len0,
            len1,
        }
    }

    /// Wrap row-major data; fails if `data.len() != len0 * len1`
    pub fn from_vec(len0: usize, len1: usize, data: Vec<T>) -> Result<Self> {
        check_match(0, data.len(), len0 * len1)?;
        Ok(Self { data, len0, len1 })
    }

    /// Build from nested rows; every row must have the same length
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let len0 = rows.len();
        let len1 = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(len0 * len1);
        for row in rows {
            check_match(1, row.len(), len1)?;
            data.extend(row);
        }
        Ok(Self { data, len0, len1 })
    }

    /// Build by evaluating `f(row, col)` for every element
    pub fn from_fn(len0: usize, len1: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(len0 * len1);
        for i in 0..len0 {
            for j in 0..len1 {
                data.push(f(i, j));
            }
        }
        Self { data, len0, len1 }
    }

    /// Copy of the half-open window `[base0, base0 + len0) x [base1, base1 + len1)`.
    pub fn get_part(&self, base0: usize, base1: usize, len0: usize, len1: usize) -> Result<Self> {
        check_window(0, base0, len0, self.len0)?;
        check_window(1, base1, len1, self.len1)?;

        let mut data = Vec::with_capacity(len0 * len1);
        for i in base0..base0 + len0 {
            let row = i * self.len1;
            data.extend_from_slice(&self.data[row + base1..row + base1 + len1]);
        }
        Ok(Self { data, len0, len1 })
    }

    /// Stack `other` below `self`. Column counts must match.
    pub fn concat_axis0(&self, other: &Self) -> Result<Self> {
        check_match(1, self.len1, other.len1)?;

        let mut data = Vec::with_capacity(self.data.len() + other.data.len());
        data.extend_from_slice(&self.data);
        data.extend_from_slice(&other.data);
        Ok(Self {
            data,
            len0: self.len0 + other.len0,
            len1: self.len1,
        })
    }

    /// Place `other` to the right of `self`. Row counts must match.
    pub fn concat_axis1(&self, other: &Self) -> Result<Self> {
        check_match(0, self.len0, other.len0)?;

        let len1 = self.len1 + other.len1;
        let mut data = Vec::with_capacity(self.len0 * len1);
        for i in 0..self.len0 {
            data.extend_from_slice(self.row(i));
            data.extend_from_slice(other.row(i));
        }
        Ok(Self {
            data,
            len0: self.len0,
            len1,
        })
    }

    /// Write `src` into the window of `self` starting at `(base0, base1)`,
    /// storing `combine(existing, incoming)` in each cell.
    pub fn blit_with(
        &mut self,
        src: &Self,
        base0: usize,
        base1: usize,
        mut combine: impl FnMut(&T, &T) -> T,
    ) -> Result<()> {
        check_window(0, base0, src.len0, self.len0)?;
        check_window(1, base1, src.len1, self.len1)?;

        for i in 0..src.len0 {
            let dst_row = (base0 + i) * self.len1 + base1;
            for (j, incoming) in src.row(i).iter().enumerate() {
                let cell = &mut self.data[dst_row + j];
                *cell = combine(cell, incoming);
            }
        }
        Ok(())
    }

    /// Overwrite the window starting at `(base0, base1)` with `src`
    pub fn copy_from(&mut self, src: &Self, base0: usize, base1: usize) -> Result<()> {
        self.blit_with(src, base0, base1, |_, incoming| incoming.clone())
    }

    /// Apply `f` to every element, producing a new array
    pub fn map<U: Clone>(&self, f: impl FnMut(&T) -> U) -> Array2<U> {
        Array2 {
            data: self.data.iter().map(f).collect(),
            len0: self.len0,
            len1: self.len1,
        }
    }
}

impl<T> Array2<T> {
    /// Length along axis 0 (rows)
    pub fn len0(&self) -> usize {
        self.len0
    }

    /// Length along axis 1 (columns)
    pub fn len1(&self) -> usize {
        self.len1
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<&T> {
        if i < self.len0 && j < self.len1 {
            self.data.get(i * self.len1 + j)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, i: usize, j: usize) -> Option<&mut T> {
        if i < self.len0 && j < self.len1 {
            self.data.get_mut(i * self.len1 + j)
        } else {
            None
        }
    }

    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.len1..(i + 1) * self.len1]
    }

    /// Row-major backing storage
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T> std::ops::Index<(usize, usize)> for Array2<T> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        assert!(i < self.len0 && j < self.len1, "index ({i}, {j}) out of bounds");
        &self.data[i * self.len1 + j]
    }
}

impl<T> std::ops::IndexMut<(usize, usize)> for Array2<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        assert!(i < self.len0 && j < self.len1, "index ({i}, {j}) out of bounds");
        &mut self.data[i * self.len1 + j]
    }
}

/// Row-major 3D array, e.g. per-layer weights over a height field
#[derive(Clone, Debug, PartialEq)]
pub struct Array3<T> {
    data: Vec<T>,
    dims: [usize; 3],
}

impl<T: Clone> Array3<T> {
    pub fn filled(dims: [usize; 3], value: T) -> Self {
        Self {
            data: vec![value; dims[0] * dims[1] * dims[2]],
            dims,
        }
    }

    pub fn from_fn(dims: [usize; 3], mut f: impl FnMut(usize, usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(dims[0] * dims[1] * dims[2]);
        for i in 0..dims[0] {
            for j in 0..dims[1] {
                for k in 0..dims[2] {
                    data.push(f(i, j, k));
                }
            }
        }
        Self { data, dims }
    }

    /// Copy of the window starting at `base` with extent `len` on each axis
    pub fn get_part(&self, base: [usize; 3], len: [usize; 3]) -> Result<Self> {
        for axis in 0..3 {
            check_window(axis, base[axis], len[axis], self.dims[axis])?;
        }
        Ok(Self::from_fn(len, |i, j, k| {
            self[(base[0] + i, base[1] + j, base[2] + k)].clone()
        }))
    }

    /// Concatenate along `axis`; the other two extents must match exactly.
    pub fn concat(&self, other: &Self, axis: usize) -> Result<Self> {
        for a in (0..3).filter(|&a| a != axis) {
            check_match(a, self.dims[a], other.dims[a])?;
        }
        let mut dims = self.dims;
        dims[axis] += other.dims[axis];
        let split = self.dims[axis];

        Ok(Self::from_fn(dims, |i, j, k| {
            let mut idx = [i, j, k];
            if idx[axis] < split {
                self[(idx[0], idx[1], idx[2])].clone()
            } else {
                idx[axis] -= split;
                other[(idx[0], idx[1], idx[2])].clone()
            }
        }))
    }

    pub fn concat_axis0(&self, other: &Self) -> Result<Self> {
        self.concat(other, 0)
    }

    pub fn concat_axis1(&self, other: &Self) -> Result<Self> {
        self.concat(other, 1)
    }

    pub fn concat_axis2(&self, other: &Self) -> Result<Self> {
        self.concat(other, 2)
    }
}

impl<T> Array3<T> {
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    fn offset(&self, i: usize, j: usize, k: usize) -> usize {
        assert!(
            i < self.dims[0] && j < self.dims[1] && k < self.dims[2],
            "index ({i}, {j}, {k}) out of bounds"
        );
        (i * self.dims[1] + j) * self.dims[2] + k
    }
}

impl<T> std::ops::Index<(usize, usize, usize)> for Array3<T> {
    type Output = T;

    fn index(&self, (i, j, k): (usize, usize, usize)) -> &T {
        &self.data[self.offset(i, j, k)]
    }
}

impl<T> std::ops::IndexMut<(usize, usize, usize)> for Array3<T> {
    fn index_mut(&mut self, (i, j, k): (usize, usize, usize)) -> &mut T {
        let offset = self.offset(i, j, k);
        &mut self.data[offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(len0: usize, len1: usize) -> Array2<i32> {
        Array2::from_fn(len0, len1, |i, j| (i * 10 + j) as i32)
    }

    #[test]
    fn get_part_copies_window() {
        let a = grid(3, 4);
        let part = a.get_part(1, 2, 2, 2).unwrap();
        assert_eq!(part, Array2::from_rows(vec![vec![12, 13], vec![22, 23]]).unwrap());
    }

    #[test]
    fn get_part_rejects_overrun_without_clamping() {
        let a = grid(3, 4);
        let err = a.get_part(0, 3, 3, 2).unwrap_err();
        assert!(matches!(
            err,
            TerrastampError::IndexOutOfRange { axis: 1, base: 3, len: 2, extent: 4 }
        ));
        assert!(a.get_part(2, 0, 2, 1).is_err());
    }

    #[test]
    fn get_part_allows_empty_window_at_edge() {
        let a = grid(3, 4);
        let part = a.get_part(3, 4, 0, 0).unwrap();
        assert!(part.is_empty());
    }

    #[test]
    fn concat_axis0_stacks_rows() {
        let top = grid(1, 3);
        let bottom = grid(2, 3);
        let c = top.concat_axis0(&bottom).unwrap();
        assert_eq!(c.len0(), 3);
        assert_eq!(c.row(0), &[0, 1, 2]);
        assert_eq!(c.row(2), &[10, 11, 12]);
    }

    #[test]
    fn concat_axis1_joins_columns() {
        let left = grid(2, 1);
        let right = grid(2, 2);
        let c = left.concat_axis1(&right).unwrap();
        assert_eq!(c.len1(), 3);
        assert_eq!(c.row(1), &[10, 10, 11]);
    }

    #[test]
    fn concat_mismatch_fails() {
        let a = grid(2, 3);
        let b = grid(3, 2);
        assert!(matches!(
            a.concat_axis0(&b),
            Err(TerrastampError::DimensionMismatch { axis: 1, left: 3, right: 2 })
        ));
        assert!(matches!(
            a.concat_axis1(&b),
            Err(TerrastampError::DimensionMismatch { axis: 0, left: 2, right: 3 })
        ));
    }

    #[test]
    fn split_then_concat_restores_original() {
        let a = grid(4, 5);
        let left = a.get_part(0, 0, 4, 2).unwrap();
        let right = a.get_part(0, 2, 4, 3).unwrap();
        assert_eq!(left.concat_axis1(&right).unwrap(), a);
    }

    #[test]
    fn blit_with_max_and_bounds() {
        let mut dst = Array2::filled(3, 3, 5);
        let src = grid(2, 2);
        dst.blit_with(&src, 1, 1, |a, b| *a.max(b)).unwrap();
        assert_eq!(dst.row(0), &[5, 5, 5]);
        assert_eq!(dst.row(1), &[5, 5, 5]);
        assert_eq!(dst.row(2), &[5, 10, 11]);

        assert!(dst.blit_with(&src, 2, 0, |_, b| *b).is_err());
    }

    #[test]
    fn copy_from_overwrites() {
        let mut dst = Array2::filled(2, 3, 9);
        dst.copy_from(&grid(1, 2), 1, 1).unwrap();
        assert_eq!(dst.row(1), &[9, 0, 1]);
    }

    #[test]
    fn from_rows_requires_rectangular_input() {
        assert!(Array2::from_rows(vec![vec![1, 2], vec![3]]).is_err());
    }

    #[test]
    fn array3_part_and_concat() {
        let a = Array3::from_fn([2, 3, 4], |i, j, k| (i * 100 + j * 10 + k) as i32);
        let part = a.get_part([1, 1, 2], [1, 2, 2]).unwrap();
        assert_eq!(part.dims(), [1, 2, 2]);
        assert_eq!(part[(0, 0, 0)], 112);
        assert_eq!(part[(0, 1, 1)], 123);
        assert!(a.get_part([0, 0, 3], [1, 1, 2]).is_err());

        let b = Array3::filled([2, 3, 1], -1);
        let c = a.concat_axis2(&b).unwrap();
        assert_eq!(c.dims(), [2, 3, 5]);
        assert_eq!(c[(1, 2, 3)], 123);
        assert_eq!(c[(1, 2, 4)], -1);

        let d = a.concat_axis0(&a).unwrap();
        assert_eq!(d[(3, 0, 0)], 100);
        let e = a.concat_axis1(&a.get_part([0, 0, 0], [2, 1, 4]).unwrap()).unwrap();
        assert_eq!(e.dims(), [2, 4, 4]);
        assert_eq!(e[(1, 3, 2)], 102);

        assert!(a.concat_axis0(&b).is_err());
        assert!(matches!(
            a.concat_axis1(&b),
            Err(TerrastampError::DimensionMismatch { axis: 2, left: 4, right: 1 })
        ));
    }
}
