//! Enlargement of tuple rows
//!
//! Rows of any depth and maxval are enlarged through a column map: a table,
//! built once per image, giving the input column each output column copies.
//! The map does not depend on pixel values, so one map serves every row.

use crate::{ScaleFactor, TransformError, TransformResult};
use log::debug;
use pixenlarge_core::{Sample, zeroed_vec};
use std::iter;

/// Output column to input column table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    columns: Vec<u32>,
}

impl ColumnMap {
    /// Build the map for one image.
    ///
    /// Output column `x * factor + k` maps to input column `x` for every
    /// `k` in `0..factor`.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidParameters`] if `output_width` is
    /// not `input_width * factor` or the map does not fit in memory.
    pub fn build(input_width: u32, output_width: u32, factor: ScaleFactor) -> TransformResult<Self> {
        if u64::from(input_width) * u64::from(factor.get()) != u64::from(output_width) {
            return Err(TransformError::InvalidParameters(format!(
                "output width {output_width} is not {input_width} x {factor}"
            )));
        }
        let mut columns = Vec::new();
        columns
            .try_reserve_exact(output_width as usize)
            .map_err(|_| {
                TransformError::InvalidParameters(format!(
                    "column map for {output_width} columns does not fit in memory"
                ))
            })?;
        columns.extend((0..input_width).flat_map(|x| iter::repeat_n(x, factor.get() as usize)));
        Ok(Self { columns })
    }

    /// Number of output columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the map has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Input column copied by output column `x`.
    pub fn source_column(&self, x: usize) -> Option<u32> {
        self.columns.get(x).copied()
    }

    /// The whole map, indexed by output column.
    pub fn as_slice(&self) -> &[u32] {
        &self.columns
    }
}

/// Reusable enlarger for the rows of one tuple image
///
/// # Examples
///
/// ```
/// use pixenlarge_transform::{GenericRowEnlarger, ScaleFactor};
///
/// // two RGB pixels
/// let mut enlarger = GenericRowEnlarger::new(2, 3, ScaleFactor::new(2).unwrap()).unwrap();
/// let row = enlarger.enlarge(&[1, 2, 3, 4, 5, 6]).unwrap();
/// assert_eq!(row, &[1, 2, 3, 1, 2, 3, 4, 5, 6, 4, 5, 6]);
/// ```
#[derive(Debug, Clone)]
pub struct GenericRowEnlarger {
    depth: usize,
    in_samples: usize,
    out_samples: usize,
    map: ColumnMap,
    output: Vec<Sample>,
}

impl GenericRowEnlarger {
    /// Create an enlarger for rows of `input_width` pixels of `depth`
    /// samples each.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidParameters`] if `depth` is 0 or the
    /// enlarged row does not fit in memory.
    pub fn new(input_width: u32, depth: u32, factor: ScaleFactor) -> TransformResult<Self> {
        if depth == 0 {
            return Err(TransformError::InvalidParameters(
                "tuple depth must be at least 1".to_string(),
            ));
        }
        let too_large = || {
            TransformError::InvalidParameters(format!(
                "row of {input_width} x {depth} samples is too large to enlarge by {factor}"
            ))
        };
        let output_width = input_width.checked_mul(factor.get()).ok_or_else(too_large)?;
        let depth = depth as usize;
        let in_samples = (input_width as usize)
            .checked_mul(depth)
            .ok_or_else(too_large)?;
        let out_samples = (output_width as usize)
            .checked_mul(depth)
            .ok_or_else(too_large)?;
        // the input row itself must be addressable
        if in_samples > isize::MAX as usize / size_of::<Sample>() {
            return Err(too_large());
        }
        // factor 1 hands back the input row and needs no buffer
        let output = if factor == ScaleFactor::ONE {
            Vec::new()
        } else {
            zeroed_vec(out_samples).map_err(|_| too_large())?
        };
        let map = ColumnMap::build(input_width, output_width, factor)?;
        debug!(
            "tuple enlarger: width {input_width} depth {depth} factor {factor}, {out_samples} samples per row"
        );
        Ok(Self {
            depth,
            in_samples,
            out_samples,
            map,
            output,
        })
    }

    /// Get the column map.
    pub fn column_map(&self) -> &ColumnMap {
        &self.map
    }

    /// Get the number of samples in each enlarged row.
    pub fn output_len(&self) -> usize {
        self.out_samples
    }

    /// Enlarge one row of `input_width * depth` samples.
    ///
    /// With factor 1 the returned slice is the input row itself.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Core`] with a row length error if `row`
    /// has the wrong number of samples.
    pub fn enlarge<'a>(&'a mut self, row: &'a [Sample]) -> TransformResult<&'a [Sample]> {
        if row.len() != self.in_samples {
            return Err(pixenlarge_core::Error::RowLength {
                expected: self.in_samples,
                actual: row.len(),
            }
            .into());
        }
        if self.output.is_empty() {
            return Ok(row);
        }
        let depth = self.depth;
        for (pixel, &column) in self.output.chunks_exact_mut(depth).zip(self.map.as_slice()) {
            let start = column as usize * depth;
            pixel.copy_from_slice(&row[start..start + depth]);
        }
        Ok(&self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factor(n: u32) -> ScaleFactor {
        ScaleFactor::new(n).unwrap()
    }

    #[test]
    fn test_column_map() {
        let map = ColumnMap::build(3, 6, factor(2)).unwrap();
        assert_eq!(map.as_slice(), &[0, 0, 1, 1, 2, 2]);
        assert_eq!(map.len(), 6);
        assert_eq!(map.source_column(5), Some(2));
        assert_eq!(map.source_column(6), None);

        // every output column maps to x / factor
        let map = ColumnMap::build(7, 35, factor(5)).unwrap();
        for x in 0..35 {
            assert_eq!(map.source_column(x), Some((x / 5) as u32));
        }
    }

    #[test]
    fn test_column_map_width_mismatch() {
        assert!(matches!(
            ColumnMap::build(3, 7, factor(2)),
            Err(TransformError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_column_map_identity() {
        let map = ColumnMap::build(4, 4, ScaleFactor::ONE).unwrap();
        assert_eq!(map.as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_enlarge_gray_row() {
        let mut enlarger = GenericRowEnlarger::new(3, 1, factor(3)).unwrap();
        assert_eq!(enlarger.output_len(), 9);
        let row = enlarger.enlarge(&[7, 0, 65535]).unwrap();
        assert_eq!(row, &[7, 7, 7, 0, 0, 0, 65535, 65535, 65535]);
    }

    #[test]
    fn test_enlarge_reuses_map() {
        let mut enlarger = GenericRowEnlarger::new(2, 4, factor(2)).unwrap();
        let first = enlarger.enlarge(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap().to_vec();
        assert_eq!(first, [1, 2, 3, 4, 1, 2, 3, 4, 5, 6, 7, 8, 5, 6, 7, 8]);
        let second = enlarger.enlarge(&[9, 9, 9, 9, 0, 0, 0, 0]).unwrap().to_vec();
        assert_eq!(second, [9, 9, 9, 9, 9, 9, 9, 9, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_enlarge_identity() {
        let mut enlarger = GenericRowEnlarger::new(2, 3, ScaleFactor::ONE).unwrap();
        let row = [1, 2, 3, 4, 5, 6];
        assert_eq!(enlarger.enlarge(&row).unwrap(), &row);
    }

    #[test]
    fn test_enlarge_wrong_length() {
        let mut enlarger = GenericRowEnlarger::new(2, 3, factor(2)).unwrap();
        assert!(matches!(
            enlarger.enlarge(&[1, 2, 3]),
            Err(TransformError::Core(pixenlarge_core::Error::RowLength {
                expected: 6,
                actual: 3
            }))
        ));
    }

    #[test]
    fn test_zero_depth() {
        assert!(GenericRowEnlarger::new(2, 0, factor(2)).is_err());
    }

    #[test]
    fn test_row_too_large() {
        // width and depth inside header limits, row far beyond memory
        for f in [ScaleFactor::ONE, factor(2)] {
            assert!(matches!(
                GenericRowEnlarger::new(2_147_483_645, u32::MAX, f),
                Err(TransformError::InvalidParameters(_))
            ));
        }
        assert!(matches!(
            GenericRowEnlarger::new(1 << 20, 1 << 30, factor(3)),
            Err(TransformError::InvalidParameters(_))
        ));
    }
}
