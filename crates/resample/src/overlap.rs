//! Per-axis overlap planning between output and input voxel grids

// ctools modules
use ctools_utils::{FloatExt, SliceExt};

// crate modules
use crate::error::{Error, Result};

// external crates
use log::trace;

/// Boundaries closer than this to an integer are treated as lying on it
///
/// Removes floating point slivers, e.g. an outermost boundary landing at
/// `n + 1e-12` would otherwise claim a zero-width overlap with a cell past the
/// end of the input axis.
const SNAP_TOLERANCE: f64 = 1e-6;

/// Largest overshoot of the outermost boundaries past the input axis that is
/// clamped back onto it, in input voxel units
const EDGE_TOLERANCE: f64 = 1e-3;

/// A single input voxel contributing to an output voxel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    /// Index of the input voxel along the axis
    pub index: usize,
    /// Fraction of the input voxel inside the output voxel, in `[0, 1]`
    pub weight: f64,
}

/// Overlap table between an output and input grid along one axis
///
/// Both grids are centred on one another. Positions are measured in units of
/// input voxels, so `boundaries()[i]` is where the edge between output cells
/// `i-1` and `i` falls on the input axis.
///
/// Every output cell has an ordered row of [Overlap] entries, one per input
/// voxel it touches. The weights in a row always add up to the width of the
/// output cell in input voxel units.
///
/// ```rust
/// # use ctools_resample::AxisOverlap;
/// // 4 input voxels of 1 mm resampled to 2 voxels of 2 mm
/// let table = AxisOverlap::plan(2, 2.0, 4, 1.0).unwrap();
///
/// assert_eq!(table.boundaries(), &[0.0, 2.0, 4.0]);
///
/// let indices: Vec<usize> = table.row(1).iter().map(|o| o.index).collect();
/// assert_eq!(indices, vec![2, 3]);
/// assert!(table.row(1).iter().all(|o| o.weight == 1.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AxisOverlap {
    boundaries: Vec<f64>,
    rows: Vec<Vec<Overlap>>,
    capacity: usize,
    input_length: usize,
    input_spacing: f64,
    output_spacing: f64,
}

impl AxisOverlap {
    /// Plan the overlaps of `output_length` cells of `output_spacing` over
    /// `input_length` cells of `input_spacing`
    ///
    /// The centre terms `output_length/2` and `input_length/2` use truncating
    /// integer division, which shifts alignment by half a voxel for odd
    /// lengths.
    ///
    /// Fails on empty axes, non-positive spacing, any output cell reaching
    /// outside of the input axis, or an output cell touching an unexpected
    /// number of input voxels for the spacing ratio.
    pub fn plan(
        output_length: usize,
        output_spacing: f64,
        input_length: usize,
        input_spacing: f64,
    ) -> Result<Self> {
        if output_length == 0 || input_length == 0 {
            return Err(Error::InvalidAxisLength {
                input_length,
                output_length,
            });
        }

        for spacing in [output_spacing, input_spacing] {
            if !spacing.is_finite() || spacing <= 0.0 {
                return Err(Error::InvalidSpacing(spacing));
            }
        }

        let capacity = (output_spacing / input_spacing).floor() as usize + 2;
        let boundaries =
            Self::boundaries_from(output_length, output_spacing, input_length, input_spacing);
        boundaries.check_ascending()?;

        let rows = boundaries
            .windows(2)
            .enumerate()
            .map(|(cell, edges)| overlap_row(cell, edges[0], edges[1], capacity, input_length))
            .collect::<Result<Vec<_>>>()?;

        trace!(
            "planned {output_length} cells over {input_length} (capacity {capacity}, [{}, {}])",
            boundaries[0],
            boundaries[output_length]
        );

        Ok(Self {
            boundaries,
            rows,
            capacity,
            input_length,
            input_spacing,
            output_spacing,
        })
    }

    /// Output cell edges in input voxel units, centred on the input grid
    fn boundaries_from(
        output_length: usize,
        output_spacing: f64,
        input_length: usize,
        input_spacing: f64,
    ) -> Vec<f64> {
        let half_output = (output_length / 2) as f64;
        let half_input = (input_length / 2) as f64;

        let mut boundaries: Vec<f64> = (0..=output_length)
            .map(|i| {
                let position = (i as f64 - half_output) * output_spacing / input_spacing;
                (position + half_input).snap(SNAP_TOLERANCE)
            })
            .collect();

        // output lengths are computed in f32, pull back outer edges that only
        // overshoot the input through that rounding
        let upper = input_length as f64;
        if let Some(first) = boundaries.first_mut() {
            if (-EDGE_TOLERANCE..0.0).contains(first) {
                *first = 0.0;
            }
        }
        if let Some(last) = boundaries.last_mut() {
            if *last > upper && *last - upper < EDGE_TOLERANCE {
                *last = upper;
            }
        }

        boundaries
    }

    /// Number of output cells
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false for a successfully planned table
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The `len()+1` output cell edges in input voxel units
    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Upper bound on the number of input voxels any output cell can touch
    ///
    /// This is `floor(output_spacing / input_spacing) + 2`.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of voxels on the input axis
    pub fn input_length(&self) -> usize {
        self.input_length
    }

    /// Input voxel size in mm
    pub fn input_spacing(&self) -> f64 {
        self.input_spacing
    }

    /// Output voxel size in mm
    pub fn output_spacing(&self) -> f64 {
        self.output_spacing
    }

    /// Overlaps of output cell `cell`
    ///
    /// Panics if `cell` is not less than `len()`.
    pub fn row(&self, cell: usize) -> &[Overlap] {
        &self.rows[cell]
    }

    /// Every row in output order
    pub fn rows(&self) -> &[Vec<Overlap>] {
        &self.rows
    }

    /// Width of output cell `cell` in input voxel units
    pub fn coverage(&self, cell: usize) -> f64 {
        self.boundaries[cell + 1] - self.boundaries[cell]
    }

    /// Sum of the weights in the row of output cell `cell`
    pub fn row_weight(&self, cell: usize) -> f64 {
        self.rows[cell].iter().map(|o| o.weight).sum()
    }

    /// Whether every row's weights sum to its cell width within `tolerance`
    ///
    /// ```rust
    /// # use ctools_resample::AxisOverlap;
    /// let table = AxisOverlap::plan(4, 1.7, 10, 1.0).unwrap();
    /// assert!(table.is_conservative(1e-9));
    /// ```
    pub fn is_conservative(&self, tolerance: f64) -> bool {
        (0..self.len()).all(|cell| self.row_weight(cell).approx_eq(self.coverage(cell), tolerance))
    }
}

/// Overlaps of the output cell spanning `[x0, x1)` on the input axis
///
/// Input voxel `k` covers `[k, k+1)`, so it contributes
/// `min(x1, k+1) - max(x0, k)`. Interior voxels get exactly 1, the first and
/// last get their partial coverage, and a cell inside a single voxel gets
/// `x1 - x0`.
fn overlap_row(
    cell: usize,
    x0: f64,
    x1: f64,
    capacity: usize,
    input_length: usize,
) -> Result<Vec<Overlap>> {
    let first = x0.floor();
    // first index entirely past the cell
    let end = x1.ceil();

    let span = (end - first) as usize;
    if span > capacity || span + 2 < capacity {
        return Err(Error::UnexpectedSpan {
            cell,
            span,
            capacity,
        });
    }

    if first < 0.0 || end > input_length as f64 {
        return Err(Error::OverlapOutOfBounds {
            cell,
            lower: x0,
            upper: x1,
            input_length,
        });
    }

    let first = first as usize;
    Ok((first..first + span)
        .map(|index| {
            let lower = x0.max(index as f64);
            let upper = x1.min((index + 1) as f64);
            Overlap {
                index,
                weight: upper - lower,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_cells_at_both_ends() {
        let row = overlap_row(0, 0.5, 2.3, 3, 4).unwrap();
        let indices: Vec<usize> = row.iter().map(|o| o.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(row[0].weight.approx_eq(0.5, 1e-12));
        assert!(row[1].weight.approx_eq(1.0, 1e-12));
        assert!(row[2].weight.approx_eq(0.3, 1e-12));
    }

    #[test]
    fn cell_inside_single_voxel() {
        // capacity of 2 for any ratio below 1
        let row = overlap_row(0, 1.25, 1.75, 2, 4).unwrap();
        assert_eq!(row, vec![Overlap { index: 1, weight: 0.5 }]);
    }

    #[test]
    fn span_too_wide() {
        let result = overlap_row(7, 0.5, 4.5, 3, 10);
        assert!(matches!(
            result,
            Err(Error::UnexpectedSpan {
                cell: 7,
                span: 5,
                capacity: 3
            })
        ));
    }

    #[test]
    fn span_too_narrow() {
        let result = overlap_row(0, 1.0, 2.0, 4, 10);
        assert!(matches!(result, Err(Error::UnexpectedSpan { span: 1, .. })));
    }

    #[test]
    fn past_the_input_edge() {
        let result = overlap_row(1, 3.5, 4.5, 3, 4);
        assert!(matches!(result, Err(Error::OverlapOutOfBounds { .. })));
    }
}
