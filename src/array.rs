//! Functions and utilities for working with [ndarray] volumes.

use crate::error::ExplorerError;
use crate::models::IndexRange;

use ndarray::prelude::*;
use ndarray::{IxDyn, SliceInfo, SliceInfoElem};

/// Trait for volume elements.
pub trait Element:
    Clone + Copy + PartialOrd + num_traits::ToPrimitive + std::fmt::Debug
{
}

/// Blanket implementation of Element.
impl<T> Element for T where
    T: Clone + Copy + PartialOrd + num_traits::ToPrimitive + std::fmt::Debug
{
}

/// Convert an element to `f64`, mapping unrepresentable values to NaN.
pub(crate) fn to_f64<T: Element>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Check that a volume has a supported number of dimensions (3 or 4).
pub fn validate_volume<T>(volume: &ArrayViewD<T>) -> Result<(), ExplorerError> {
    match volume.ndim() {
        3 | 4 => Ok(()),
        ndim => Err(ExplorerError::UnsupportedVolume { ndim }),
    }
}

/// Check that every axis in `axes` exists in an array of `ndim` dimensions and appears once.
pub(crate) fn validate_axes(axes: &[usize], ndim: usize) -> Result<(), ExplorerError> {
    for (n, axis) in axes.iter().enumerate() {
        if *axis >= ndim {
            return Err(ExplorerError::AxisOutOfRange { axis: *axis, ndim });
        }
        if axes[..n].contains(axis) {
            return Err(ExplorerError::DuplicateAxis { axis: *axis });
        }
    }
    Ok(())
}

/// Clamp an index such that it is safe for indexing an axis of length `length`.
pub(crate) fn clamp_index(index: usize, length: usize) -> usize {
    std::cmp::min(index, length.saturating_sub(1))
}

/// Build an [ndarray] SliceInfo fixing each axis not in `keep_axes` to the matching index.
///
/// Kept axes are selected in full and the fixed axes are removed from the result.
///
/// # Arguments
///
/// * `fixed_indices`: One index per axis of the array. Entries for kept axes are ignored.
/// * `keep_axes`: Axes to keep
/// * `shape`: Shape of the array being sliced
pub(crate) fn build_point_slice_info(
    fixed_indices: &[usize],
    keep_axes: &[usize],
    shape: &[usize],
) -> SliceInfo<Vec<SliceInfoElem>, IxDyn, IxDyn> {
    let si: Vec<SliceInfoElem> = std::iter::zip(fixed_indices, shape)
        .enumerate()
        .map(|(axis, (index, length))| {
            if keep_axes.contains(&axis) {
                SliceInfoElem::Slice {
                    start: 0,
                    end: None,
                    step: 1,
                }
            } else {
                let index = clamp_index(*index, *length);
                SliceInfoElem::Index(index as isize)
            }
        })
        .collect();
    SliceInfo::try_from(si).expect("SliceInfo should not fail for IxDyn")
}

/// Build an [ndarray] SliceInfo restricting each axis in `axes` to the matching range.
///
/// Ranges are clamped to the axis and widened to at least one element. Axes not listed are
/// selected in full. No axes are removed from the result.
pub(crate) fn build_range_slice_info(
    ranges: &[IndexRange],
    axes: &[usize],
    shape: &[usize],
) -> SliceInfo<Vec<SliceInfoElem>, IxDyn, IxDyn> {
    let si: Vec<SliceInfoElem> = shape
        .iter()
        .enumerate()
        .map(|(axis, length)| {
            match axes.iter().position(|a| *a == axis) {
                Some(n) => {
                    let range = ranges[n].clamped(*length);
                    SliceInfoElem::Slice {
                        start: range.lo as isize,
                        end: Some(range.hi as isize),
                        step: 1,
                    }
                }
                None => SliceInfoElem::Slice {
                    start: 0,
                    end: None,
                    step: 1,
                },
            }
        })
        .collect();
    SliceInfo::try_from(si).expect("SliceInfo should not fail for IxDyn")
}

/// Returns the transpose of a 2-D array as an owned array in standard layout.
pub fn transpose<T: Clone>(data: &ArrayView2<T>) -> Array2<T> {
    data.t().as_standard_layout().into_owned()
}

/// Convert a dynamic dimensional view into a 2-D view.
pub fn as_2d<'a, T>(data: ArrayViewD<'a, T>) -> Result<ArrayView2<'a, T>, ExplorerError> {
    Ok(data.into_dimensionality::<Ix2>()?)
}
