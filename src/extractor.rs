//! Slice extraction and reductions over volumes.
//!
//! These are the numerical operations behind every view: looking up the index nearest to a
//! coordinate, taking point slices, summing sub-volumes and computing color ranges.
//!
//! Degenerate inputs never produce an error here. Empty ranges are widened, and data without any
//! finite value falls back to a caller supplied range. Both cases are logged.

use crate::array::{self, Element};
use crate::error::ExplorerError;
use crate::models::IndexRange;
use crate::plot_state::ColorScale;

use ndarray::prelude::*;
use ndarray::Dimension;
use ndarray_stats::interpolate::Linear;
use ndarray_stats::Quantile1dExt;
use noisy_float::types::{n64, N64};
use serde::{Deserialize, Serialize};

/// Default lower percentile for color ranges.
pub const DEFAULT_LOW_PERCENTILE: f64 = 1.0;

/// Default upper percentile for color ranges.
pub const DEFAULT_HIGH_PERCENTILE: f64 = 99.0;

/// Range used when data has no finite values.
pub const DEFAULT_FALLBACK_RANGE: (f64, f64) = (0.0, 1.0);

/// Percentiles and fallback used to compute color ranges
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Percentiles {
    /// Lower percentile (0 to 100)
    pub low: f64,
    /// Upper percentile (0 to 100)
    pub high: f64,
    /// Range used when data has no finite values
    pub fallback: (f64, f64),
}

impl Default for Percentiles {
    fn default() -> Self {
        Percentiles {
            low: DEFAULT_LOW_PERCENTILE,
            high: DEFAULT_HIGH_PERCENTILE,
            fallback: DEFAULT_FALLBACK_RANGE,
        }
    }
}

/// Returns the index of the coordinate nearest to `value`.
///
/// The nearest coordinate is the one with the minimum absolute difference; ties resolve to the
/// lower index. The result is always a valid index for a non-empty `coords`. An empty coordinate
/// array or a NaN value gives index 0.
///
/// # Arguments
///
/// * `coords`: Coordinate ticks along one axis
/// * `value`: Coordinate value to look up
pub fn index_from_coordinate(coords: &[f64], value: f64) -> usize {
    if coords.is_empty() || value.is_nan() {
        tracing::warn!(len = coords.len(), value, "cannot look up coordinate; using index 0");
        return 0;
    }
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (index, coord) in coords.iter().enumerate() {
        let distance = (coord - value).abs();
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }
    array::clamp_index(best, coords.len())
}

/// Returns the half-open index range covering the coordinate interval between `a` and `b`.
///
/// The ends may be given in either order. The result contains at least one index.
pub fn index_range_from_coordinates(coords: &[f64], a: f64, b: f64) -> IndexRange {
    let ia = index_from_coordinate(coords, a);
    let ib = index_from_coordinate(coords, b);
    IndexRange::new(std::cmp::min(ia, ib), std::cmp::max(ia, ib) + 1)
}

/// Returns the view of `volume` obtained by fixing every axis not in `keep_axes`.
///
/// For a 4-D volume with `keep_axes = [2, 3]` and `fixed_indices = [i, j, _, _]` this is
/// `volume[i, j, :, :]`. Kept axes stay in volume order. Fixed indices are clamped to their axis.
///
/// # Arguments
///
/// * `volume`: 3-D or 4-D volume
/// * `fixed_indices`: One index per volume axis. Entries for kept axes are ignored.
/// * `keep_axes`: Axes to keep in the result
pub fn point_slice<'a, T>(
    volume: &ArrayViewD<'a, T>,
    fixed_indices: &[usize],
    keep_axes: &[usize],
) -> Result<ArrayViewD<'a, T>, ExplorerError> {
    array::validate_volume(volume)?;
    array::validate_axes(keep_axes, volume.ndim())?;
    if fixed_indices.len() != volume.ndim() {
        return Err(ExplorerError::DimensionMismatch {
            what: "fixed indices",
            expected: volume.ndim(),
            actual: fixed_indices.len(),
        });
    }
    let slice_info = array::build_point_slice_info(fixed_indices, keep_axes, volume.shape());
    Ok(volume.clone().slice_move(slice_info))
}

/// Sums `volume` over `reduce_axes`, restricting each reduced axis to its range.
///
/// Each range is half-open, clamped to its axis and widened to at least one element. Non-finite
/// values are skipped. The result has the remaining axes in volume order.
///
/// # Arguments
///
/// * `volume`: 3-D or 4-D volume
/// * `ranges`: One range per entry of `reduce_axes`
/// * `reduce_axes`: Axes to sum over
#[tracing::instrument(level = "DEBUG", skip(volume))]
pub fn range_sum_raw<T: Element>(
    volume: &ArrayViewD<T>,
    ranges: &[IndexRange],
    reduce_axes: &[usize],
) -> Result<ArrayD<f64>, ExplorerError> {
    array::validate_volume(volume)?;
    array::validate_axes(reduce_axes, volume.ndim())?;
    if ranges.len() != reduce_axes.len() {
        return Err(ExplorerError::DimensionMismatch {
            what: "index ranges",
            expected: reduce_axes.len(),
            actual: ranges.len(),
        });
    }
    let slice_info = array::build_range_slice_info(ranges, reduce_axes, volume.shape());
    let sliced = volume.slice(slice_info);

    let mut axes = reduce_axes.to_vec();
    axes.sort_unstable();
    let Some((first_axis, remaining_axes)) = axes.split_first() else {
        return Ok(sliced.mapv(array::to_f64));
    };
    // Sum over first axis
    let mut result = sliced.fold_axis(Axis(*first_axis), 0.0, |sum, val| {
        let val = array::to_f64(*val);
        if val.is_finite() {
            sum + val
        } else {
            *sum
        }
    });
    // Sum over remaining axes. Each earlier reduction shifts later axes down by one.
    for (n, axis) in remaining_axes.iter().enumerate() {
        result = result.sum_axis(Axis(axis - n - 1));
    }
    Ok(result)
}

/// Sums `volume` over `reduce_axes` within `ranges` and normalises the result to `[0, 1]`.
///
/// See [range_sum_raw] and [normalize].
pub fn range_sum<T: Element>(
    volume: &ArrayViewD<T>,
    ranges: &[IndexRange],
    reduce_axes: &[usize],
) -> Result<ArrayD<f64>, ExplorerError> {
    let sums = range_sum_raw(volume, ranges, reduce_axes)?;
    Ok(normalize(&sums.view()))
}

/// Min-max normalise `data` to `[0, 1]`.
///
/// Minimum and maximum are taken over the finite values. When they are equal, or there are no
/// finite values, the result is all zero. Non-finite values map to zero.
pub fn normalize<D: Dimension>(data: &ArrayView<f64, D>) -> Array<f64, D> {
    let (min, max) = data
        .iter()
        .copied()
        .filter(|val| val.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), val| {
            (min.min(val), max.max(val))
        });
    if !(max > min) {
        return Array::zeros(data.raw_dim());
    }
    let span = max - min;
    data.mapv(|val| if val.is_finite() { (val - min) / span } else { 0.0 })
}

/// Returns the `[low_pct, high_pct]` percentiles of the finite values in `data`.
///
/// Percentiles are in the range 0 to 100 and use linear interpolation between the closest ranks.
/// When `data` has no finite values `fallback` is returned.
///
/// # Arguments
///
/// * `data`: Values to compute the range of
/// * `low_pct`: Lower percentile, typically 1
/// * `high_pct`: Upper percentile, typically 99
/// * `fallback`: Range to use when no finite values exist
pub fn percentile_range<T: Element, D: Dimension>(
    data: &ArrayView<T, D>,
    low_pct: f64,
    high_pct: f64,
    fallback: (f64, f64),
) -> (f64, f64) {
    let finite = data
        .iter()
        .map(|val| array::to_f64(*val))
        .filter(|val| val.is_finite());
    percentile_range_of(finite, low_pct, high_pct, fallback)
}

/// Returns the color range for `data` displayed with `color_scale`.
///
/// With a [ColorScale::Log] scale only strictly positive values take part, since the others
/// cannot be displayed.
pub fn display_range<T: Element, D: Dimension>(
    data: &ArrayView<T, D>,
    color_scale: ColorScale,
    low_pct: f64,
    high_pct: f64,
    fallback: (f64, f64),
) -> (f64, f64) {
    let finite = data
        .iter()
        .map(|val| array::to_f64(*val))
        .filter(|val| val.is_finite());
    match color_scale {
        ColorScale::Linear => percentile_range_of(finite, low_pct, high_pct, fallback),
        ColorScale::Log => {
            percentile_range_of(finite.filter(|val| *val > 0.0), low_pct, high_pct, fallback)
        }
    }
}

fn percentile_range_of(
    values: impl Iterator<Item = f64>,
    low_pct: f64,
    high_pct: f64,
    fallback: (f64, f64),
) -> (f64, f64) {
    let mut values: Array1<N64> = values.map(n64).collect();
    if values.is_empty() {
        tracing::warn!(?fallback, "no finite values to compute a range from; using fallback");
        return fallback;
    }
    let (low_pct, high_pct) = if low_pct <= high_pct {
        (low_pct, high_pct)
    } else {
        (high_pct, low_pct)
    };
    let low = quantile(&mut values, low_pct);
    let high = quantile(&mut values, high_pct);
    match (low, high) {
        (Some(low), Some(high)) => (low.min(high), low.max(high)),
        _ => {
            tracing::warn!(
                low_pct,
                high_pct,
                ?fallback,
                "invalid percentiles; using fallback"
            );
            fallback
        }
    }
}

fn quantile(values: &mut Array1<N64>, pct: f64) -> Option<f64> {
    if !(0.0..=100.0).contains(&pct) {
        return None;
    }
    values
        .quantile_mut(n64(pct / 100.0), &Linear)
        .ok()
        .map(|q| q.raw())
}
