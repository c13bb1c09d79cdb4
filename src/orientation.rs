//! Alignment of 2-D slices with their coordinate arrays.
//!
//! A slice taken from a volume has rows (axis 0) and columns (axis 1). The renderer draws rows
//! along the y-axis and columns along the x-axis, so a slice whose rows run along the x
//! coordinate must be transposed before display. This module decides when that is the case from
//! the lengths of the coordinate arrays.
//!
//! Only the data is ever transposed. The x coordinate array is always placed on the x-axis and the
//! y coordinate array on the y-axis; their values are never reordered.

use crate::array::{self, Element};
use crate::models::ImagePlacement;

use ndarray::prelude::*;
use serde::{Deserialize, Serialize};

/// Result of resolving the orientation of a 2-D slice
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct Orientation {
    /// Whether the slice must be transposed so that rows map to y and columns map to x
    pub needs_flip: bool,
}

/// Decide whether a slice of shape `[d0, d1]` must be transposed to match its coordinate arrays.
///
/// * `x_len == d1 && y_len == d0`: already aligned, no flip.
/// * `x_len == d0 && y_len == d1`: flip.
/// * anything else: no flip, logged as ambiguous.
///
/// A square slice matches both of the first two cases; it is not flipped and is also logged as
/// ambiguous.
///
/// # Arguments
///
/// * `slice_shape`: Rows and columns of the slice
/// * `x_coord_len`: Length of the coordinate array for the x-axis, if known
/// * `y_coord_len`: Length of the coordinate array for the y-axis, if known
pub fn resolve(
    slice_shape: [usize; 2],
    x_coord_len: Option<usize>,
    y_coord_len: Option<usize>,
) -> Orientation {
    let [d0, d1] = slice_shape;
    let (x_len, y_len) = match (x_coord_len, y_coord_len) {
        (Some(x_len), Some(y_len)) => (x_len, y_len),
        _ => {
            tracing::warn!(
                d0,
                d1,
                ?x_coord_len,
                ?y_coord_len,
                "coordinate lengths unknown, orientation is ambiguous; not flipping"
            );
            return Orientation { needs_flip: false };
        }
    };
    if x_len == d1 && y_len == d0 {
        if x_len == y_len {
            tracing::warn!(
                d0,
                d1,
                x_len,
                y_len,
                "square slice with equal coordinate lengths, orientation is ambiguous; not flipping"
            );
        }
        Orientation { needs_flip: false }
    } else if x_len == d0 && y_len == d1 {
        tracing::debug!(d0, d1, x_len, y_len, "slice must be transposed");
        Orientation { needs_flip: true }
    } else {
        tracing::warn!(
            d0,
            d1,
            x_len,
            y_len,
            "coordinate lengths match neither orientation, orientation is ambiguous; not flipping"
        );
        Orientation { needs_flip: false }
    }
}

/// A 2-D slice together with its coordinate arrays and axis labels.
///
/// The labels describe the axes of the slice as given (`x_label` for the columns, `y_label` for
/// the rows) and therefore follow the data when it is transposed. The coordinate arrays describe
/// the semantic x and y axes and never move.
#[derive(Clone, Debug)]
pub struct OrientedSlice<'a, T> {
    data: ArrayView2<'a, T>,
    x_coords: Option<&'a [f64]>,
    y_coords: Option<&'a [f64]>,
    x_label: String,
    y_label: String,
    orientation: Orientation,
}

impl<'a, T: Element> OrientedSlice<'a, T> {
    /// Return a new OrientedSlice, resolving its orientation from the coordinate lengths.
    pub fn new(
        data: ArrayView2<'a, T>,
        x_coords: Option<&'a [f64]>,
        y_coords: Option<&'a [f64]>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        let (d0, d1) = data.dim();
        let orientation = resolve([d0, d1], x_coords.map(<[f64]>::len), y_coords.map(<[f64]>::len));
        Self::with_orientation(data, x_coords, y_coords, x_label, y_label, orientation)
    }

    /// Return a new OrientedSlice with an orientation that was resolved earlier.
    ///
    /// Views keep the orientation chosen when their dataset was selected, so later slices of the
    /// same dataset reuse it rather than resolving again.
    pub fn with_orientation(
        data: ArrayView2<'a, T>,
        x_coords: Option<&'a [f64]>,
        y_coords: Option<&'a [f64]>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        orientation: Orientation,
    ) -> Self {
        OrientedSlice {
            data,
            x_coords,
            y_coords,
            x_label: x_label.into(),
            y_label: y_label.into(),
            orientation,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn needs_flip(&self) -> bool {
        self.orientation.needs_flip
    }

    /// Returns the data to display: the slice itself, or its transpose when a flip is needed.
    pub fn flipped_data(&self) -> Array2<T> {
        if self.orientation.needs_flip {
            array::transpose(&self.data)
        } else {
            self.data.to_owned()
        }
    }

    /// Coordinates for the x-axis. Always the x coordinate array.
    pub fn flipped_x_coords(&self) -> Option<&'a [f64]> {
        self.x_coords
    }

    /// Coordinates for the y-axis. Always the y coordinate array.
    pub fn flipped_y_coords(&self) -> Option<&'a [f64]> {
        self.y_coords
    }

    /// Label for the x-axis of the displayed data.
    pub fn flipped_x_axis_label(&self) -> &str {
        if self.orientation.needs_flip {
            &self.y_label
        } else {
            &self.x_label
        }
    }

    /// Label for the y-axis of the displayed data.
    pub fn flipped_y_axis_label(&self) -> &str {
        if self.orientation.needs_flip {
            &self.x_label
        } else {
            &self.y_label
        }
    }

    /// Build the renderer's image placement for the displayed data.
    ///
    /// The image spans the coordinate extents where coordinates are known and index space
    /// otherwise.
    pub fn image_placement(&self) -> ImagePlacement {
        let data = self.flipped_data().mapv(array::to_f64);
        let (rows, cols) = data.dim();
        let (x_start, width) = extent(self.x_coords, cols);
        let (y_start, height) = extent(self.y_coords, rows);
        ImagePlacement {
            data,
            x_start,
            y_start,
            width,
            height,
        }
    }
}

/// Start and width of an axis in coordinate units, falling back to index units.
fn extent(coords: Option<&[f64]>, length: usize) -> (f64, f64) {
    match coords {
        Some([first, .., last]) => {
            let start = first.min(*last);
            (start, (last - first).abs())
        }
        Some([only]) => (*only, 1.0),
        _ => (0.0, length as f64),
    }
}
