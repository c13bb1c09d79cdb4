//! Data types shared between the extractor, plot state and renderer contract

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A half-open index range `[lo, hi)` along a single axis
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct IndexRange {
    /// First index in the range
    pub lo: usize,
    /// One past the last index in the range
    pub hi: usize,
}

impl IndexRange {
    /// Return a new IndexRange object.
    pub fn new(lo: usize, hi: usize) -> Self {
        IndexRange { lo, hi }
    }

    /// Returns the range covering a whole axis of length `length`.
    pub fn full(length: usize) -> Self {
        IndexRange { lo: 0, hi: length }
    }

    /// Returns the range clamped to an axis of length `length`.
    ///
    /// The result always contains at least one element when the axis is non-empty: an empty range
    /// (`hi <= lo`) is widened by one index, moving back from the end of the axis if necessary.
    pub fn clamped(self, length: usize) -> Self {
        if length == 0 {
            return IndexRange { lo: 0, hi: 0 };
        }
        let lo = std::cmp::min(self.lo, length - 1);
        let hi = std::cmp::min(self.hi, length);
        if hi > lo {
            return IndexRange { lo, hi };
        }
        tracing::debug!(lo = self.lo, hi = self.hi, length, "widening empty index range");
        IndexRange { lo, hi: lo + 1 }
    }

    /// Number of indices in the range.
    pub fn len(&self) -> usize {
        self.hi.saturating_sub(self.lo)
    }

    /// Whether the range is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Inclusive min/max index bounds along one axis, always kept with `min <= max`
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(try_from = "RawBounds")]
pub struct Bounds {
    min: usize,
    max: usize,
}

#[derive(Deserialize)]
struct RawBounds {
    min: usize,
    max: usize,
}

impl TryFrom<RawBounds> for Bounds {
    type Error = std::convert::Infallible;

    fn try_from(raw: RawBounds) -> Result<Self, Self::Error> {
        Ok(Bounds::new(raw.min, raw.max))
    }
}

impl Bounds {
    /// Return new Bounds, swapping the arguments if they are out of order.
    pub fn new(a: usize, b: usize) -> Self {
        Bounds {
            min: std::cmp::min(a, b),
            max: std::cmp::max(a, b),
        }
    }

    /// Bounds containing the single index `index`.
    pub fn point(index: usize) -> Self {
        Bounds {
            min: index,
            max: index,
        }
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Convert to the equivalent half-open [IndexRange]. A `max` of `usize::MAX` saturates.
    pub fn to_index_range(self) -> IndexRange {
        IndexRange::new(self.min, self.max.saturating_add(1))
    }
}

/// Crosshair position or reduction region of a view
///
/// Either a single 1-D range or a rectangle over two axes.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Selection {
    /// A range along a single axis
    Range { x: Bounds },
    /// A rectangle over two axes
    Rect { x: Bounds, y: Bounds },
}

impl Selection {
    /// Return a 1-D selection between the two indices.
    pub fn range(a: usize, b: usize) -> Self {
        Selection::Range { x: Bounds::new(a, b) }
    }

    /// Return a rectangular selection with corners `(x0, y0)` and `(x1, y1)`.
    pub fn rect(x0: usize, y0: usize, x1: usize, y1: usize) -> Self {
        Selection::Rect {
            x: Bounds::new(x0, x1),
            y: Bounds::new(y0, y1),
        }
    }

    /// Move one corner of the selection, keeping it normalised.
    pub fn drag_to(self, x: usize, y: Option<usize>) -> Self {
        match (self, y) {
            (Selection::Range { x: bx }, _) => Selection::range(bx.min(), x),
            (Selection::Rect { x: bx, y: by }, Some(y)) => {
                Selection::rect(bx.min(), by.min(), x, y)
            }
            (Selection::Rect { x: bx, y: by }, None) => Selection::Rect {
                x: Bounds::new(bx.min(), x),
                y: by,
            },
        }
    }

    /// Half-open index ranges of the selection, x first.
    pub fn index_ranges(&self) -> Vec<IndexRange> {
        match self {
            Selection::Range { x } => vec![x.to_index_range()],
            Selection::Rect { x, y } => vec![x.to_index_range(), y.to_index_range()],
        }
    }
}

/// Image placement consumed by the renderer
///
/// The data is placed with its lower-left corner at `(x_start, y_start)` and spans
/// `width` x `height` in coordinate units. Rows of `data` map to the y-axis and columns to the
/// x-axis.
#[derive(Clone, Debug, PartialEq)]
pub struct ImagePlacement {
    /// Displayed data
    pub data: Array2<f64>,
    /// Coordinate of the first column
    pub x_start: f64,
    /// Coordinate of the first row
    pub y_start: f64,
    /// Extent along the x-axis
    pub width: f64,
    /// Extent along the y-axis
    pub height: f64,
}

/// Color mapping consumed by the renderer
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
pub struct ColorMapping {
    /// Value mapped to the first palette color
    pub low: f64,
    /// Value mapped to the last palette color
    pub high: f64,
    /// Palette name
    #[validate(length(min = 1, message = "palette must not be empty"))]
    pub palette: String,
}
