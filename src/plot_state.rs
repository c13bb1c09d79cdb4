//! Per-view plot state.
//!
//! A [PlotState] holds everything about a view that is not data: color range and how it is
//! chosen, palette, color scale, plot geometry, orientation and the current selection. It is
//! small and serialisable, which is what makes undo/redo and session files cheap.

use crate::array::Element;
use crate::debounce::Change;
use crate::error::ExplorerError;
use crate::extractor::{self, Percentiles};
use crate::history::Stateful;
use crate::models::{ColorMapping, Selection};
use crate::orientation::Orientation;

use ndarray::{ArrayView, Dimension};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use validator::{Validate, ValidationError};

/// Default palette.
pub const DEFAULT_PALETTE: &str = "Viridis256";

/// How the color range of a view is chosen
#[derive(Clone, Copy, Debug, Default, Deserialize, Display, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RangeMode {
    /// Recomputed from the visible data on every change
    #[default]
    Dynamic,
    /// Frozen to the bounds entered by the user
    UserSpecified,
}

/// Mapping from values to palette positions
#[derive(Clone, Copy, Debug, Default, Deserialize, Display, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorScale {
    #[default]
    Linear,
    Log,
}

/// How the on-screen size of a plot is derived
#[derive(Clone, Copy, Debug, Default, Deserialize, Display, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeMode {
    /// Square plot with side `width * scale`
    #[default]
    Square,
    /// Width and height as given, times `scale`
    Custom,
    /// Follows the aspect ratio of the data
    AspectRatio,
}

/// State of a single view
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
#[validate(schema(function = "validate_plot_state"))]
pub struct PlotState {
    range_mode: RangeMode,
    range_min: f64,
    range_max: f64,
    #[validate(length(min = 1, message = "palette must not be empty"))]
    palette: String,
    color_scale: ColorScale,
    shape_mode: ShapeMode,
    #[validate(range(min = 1, message = "width must be greater than 0"))]
    width: u32,
    #[validate(range(min = 1, message = "height must be greater than 0"))]
    height: u32,
    scale: f64,
    #[validate(range(min = 1, message = "min size must be greater than 0"))]
    min_size: u32,
    max_size: u32,
    needs_flip: bool,
    axis_label_x: String,
    axis_label_y: String,
    selection: Option<Selection>,
}

impl Default for PlotState {
    fn default() -> Self {
        PlotState {
            range_mode: RangeMode::Dynamic,
            range_min: 0.0,
            range_max: 1.0,
            palette: DEFAULT_PALETTE.to_string(),
            color_scale: ColorScale::Linear,
            shape_mode: ShapeMode::Square,
            width: 400,
            height: 400,
            scale: 1.0,
            min_size: 200,
            max_size: 1200,
            needs_flip: false,
            axis_label_x: String::new(),
            axis_label_y: String::new(),
            selection: None,
        }
    }
}

/// Validate the relationships between plot state fields
fn validate_plot_state(state: &PlotState) -> Result<(), ValidationError> {
    if !state.range_min.is_finite() || !state.range_max.is_finite() {
        return Err(ValidationError::new("range bounds must be finite"));
    }
    if state.range_min > state.range_max {
        let mut error = ValidationError::new("range min must not be greater than range max");
        error.add_param("range_min".into(), &state.range_min);
        error.add_param("range_max".into(), &state.range_max);
        return Err(error);
    }
    if !(state.scale.is_finite() && state.scale > 0.0) {
        let mut error = ValidationError::new("scale must be greater than 0");
        error.add_param("scale".into(), &state.scale);
        return Err(error);
    }
    if state.min_size > state.max_size {
        let mut error = ValidationError::new("min size must not be greater than max size");
        error.add_param("min_size".into(), &state.min_size);
        error.add_param("max_size".into(), &state.max_size);
        return Err(error);
    }
    Ok(())
}

impl PlotState {
    /// Return a new PlotState with default settings.
    ///
    /// # Arguments
    ///
    /// * `axis_label_x`: Label of the x-axis
    /// * `axis_label_y`: Label of the y-axis
    /// * `needs_flip`: Whether slices must be transposed for display, as resolved by
    ///   [orientation::resolve](crate::orientation::resolve)
    pub fn new(
        axis_label_x: impl Into<String>,
        axis_label_y: impl Into<String>,
        needs_flip: bool,
    ) -> Self {
        PlotState {
            axis_label_x: axis_label_x.into(),
            axis_label_y: axis_label_y.into(),
            needs_flip,
            ..Default::default()
        }
    }

    pub fn range_mode(&self) -> RangeMode {
        self.range_mode
    }

    /// Current color range as `(min, max)`.
    pub fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }

    pub fn palette(&self) -> &str {
        &self.palette
    }

    pub fn color_scale(&self) -> ColorScale {
        self.color_scale
    }

    pub fn shape_mode(&self) -> ShapeMode {
        self.shape_mode
    }

    /// Stored width and height, before scaling.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Minimum and maximum on-screen size of either side.
    pub fn size_limits(&self) -> (u32, u32) {
        (self.min_size, self.max_size)
    }

    pub fn needs_flip(&self) -> bool {
        self.needs_flip
    }

    pub fn orientation(&self) -> Orientation {
        Orientation {
            needs_flip: self.needs_flip,
        }
    }

    pub fn axis_labels(&self) -> (&str, &str) {
        (&self.axis_label_x, &self.axis_label_y)
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Color mapping for the renderer.
    pub fn color_mapping(&self) -> ColorMapping {
        ColorMapping {
            low: self.range_min,
            high: self.range_max,
            palette: self.palette.clone(),
        }
    }

    /// Switch between dynamic and user specified color ranges.
    ///
    /// Switching to [RangeMode::Dynamic] recomputes the range from `visible` straight away.
    /// Switching to [RangeMode::UserSpecified] keeps the last computed range as the starting point
    /// for the user's bounds.
    pub fn set_range_mode<T: Element, D: Dimension>(
        &mut self,
        mode: RangeMode,
        visible: &ArrayView<T, D>,
        percentiles: &Percentiles,
    ) -> Option<Change> {
        if mode == self.range_mode {
            return None;
        }
        self.range_mode = mode;
        if mode == RangeMode::Dynamic {
            self.compute_range(visible, percentiles);
        }
        Some(Change::immediate(format!("Range mode set to {}", mode)))
    }

    /// Recompute the color range from `visible` if the range is dynamic.
    ///
    /// Returns whether the range was recomputed. This is not a tracked change: the range follows
    /// from the data, which is not part of the history.
    pub fn refresh_range<T: Element, D: Dimension>(
        &mut self,
        visible: &ArrayView<T, D>,
        percentiles: &Percentiles,
    ) -> bool {
        match self.range_mode {
            RangeMode::Dynamic => {
                self.compute_range(visible, percentiles);
                true
            }
            RangeMode::UserSpecified => false,
        }
    }

    fn compute_range<T: Element, D: Dimension>(
        &mut self,
        visible: &ArrayView<T, D>,
        percentiles: &Percentiles,
    ) {
        let (low, high) = extractor::display_range(
            visible,
            self.color_scale,
            percentiles.low,
            percentiles.high,
            percentiles.fallback,
        );
        self.range_min = low;
        self.range_max = high;
    }

    /// Set the user specified color range. The bounds may be given in either order.
    ///
    /// Ignored unless the range mode is [RangeMode::UserSpecified], or if either bound is not
    /// finite.
    pub fn set_user_range(&mut self, a: f64, b: f64) -> Option<Change> {
        if self.range_mode != RangeMode::UserSpecified {
            tracing::warn!(a, b, "ignoring user range while range mode is dynamic");
            return None;
        }
        if !a.is_finite() || !b.is_finite() {
            tracing::warn!(a, b, "ignoring non-finite user range");
            return None;
        }
        let (min, max) = (a.min(b), a.max(b));
        if (min, max) == (self.range_min, self.range_max) {
            return None;
        }
        self.range_min = min;
        self.range_max = max;
        Some(Change::debounced(format!("Range set to [{}, {}]", min, max)))
    }

    pub fn set_palette(&mut self, palette: impl Into<String>) -> Option<Change> {
        let palette = palette.into();
        if palette.is_empty() || palette == self.palette {
            return None;
        }
        let change = Change::immediate(format!("Palette set to {}", palette));
        self.palette = palette;
        Some(change)
    }

    /// Set the color scale. A dynamic range should be refreshed afterwards, since log scales only
    /// take positive values into account.
    pub fn set_color_scale(&mut self, color_scale: ColorScale) -> Option<Change> {
        if color_scale == self.color_scale {
            return None;
        }
        self.color_scale = color_scale;
        Some(Change::immediate(format!("Color scale set to {}", color_scale)))
    }

    pub fn set_shape_mode(&mut self, shape_mode: ShapeMode) -> Option<Change> {
        if shape_mode == self.shape_mode {
            return None;
        }
        self.shape_mode = shape_mode;
        Some(Change::immediate(format!("Shape mode set to {}", shape_mode)))
    }

    /// Set the stored width and height. Each is clamped to the size limits.
    pub fn set_size(&mut self, width: u32, height: u32) -> Option<Change> {
        let width = self.clamp_size(width);
        let height = self.clamp_size(height);
        if (width, height) == (self.width, self.height) {
            return None;
        }
        self.width = width;
        self.height = height;
        Some(Change::debounced(format!("Size set to {}x{}", width, height)))
    }

    /// Clamp a side to the size limits. The upper limit wins if the limits are inverted, as they
    /// can be in a state that was deserialised without validation.
    fn clamp_size(&self, side: u32) -> u32 {
        side.max(self.min_size).min(self.max_size)
    }

    /// Set the scale factor applied to the stored size. Must be positive and finite.
    pub fn set_scale(&mut self, scale: f64) -> Option<Change> {
        if !(scale.is_finite() && scale > 0.0) {
            tracing::warn!(scale, "ignoring invalid scale");
            return None;
        }
        if scale == self.scale {
            return None;
        }
        self.scale = scale;
        Some(Change::debounced(format!("Scale set to {}", scale)))
    }

    /// Set the on-screen size limits. The limits may be given in either order; zero is raised to
    /// one. The stored size is clamped to the new limits.
    pub fn set_size_limits(&mut self, a: u32, b: u32) -> Option<Change> {
        let min_size = a.min(b).max(1);
        let max_size = a.max(b).max(1);
        if (min_size, max_size) == (self.min_size, self.max_size) {
            return None;
        }
        self.min_size = min_size;
        self.max_size = max_size;
        self.width = self.width.clamp(min_size, max_size);
        self.height = self.height.clamp(min_size, max_size);
        Some(Change::debounced(format!(
            "Size limits set to [{}, {}]",
            min_size, max_size
        )))
    }

    /// Update orientation and axis labels after the view's dataset selection changed.
    pub fn reorient(
        &mut self,
        orientation: Orientation,
        axis_label_x: impl Into<String>,
        axis_label_y: impl Into<String>,
    ) -> Option<Change> {
        let axis_label_x = axis_label_x.into();
        let axis_label_y = axis_label_y.into();
        if orientation.needs_flip == self.needs_flip
            && axis_label_x == self.axis_label_x
            && axis_label_y == self.axis_label_y
        {
            return None;
        }
        self.needs_flip = orientation.needs_flip;
        self.axis_label_x = axis_label_x;
        self.axis_label_y = axis_label_y;
        Some(Change::immediate(format!(
            "Dataset axes set to {} / {}",
            self.axis_label_x, self.axis_label_y
        )))
    }

    /// Set or clear the crosshair/reduction selection.
    pub fn set_selection(&mut self, selection: Option<Selection>) -> Option<Change> {
        if selection == self.selection {
            return None;
        }
        self.selection = selection;
        let description = match selection {
            Some(Selection::Range { x }) => {
                format!("Selection set to [{}, {}]", x.min(), x.max())
            }
            Some(Selection::Rect { x, y }) => format!(
                "Selection set to [{}, {}] x [{}, {}]",
                x.min(),
                x.max(),
                y.min(),
                y.max()
            ),
            None => "Selection cleared".to_string(),
        };
        Some(Change::debounced(description))
    }

    /// On-screen `(width, height)` of the plot for data spanning `x_extent` by `y_extent`.
    ///
    /// Each side is clamped to the size limits. Extents are only used in
    /// [ShapeMode::AspectRatio]; if they are not positive and finite the stored size is used as in
    /// [ShapeMode::Custom].
    pub fn plot_size(&self, x_extent: f64, y_extent: f64) -> (u32, u32) {
        let clamp = |side: f64| -> u32 {
            let side = side.round().max(self.min_size as f64).min(self.max_size as f64);
            side as u32
        };
        let width = self.width as f64 * self.scale;
        let height = self.height as f64 * self.scale;
        let valid_extents =
            x_extent.is_finite() && y_extent.is_finite() && x_extent > 0.0 && y_extent > 0.0;
        match self.shape_mode {
            ShapeMode::Square => (clamp(width), clamp(width)),
            ShapeMode::AspectRatio if valid_extents => {
                let longest = width.max(height);
                if x_extent >= y_extent {
                    (clamp(longest), clamp(longest * y_extent / x_extent))
                } else {
                    (clamp(longest * x_extent / y_extent), clamp(longest))
                }
            }
            ShapeMode::Custom | ShapeMode::AspectRatio => (clamp(width), clamp(height)),
        }
    }
}

impl Stateful for PlotState {
    type State = PlotState;

    fn to_state(&self) -> PlotState {
        self.clone()
    }

    /// Restore every field from `state` after validating it.
    fn from_state(&mut self, state: PlotState) -> Result<(), ExplorerError> {
        state.validate()?;
        *self = state;
        Ok(())
    }
}
