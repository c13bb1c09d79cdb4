//! Session inspection run by the `volume-explorer` binary.

use crate::array;
use crate::cli::CommandLineArgs;
use crate::config::ExplorerConfig;
use crate::dataset::{DatasetLoader, JsonDatasetLoader};
use crate::error::ExplorerError;
use crate::extractor;
use crate::orientation::OrientedSlice;
use crate::plot_state::{ColorScale, PlotState, RangeMode, ShapeMode};
use crate::session::SessionController;

use expanduser::expanduser;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;
use uuid::Uuid;

/// Metadata entry naming the volume shown by the map view.
pub const VOLUME_METADATA_KEY: &str = "volume_picked";

/// Name of the view showing point slices of the volume.
pub const MAP_PLOT: &str = "map";

/// Summary of a single view
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotSummary {
    pub name: String,
    pub range_mode: RangeMode,
    pub range: (f64, f64),
    pub palette: String,
    pub color_scale: ColorScale,
    pub shape_mode: ShapeMode,
    pub plot_size: (u32, u32),
    pub needs_flip: bool,
    pub axis_labels: (String, String),
}

impl PlotSummary {
    fn new(name: &str, state: &PlotState, extents: (f64, f64)) -> Self {
        let (x_label, y_label) = state.axis_labels();
        PlotSummary {
            name: name.to_string(),
            range_mode: state.range_mode(),
            range: state.range(),
            palette: state.palette().to_string(),
            color_scale: state.color_scale(),
            shape_mode: state.shape_mode(),
            plot_size: state.plot_size(extents.0, extents.1),
            needs_flip: state.needs_flip(),
            axis_labels: (x_label.to_string(), y_label.to_string()),
        }
    }
}

/// Summary of a session, printed by the binary
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub metadata: BTreeMap<String, Option<String>>,
    pub plots: Vec<PlotSummary>,
    pub history_entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_shape: Option<Vec<usize>>,
}

/// Expand `~` in a user supplied path.
fn expand_path(path: &str) -> Result<PathBuf, ExplorerError> {
    expanduser(path).map_err(|error| ExplorerError::io(path, error))
}

/// Load, validate and summarise the session named by `args`.
///
/// If a data directory is given and the session references a volume, the map view is aligned
/// with the volume's last two axes and its dynamic range is recomputed from the first slice.
/// The change log is exported and the session re-saved if requested.
#[tracing::instrument(level = "DEBUG", skip(args))]
pub fn run(args: &CommandLineArgs) -> Result<SessionSummary, ExplorerError> {
    let config = ExplorerConfig::from(args);
    let session_path = expand_path(&args.session_file)?;
    let mut controller = SessionController::open(&session_path, &config)?;

    let mut volume_shape = None;
    let mut map_extents = (1.0, 1.0);
    let volume_id = controller
        .session()
        .metadata(VOLUME_METADATA_KEY)
        .map(str::to_string);
    if let (Some(data_dir), Some(volume_id)) = (&args.data_dir, volume_id) {
        let loader = JsonDatasetLoader::new(expand_path(data_dir)?);
        let dataset = loader.load(&volume_id)?;
        let volume = dataset.view();
        let ndim = volume.ndim();
        volume_shape = Some(volume.shape().to_vec());

        if controller.session().plot(MAP_PLOT).is_ok() {
            let keep_axes = [ndim - 2, ndim - 1];
            let slice = extractor::point_slice(&volume, &vec![0; ndim], &keep_axes)?;
            let slice = array::as_2d(slice)?;
            let (x_label, y_label) = {
                let (x_label, y_label) = controller.session().plot(MAP_PLOT)?.axis_labels();
                (x_label.to_string(), y_label.to_string())
            };
            let oriented = OrientedSlice::new(
                slice.view(),
                dataset.axis_coords(ndim - 1),
                dataset.axis_coords(ndim - 2),
                x_label,
                y_label,
            );
            let placement = oriented.image_placement();
            map_extents = (placement.width, placement.height);

            let now = Instant::now();
            let orientation = oriented.orientation();
            let labels = (
                oriented.flipped_x_axis_label().to_string(),
                oriented.flipped_y_axis_label().to_string(),
            );
            controller.edit_plot(MAP_PLOT, now, |plot| {
                plot.reorient(orientation, labels.0, labels.1)
            })?;
            controller.refresh_plot_range(MAP_PLOT, &placement.data.view())?;
            controller.tick(now)?;
        }
    }

    if let Some(path) = &args.export_change_log {
        controller.export_change_log(&expand_path(path)?)?;
    }
    if let Some(path) = &args.resave {
        controller.save(&expand_path(path)?)?;
    }

    let session = controller.session();
    let plots = session
        .plots()
        .map(|(name, state)| {
            let extents = if name == MAP_PLOT {
                map_extents
            } else {
                (1.0, 1.0)
            };
            PlotSummary::new(name, state, extents)
        })
        .collect();
    Ok(SessionSummary {
        session_id: session.session_id(),
        metadata: session.metadata_entries().clone(),
        plots,
        history_entries: controller.history().len(),
        volume_shape,
    })
}
