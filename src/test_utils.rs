use crate::plot_state::PlotState;
use crate::session::Session;

use ndarray::{ArrayD, IxDyn};

/// Create a 4-D volume of shape `(4, 5, 6, 7)` where each element encodes its own index.
///
/// The element at `[i, j, k, l]` is `1000 * i + 100 * j + 10 * k + l`.
pub(crate) fn volume_4d() -> ArrayD<f64> {
    ArrayD::from_shape_fn(IxDyn(&[4, 5, 6, 7]), |idx| {
        (1000 * idx[0] + 100 * idx[1] + 10 * idx[2] + idx[3]) as f64
    })
}

/// Create a 3-D volume of shape `(2, 3, 4)` holding `0..24` in row-major order.
pub(crate) fn volume_3d() -> ArrayD<f64> {
    ArrayD::from_shape_fn(IxDyn(&[2, 3, 4]), |idx| {
        (12 * idx[0] + 4 * idx[1] + idx[2]) as f64
    })
}

/// Create a PlotState with only required fields set.
pub(crate) fn get_test_plot_state() -> PlotState {
    PlotState::new("x", "y", false)
}

/// Create a Session with map, probe and projection plots and some metadata.
pub(crate) fn get_test_session() -> Session {
    let mut session = Session::new();
    session.insert_plot("map", PlotState::new("x", "y", false));
    session.insert_plot("probe", PlotState::new("q", "energy", true));
    session.insert_plot("projection", PlotState::new("x", "y", false));
    session.set_metadata("volume_picked", Some("volumes/sample.idx".to_string()));
    session.set_metadata("x_coords_picked", Some("coords/x.npy".to_string()));
    session.set_metadata("plot1_mode", None);
    session
}

/// Return a unique path in the system temporary directory.
pub(crate) fn temp_path(suffix: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("volume-explorer-{}-{}", uuid::Uuid::new_v4(), suffix))
}
