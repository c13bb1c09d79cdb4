//! Sessions of coupled views.
//!
//! A [Session] groups the [PlotState] of each view with free-form metadata holding references to
//! the datasets being explored. Sessions are persisted as JSON without any array data; volumes
//! and coordinates are fetched again from their references when a session is restored.
//!
//! A [SessionController] drives a session from an event loop. It routes view edits through a
//! [Debouncer] into a [SessionStateHistory], and counts the redraws the host needs to perform.

use crate::array::Element;
use crate::config::ExplorerConfig;
use crate::debounce::{Change, Debouncer};
use crate::error::ExplorerError;
use crate::extractor::Percentiles;
use crate::history::{ChangeLogEntry, SessionStateHistory, Stateful};
use crate::plot_state::PlotState;

use ndarray::{ArrayView, Dimension};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;
use validator::Validate;

/// Named views and dataset references
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    session_id: Uuid,
    #[serde(default)]
    metadata: BTreeMap<String, Option<String>>,
    #[serde(default)]
    plots: BTreeMap<String, PlotState>,
}

impl Session {
    /// Return a new empty Session with a random ID.
    pub fn new() -> Self {
        Session {
            session_id: Uuid::new_v4(),
            metadata: BTreeMap::new(),
            plots: BTreeMap::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Add or replace the named view, returning the previous state if any.
    pub fn insert_plot(&mut self, name: impl Into<String>, state: PlotState) -> Option<PlotState> {
        self.plots.insert(name.into(), state)
    }

    pub fn plot(&self, name: &str) -> Result<&PlotState, ExplorerError> {
        self.plots.get(name).ok_or_else(|| ExplorerError::UnknownPlot {
            name: name.to_string(),
        })
    }

    pub fn plot_mut(&mut self, name: &str) -> Result<&mut PlotState, ExplorerError> {
        self.plots
            .get_mut(name)
            .ok_or_else(|| ExplorerError::UnknownPlot {
                name: name.to_string(),
            })
    }

    /// Views in name order.
    pub fn plots(&self) -> impl Iterator<Item = (&str, &PlotState)> {
        self.plots.iter().map(|(name, state)| (name.as_str(), state))
    }

    /// Set a metadata entry. A `None` value records that the entry is known but unset.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: Option<String>) {
        self.metadata.insert(key.into(), value);
    }

    /// Returns the value of a metadata entry. `None` if the entry is missing or unset.
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|value| value.as_deref())
    }

    pub fn metadata_entries(&self) -> &BTreeMap<String, Option<String>> {
        &self.metadata
    }

    /// Check every view's state.
    pub fn validate(&self) -> Result<(), ExplorerError> {
        for (name, state) in &self.plots {
            state.validate().map_err(|error| {
                tracing::warn!(plot = %name, "invalid plot state");
                error
            })?;
        }
        Ok(())
    }

    /// Write the session to `path` as pretty-printed JSON.
    ///
    /// # Arguments
    ///
    /// * `path`: File to write
    /// * `include_data`: Must be `false`. Sessions never hold array data, so asking for it is an
    ///   error rather than a silent omission.
    #[tracing::instrument(level = "DEBUG", skip(self))]
    pub fn save(&self, path: &Path, include_data: bool) -> Result<(), ExplorerError> {
        if include_data {
            return Err(ExplorerError::DataNotPersistable);
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|error| ExplorerError::io(path, error))?;
        tracing::info!(session_id = %self.session_id, path = %path.display(), "saved session");
        Ok(())
    }

    /// Read a session from `path` and validate every view.
    ///
    /// # Arguments
    ///
    /// * `path`: File to read
    /// * `restore_data`: Must be `false`. Array data is fetched by the caller through a
    ///   [DatasetLoader](crate::dataset::DatasetLoader) using the metadata references.
    #[tracing::instrument(level = "DEBUG")]
    pub fn load(path: &Path, restore_data: bool) -> Result<Self, ExplorerError> {
        if restore_data {
            return Err(ExplorerError::DataNotPersistable);
        }
        let json = std::fs::read_to_string(path).map_err(|error| ExplorerError::io(path, error))?;
        let session: Session = serde_json::from_str(&json)?;
        session.validate()?;
        tracing::info!(
            session_id = %session.session_id,
            plots = session.plots.len(),
            "loaded session"
        );
        Ok(session)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Stateful for Session {
    type State = Session;

    fn to_state(&self) -> Session {
        self.clone()
    }

    fn from_state(&mut self, state: Session) -> Result<(), ExplorerError> {
        state.validate()?;
        *self = state;
        Ok(())
    }
}

fn loaded_description(path: &Path) -> String {
    format!("Session loaded from {}", path.display())
}

/// Write the change log of `history` to `path` as a JSON array.
pub fn export_change_log(path: &Path, history: &SessionStateHistory) -> Result<(), ExplorerError> {
    write_change_log(path, history.change_log())
}

fn write_change_log(path: &Path, change_log: &[ChangeLogEntry]) -> Result<(), ExplorerError> {
    let json = serde_json::to_string_pretty(change_log)?;
    std::fs::write(path, json).map_err(|error| ExplorerError::io(path, error))?;
    tracing::info!(entries = change_log.len(), path = %path.display(), "exported change log");
    Ok(())
}

/// Drives a session from a single-threaded event loop
///
/// Edits to views are reported as [Change]s and committed to the history by [Self::tick] once
/// their debounce delay has passed. Whole-session operations (load, undo and redo) replace the
/// session in one step while holding the controller exclusively, so no edit can be tracked
/// part-way through. Each finishes with a single redraw request.
#[derive(Debug)]
pub struct SessionController {
    session: Session,
    history: SessionStateHistory,
    debouncer: Debouncer,
    percentiles: Percentiles,
    redraw_requests: usize,
}

impl SessionController {
    /// Return a new SessionController for `session`, with its initial state committed.
    pub fn new(session: Session, config: &ExplorerConfig) -> Result<Self, ExplorerError> {
        Self::with_initial_entry(session, config, "Session created")
    }

    /// Return a new SessionController for the session saved at `path`, with the loaded state as
    /// the only history entry.
    pub fn open(path: &Path, config: &ExplorerConfig) -> Result<Self, ExplorerError> {
        let session = Session::load(path, false)?;
        Self::with_initial_entry(session, config, &loaded_description(path))
    }

    fn with_initial_entry(
        session: Session,
        config: &ExplorerConfig,
        description: &str,
    ) -> Result<Self, ExplorerError> {
        let mut history = SessionStateHistory::new(config.max_history);
        history.save_state(&session, description)?;
        Ok(SessionController {
            session,
            history,
            debouncer: Debouncer::new(config.debounce),
            percentiles: config.percentiles,
            redraw_requests: 0,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn history(&self) -> &SessionStateHistory {
        &self.history
    }

    /// Whether a commit is waiting for its debounce delay.
    pub fn has_pending_commit(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Number of redraws requested so far.
    pub fn redraw_requests(&self) -> usize {
        self.redraw_requests
    }

    /// Apply `edit` to the named view and schedule a commit for the change it reports.
    ///
    /// Returns the change, or `None` if the edit changed nothing. If the change cannot coalesce
    /// with the pending commit, the pending commit is made first from the state before the edit.
    pub fn edit_plot<F>(
        &mut self,
        name: &str,
        now: Instant,
        edit: F,
    ) -> Result<Option<Change>, ExplorerError>
    where
        F: FnOnce(&mut PlotState) -> Option<Change>,
    {
        let plot = self.session.plot_mut(name)?;
        let before = self.debouncer.is_pending().then(|| plot.clone());
        let Some(change) = edit(plot) else {
            return Ok(None);
        };
        if let Some(before) = before {
            if !self.debouncer.coalesces(change.policy) {
                self.commit_pending_before(name, before)?;
            }
        }
        tracing::debug!(plot = name, description = %change.description, policy = %change.policy, "plot changed");
        self.debouncer.schedule(change.clone(), now);
        self.redraw_requests += 1;
        Ok(Some(change))
    }

    /// Commit the pending change with the named view as it was before the latest edit.
    fn commit_pending_before(&mut self, name: &str, before: PlotState) -> Result<(), ExplorerError> {
        let edited = std::mem::replace(self.session.plot_mut(name)?, before);
        let result = self.flush();
        *self.session.plot_mut(name)? = edited;
        result
    }

    /// Recompute the color range of the named view from the data it now shows.
    ///
    /// Only views with a dynamic range are affected. A recomputed range requests a redraw but is
    /// not committed to history. Returns whether the range was recomputed.
    pub fn refresh_plot_range<T: Element, D: Dimension>(
        &mut self,
        name: &str,
        visible: &ArrayView<T, D>,
    ) -> Result<bool, ExplorerError> {
        let refreshed = self
            .session
            .plot_mut(name)?
            .refresh_range(visible, &self.percentiles);
        if refreshed {
            self.redraw_requests += 1;
        }
        Ok(refreshed)
    }

    /// Commit the pending change if it is due at `now`. Returns whether a commit was made.
    pub fn tick(&mut self, now: Instant) -> Result<bool, ExplorerError> {
        match self.debouncer.poll(now) {
            Some(description) => {
                self.history.save_state(&self.session, &description)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Commit the pending change regardless of its deadline.
    fn flush(&mut self) -> Result<(), ExplorerError> {
        if let Some(description) = self.debouncer.flush() {
            self.history.save_state(&self.session, &description)?;
        }
        Ok(())
    }

    /// Undo the last committed change. A pending change is committed first, so it is the one
    /// undone.
    pub fn undo(&mut self) -> Result<bool, ExplorerError> {
        self.flush()?;
        let undone = self.history.undo(&mut self.session)?;
        if undone {
            self.redraw_requests += 1;
        }
        Ok(undone)
    }

    /// Redo the last undone change.
    pub fn redo(&mut self) -> Result<bool, ExplorerError> {
        self.flush()?;
        let redone = self.history.redo(&mut self.session)?;
        if redone {
            self.redraw_requests += 1;
        }
        Ok(redone)
    }

    /// Replace the session with the one saved at `path`.
    ///
    /// Any pending change is committed first. The loaded session is committed as a single
    /// history entry and a single redraw is requested.
    #[tracing::instrument(level = "DEBUG", skip(self))]
    pub fn load(&mut self, path: &Path) -> Result<(), ExplorerError> {
        self.flush()?;
        let loaded = Session::load(path, false)?;
        self.session.from_state(loaded)?;
        self.history
            .save_state(&self.session, &loaded_description(path))?;
        self.redraw_requests += 1;
        Ok(())
    }

    /// Save the session to `path`, without array data.
    pub fn save(&self, path: &Path) -> Result<(), ExplorerError> {
        self.session.save(path, false)
    }

    /// Write the change log to `path`.
    pub fn export_change_log(&self, path: &Path) -> Result<(), ExplorerError> {
        export_change_log(path, &self.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Selection;
    use crate::plot_state::ShapeMode;
    use crate::test_utils;

    use std::time::Duration;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn controller() -> SessionController {
        SessionController::new(test_utils::get_test_session(), &ExplorerConfig::default()).unwrap()
    }

    #[test]
    fn plot_lookup() {
        let mut session = test_utils::get_test_session();
        assert_eq!(("q", "energy"), session.plot("probe").unwrap().axis_labels());
        match session.plot_mut("missing").unwrap_err() {
            ExplorerError::UnknownPlot { name } => assert_eq!("missing", name),
            _ => panic!("expected unknown plot error"),
        }
        let names: Vec<&str> = session.plots().map(|(name, _)| name).collect();
        assert_eq!(vec!["map", "probe", "projection"], names);
    }

    #[test]
    fn metadata() {
        let session = test_utils::get_test_session();
        assert_eq!(Some("volumes/sample.idx"), session.metadata("volume_picked"));
        assert_eq!(None, session.metadata("plot1_mode"));
        assert_eq!(None, session.metadata("missing"));
        assert!(session.metadata_entries().contains_key("plot1_mode"));
    }

    #[test]
    fn session_json() {
        let session = test_utils::get_test_session();
        let json = serde_json::to_value(&session).unwrap();
        let object = json.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(|key| key.as_str()).collect();
        keys.sort();
        assert_eq!(vec!["metadata", "plots", "sessionId"], keys);
        assert_eq!(
            serde_json::json!(session.session_id().to_string()),
            json["sessionId"]
        );
        assert_eq!(serde_json::Value::Null, json["metadata"]["plot1_mode"]);
        assert_eq!(serde_json::json!(true), json["plots"]["probe"]["needsFlip"]);
    }

    #[test]
    fn save_load_round_trip() {
        let mut session = test_utils::get_test_session();
        let map = session.plot_mut("map").unwrap();
        map.set_palette("Greys256").unwrap();
        map.set_shape_mode(ShapeMode::AspectRatio).unwrap();
        map.set_selection(Some(Selection::rect(1, 2, 3, 4))).unwrap();
        let path = test_utils::temp_path("session.json");
        session.save(&path, false).unwrap();
        let loaded = Session::load(&path, false).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(session, loaded);
    }

    #[test]
    fn save_include_data() {
        let session = test_utils::get_test_session();
        let path = test_utils::temp_path("session.json");
        match session.save(&path, true).unwrap_err() {
            ExplorerError::DataNotPersistable => (),
            _ => panic!("expected data not persistable error"),
        }
        assert!(!path.exists());
    }

    #[test]
    fn load_restore_data() {
        let path = test_utils::temp_path("session.json");
        match Session::load(&path, true).unwrap_err() {
            ExplorerError::DataNotPersistable => (),
            _ => panic!("expected data not persistable error"),
        }
    }

    #[test]
    fn load_missing_file() {
        let path = test_utils::temp_path("missing.json");
        match Session::load(&path, false).unwrap_err() {
            ExplorerError::Io { path: error_path, .. } => assert_eq!(path, error_path),
            _ => panic!("expected io error"),
        }
    }

    #[test]
    fn load_corrupt_file() {
        let path = test_utils::temp_path("corrupt.json");
        std::fs::write(&path, "{\"sessionId\": ").unwrap();
        let result = Session::load(&path, false);
        std::fs::remove_file(&path).unwrap();
        match result.unwrap_err() {
            ExplorerError::Json(_) => (),
            _ => panic!("expected json error"),
        }
    }

    #[test]
    fn load_invalid_plot() {
        let path = test_utils::temp_path("invalid.json");
        let json = serde_json::json!({
            "sessionId": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "metadata": {},
            "plots": {"map": {"minSize": 500, "maxSize": 100}},
        });
        std::fs::write(&path, json.to_string()).unwrap();
        let result = Session::load(&path, false);
        std::fs::remove_file(&path).unwrap();
        match result.unwrap_err() {
            ExplorerError::Validation(_) => (),
            _ => panic!("expected validation error"),
        }
    }

    #[test]
    fn export_change_log_json() {
        let mut controller = controller();
        let start = Instant::now();
        controller
            .edit_plot("map", start, |plot| plot.set_palette("Greys256"))
            .unwrap();
        controller.tick(start).unwrap();
        let path = test_utils::temp_path("changes.json");
        controller.export_change_log(&path).unwrap();
        let json = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        let entries: Vec<ChangeLogEntry> = serde_json::from_str(&json).unwrap();
        let descriptions: Vec<&str> = entries.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(vec!["Session created", "Palette set to Greys256"], descriptions);
        let raw: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(raw[0]["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn edit_unknown_plot() {
        let mut controller = controller();
        let result = controller.edit_plot("missing", Instant::now(), |plot| plot.set_palette("x"));
        assert!(result.is_err());
        assert!(!controller.has_pending_commit());
    }

    #[test]
    fn debounced_edits_commit_once() {
        let mut controller = controller();
        let start = Instant::now();
        for n in 0..10u64 {
            let now = start + ms(n * 100);
            controller
                .edit_plot("map", now, |plot| plot.set_size(300 + n as u32 * 10, 300))
                .unwrap();
            assert!(!controller.tick(now).unwrap());
        }
        assert!(controller.tick(start + ms(1400)).unwrap());
        assert_eq!(2, controller.history().len());
        let current = controller.history().current().unwrap();
        assert_eq!("Size set to 390x300", current.description);
        assert_eq!(
            serde_json::to_value(controller.session()).unwrap(),
            current.snapshot
        );
        assert_eq!((390, 300), controller.session().plot("map").unwrap().size());
        assert_eq!(10, controller.redraw_requests());
    }

    fn change_log_descriptions(controller: &SessionController) -> Vec<String> {
        controller
            .history()
            .change_log()
            .iter()
            .map(|entry| entry.description.clone())
            .collect()
    }

    #[test]
    fn immediate_edit_commits_pending_drag_separately() {
        let mut controller = controller();
        let start = Instant::now();
        controller
            .edit_plot("map", start, |plot| {
                plot.set_selection(Some(Selection::range(1, 4)))
            })
            .unwrap();
        controller
            .edit_plot("map", start + ms(100), |plot| plot.set_palette("Greys256"))
            .unwrap();
        assert!(controller.tick(start + ms(100)).unwrap());
        assert_eq!(
            vec![
                "Session created",
                "Selection set to [1, 4]",
                "Palette set to Greys256"
            ],
            change_log_descriptions(&controller)
        );

        // The drag entry holds the palette from before the palette change.
        assert!(controller.undo().unwrap());
        let map = controller.session().plot("map").unwrap();
        assert_eq!("Viridis256", map.palette());
        assert_eq!(Some(Selection::range(1, 4)), map.selection());

        assert!(controller.undo().unwrap());
        assert_eq!(None, controller.session().plot("map").unwrap().selection());
    }

    #[test]
    fn drag_after_immediate_edit_keeps_both_entries() {
        let mut controller = controller();
        let start = Instant::now();
        controller
            .edit_plot("map", start, |plot| plot.set_palette("Greys256"))
            .unwrap();
        controller
            .edit_plot("map", start, |plot| {
                plot.set_selection(Some(Selection::range(1, 4)))
            })
            .unwrap();
        assert_eq!(
            vec!["Session created", "Palette set to Greys256"],
            change_log_descriptions(&controller)
        );
        assert!(!controller.tick(start).unwrap());
        assert!(controller.tick(start + ms(500)).unwrap());
        assert_eq!(
            vec![
                "Session created",
                "Palette set to Greys256",
                "Selection set to [1, 4]"
            ],
            change_log_descriptions(&controller)
        );

        assert!(controller.undo().unwrap());
        let map = controller.session().plot("map").unwrap();
        assert_eq!("Greys256", map.palette());
        assert_eq!(None, map.selection());
    }

    #[test]
    fn consecutive_immediate_edits_commit_separately() {
        let mut controller = controller();
        let start = Instant::now();
        controller
            .edit_plot("probe", start, |plot| plot.set_palette("Greys256"))
            .unwrap();
        controller
            .edit_plot("probe", start, |plot| plot.set_shape_mode(ShapeMode::Custom))
            .unwrap();
        controller.tick(start).unwrap();
        assert_eq!(3, controller.history().len());
        assert!(controller.undo().unwrap());
        let probe = controller.session().plot("probe").unwrap();
        assert_eq!("Greys256", probe.palette());
        assert_eq!(ShapeMode::Square, probe.shape_mode());
    }

    #[test]
    fn open_starts_history_with_loaded_session() {
        let saved = test_utils::get_test_session();
        let path = test_utils::temp_path("session.json");
        saved.save(&path, false).unwrap();
        let controller = SessionController::open(&path, &ExplorerConfig::default());
        std::fs::remove_file(&path).unwrap();
        let mut controller = controller.unwrap();
        assert_eq!(&saved, controller.session());
        assert_eq!(1, controller.history().len());
        assert!(controller.history().change_log()[0]
            .description
            .starts_with("Session loaded from"));
        assert!(!controller.undo().unwrap());
    }

    #[test]
    fn immediate_edit_commits_on_next_tick() {
        let mut controller = controller();
        let start = Instant::now();
        controller
            .edit_plot("probe", start, |plot| plot.set_shape_mode(ShapeMode::Custom))
            .unwrap();
        assert!(controller.tick(start).unwrap());
        assert_eq!(2, controller.history().len());
    }

    #[test]
    fn unchanged_edit_not_scheduled() {
        let mut controller = controller();
        let change = controller
            .edit_plot("map", Instant::now(), |plot| plot.set_palette("Viridis256"))
            .unwrap();
        assert_eq!(None, change);
        assert!(!controller.has_pending_commit());
        assert_eq!(0, controller.redraw_requests());
    }

    #[test]
    fn undo_flushes_pending_commit() {
        let mut controller = controller();
        let start = Instant::now();
        controller
            .edit_plot("map", start, |plot| plot.set_palette("Greys256"))
            .unwrap();
        controller.tick(start).unwrap();
        controller
            .edit_plot("map", start, |plot| plot.set_size(500, 500))
            .unwrap();

        assert!(controller.undo().unwrap());
        assert!(!controller.has_pending_commit());
        let map = controller.session().plot("map").unwrap();
        assert_eq!("Greys256", map.palette());
        assert_eq!((400, 400), map.size());

        assert!(controller.redo().unwrap());
        assert_eq!((500, 500), controller.session().plot("map").unwrap().size());
        assert!(!controller.redo().unwrap());
    }

    #[test]
    fn undo_at_boundary() {
        let mut controller = controller();
        let redraws = controller.redraw_requests();
        assert!(!controller.undo().unwrap());
        assert_eq!(redraws, controller.redraw_requests());
    }

    #[test]
    fn load_commits_once_and_redraws_once() {
        let mut saved = test_utils::get_test_session();
        saved
            .plot_mut("projection")
            .unwrap()
            .set_palette("Inferno256")
            .unwrap();
        saved.plot_mut("map").unwrap().set_size(600, 500).unwrap();
        saved
            .plot_mut("probe")
            .unwrap()
            .set_shape_mode(ShapeMode::Custom)
            .unwrap();
        let path = test_utils::temp_path("session.json");
        saved.save(&path, false).unwrap();

        let mut controller = controller();
        let history_len = controller.history().len();
        let redraws = controller.redraw_requests();
        controller.load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(!controller.has_pending_commit());
        assert_eq!(history_len + 1, controller.history().len());
        assert_eq!(redraws + 1, controller.redraw_requests());
        assert_eq!(&saved, controller.session());

        assert!(controller.undo().unwrap());
        assert_eq!(
            "Viridis256",
            controller.session().plot("projection").unwrap().palette()
        );
    }

    #[test]
    fn load_failure_leaves_session() {
        let mut controller = controller();
        let before = controller.session().clone();
        let path = test_utils::temp_path("missing.json");
        assert!(controller.load(&path).is_err());
        assert_eq!(&before, controller.session());
        assert_eq!(1, controller.history().len());
    }

    #[test]
    fn refresh_plot_range() {
        let mut controller = controller();
        let data = ndarray::Array::linspace(0.0, 100.0, 101);
        assert!(controller.refresh_plot_range("map", &data.view()).unwrap());
        let (low, high) = controller.session().plot("map").unwrap().range();
        assert!((low - 1.0).abs() < 1e-9);
        assert!((high - 99.0).abs() < 1e-9);
        assert_eq!(1, controller.redraw_requests());
        assert_eq!(1, controller.history().len());
        assert!(controller.refresh_plot_range("missing", &data.view()).is_err());
    }

    #[test]
    fn save_via_controller() {
        let controller = controller();
        let path = test_utils::temp_path("session.json");
        controller.save(&path).unwrap();
        let loaded = Session::load(&path, false).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(controller.session(), &loaded);
    }
}
