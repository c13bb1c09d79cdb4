//! This crate provides the core of an interactive multi-view volume explorer. Given a 3-D or 4-D
//! volume and one coordinate array per axis, it aligns 2-D slices with their coordinates for
//! display, extracts point slices and summed projections, and keeps the state of several coupled
//! views in an undoable, persistable session.
//!
//! Rendering, widgets and dataset transport are left to the host. The host drives a
//! [session::SessionController] from its event loop, feeds it edits to views and redraws when
//! asked.
//!
//! The crate is built on top of a number of open source components.
//!
//! * [ndarray] provides [NumPy](https://numpy.org)-like n-dimensional arrays used for slicing and
//!   reductions, with [ndarray-stats](ndarray_stats) providing percentiles.
//! * [Serde](serde) performs (de)serialisation of session files, history snapshots and change
//!   logs.
//! * [validator] checks plot states restored from files and snapshots.
//! * [tracing](https://docs.rs/tracing) records ambiguous orientations, degenerate selections and other absorbed edge
//!   cases.

pub mod app;
pub mod array;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod debounce;
pub mod error;
pub mod extractor;
pub mod history;
pub mod models;
pub mod orientation;
pub mod plot_state;
pub mod session;
#[cfg(test)]
pub mod test_utils;
pub mod tracing;
