//! Dataset loading.
//!
//! Volumes and their coordinates are never stored in a session. A session refers to them by
//! identifier and a [DatasetLoader] turns an identifier back into a [Dataset].

use crate::array;
use crate::error::ExplorerError;

use ndarray::{ArrayD, ArrayViewD, IxDyn};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A volume and one coordinate array per axis
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    pub volume: ArrayD<f64>,
    pub coords: Vec<Vec<f64>>,
}

impl Dataset {
    /// Return a new Dataset, checking that the volume is 3-D or 4-D and that each coordinate
    /// array matches its axis.
    pub fn new(volume: ArrayD<f64>, coords: Vec<Vec<f64>>) -> Result<Self, ExplorerError> {
        array::validate_volume(&volume.view())?;
        if coords.len() != volume.ndim() {
            return Err(ExplorerError::DimensionMismatch {
                what: "coordinate arrays",
                expected: volume.ndim(),
                actual: coords.len(),
            });
        }
        for (length, axis_coords) in volume.shape().iter().zip(&coords) {
            if axis_coords.len() != *length {
                return Err(ExplorerError::DimensionMismatch {
                    what: "coordinates",
                    expected: *length,
                    actual: axis_coords.len(),
                });
            }
        }
        Ok(Dataset { volume, coords })
    }

    pub fn view(&self) -> ArrayViewD<f64> {
        self.volume.view()
    }

    /// Coordinates of `axis`, if it exists.
    pub fn axis_coords(&self, axis: usize) -> Option<&[f64]> {
        self.coords.get(axis).map(|coords| coords.as_slice())
    }
}

/// Source of datasets
pub trait DatasetLoader {
    /// Load the dataset identified by `id`.
    ///
    /// Any failure is reported as [ExplorerError::DatasetUnavailable].
    fn load(&self, id: &str) -> Result<Dataset, ExplorerError>;
}

/// On-disk layout of a dataset read by [JsonDatasetLoader]
#[derive(Debug, Deserialize)]
struct DatasetFile {
    shape: Vec<usize>,
    data: Vec<f64>,
    coords: Vec<Vec<f64>>,
}

/// Loads datasets from JSON files under a root directory
///
/// Each file holds `shape`, `data` in row-major order, and `coords` with one array per axis.
/// Identifiers are paths relative to the root.
#[derive(Clone, Debug)]
pub struct JsonDatasetLoader {
    root: PathBuf,
}

impl JsonDatasetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        JsonDatasetLoader { root: root.into() }
    }

    fn read(&self, path: &Path) -> Result<Dataset, ExplorerError> {
        let json = std::fs::read_to_string(path).map_err(|error| ExplorerError::io(path, error))?;
        let file: DatasetFile = serde_json::from_str(&json)?;
        let volume = ArrayD::from_shape_vec(IxDyn(&file.shape), file.data)?;
        Dataset::new(volume, file.coords)
    }
}

impl DatasetLoader for JsonDatasetLoader {
    #[tracing::instrument(level = "DEBUG", skip(self))]
    fn load(&self, id: &str) -> Result<Dataset, ExplorerError> {
        let path = self.root.join(id);
        self.read(&path).map_err(|error| {
            tracing::warn!(dataset = id, %error, "failed to load dataset");
            ExplorerError::DatasetUnavailable {
                dataset: id.to_string(),
            }
        })
    }
}

/// Serves datasets held in memory
#[derive(Clone, Debug, Default)]
pub struct MemoryDatasetLoader {
    datasets: HashMap<String, Dataset>,
}

impl MemoryDatasetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, dataset: Dataset) {
        self.datasets.insert(id.into(), dataset);
    }
}

impl DatasetLoader for MemoryDatasetLoader {
    fn load(&self, id: &str) -> Result<Dataset, ExplorerError> {
        self.datasets
            .get(id)
            .cloned()
            .ok_or_else(|| ExplorerError::DatasetUnavailable {
                dataset: id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    fn coords_for(shape: &[usize]) -> Vec<Vec<f64>> {
        shape
            .iter()
            .map(|length| (0..*length).map(|n| n as f64 * 0.5).collect())
            .collect()
    }

    #[test]
    fn new_dataset() {
        let volume = test_utils::volume_4d();
        let dataset = Dataset::new(volume.clone(), coords_for(volume.shape())).unwrap();
        assert_eq!(&[4, 5, 6, 7], dataset.view().shape());
        assert_eq!(Some(&[0.0, 0.5, 1.0, 1.5][..]), dataset.axis_coords(0));
        assert_eq!(None, dataset.axis_coords(4));
    }

    #[test]
    fn new_dataset_2d() {
        let volume = ArrayD::zeros(IxDyn(&[2, 3]));
        match Dataset::new(volume, vec![vec![0.0; 2], vec![0.0; 3]]).unwrap_err() {
            ExplorerError::UnsupportedVolume { ndim } => assert_eq!(2, ndim),
            _ => panic!("expected unsupported volume error"),
        }
    }

    #[test]
    fn new_dataset_missing_coords() {
        let volume = test_utils::volume_3d();
        match Dataset::new(volume, vec![vec![0.0; 2]]).unwrap_err() {
            ExplorerError::DimensionMismatch {
                expected, actual, ..
            } => assert_eq!((3, 1), (expected, actual)),
            _ => panic!("expected dimension mismatch error"),
        }
    }

    #[test]
    fn new_dataset_wrong_coord_length() {
        let volume = test_utils::volume_3d();
        let coords = vec![vec![0.0; 2], vec![0.0; 3], vec![0.0; 5]];
        match Dataset::new(volume, coords).unwrap_err() {
            ExplorerError::DimensionMismatch {
                what,
                expected,
                actual,
            } => assert_eq!(("coordinates", 4, 5), (what, expected, actual)),
            _ => panic!("expected dimension mismatch error"),
        }
    }

    #[test]
    fn memory_loader() {
        let volume = test_utils::volume_3d();
        let dataset = Dataset::new(volume.clone(), coords_for(volume.shape())).unwrap();
        let mut loader = MemoryDatasetLoader::new();
        loader.insert("sample", dataset.clone());
        assert_eq!(dataset, loader.load("sample").unwrap());
        match loader.load("other").unwrap_err() {
            ExplorerError::DatasetUnavailable { dataset } => assert_eq!("other", dataset),
            _ => panic!("expected dataset unavailable error"),
        }
    }

    #[test]
    fn json_loader() {
        let path = test_utils::temp_path("dataset.json");
        let json = serde_json::json!({
            "shape": [2, 3, 4],
            "data": (0..24).collect::<Vec<i32>>(),
            "coords": [[0.0, 1.0], [0.0, 1.0, 2.0], [0.0, 1.0, 2.0, 3.0]],
        });
        std::fs::write(&path, json.to_string()).unwrap();
        let loader = JsonDatasetLoader::new(std::env::temp_dir());
        let id = path.file_name().unwrap().to_str().unwrap();
        let dataset = loader.load(id);
        std::fs::remove_file(&path).unwrap();
        let dataset = dataset.unwrap();
        assert_eq!(test_utils::volume_3d(), dataset.volume);
        assert_eq!(vec![0.0, 1.0, 2.0], dataset.coords[1]);
    }

    #[test]
    fn json_loader_bad_shape() {
        let path = test_utils::temp_path("dataset.json");
        let json = serde_json::json!({
            "shape": [2, 3, 4],
            "data": [1.0, 2.0],
            "coords": [[0.0, 1.0], [0.0, 1.0, 2.0], [0.0, 1.0, 2.0, 3.0]],
        });
        std::fs::write(&path, json.to_string()).unwrap();
        let loader = JsonDatasetLoader::new(std::env::temp_dir());
        let id = path.file_name().unwrap().to_str().unwrap();
        let result = loader.load(id);
        std::fs::remove_file(&path).unwrap();
        match result.unwrap_err() {
            ExplorerError::DatasetUnavailable { dataset } => assert_eq!(id, dataset),
            _ => panic!("expected dataset unavailable error"),
        }
    }

    #[test]
    fn json_loader_missing_file() {
        let loader = JsonDatasetLoader::new(std::env::temp_dir());
        assert!(loader.load("no-such-dataset.json").is_err());
    }
}
