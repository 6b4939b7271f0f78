//! IO
//!
//! JSON persistence of configured and fitted estimators.
use crate::errors::FairnessError;
use crate::estimator::BaseEstimator;
use crate::linear_model::{LinearACFClassifier, LinearRegression, LogisticRegression};
use crate::meta_estimator::FairnessAwareMetaEstimator;
use crate::postprocessing::{MultipleROClassifier, SingleROClassifier};
use crate::preprocessing::Relabeller;
use crate::tree::DecisionTreeClassifier;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Save and load models as JSON.
///
/// Learners wrapped in [`BaseEstimator::Custom`] are not serializable, so
/// dumping a model that holds one fails with [`FairnessError::UnableToWrite`].
pub trait ModelIO: Serialize + DeserializeOwned + Sized {
    /// Save a model as a json object to a file.
    ///
    /// * `path` - Path to save the model.
    fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<(), FairnessError> {
        fs::write(path, self.json_dump()?).map_err(|e| FairnessError::UnableToWrite(e.to_string()))
    }

    /// Dump a model as a json object
    fn json_dump(&self) -> Result<String, FairnessError> {
        serde_json::to_string(self).map_err(|e| FairnessError::UnableToWrite(e.to_string()))
    }

    /// Load a model from Json string
    ///
    /// * `json_str` - String object, which can be serialized to json.
    fn from_json(json_str: &str) -> Result<Self, FairnessError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| FairnessError::UnableToRead(e.to_string()))
    }

    /// Load a model from a path to a json object.
    ///
    /// * `path` - Path to load the model from.
    fn load_model<P: AsRef<Path>>(path: P) -> Result<Self, FairnessError> {
        let json_str = fs::read_to_string(path).map_err(|e| FairnessError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}

impl ModelIO for LogisticRegression {}
impl ModelIO for LinearRegression {}
impl ModelIO for DecisionTreeClassifier {}
impl ModelIO for BaseEstimator {}
impl ModelIO for LinearACFClassifier {}
impl ModelIO for Relabeller {}
impl ModelIO for SingleROClassifier {}
impl ModelIO for MultipleROClassifier {}
impl<E> ModelIO for FairnessAwareMetaEstimator<E> where E: Serialize + DeserializeOwned {}
