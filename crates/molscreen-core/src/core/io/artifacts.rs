use crate::core::ensemble::EnsembleError;
use crate::core::ensemble::model::{Classifier, ModelArtifact};
use crate::core::ensemble::scaler::{Scaler, ScalerArtifact};
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid artifact '{path}': {source}")]
    Invalid {
        path: String,
        source: EnsembleError,
    },
}

fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let content = std::fs::read_to_string(path).map_err(|e| ArtifactError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ArtifactError::Toml {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

pub fn load_scaler(path: &Path) -> Result<Box<dyn Scaler>, ArtifactError> {
    load_toml::<ScalerArtifact>(path)?
        .into_scaler()
        .map_err(|e| ArtifactError::Invalid {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
}

pub fn load_model(path: &Path) -> Result<Box<dyn Classifier>, ArtifactError> {
    load_toml::<ModelArtifact>(path)?
        .into_classifier()
        .map_err(|e| ArtifactError::Invalid {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ensemble::vote::Label;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn scaler_and_model_load_from_toml() {
        let dir = tempdir().unwrap();
        let scaler_path = dir.path().join("scaler.toml");
        let model_path = dir.path().join("model.toml");
        fs::write(
            &scaler_path,
            "kind = \"standard\"\nmean = [1.0]\nscale = [2.0]\n",
        )
        .unwrap();
        fs::write(
            &model_path,
            "kind = \"logistic\"\ncoef = [1.0]\nintercept = 0.0\nclasses = [\"below_5\", \"above_5\"]\n",
        )
        .unwrap();

        let scaler = load_scaler(&scaler_path).unwrap();
        let model = load_model(&model_path).unwrap();
        let scaled = scaler.transform(&[5.0]).unwrap();
        assert_eq!(scaled, vec![2.0]);
        assert_eq!(model.predict(&scaled).unwrap(), Label::Positive);
    }

    #[test]
    fn missing_artifact_is_an_io_error() {
        let result = load_model(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ArtifactError::Io { .. })));
    }

    #[test]
    fn malformed_artifact_is_a_toml_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "kind = \"standard\"\nmean = \"oops\"\n").unwrap();
        assert!(matches!(load_scaler(&path), Err(ArtifactError::Toml { .. })));
    }

    #[test]
    fn inconsistent_artifact_is_invalid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "kind = \"min-max\"\ndata-min = [0.0]\ndata-max = []\n").unwrap();
        assert!(matches!(
            load_scaler(&path),
            Err(ArtifactError::Invalid { .. })
        ));
    }
}
