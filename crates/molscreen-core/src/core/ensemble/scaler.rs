use super::EnsembleError;
use serde::Deserialize;
use std::fmt::Debug;

/// Feature preprocessing applied before a model sees a row.
pub trait Scaler: Debug + Send + Sync {
    fn n_features(&self) -> usize;
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, EnsembleError>;
}

/// Serialized scaler, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ScalerArtifact {
    Standard(StandardScaler),
    MinMax(MinMaxScaler),
    Identity(IdentityScaler),
}

impl ScalerArtifact {
    /// Checks internal consistency and returns the scaler as a trait object.
    pub fn into_scaler(self) -> Result<Box<dyn Scaler>, EnsembleError> {
        match self {
            Self::Standard(s) => {
                check_lengths("standard", s.mean.len(), s.scale.len())?;
                Ok(Box::new(s))
            }
            Self::MinMax(s) => {
                check_lengths("min-max", s.data_min.len(), s.data_max.len())?;
                Ok(Box::new(s))
            }
            Self::Identity(s) => Ok(Box::new(s)),
        }
    }
}

fn check_lengths(kind: &str, a: usize, b: usize) -> Result<(), EnsembleError> {
    if a != b {
        return Err(EnsembleError::InvalidArtifact(format!(
            "{} scaler has {} centering values but {} scaling values",
            kind, a, b
        )));
    }
    Ok(())
}

fn check_row(expected: usize, row: &[f64]) -> Result<(), EnsembleError> {
    if row.len() != expected {
        return Err(EnsembleError::FeatureCount {
            component: "scaler",
            expected,
            actual: row.len(),
        });
    }
    Ok(())
}

/// `(x - mean) / scale` per feature. A zero scale leaves the centered value unscaled.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, EnsembleError> {
        check_row(self.n_features(), row)?;
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| {
                let s = if *s == 0.0 { 1.0 } else { *s };
                (x - m) / s
            })
            .collect())
    }
}

/// Maps `[data-min, data-max]` onto `[0, 1]` per feature. A constant feature maps to 0.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MinMaxScaler {
    pub data_min: Vec<f64>,
    pub data_max: Vec<f64>,
}

impl Scaler for MinMaxScaler {
    fn n_features(&self) -> usize {
        self.data_min.len()
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, EnsembleError> {
        check_row(self.n_features(), row)?;
        Ok(row
            .iter()
            .zip(self.data_min.iter().zip(&self.data_max))
            .map(|(x, (lo, hi))| {
                let range = hi - lo;
                if range == 0.0 { 0.0 } else { (x - lo) / range }
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IdentityScaler {
    pub n_features: usize,
}

impl Scaler for IdentityScaler {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, EnsembleError> {
        check_row(self.n_features, row)?;
        Ok(row.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_scaler_centers_and_scales() {
        let artifact: ScalerArtifact = toml::from_str(
            r#"
            kind = "standard"
            mean = [1.0, 10.0, 3.0]
            scale = [2.0, 5.0, 0.0]
            "#,
        )
        .unwrap();
        let scaler = artifact.into_scaler().unwrap();
        assert_eq!(scaler.n_features(), 3);
        assert_eq!(
            scaler.transform(&[3.0, 0.0, 4.0]).unwrap(),
            vec![1.0, -2.0, 1.0]
        );
    }

    #[test]
    fn min_max_scaler_maps_to_unit_interval() {
        let artifact: ScalerArtifact = toml::from_str(
            r#"
            kind = "min-max"
            data-min = [0.0, -1.0, 5.0]
            data-max = [10.0, 1.0, 5.0]
            "#,
        )
        .unwrap();
        let scaler = artifact.into_scaler().unwrap();
        assert_eq!(
            scaler.transform(&[5.0, 1.0, 7.0]).unwrap(),
            vec![0.5, 1.0, 0.0]
        );
    }

    #[test]
    fn identity_scaler_passes_rows_through() {
        let scaler = IdentityScaler { n_features: 2 };
        assert_eq!(scaler.transform(&[1.5, -2.0]).unwrap(), vec![1.5, -2.0]);
    }

    #[test]
    fn wrong_row_length_is_rejected() {
        let scaler = IdentityScaler { n_features: 2 };
        assert!(matches!(
            scaler.transform(&[1.0]),
            Err(EnsembleError::FeatureCount {
                expected: 2,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn inconsistent_artifact_is_rejected() {
        let artifact = ScalerArtifact::Standard(StandardScaler {
            mean: vec![0.0, 0.0],
            scale: vec![1.0],
        });
        assert!(matches!(
            artifact.into_scaler(),
            Err(EnsembleError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn unknown_kind_fails_to_deserialize() {
        let result: Result<ScalerArtifact, _> = toml::from_str("kind = \"robust\"\nn-features = 1");
        assert!(result.is_err());
    }
}
