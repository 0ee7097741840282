use crate::error::{CliError, Result};
use molscreen::core::ensemble::gate::ImputationPolicy;
use molscreen::core::ensemble::schema::ReservedColumns;
use molscreen::core::ensemble::vote::{LabelSet, TiePolicy};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConformerSection {
    pub output: Option<PathBuf>,
    pub num_conformers: Option<usize>,
    pub seed: Option<u64>,
    pub max_iterations: Option<usize>,
    pub max_embed_attempts: Option<usize>,
    /// Seconds.
    pub time_budget: Option<f64>,
    pub forcefields: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSlot {
    pub reference: PathBuf,
    pub scaler: PathBuf,
    pub model: PathBuf,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileClassifySection {
    pub output: Option<PathBuf>,
    pub tie_policy: Option<TiePolicy>,
    pub imputation: Option<ImputationPolicy>,
    pub labels: Option<LabelSet>,
    pub reserved: Option<ReservedColumns>,
    pub slots: Option<Vec<FileSlot>>,
}

/// Contents of a `-c` configuration file. Every key is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub conformers: Option<FileConformerSection>,
    pub classify: Option<FileClassifySection>,
    /// Directory relative paths in the file are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_both_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("molscreen.toml");
        fs::write(
            &path,
            r#"
            [conformers]
            num-conformers = 20
            time-budget = 2.5
            forcefields = ["universal"]

            [classify]
            tie-policy = "positive"
            imputation = "exclude"

            [classify.labels]
            positive = "active"
            negative = "inactive"

            [[classify.slots]]
            reference = "data.csv"
            scaler = "scalers/a.toml"
            model = "models/a.toml"
            "#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        let conformers = config.conformers.clone().unwrap();
        assert_eq!(conformers.num_conformers, Some(20));
        assert_eq!(conformers.time_budget, Some(2.5));
        assert_eq!(conformers.seed, None);

        let classify = config.classify.clone().unwrap();
        assert_eq!(classify.tie_policy, Some(TiePolicy::Positive));
        assert_eq!(classify.imputation, Some(ImputationPolicy::Exclude));
        assert_eq!(classify.labels.unwrap().positive, "active");
        let slot = &classify.slots.unwrap()[0];
        assert_eq!(config.resolve(&slot.model), dir.path().join("models/a.toml"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[conformers]\nnum-conformer = 3\n").unwrap();
        assert!(matches!(
            FileConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn absolute_paths_are_kept() {
        let config = FileConfig {
            base_dir: PathBuf::from("/etc/molscreen"),
            ..Default::default()
        };
        assert_eq!(
            config.resolve(Path::new("/data/x.csv")),
            PathBuf::from("/data/x.csv")
        );
        assert_eq!(
            config.resolve(Path::new("x.csv")),
            PathBuf::from("/etc/molscreen/x.csv")
        );
    }
}
