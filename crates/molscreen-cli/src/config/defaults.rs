use std::path::PathBuf;

pub struct DefaultsConfig {
    pub conformer_output: PathBuf,
    pub num_conformers: usize,
    pub seed: u64,
    pub max_iterations: usize,
    pub max_embed_attempts: usize,
    pub forcefields: Vec<String>,
    pub predictions_output: PathBuf,
    pub frames: usize,
    pub reference: PathBuf,
    pub scaler_dir: PathBuf,
    pub model_dir: PathBuf,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            conformer_output: PathBuf::from("output.sdf"),
            num_conformers: 10,
            seed: 42,
            max_iterations: 1000,
            max_embed_attempts: 10,
            forcefields: vec!["typed".to_string(), "universal".to_string()],
            predictions_output: PathBuf::from("predictions.csv"),
            frames: 5,
            reference: PathBuf::from("training_data/data.csv"),
            scaler_dir: PathBuf::from("weights/scalers"),
            model_dir: PathBuf::from("weights/models"),
        }
    }
}

impl DefaultsConfig {
    /// `(reference, scaler, model)` for frames `1..=frames`.
    pub fn slot_paths(&self) -> Vec<(PathBuf, PathBuf, PathBuf)> {
        (1..=self.frames)
            .map(|frame| {
                let file = format!("frame_{}.toml", frame);
                (
                    self.reference.clone(),
                    self.scaler_dir.join(&file),
                    self.model_dir.join(&file),
                )
            })
            .collect()
    }
}
