use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub verbose: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("fairdice"),
            verbose: false,
        }
    }
}

impl CliConfig {
    pub fn new(data_dir: Option<PathBuf>, verbose: bool) -> Self {
        let mut config = Self::default();
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }
        config.verbose = verbose;
        config
    }

    pub fn transcripts_dir(&self) -> PathBuf {
        self.data_dir.join("transcripts")
    }

    pub fn log_filter(&self) -> String {
        let level = if self.verbose { "debug" } else { "warn" };
        format!("fairdice={},fairdice_core={}", level, level)
    }
}

pub fn transcript_path(dir: &Path, game_id: impl std::fmt::Display) -> PathBuf {
    dir.join(format!("{}.json", game_id))
}
