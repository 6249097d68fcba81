use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::infra::{
    config::{load, AppConfig, ConfigOverrides},
    contracts::ConfigAdapter,
};

#[derive(Debug, Clone, Default)]
pub struct FileConfigAdapter {
    path: Option<PathBuf>,
    overrides: ConfigOverrides,
}

impl FileConfigAdapter {
    pub fn new(path: Option<&Path>, overrides: ConfigOverrides) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
            overrides,
        }
    }
}

impl ConfigAdapter for FileConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        Ok(load(self.path.as_deref(), &self.overrides)?)
    }
}
