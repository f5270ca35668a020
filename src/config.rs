use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct RawCfg {
    pub changelog: Option<RawChangelogCfg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RawChangelogCfg {
    pub repository: Option<String>,
    pub subtitle: Option<String>,
    pub file: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub working_directory: Option<PathBuf>,
}

impl RawChangelogCfg {
    /// Reads the `[changelog]` table of a TOML configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::ConfigRead(path.to_path_buf(), e))?;

        RawChangelogCfg::from_toml(&contents, path)
    }

    fn from_toml(contents: &str, path: &Path) -> Result<Self> {
        let cfg: RawCfg =
            toml::from_str(contents).map_err(|e| Error::ConfigParse(path.to_path_buf(), e))?;

        cfg.changelog.ok_or_else(|| Error::ConfigFormat(path.to_path_buf()))
    }
}
