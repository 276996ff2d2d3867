use std::path::{Path, PathBuf};

use directories::{ProjectDirs, UserDirs};
use serde::Deserialize;

use crate::cli::GlobalArgs;
use crate::error::ConfigError;
use crate::store::Backend;

pub struct Config {
    pub backend: Backend,
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
}

/// Contents of config.toml. Every key is optional, CLI flags win.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub backend: Option<Backend>,
    pub data_dir: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
}

impl FileConfig {
    /// Read config.toml from `path`. A missing file is an empty config.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(FileConfig::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Platform locations used when neither the file nor the flags set a path.
pub struct Defaults {
    pub data_dir: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
}

impl Defaults {
    /// History in the platform data dir, exports in `<Pictures>/qrkeep`.
    pub fn platform() -> Self {
        let data_dir = project_dirs().map(|dirs| dirs.data_dir().to_path_buf());
        let picture_dir = UserDirs::new().and_then(|dirs| dirs.picture_dir().map(Path::to_path_buf));
        Self::from_dirs(data_dir, picture_dir)
    }

    fn from_dirs(data_dir: Option<PathBuf>, picture_dir: Option<PathBuf>) -> Self {
        Defaults {
            data_dir,
            export_dir: picture_dir.map(|dir| dir.join("qrkeep")),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "qrkeep")
}

/// `QRKEEP_CONFIG` if set, else `<config dir>/qrkeep/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("QRKEEP_CONFIG") {
        return Some(PathBuf::from(path));
    }
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

impl Config {
    pub fn from_args(args: &GlobalArgs) -> Result<Self, ConfigError> {
        let file = match config_path() {
            Some(path) => FileConfig::load_from_path(&path)?,
            None => FileConfig::default(),
        };
        Self::resolve(args, file, Defaults::platform())
    }

    pub fn resolve(args: &GlobalArgs, file: FileConfig, defaults: Defaults) -> Result<Self, ConfigError> {
        let data_dir = args
            .data_dir
            .clone()
            .or(file.data_dir)
            .or(defaults.data_dir)
            .ok_or(ConfigError::NoDirectory("data"))?;

        // exports land next to the data when no pictures dir is known
        let export_dir = file
            .export_dir
            .or(defaults.export_dir)
            .unwrap_or_else(|| data_dir.join("exports"));

        Ok(Config {
            backend: args.backend.or(file.backend).unwrap_or_default(),
            data_dir,
            export_dir,
        })
    }
}
