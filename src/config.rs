use anyhow::Context;
use serde::Deserialize;
use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

/// Optional override file, looked up in the working directory.
pub const CONFIG_FILEPATH: &str = "shapefile_cleaner.yaml";

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("Shapefiles/updated_commune.shp"),
            output_path: PathBuf::from("Shapefiles/updated_commune_cleaned.shp"),
        }
    }
}

impl Config {
    /// Load the config from `config_filepath`, falling back to the defaults if there is no such file.
    pub fn load(config_filepath: &Path) -> anyhow::Result<Self> {
        if !config_filepath.exists() {
            log::debug!("No config file at {:?}, using defaults", config_filepath);
            return Ok(Self::default());
        }
        let config_contents = read_to_string(config_filepath)?;
        serde_yaml::from_str(&config_contents)
            .with_context(|| format!("Parsing config file {:?}", config_filepath))
    }
}
