use std::{fs::File, path::Path};

use lottery::{DipSettings, DrawSettings};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// The rules of the game being simulated, loaded from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub draw: DrawSettings,
    pub dip: DipSettings,
}

impl GameSettings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let settings: Self = load_json_from_file(path)?;
        // Fail before any output directory is created
        settings.draw.validate()?;
        Ok(settings)
    }
}

/// Generically load a json file
fn load_json_from_file<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let f = File::open(path).map_err(Box::new)?;
    Ok(serde_json::from_reader(f)?)
}
