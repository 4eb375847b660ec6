use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{PlotError, Result};

/// Environment variable naming an optional JSON render configuration.
pub const CONFIG_ENV_VAR: &str = "SLIDERS_PLOT_CONFIG";

/// Read and decode a JSON document from disk.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => PlotError::NotFound {
            path: path.to_path_buf(),
        },
        _ => PlotError::io(path, err),
    })?;
    serde_json::from_str(&contents).map_err(|err| PlotError::parse(path, err))
}

/// Load a JSON configuration from disk, creating it with the provided initializer if missing.
pub fn load_or_init<T, F>(path: &Path, initializer: F) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> T,
{
    if path.exists() {
        load_json(path)
    } else {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| PlotError::io(parent, err))?;
        }
        let value = initializer();
        let serialized =
            serde_json::to_string_pretty(&value).map_err(|err| PlotError::parse(path, err))?;
        fs::write(path, serialized).map_err(|err| PlotError::io(path, err))?;
        Ok(value)
    }
}

/// Geometry of rendered charts, in SVG user units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    /// Fraction of each x slot left empty between bar groups.
    pub bar_gap: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 540.0,
            margin: 64.0,
            bar_gap: 0.2,
        }
    }
}

impl RenderConfig {
    /// Resolve the configuration named by [`CONFIG_ENV_VAR`], or the defaults when unset.
    pub fn from_env() -> Result<Self> {
        match env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => {
                let path = PathBuf::from(path);
                tracing::debug!(path = %path.display(), "loading render config");
                Self::load_or_init(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn load_or_init(path: &Path) -> Result<Self> {
        let config: Self = load_or_init(path, Self::default)?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let plot_width = self.width - 2.0 * self.margin;
        let plot_height = self.height - 2.0 * self.margin;
        if !(plot_width > 0.0 && plot_height > 0.0) {
            return Err(PlotError::parse(
                path,
                format!(
                    "chart of {}x{} leaves no room inside a margin of {}",
                    self.width, self.height, self.margin
                ),
            ));
        }
        if !(0.0..1.0).contains(&self.bar_gap) {
            return Err(PlotError::parse(
                path,
                format!("bar_gap {} must lie in [0, 1)", self.bar_gap),
            ));
        }
        Ok(())
    }
}
