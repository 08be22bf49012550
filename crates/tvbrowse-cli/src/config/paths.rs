//! Config file location.
//!
//! An explicit `--dir` wins. Otherwise the file lives under the XDG config
//! home, falling back to `~/.config` when `XDG_CONFIG_HOME` is unset or empty.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Directory name under the config home.
const APP_DIR: &str = "tvbrowse";

/// File name of the config.
const CONFIG_FILE: &str = "config.toml";

/// Resolves the config file path from `--dir` and the environment.
///
/// # Errors
///
/// Returns an error if `dir` is `None` and neither `XDG_CONFIG_HOME` nor
/// `HOME` is set.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }
    let xdg = std::env::var_os("XDG_CONFIG_HOME");
    let home = std::env::var_os("HOME");
    default_config_path(xdg.as_deref().map(Path::new), home.as_deref().map(Path::new))
}

/// Picks the config home from the given variables and appends the app path.
///
/// Relative or empty `XDG_CONFIG_HOME` values are ignored, as the XDG base
/// directory rules require.
fn default_config_path(xdg_config_home: Option<&Path>, home: Option<&Path>) -> Result<PathBuf> {
    let config_home = match (xdg_config_home.filter(|p| p.is_absolute()), home) {
        (Some(xdg), _) => xdg.to_path_buf(),
        (None, Some(home)) if !home.as_os_str().is_empty() => home.join(".config"),
        _ => bail!("cannot locate config: neither XDG_CONFIG_HOME nor HOME is set"),
    };
    Ok(config_home.join(APP_DIR).join(CONFIG_FILE))
}
