//! XDG Base Directory paths for the avatar companion.
//!
//! The backend follows XDG paths on every platform so the config file, the
//! downloaded avatars and the custom catalog live in predictable places.

use std::path::PathBuf;

/// Directory name used under the XDG roots.
const APP_DIR: &str = "avatar";

/// Get the avatar config directory.
///
/// Returns `$XDG_CONFIG_HOME/avatar` if set, otherwise `~/.config/avatar`.
///
/// # Examples
///
/// ```
/// use avatar_paths::config_dir;
///
/// let config = config_dir();
/// let file = config.join("config.toml");
/// ```
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join(APP_DIR)
    } else if let Some(home) = dirs::home_dir() {
        home.join(".config").join(APP_DIR)
    } else {
        PathBuf::from(".config").join(APP_DIR)
    }
}

/// Get the avatar data directory.
///
/// Returns `$XDG_DATA_HOME/avatar` if set, otherwise `~/.local/share/avatar`.
/// Downloaded `.glb` files and the custom avatar catalog are stored here.
pub fn data_dir() -> PathBuf {
    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg_data).join(APP_DIR)
    } else if let Some(home) = dirs::home_dir() {
        home.join(".local/share").join(APP_DIR)
    } else {
        PathBuf::from(".local/share").join(APP_DIR)
    }
}

/// Default directory for downloaded avatar models.
pub fn avatars_dir() -> PathBuf {
    data_dir().join("avatares")
}

/// Default location of the persisted custom avatar catalog.
pub fn custom_avatars_file() -> PathBuf {
    data_dir().join("custom_avatars.json")
}
