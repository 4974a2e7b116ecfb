//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Directory name under the user config root.
const APP_DIR: &str = "wsdot";

/// File name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Resolves the config file path.
///
/// In order of preference: `{dir}/config.toml`,
/// `$XDG_CONFIG_HOME/wsdot/config.toml`, `~/.config/wsdot/config.toml`.
///
/// # Errors
///
/// Returns an error if `dir` is `None` and neither `XDG_CONFIG_HOME` nor
/// `HOME` is set.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }
    config_path_from(
        std::env::var_os("XDG_CONFIG_HOME").as_deref().map(Path::new),
        std::env::var_os("HOME").as_deref().map(Path::new),
    )
}

fn config_path_from(xdg_config_home: Option<&Path>, home: Option<&Path>) -> Result<PathBuf> {
    let root = match (xdg_config_home, home) {
        (Some(xdg), _) if xdg.is_absolute() => xdg.to_path_buf(),
        (_, Some(home)) => home.join(".config"),
        _ => bail!("HOME environment variable is not set"),
    };
    Ok(root.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_resolve_with_dir() {
        // Arrange
        let dir = PathBuf::from("/tmp/wsdot-project");

        // Act
        let path = resolve_config_path(Some(&dir)).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/tmp/wsdot-project/config.toml"));
    }

    #[test]
    fn test_xdg_config_home_wins_over_home() {
        // Arrange & Act
        let path = config_path_from(Some(Path::new("/xdg")), Some(Path::new("/home/u"))).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/xdg/wsdot/config.toml"));
    }

    #[test]
    fn test_relative_xdg_is_ignored() {
        // Arrange & Act
        let path = config_path_from(Some(Path::new("rel")), Some(Path::new("/home/u"))).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/home/u/.config/wsdot/config.toml"));
    }

    #[test]
    fn test_no_home_is_error() {
        // Arrange & Act
        let result = config_path_from(None, None);

        // Assert
        assert!(result.unwrap_err().to_string().contains("HOME"));
    }
}
