//! Configuration loading for portrait definitions
//!
//! Definitions are loaded from TOML files in two locations:
//! - **Builtin**: shipped with the host game (read-only)
//! - **Custom**: user-created definitions (editable)
//!
//! Documents merge in load order: layer lists extend per actor, later
//! scenes replace earlier ones with the same name. A merged set without any
//! scenes or without any portraits is rejected; the host cannot run with
//! half a configuration.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::portraits::PortraitSet;
use tachie_types::PortraitConfig;

/// Errors that can occur during config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// No `[[scene]]` entry survived the merge
    #[error("no scene entries found in any definition file")]
    MissingScenes,

    /// No `[[portrait]]` entry survived the merge
    #[error("no portrait entries found in any definition file")]
    MissingPortraits,
}

/// Load definitions from builtin and custom config directories.
///
/// # Arguments
/// * `builtin_dir` - Directory containing builtin TOML files (shipped with
///   the host)
/// * `custom_dir` - Directory containing user TOML files (optional)
///
/// Builtin definitions load first, then custom definitions; custom scenes
/// with a reused name override builtins. Unreadable or unparseable files
/// inside a directory are logged and skipped. An empty result is fatal.
pub fn load_definitions(
    builtin_dir: Option<&Path>,
    custom_dir: Option<&Path>,
) -> Result<PortraitSet, ConfigError> {
    let mut set = PortraitSet::new();

    if let Some(dir) = builtin_dir {
        if dir.exists() {
            load_directory(&mut set, dir, "builtin")?;
        }
    }
    if let Some(dir) = custom_dir {
        if dir.exists() {
            load_directory(&mut set, dir, "custom")?;
        }
    }

    if !set.has_scenes() {
        return Err(ConfigError::MissingScenes);
    }
    if !set.has_portraits() {
        return Err(ConfigError::MissingPortraits);
    }

    Ok(set)
}

/// Load all TOML files from a directory
fn load_directory(set: &mut PortraitSet, dir: &Path, source: &str) -> Result<(), ConfigError> {
    let entries = fs::read_dir(dir).map_err(|e| ConfigError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "toml") {
            continue;
        }
        match load_file(&path) {
            Ok(config) => {
                let duplicates = set.add_config(config);
                if !duplicates.is_empty() {
                    tracing::warn!(
                        source,
                        file = ?path.file_name(),
                        scenes = ?duplicates,
                        "scene names redefined, later entries win"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(source, error = %e, "skipping unloadable definition file");
            }
        }
    }

    Ok(())
}

/// Load a single TOML definition file
pub fn load_file(path: &Path) -> Result<PortraitConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Default directory for user-created definition files
pub fn default_custom_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tachie").join("portraits"))
}
