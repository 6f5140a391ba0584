//! User configuration, read from a TOML file.
//!
//! ```toml
//! [editor]
//! tab-width = 4
//! scroll-margin = 3
//!
//! [keys]
//! "C-g" = "find"
//! ```

use std::{
  collections::HashMap,
  fs,
  io,
  path::{
    Path,
    PathBuf,
  },
};

use etcetera::base_strategy::{
  BaseStrategy,
  choose_base_strategy,
};
use serde::Deserialize;
use thiserror::Error;

use crate::keymap::{
  self,
  Keymap,
};

pub const CONFIG_DIR_ENV: &str = "THE_PAD_CONFIG_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {path}: {source}")]
  Read {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("bad config {path}: {source}")]
  Parse {
    path:   PathBuf,
    #[source]
    source: toml::de::Error,
  },
  #[error(transparent)]
  Keymap(#[from] keymap::KeymapError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct EditorConfig {
  /// Columns a tab expands to on screen.
  pub tab_width:     usize,
  /// Lines kept visible above and below the cursor when scrolling.
  pub scroll_margin: usize,
}

impl Default for EditorConfig {
  fn default() -> Self {
    Self {
      tab_width:     8,
      scroll_margin: 2,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  pub editor: EditorConfig,
  /// Key binding literal to command name, e.g. `"C-g" = "find"`.
  pub keys:   HashMap<String, String>,
}

impl Config {
  pub fn from_toml(contents: &str, path: &Path) -> Result<Self> {
    toml::from_str(contents).map_err(|source| {
      ConfigError::Parse {
        path: path.to_path_buf(),
        source,
      }
    })
  }

  /// Read the config at `path`. Every error is reported, including a missing
  /// file.
  pub fn load(path: &Path) -> Result<Self> {
    let contents = fs::read_to_string(path).map_err(|source| {
      ConfigError::Read {
        path: path.to_path_buf(),
        source,
      }
    })?;
    let config = Self::from_toml(&contents, path)?;
    tracing::info!("loaded config from {}", path.display());
    Ok(config)
  }

  /// Read the config from the user's config directory. A missing file means
  /// defaults.
  pub fn load_default() -> Result<Self> {
    let Some(path) = default_config_file() else {
      tracing::warn!("no config directory found, using defaults");
      return Ok(Self::default());
    };
    match Self::load(&path) {
      Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
        tracing::debug!("no config at {}, using defaults", path.display());
        Ok(Self::default())
      },
      result => result,
    }
  }

  /// The default keymap with `[keys]` applied on top.
  pub fn keymap(&self) -> Result<Keymap> {
    let mut keymap = Keymap::default();
    keymap.merge_overrides(&self.keys)?;
    Ok(keymap)
  }
}

/// `$THE_PAD_CONFIG_DIR`, or `the-pad` under the platform config directory.
pub fn config_dir() -> Option<PathBuf> {
  if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
    return Some(PathBuf::from(dir));
  }
  let strategy = choose_base_strategy().ok()?;
  Some(strategy.config_dir().join("the-pad"))
}

pub fn default_config_file() -> Option<PathBuf> {
  config_dir().map(|dir| dir.join("config.toml"))
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{
    command::Command,
    keymap::KeyEvent,
  };

  fn parse(contents: &str) -> Result<Config> {
    Config::from_toml(contents, Path::new("config.toml"))
  }

  #[test]
  fn empty_config_is_default() {
    let config = parse("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.editor.tab_width, 8);
    assert_eq!(config.editor.scroll_margin, 2);
  }

  #[test]
  fn partial_editor_table() {
    let config = parse("[editor]\ntab-width = 4\n").unwrap();
    assert_eq!(config.editor.tab_width, 4);
    assert_eq!(config.editor.scroll_margin, 2);
  }

  #[test]
  fn unknown_fields_are_rejected() {
    assert!(matches!(
      parse("[editor]\ntab-size = 4\n"),
      Err(ConfigError::Parse { .. })
    ));
    assert!(parse("theme = \"dark\"\n").is_err());
  }

  #[test]
  fn keys_override_the_default_keymap() {
    let config = parse("[keys]\n\"C-g\" = \"find\"\n\"C-z\" = \"redo\"\n").unwrap();
    let keymap = config.keymap().unwrap();
    assert_eq!(keymap.lookup(&KeyEvent::ctrl('g')), Some(Command::Find));
    assert_eq!(keymap.lookup(&KeyEvent::ctrl('z')), Some(Command::Redo));

    let config = parse("[keys]\n\"C-g\" = \"launch\"\n").unwrap();
    assert!(matches!(config.keymap(), Err(ConfigError::Keymap(_))));
  }

  #[test]
  fn load_reads_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    assert!(matches!(Config::load(&path), Err(ConfigError::Read { .. })));

    fs::write(&path, "[editor]\nscroll-margin = 0\n").unwrap();
    assert_eq!(Config::load(&path).unwrap().editor.scroll_margin, 0);

    fs::write(&path, "[editor\n").unwrap();
    assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
  }
}
