//! Workspace registry: named brains, which one is active, and each brain's
//! focused project. Stored as JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::brain::Brain;
use crate::error::{BrainError, Result};
use crate::persist::atomic::atomic_write;

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "BRAIN_CONFIG";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrainEntry {
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub active: Option<String>,
    #[serde(default)]
    pub brains: BTreeMap<String, BrainEntry>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(p) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(p));
        }
        dirs::config_dir()
            .map(|d| d.join("brain").join("config.json"))
            .ok_or_else(|| BrainError::Config("no config directory on this platform".into()))
    }

    /// A missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        atomic_write(path, json.as_bytes())
    }

    /// Register (or re-point) a brain and make it active.
    pub fn add(&mut self, name: &str, path: PathBuf) {
        let entry = self.brains.entry(name.to_string()).or_default();
        entry.path = path;
        self.active = Some(name.to_string());
    }

    pub fn activate(&mut self, name: &str) -> Result<()> {
        if !self.brains.contains_key(name) {
            return Err(BrainError::NotFound(format!("brain {name:?}")));
        }
        self.active = Some(name.to_string());
        Ok(())
    }

    fn active_entry(&self) -> Result<(&str, &BrainEntry)> {
        let name = self
            .active
            .as_deref()
            .ok_or_else(|| BrainError::NotFound("no active brain; run `brain init`".into()))?;
        let entry = self
            .brains
            .get(name)
            .ok_or_else(|| BrainError::Config(format!("active brain {name:?} is not registered")))?;
        Ok((name, entry))
    }

    pub fn set_focus(&mut self, project: Option<String>) -> Result<()> {
        let name = self.active_entry()?.0.to_string();
        if let Some(entry) = self.brains.get_mut(&name) {
            entry.focus = project;
        }
        Ok(())
    }

    pub fn active_brain(&self) -> Result<Brain> {
        let (_, entry) = self.active_entry()?;
        Ok(Brain::new(entry.path.clone()).with_focus(entry.focus.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(matches!(cfg.active_brain(), Err(BrainError::NotFound(_))));
    }

    #[test]
    fn save_load_and_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut cfg = Config::default();
        cfg.add("work", PathBuf::from("/tmp/work"));
        cfg.add("home", PathBuf::from("/tmp/home"));
        cfg.activate("work").unwrap();
        cfg.set_focus(Some("api".into())).unwrap();
        cfg.save(&path).unwrap();

        let back = Config::load(&path).unwrap();
        assert_eq!(back, cfg);
        let brain = back.active_brain().unwrap();
        assert_eq!(brain.root, PathBuf::from("/tmp/work"));
        assert_eq!(brain.focus.as_deref(), Some("api"));
        assert!(back.clone().activate("nope").is_err());
    }

    #[test]
    fn malformed_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load(&path), Err(BrainError::Config(_))));
    }
}
