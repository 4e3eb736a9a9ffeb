use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use setgen_build::{GenerateMode, SetterGenerator};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "setgen.toml";

/// Where the generator runs and how it is configured.
pub struct ProjectContext {
    pub root: PathBuf,
    pub config_path: PathBuf,
    /// `None` when the root has no `setgen.toml`.
    pub config: Option<SetgenConfig>,
}

/// Configuration stored in setgen.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetgenConfig {
    #[serde(default)]
    pub generator: GeneratorSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// Directories to scan, relative to the root.
    #[serde(default = "default_scan_paths")]
    pub scan_paths: Vec<String>,
    #[serde(default = "default_skip_hidden")]
    pub skip_hidden: bool,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            scan_paths: default_scan_paths(),
            skip_hidden: default_skip_hidden(),
        }
    }
}

fn default_scan_paths() -> Vec<String> {
    vec![".".to_string()]
}

fn default_skip_hidden() -> bool {
    true
}

impl ProjectContext {
    /// Use `root` when given, the current directory otherwise.
    pub fn resolve(root: Option<PathBuf>) -> Result<Self> {
        let root = match root {
            Some(root) => root,
            None => std::env::current_dir().context("Failed to get current directory")?,
        };
        Self::from_root(root)
    }

    pub fn from_root(root: PathBuf) -> Result<Self> {
        if !root.is_dir() {
            anyhow::bail!("Root {} is not a directory", root.display());
        }

        let config_path = root.join(CONFIG_FILE);
        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: SetgenConfig =
                toml::from_str(&content).with_context(|| format!("Failed to parse {}", config_path.display()))?;
            Some(config)
        } else {
            None
        };

        Ok(Self {
            root,
            config_path,
            config,
        })
    }

    pub fn settings(&self) -> GeneratorSettings {
        self.config.as_ref().map(|c| c.generator.clone()).unwrap_or_default()
    }

    pub fn scan_paths(&self) -> Vec<PathBuf> {
        self.settings()
            .scan_paths
            .iter()
            .map(|path| resolve_against(&self.root, path))
            .collect()
    }

    /// A generator configured for this project.
    pub fn generator(&self, mode: GenerateMode) -> SetterGenerator {
        let settings = self.settings();
        let generator = setgen_build::generate_setters()
            .skip_hidden(settings.skip_hidden)
            .mode(mode);
        self.scan_paths()
            .into_iter()
            .fold(generator, |generator, path| generator.scan_path(path))
    }
}

fn resolve_against(root: &Path, path: &str) -> PathBuf {
    if path == "." { root.to_path_buf() } else { root.join(path) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SetgenConfig::default();
        assert_eq!(config.generator.scan_paths, vec!["."]);
        assert!(config.generator.skip_hidden);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SetgenConfig = toml::from_str("[generator]\nscan_paths = [\"internal\", \"pkg\"]\n").unwrap();
        assert_eq!(config.generator.scan_paths, vec!["internal", "pkg"]);
        assert!(config.generator.skip_hidden);

        let config: SetgenConfig = toml::from_str("").unwrap();
        assert_eq!(config, SetgenConfig::default());
    }

    #[test]
    fn test_config_serialization() {
        let toml_str = toml::to_string_pretty(&SetgenConfig::default()).unwrap();
        assert!(toml_str.contains("scan_paths"));
        assert!(toml_str.contains("skip_hidden"));
    }

    #[test]
    fn test_context_loads_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[generator]\nscan_paths = [\"models\"]\nskip_hidden = false\n",
        )
        .unwrap();

        let ctx = ProjectContext::from_root(dir.path().to_path_buf()).unwrap();
        assert!(ctx.config.is_some());
        assert!(!ctx.settings().skip_hidden);
        assert_eq!(ctx.scan_paths(), vec![dir.path().join("models")]);
    }

    #[test]
    fn test_context_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ProjectContext::from_root(dir.path().to_path_buf()).unwrap();
        assert!(ctx.config.is_none());
        assert_eq!(ctx.scan_paths(), vec![dir.path().to_path_buf()]);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[generator]\nskip_hidden = \"yes\"\n").unwrap();
        let err = ProjectContext::from_root(dir.path().to_path_buf()).err().unwrap();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
