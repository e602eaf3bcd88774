//! Configuration loading for the LSP engine
//!
//! Loads settings from YAML configuration files and discovers the
//! manifests a workspace declares.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Config file names checked at the workspace root, in order
const CONFIG_FILE_NAMES: &[&str] = &[".cem-lsp.yaml", ".cem-lsp.yml", "cem-lsp.yaml", "cem-lsp.yml"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Main engine configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine settings
    pub engine: EngineSettings,
    /// Manifest sources and reloading
    pub registry: RegistrySettings,
    /// Completion list settings
    pub completion: CompletionSettings,
}

/// Core engine settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Server name
    pub name: String,
    /// Discover manifests from the workspace root
    pub workspace_discovery: bool,
}

/// Where manifests come from and how they are reloaded
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// Manifest files relative to the workspace root
    pub manifest_paths: Vec<String>,
    /// Honour `customElements` in the workspace package.json
    pub include_package_json: bool,
    /// Honour `customElements` in each dependency's package.json
    pub include_dependencies: bool,
    /// Reload when manifest files change on disk
    pub watch: bool,
    /// Quiet period before a reload, in milliseconds
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    /// Maximum number of items per response
    pub max_items: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            name: "cem-lsp".to_string(),
            workspace_discovery: true,
        }
    }
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            manifest_paths: vec!["custom-elements.json".to_string()],
            include_package_json: true,
            include_dependencies: true,
            watch: true,
            debounce_ms: 500,
        }
    }
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self { max_items: 200 }
    }
}

impl RegistrySettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// The parts of package.json that point at manifests
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PackageJson {
    custom_elements: Option<String>,
    dependencies: BTreeMap<String, serde_json::Value>,
    dev_dependencies: BTreeMap<String, serde_json::Value>,
}

impl EngineConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from default locations
    pub fn load_default(workspace_root: &Path) -> Self {
        for name in CONFIG_FILE_NAMES {
            let candidate = workspace_root.join(name);
            if !candidate.exists() {
                continue;
            }

            match Self::load(&candidate) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", candidate.display());
                    return config;
                }
                Err(e) => tracing::warn!("{}", e),
            }
        }

        Self::default()
    }

    /// Existing manifest files for a workspace, in discovery order and
    /// without duplicates
    pub fn discover_manifests(&self, workspace_root: &Path) -> Vec<PathBuf> {
        let settings = &self.registry;
        let mut found: Vec<PathBuf> = Vec::new();
        let mut push = |path: PathBuf| {
            let path: PathBuf = path.components().collect();
            if path.is_file() && !found.contains(&path) {
                found.push(path);
            }
        };

        for manifest in &settings.manifest_paths {
            push(workspace_root.join(manifest));
        }

        if settings.include_package_json || settings.include_dependencies {
            if let Some(package) = read_package_json(workspace_root) {
                if settings.include_package_json {
                    if let Some(manifest) = &package.custom_elements {
                        push(workspace_root.join(manifest));
                    }
                }

                if settings.include_dependencies {
                    let deps = package
                        .dependencies
                        .keys()
                        .chain(package.dev_dependencies.keys());
                    for dep in deps {
                        let dep_root = workspace_root.join("node_modules").join(dep);
                        let manifest = read_package_json(&dep_root)
                            .and_then(|dep_package| dep_package.custom_elements);
                        if let Some(manifest) = manifest {
                            push(dep_root.join(manifest));
                        }
                    }
                }
            }
        }

        found
    }
}

fn read_package_json(dir: &Path) -> Option<PackageJson> {
    let path = dir.join("package.json");
    let content = std::fs::read_to_string(&path).ok()?;

    match serde_json::from_str(&content) {
        Ok(package) => Some(package),
        Err(e) => {
            tracing::debug!("Ignoring {}: {}", path.display(), e);
            None
        }
    }
}
