//! Component registry
//!
//! Tag-indexed store of attributes, events and slots aggregated from one or
//! more manifests. The active mapping lives in an immutable
//! [`RegistrySnapshot`] behind an [`ArcSwap`]; every mutation builds a
//! complete new snapshot and swaps it in, so readers never block and never
//! see a half-applied manifest.
//!
//! Manifests are tracked as sources. File sources are re-read by
//! [`ComponentRegistry::reload`]; inline and generated sources keep their
//! last parsed content. Sources are applied in load order and a later source
//! replaces a tag wholesale.

pub mod watch;

use crate::manifest::{is_custom_element_tag, Attribute, Declaration, Event, Package, Slot};
use arc_swap::ArcSwap;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

pub use watch::{ManifestWatcher, ReloadBatch, ReloadScheduler, ReloadSender, ReloadSignal};

/// Errors raised while loading manifests
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read manifest {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything known about one custom element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentDefinition {
    pub tag_name: String,
    pub description: Option<String>,
    pub attributes: Vec<Attribute>,
    pub events: Vec<Event>,
    pub slots: Vec<Slot>,
}

impl ComponentDefinition {
    /// Build from a manifest declaration. Repeated attribute names keep the
    /// first position and the last definition.
    pub fn from_declaration(tag_name: &str, decl: &Declaration) -> Self {
        let mut attributes: Vec<Attribute> = Vec::with_capacity(decl.attributes.len());
        for attr in &decl.attributes {
            if attr.name.is_empty() {
                continue;
            }
            match attributes.iter_mut().find(|a| a.name == attr.name) {
                Some(existing) => *existing = attr.clone(),
                None => attributes.push(attr.clone()),
            }
        }

        let description = decl
            .description
            .clone()
            .filter(|d| !d.is_empty())
            .or_else(|| decl.summary.clone().filter(|s| !s.is_empty()));

        Self {
            tag_name: tag_name.to_string(),
            description,
            attributes,
            events: decl.events.iter().filter(|e| !e.name.is_empty()).cloned().collect(),
            slots: decl.slots.clone(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn event(&self, name: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.name == name)
    }

    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.name == name)
    }

    /// Named slots in declaration order, without the default slot or repeats
    pub fn named_slots(&self) -> Vec<&Slot> {
        let mut named: Vec<&Slot> = Vec::new();
        for slot in &self.slots {
            if !slot.name.is_empty() && !named.iter().any(|s| s.name == slot.name) {
                named.push(slot);
            }
        }
        named
    }
}

/// Immutable tag -> definition mapping
#[derive(Debug, Default)]
pub struct RegistrySnapshot {
    generation: u64,
    tags: BTreeMap<String, Arc<ComponentDefinition>>,
}

impl RegistrySnapshot {
    /// Build a snapshot from manifests applied in order
    pub fn build<'a>(generation: u64, packages: impl IntoIterator<Item = &'a Package>) -> Self {
        let mut tags = BTreeMap::new();

        for package in packages {
            for (tag_name, decl) in package.custom_elements() {
                if !is_custom_element_tag(tag_name) {
                    tracing::debug!("Skipping invalid custom element tag: {}", tag_name);
                    continue;
                }
                tags.insert(
                    tag_name.to_string(),
                    Arc::new(ComponentDefinition::from_declaration(tag_name, decl)),
                );
            }
        }

        Self { generation, tags }
    }

    /// Incremented on every swap
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn definition(&self, tag_name: &str) -> Option<&Arc<ComponentDefinition>> {
        self.tags.get(tag_name)
    }

    pub fn contains(&self, tag_name: &str) -> bool {
        self.tags.contains_key(tag_name)
    }

    pub fn attributes(&self, tag_name: &str) -> &[Attribute] {
        self.definition(tag_name)
            .map(|d| d.attributes.as_slice())
            .unwrap_or(&[])
    }

    pub fn events(&self, tag_name: &str) -> &[Event] {
        self.definition(tag_name)
            .map(|d| d.events.as_slice())
            .unwrap_or(&[])
    }

    pub fn slots(&self, tag_name: &str) -> &[Slot] {
        self.definition(tag_name)
            .map(|d| d.slots.as_slice())
            .unwrap_or(&[])
    }

    /// Registered tags in sorted order
    pub fn all_tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Identity of a loaded manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    /// Manifest file, re-read on reload
    File(PathBuf),
    /// In-memory manifest registered under a label
    Inline(String),
    /// Latest output of the generate pipeline
    Generated,
}

impl ManifestSource {
    fn origin(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Inline(label) => label.clone(),
            Self::Generated => "<generated>".to_string(),
        }
    }
}

#[derive(Debug)]
struct LoadedSource {
    source: ManifestSource,
    package: Arc<Package>,
}

/// Hot-reloadable component registry
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    snapshot: ArcSwap<RegistrySnapshot>,
    sources: Mutex<Vec<LoadedSource>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot; hold it for the duration of one request
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.snapshot.load_full()
    }

    /// Add or replace an in-memory manifest. Returns the number of custom
    /// elements the manifest declares.
    pub fn load(&self, label: &str, manifest: &str) -> Result<usize, RegistryError> {
        let source = ManifestSource::Inline(label.to_string());
        let package = parse(&source, manifest)?;
        Ok(self.upsert(source, Arc::new(package)))
    }

    /// Add or replace a manifest file and track it for reload
    pub fn load_file(&self, path: &Path) -> Result<usize, RegistryError> {
        let source = ManifestSource::File(path.to_path_buf());
        let package = read_and_parse(path)?;
        let count = self.upsert(source, package);
        tracing::info!("Loaded {} custom elements from {}", count, path.display());
        Ok(count)
    }

    /// Replace the generated manifest
    pub fn set_generated(&self, manifest: &str) -> Result<usize, RegistryError> {
        let package = parse(&ManifestSource::Generated, manifest).inspect_err(|err| {
            tracing::warn!("Discarding generated manifest: {}", err);
        })?;
        Ok(self.upsert(ManifestSource::Generated, Arc::new(package)))
    }

    /// Re-read every file source and swap in a fresh snapshot.
    ///
    /// All file sources must parse; on the first failure the active snapshot
    /// stays in force and the error is returned.
    pub fn reload(&self) -> Result<usize, RegistryError> {
        let mut sources = self.lock_sources();

        let mut fresh = Vec::with_capacity(sources.len());
        for loaded in sources.iter() {
            let package = match &loaded.source {
                ManifestSource::File(path) => read_and_parse(path).inspect_err(|err| {
                    tracing::warn!("Reload aborted, keeping previous registry: {}", err);
                })?,
                _ => Arc::clone(&loaded.package),
            };
            fresh.push(package);
        }

        for (loaded, package) in sources.iter_mut().zip(fresh) {
            loaded.package = package;
        }

        let count = self.rebuild(&sources);
        tracing::info!("Registry reloaded: {} custom elements", count);
        Ok(count)
    }

    /// Manifest files tracked for reload
    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.lock_sources()
            .iter()
            .filter_map(|loaded| match &loaded.source {
                ManifestSource::File(path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn definition(&self, tag_name: &str) -> Option<Arc<ComponentDefinition>> {
        self.snapshot().definition(tag_name).cloned()
    }

    pub fn attributes(&self, tag_name: &str) -> Vec<Attribute> {
        self.snapshot().attributes(tag_name).to_vec()
    }

    pub fn events(&self, tag_name: &str) -> Vec<Event> {
        self.snapshot().events(tag_name).to_vec()
    }

    pub fn slots(&self, tag_name: &str) -> Vec<Slot> {
        self.snapshot().slots(tag_name).to_vec()
    }

    pub fn all_tag_names(&self) -> Vec<String> {
        self.snapshot().all_tag_names().map(str::to_string).collect()
    }

    fn upsert(&self, source: ManifestSource, package: Arc<Package>) -> usize {
        let count = package
            .custom_elements()
            .filter(|(tag, _)| is_custom_element_tag(tag))
            .count();

        let mut sources = self.lock_sources();
        match sources.iter_mut().find(|loaded| loaded.source == source) {
            Some(existing) => existing.package = package,
            None => sources.push(LoadedSource { source, package }),
        }
        self.rebuild(&sources);

        count
    }

    fn rebuild(&self, sources: &[LoadedSource]) -> usize {
        let generation = self.snapshot.load().generation + 1;
        let snapshot = RegistrySnapshot::build(generation, sources.iter().map(|s| s.package.as_ref()));
        let count = snapshot.len();
        self.snapshot.store(Arc::new(snapshot));
        count
    }

    fn lock_sources(&self) -> std::sync::MutexGuard<'_, Vec<LoadedSource>> {
        self.sources.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn parse(source: &ManifestSource, manifest: &str) -> Result<Package, RegistryError> {
    Package::from_json(manifest).map_err(|source_err| RegistryError::Parse {
        origin: source.origin(),
        source: source_err,
    })
}

fn read_and_parse(path: &Path) -> Result<Arc<Package>, RegistryError> {
    let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&ManifestSource::File(path.to_path_buf()), &content).map(Arc::new)
}
