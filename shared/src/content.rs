//! Portfolio content shown when the ship interacts with a prop.
//!
//! The core only resolves keys to text; rendering the markdown is left to
//! whichever front end consumes [`InteractionEvent`](crate::interaction::InteractionEvent)s.

use bevy_ecs::resource::Resource;
use bevy_platform::collections::HashMap;
use log::info;
use ron::de::from_str;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AssetError, ConfigError};
use crate::interaction::{InteractionAction, InteractionEvent};
use crate::props::PropKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub title: String,
    /// Provider key (a file name for directory-backed content, or a URL for links)
    pub key: String,
}

impl ContentEntry {
    pub fn new(title: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            key: key.into(),
        }
    }
}

/// Ordered content lists; islands show projects, chests resume sections,
/// bottles open links.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentCatalog {
    pub projects: Vec<ContentEntry>,
    pub sections: Vec<ContentEntry>,
    pub links: Vec<ContentEntry>,
}

impl ContentCatalog {
    pub fn entries(&self, kind: PropKind) -> &[ContentEntry] {
        match kind {
            PropKind::Island => &self.projects,
            PropKind::Chest => &self.sections,
            PropKind::Bottle => &self.links,
        }
    }

    pub fn entry(&self, kind: PropKind, index: usize) -> Option<&ContentEntry> {
        self.entries(kind).get(index)
    }

    pub fn len(&self, kind: PropKind) -> usize {
        self.entries(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.sections.is_empty() && self.links.is_empty()
    }

    /// Load from RON; a missing file yields an empty catalog.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("Content catalog not found: {}. No content will be shown.", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let catalog: ContentCatalog = from_str(&contents)?;
        info!(
            "Loaded content catalog: {} projects, {} sections, {} links",
            catalog.projects.len(),
            catalog.sections.len(),
            catalog.links.len()
        );
        Ok(catalog)
    }

    /// Turn an interaction into something to show.
    ///
    /// Panels fetch their body through `provider`; links carry the key itself.
    /// `Ok(None)` means there is nothing to show (a closing panel or a prop
    /// without content).
    pub fn resolve(
        &self,
        provider: &impl ContentProvider,
        event: &InteractionEvent,
    ) -> Result<Option<ResolvedContent>, AssetError> {
        if event.action == InteractionAction::ClosePanel {
            return Ok(None);
        }
        let Some(entry) = event.content.and_then(|index| self.entry(event.kind, index)) else {
            return Ok(None);
        };

        let body = match event.action {
            InteractionAction::OpenLink => entry.key.clone(),
            _ => provider.fetch(&entry.key)?,
        };
        Ok(Some(ResolvedContent {
            kind: event.kind,
            slot: event.slot,
            title: entry.title.clone(),
            body,
        }))
    }
}

/// A panel or link ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContent {
    pub kind: PropKind,
    pub slot: usize,
    pub title: String,
    /// Panel text, or the URL for links
    pub body: String,
}

/// Key to text resolution.
pub trait ContentProvider {
    fn fetch(&self, key: &str) -> Result<String, AssetError>;
}

/// Reads `<root>/<key>` from disk.
#[derive(Debug, Clone)]
pub struct DirectoryContent {
    root: PathBuf,
}

impl DirectoryContent {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ContentProvider for DirectoryContent {
    fn fetch(&self, key: &str) -> Result<String, AssetError> {
        // Keys stay inside the root
        if Path::new(key).is_absolute() || key.split(['/', '\\']).any(|part| part == "..") {
            return Err(AssetError::NotFound(key.to_string()));
        }
        let path = self.root.join(key);
        if !path.is_file() {
            return Err(AssetError::NotFound(path.display().to_string()));
        }
        fs::read_to_string(&path).map_err(|e| AssetError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Content held in memory, for tests and embedded builds.
#[derive(Debug, Clone, Default)]
pub struct MemoryContent {
    entries: HashMap<String, String>,
}

impl MemoryContent {
    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.entries.insert(key.into(), text.into());
        self
    }
}

impl ContentProvider for MemoryContent {
    fn fetch(&self, key: &str) -> Result<String, AssetError> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ContentCatalog {
        ContentCatalog {
            projects: vec![
                ContentEntry::new("Raytracer", "projects/raytracer.md"),
                ContentEntry::new("Compiler", "projects/compiler.md"),
            ],
            sections: vec![ContentEntry::new("Experience", "resume/experience.md")],
            links: vec![],
        }
    }

    #[test]
    fn test_entries_by_kind() {
        let catalog = catalog();
        assert_eq!(catalog.len(PropKind::Island), 2);
        assert_eq!(catalog.len(PropKind::Chest), 1);
        assert_eq!(catalog.len(PropKind::Bottle), 0);
        assert_eq!(
            catalog.entry(PropKind::Island, 1).map(|e| e.title.as_str()),
            Some("Compiler")
        );
        assert!(catalog.entry(PropKind::Bottle, 0).is_none());
    }

    #[test]
    fn test_catalog_parses_from_ron() {
        let text = r#"(
            projects: [(title: "Raytracer", key: "projects/raytracer.md")],
            links: [(title: "GitHub", key: "https://github.com")],
        )"#;
        let catalog: ContentCatalog = from_str(text).unwrap();
        assert_eq!(catalog.projects.len(), 1);
        assert!(catalog.sections.is_empty());
        assert_eq!(catalog.links[0].key, "https://github.com");
    }

    #[test]
    fn test_memory_provider() {
        let provider = MemoryContent::default().with("a.md", "# A");
        assert_eq!(provider.fetch("a.md"), Ok("# A".to_string()));
        assert_eq!(provider.fetch("b.md"), Err(AssetError::NotFound("b.md".to_string())));
    }

    #[test]
    fn test_resolve_events() {
        let catalog = ContentCatalog {
            links: vec![ContentEntry::new("GitHub", "https://github.com")],
            ..catalog()
        };
        let provider = MemoryContent::default().with("projects/compiler.md", "# Compiler");
        let event = |kind, action, content| InteractionEvent {
            slot: 3,
            kind,
            action,
            content,
        };

        let panel = catalog
            .resolve(&provider, &event(PropKind::Island, InteractionAction::OpenPanel, Some(1)))
            .unwrap()
            .unwrap();
        assert_eq!(panel.title, "Compiler");
        assert_eq!(panel.body, "# Compiler");

        let link = catalog
            .resolve(&provider, &event(PropKind::Bottle, InteractionAction::OpenLink, Some(0)))
            .unwrap()
            .unwrap();
        assert_eq!(link.body, "https://github.com", "Links are not fetched");

        assert_eq!(
            catalog.resolve(&provider, &event(PropKind::Chest, InteractionAction::ClosePanel, Some(0))),
            Ok(None)
        );
        assert_eq!(
            catalog.resolve(&provider, &event(PropKind::Bottle, InteractionAction::OpenLink, None)),
            Ok(None)
        );
        assert!(
            catalog
                .resolve(&provider, &event(PropKind::Island, InteractionAction::OpenPanel, Some(0)))
                .is_err(),
            "Missing panel text surfaces as an error"
        );
    }

    #[test]
    fn test_directory_provider() {
        let dir = std::env::temp_dir().join(format!("sailfolio-content-{}", std::process::id()));
        fs::create_dir_all(dir.join("projects")).unwrap();
        fs::write(dir.join("projects/raytracer.md"), "# Raytracer").unwrap();

        let provider = DirectoryContent::new(&dir);
        assert_eq!(provider.fetch("projects/raytracer.md").unwrap(), "# Raytracer");
        assert!(matches!(provider.fetch("projects/missing.md"), Err(AssetError::NotFound(_))));
        assert!(matches!(provider.fetch("../escape.md"), Err(AssetError::NotFound(_))));

        fs::remove_dir_all(&dir).unwrap();
    }
}
