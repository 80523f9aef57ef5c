//! Static gallery content: items grouped into ordered display modes.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Text shown for an item, either a localization key or literal text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextRef {
    Key { key: String },
    Literal(String),
}

impl TextRef {
    pub fn key(key: impl Into<String>) -> Self {
        TextRef::Key { key: key.into() }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        TextRef::Literal(text.into())
    }

    /// Resolve to display text, using `lookup` for keys.
    ///
    /// Keys without a translation fall back to the key itself.
    pub fn resolve<'a, F>(&'a self, lookup: F) -> std::borrow::Cow<'a, str>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match self {
            TextRef::Literal(text) => text.as_str().into(),
            TextRef::Key { key } => lookup(key).map(Into::into).unwrap_or_else(|| key.as_str().into()),
        }
    }
}

impl Default for TextRef {
    fn default() -> Self {
        TextRef::Literal(String::new())
    }
}

/// One exhibit in the gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    /// Asset locator, used as the cache key
    pub locator: String,
    #[serde(default)]
    pub author: TextRef,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: TextRef,
}

impl GalleryItem {
    pub fn new(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            author: TextRef::default(),
            link: String::new(),
            description: TextRef::default(),
        }
    }

    pub fn with_author(mut self, author: TextRef) -> Self {
        self.author = author;
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    pub fn with_description(mut self, description: TextRef) -> Self {
        self.description = description;
        self
    }
}

/// A named, ordered list of items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryMode {
    pub name: String,
    pub items: Vec<GalleryItem>,
}

/// Every mode of the gallery, in navigation order.
///
/// Only constructible through [`GalleryDataset::new`], which guarantees at
/// least one mode, no empty or duplicated modes, and no empty locators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryDataset {
    modes: Vec<GalleryMode>,
}

impl GalleryDataset {
    pub fn new(modes: Vec<GalleryMode>) -> Result<Self, ConfigError> {
        if modes.is_empty() {
            return Err(ConfigError::NoModes);
        }

        for (position, mode) in modes.iter().enumerate() {
            if modes[..position].iter().any(|m| m.name == mode.name) {
                return Err(ConfigError::DuplicateMode(mode.name.clone()));
            }
            if mode.items.is_empty() {
                return Err(ConfigError::EmptyMode(mode.name.clone()));
            }
            if let Some(index) = mode.items.iter().position(|i| i.locator.trim().is_empty()) {
                return Err(ConfigError::EmptyLocator {
                    mode: mode.name.clone(),
                    index,
                });
            }
        }

        Ok(Self { modes })
    }

    /// Builder-style constructor for code defined galleries
    pub fn builder() -> GalleryDatasetBuilder {
        GalleryDatasetBuilder { modes: Vec::new() }
    }

    /// Index of the mode called `name`
    pub fn mode_index(&self, name: &str) -> Option<usize> {
        self.modes.iter().position(|m| m.name == name)
    }

    pub fn mode(&self, index: usize) -> Option<&GalleryMode> {
        self.modes.get(index)
    }

    pub fn mode_names(&self) -> Vec<&str> {
        self.modes.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn mode_count(&self) -> usize {
        self.modes.len()
    }

    /// Number of items in mode `mode`, 0 for an unknown mode index
    pub fn len(&self, mode: usize) -> usize {
        self.modes.get(mode).map_or(0, |m| m.items.len())
    }

    pub fn item(&self, mode: usize, index: usize) -> Option<&GalleryItem> {
        self.modes.get(mode)?.items.get(index)
    }

    /// Every locator in the gallery, deduplicated, in navigation order
    pub fn locators(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for item in self.modes.iter().flat_map(|m| m.items.iter()) {
            if !seen.contains(&item.locator.as_str()) {
                seen.push(item.locator.as_str());
            }
        }
        seen
    }
}

pub struct GalleryDatasetBuilder {
    modes: Vec<GalleryMode>,
}

impl GalleryDatasetBuilder {
    pub fn mode(mut self, name: impl Into<String>, items: Vec<GalleryItem>) -> Self {
        self.modes.push(GalleryMode {
            name: name.into(),
            items,
        });
        self
    }

    pub fn build(self) -> Result<GalleryDataset, ConfigError> {
        GalleryDataset::new(self.modes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(locators: &[&str]) -> Vec<GalleryItem> {
        locators.iter().map(|l| GalleryItem::new(*l)).collect()
    }

    #[test]
    fn test_dataset_keeps_mode_order() {
        let dataset = GalleryDataset::builder()
            .mode("solo", items(&["a.glb", "b.glb"]))
            .mode("team", items(&["c.glb"]))
            .build()
            .unwrap();

        assert_eq!(dataset.mode_names(), vec!["solo", "team"]);
        assert_eq!(dataset.mode_index("team"), Some(1));
        assert_eq!(dataset.len(0), 2);
        assert_eq!(dataset.item(0, 1).unwrap().locator, "b.glb");
        assert!(dataset.item(1, 1).is_none());
    }

    #[test]
    fn test_rejects_invalid_datasets() {
        assert!(matches!(GalleryDataset::new(Vec::new()), Err(ConfigError::NoModes)));

        let empty_mode = GalleryDataset::builder()
            .mode("solo", items(&["a.glb"]))
            .mode("team", Vec::new())
            .build();
        assert!(matches!(empty_mode, Err(ConfigError::EmptyMode(m)) if m == "team"));

        let duplicate = GalleryDataset::builder()
            .mode("solo", items(&["a.glb"]))
            .mode("solo", items(&["b.glb"]))
            .build();
        assert!(matches!(duplicate, Err(ConfigError::DuplicateMode(_))));

        let blank = GalleryDataset::builder()
            .mode("solo", items(&["a.glb", "  "]))
            .build();
        assert!(matches!(
            blank,
            Err(ConfigError::EmptyLocator { index: 1, .. })
        ));
    }

    #[test]
    fn test_locators_are_deduplicated() {
        let dataset = GalleryDataset::builder()
            .mode("solo", items(&["a.glb", "b.glb"]))
            .mode("team", items(&["b.glb", "c.glb"]))
            .build()
            .unwrap();
        assert_eq!(dataset.locators(), vec!["a.glb", "b.glb", "c.glb"]);
    }

    #[test]
    fn test_text_ref_from_json() {
        let item: GalleryItem = serde_json::from_str(
            r#"{ "locator": "lamp.glb", "author": { "key": "author.lamp" }, "description": "A desk lamp" }"#,
        )
        .unwrap();

        assert_eq!(item.author, TextRef::key("author.lamp"));
        assert_eq!(item.description, TextRef::literal("A desk lamp"));
        assert_eq!(item.link, "");
    }

    #[test]
    fn test_text_ref_resolve() {
        let key = TextRef::key("author.lamp");
        assert_eq!(key.resolve(|_| Some("Ada".to_string())), "Ada");
        assert_eq!(key.resolve(|_| None), "author.lamp");
        assert_eq!(TextRef::literal("Bo").resolve(|_| None), "Bo");
    }
}
