//! Section descriptors and the validated, ordered catalog.
//!
//! The catalog is loaded once at startup and never mutated afterwards.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::{GalleryError, Result};

/// Built-in gallery content, used when no `--sections` file is given.
const BUILTIN_SECTIONS: &str = include_str!("../../assets/sections.toml");

/// Image shown above the first half viewport when nothing else is configured.
pub const DEFAULT_HERO_IMAGE: &str = "assets/hero-bg.png";

/// One content panel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Section {
    pub id: u32,
    pub title: String,
    pub subtitle: String,
    /// Body text; paragraphs are separated by blank lines.
    pub content: String,
    /// Background image URI (file path or http/https URL).
    pub image: String,
    /// Gradient style tag, e.g. `from-purple-600 via-pink-600 to-blue-600`.
    #[serde(default)]
    pub gradient: String,
    /// Accent style tag, e.g. `accent-purple`.
    #[serde(default)]
    pub accent: String,
}

impl Section {
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct SectionFile {
    hero_image: Option<String>,
    #[serde(rename = "section", default)]
    sections: Vec<Section>,
}

/// Ordered, validated section list plus the hero image.
#[derive(Debug, Clone)]
pub struct SectionCatalog {
    hero_image: String,
    sections: Vec<Section>,
}

impl SectionCatalog {
    /// Validate `sections`: non-empty, unique ids, every section has an image.
    pub fn new(hero_image: impl Into<String>, sections: Vec<Section>) -> Result<Self> {
        if sections.is_empty() {
            return Err(GalleryError::EmptyCatalog);
        }
        let mut seen = HashSet::new();
        for section in &sections {
            if !seen.insert(section.id) {
                return Err(GalleryError::DuplicateSectionId(section.id));
            }
            if section.image.trim().is_empty() {
                return Err(GalleryError::MissingImage { id: section.id });
            }
        }
        let hero_image = hero_image.into();
        let hero_image = if hero_image.trim().is_empty() {
            DEFAULT_HERO_IMAGE.to_string()
        } else {
            hero_image
        };
        Ok(Self {
            hero_image,
            sections,
        })
    }

    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_SECTIONS, "built-in sections")
    }

    /// Load a TOML section file from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| GalleryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Parse TOML text; `origin` names the source in error messages.
    pub fn parse(text: &str, origin: &str) -> Result<Self> {
        let file: SectionFile = toml::from_str(text).map_err(|source| GalleryError::SectionData {
            origin: origin.to_string(),
            source,
        })?;
        let hero = file
            .hero_image
            .unwrap_or_else(|| DEFAULT_HERO_IMAGE.to_string());
        Self::new(hero, file.sections)
    }

    /// Replace the hero image (CLI override).
    pub fn with_hero_image(mut self, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        if !uri.trim().is_empty() {
            self.hero_image = uri;
        }
        self
    }

    pub fn hero_image(&self) -> &str {
        &self.hero_image
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn get(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Hero image followed by every section image, without duplicates.
    pub fn all_images(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        std::iter::once(self.hero_image.as_str())
            .chain(self.sections.iter().map(|s| s.image.as_str()))
            .filter(|uri| seen.insert(*uri))
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn sample_section(id: u32, image: &str) -> Section {
    Section {
        id,
        title: format!("Section {id}"),
        subtitle: "Subtitle".into(),
        content: "First paragraph.\n\nSecond paragraph.".into(),
        image: image.into(),
        gradient: String::new(),
        accent: String::new(),
    }
}
