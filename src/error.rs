//! Error types shared by the core and the runtime.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("section catalog is empty")]
    EmptyCatalog,

    #[error("duplicate section id {0}")]
    DuplicateSectionId(u32),

    #[error("section {id} has no image")]
    MissingImage { id: u32 },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid section data in {origin}")]
    SectionData {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to load image {uri}: {reason}")]
    ImageLoad { uri: String, reason: String },
}

pub type Result<T> = std::result::Result<T, GalleryError>;
