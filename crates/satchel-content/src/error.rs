//! Content loading errors.

use thiserror::Error;

/// Errors raised while loading or validating static content.
#[derive(Debug, Error)]
pub enum ContentError {
    /// A content file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path that failed.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A content file is not valid YAML for its schema.
    #[error("malformed content: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Two catalog entries share an identifier.
    #[error("duplicate item id: {0}")]
    DuplicateItem(String),

    /// A pack lists contents the catalog does not know.
    #[error("pack {pack} lists unknown item {item}")]
    UnknownPackItem {
        /// The pack identifier.
        pack: String,
        /// The missing item.
        item: String,
    },

    /// Two starting-gear entries share a class.
    #[error("duplicate starting gear for class: {0}")]
    DuplicateClass(String),

    /// Starting gear references an item the catalog does not know.
    #[error("starting gear for {class} references unknown item {item}")]
    UnknownGearItem {
        /// The class whose gear is invalid.
        class: String,
        /// The missing item.
        item: String,
    },

    /// No starting gear exists for the requested class.
    #[error("unknown class: {0}")]
    UnknownClass(String),
}
