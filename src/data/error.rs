use thiserror::Error;

/// Total failure to load a boundary or tabular source.
///
/// Per-row anomalies (empty identifiers, unparsable cells, unmatched joins) never
/// produce a `LoadError`; they are logged and absorbed by the loader.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("[data] failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("[data] failed to fetch {location}: {message}")]
    Network { location: String, message: String },

    #[error("[data] cannot load {location}: {message}")]
    Unsupported { location: String, message: String },

    #[error("[data] malformed boundary data in {location}: {message}")]
    Geometry { location: String, message: String },

    #[error("[data] malformed tabular data in {location}: {message}")]
    Table { location: String, message: String },
}

impl LoadError {
    /// Where the failing source lives (path, URL, or in-memory label).
    pub fn location(&self) -> &str {
        match self {
            LoadError::Io { location, .. }
            | LoadError::Network { location, .. }
            | LoadError::Unsupported { location, .. }
            | LoadError::Geometry { location, .. }
            | LoadError::Table { location, .. } => location,
        }
    }
}
