use std::{fmt, path::PathBuf, sync::Arc};

use super::error::LoadError;

/// Where a boundary or tabular file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    /// `http://` or `https://` URL, fetched when the `download` feature is enabled.
    Url(String),
    /// Contents already in memory (browser fetches, tests); `label` names it in errors.
    Bytes { label: String, bytes: Arc<[u8]> },
}

impl Source {
    /// URLs are recognized by scheme; anything else is a filesystem path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Source::Url(location.to_string())
        } else {
            Source::Path(PathBuf::from(location))
        }
    }

    pub fn bytes(label: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Source::Bytes { label: label.into(), bytes: bytes.into() }
    }

    pub fn location(&self) -> String {
        match self {
            Source::Path(path) => path.display().to_string(),
            Source::Url(url) => url.clone(),
            Source::Bytes { label, .. } => label.clone(),
        }
    }

    /// Read the whole source into memory.
    pub fn fetch(&self) -> Result<Arc<[u8]>, LoadError> {
        match self {
            Source::Path(path) => std::fs::read(path)
                .map(Arc::from)
                .map_err(|source| LoadError::Io { location: self.location(), source }),
            Source::Url(url) => fetch_url(url),
            Source::Bytes { bytes, .. } => Ok(Arc::clone(bytes)),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.location()) }
}

#[cfg(feature = "download")]
fn fetch_url(url: &str) -> Result<Arc<[u8]>, LoadError> {
    let network = |message: String| LoadError::Network { location: url.to_string(), message };

    let response = reqwest::blocking::get(url)
        .map_err(|e| network(e.to_string()))?
        .error_for_status()
        .map_err(|e| network(e.to_string()))?;

    response.bytes()
        .map(|bytes| Arc::from(bytes.as_ref()))
        .map_err(|e| network(e.to_string()))
}

#[cfg(not(feature = "download"))]
fn fetch_url(url: &str) -> Result<Arc<[u8]>, LoadError> {
    Err(LoadError::Unsupported {
        location: url.to_string(),
        message: "built without the `download` feature".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_distinguishes_urls_from_paths() {
        assert!(matches!(Source::parse("https://example.org/a.geojson"), Source::Url(_)));
        assert!(matches!(Source::parse("http://example.org/a.csv"), Source::Url(_)));
        assert!(matches!(Source::parse("data/a.geojson"), Source::Path(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Source::parse("/definitely/not/here.geojson").fetch().unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert_eq!(err.location(), "/definitely/not/here.geojson");
    }

    #[test]
    fn in_memory_bytes_round_trip() {
        let source = Source::bytes("inline", b"abc".to_vec());
        assert_eq!(&*source.fetch().unwrap(), b"abc");
        assert_eq!(source.to_string(), "inline");
    }
}
