//! Sources of raw UCD text: a download cache and an in-memory map.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::config::UcdResource;
use crate::error::{Error, Result};

/// Hands out the text of a UCD resource.
pub trait ResourceProvider {
    /// # Errors
    /// [`Error::Fetch`] when the resource cannot be obtained,
    /// [`Error::Format`] when it is not UTF-8.
    fn load(&self, resource: UcdResource) -> Result<String>;
}

/// Retrieves the bytes behind a URL.
pub trait Fetcher {
    /// # Errors
    /// Any transport or HTTP status failure, already mapped to [`Error::Fetch`].
    fn fetch(&self, resource: UcdResource, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP fetcher. One request per call, no retries.
#[derive(Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    const USER_AGENT: &'static str = concat!("ucd-tablegen/", env!("CARGO_PKG_VERSION"));

    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .user_agent(Self::USER_AGENT)
                .build(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, resource: UcdResource, url: &str) -> Result<Vec<u8>> {
        let response = self
            .agent
            .get(url)
            .set("Accept", "text/plain,*/*")
            .call()
            .map_err(|err| Error::fetch(resource.file_name(), err))?;
        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|err| Error::fetch(resource.file_name(), err))?;
        Ok(bytes)
    }
}

/// Reads resources from a cache directory, fetching each missing file once.
///
/// A cached file counts as valid when it exists and is non-empty; its contents
/// are never compared against anything. Downloads land in a temporary sibling
/// and are renamed into place, so an interrupted fetch leaves no file behind.
pub struct CachedProvider<F = HttpFetcher> {
    dir: PathBuf,
    offline: bool,
    fetcher: F,
}

impl CachedProvider<HttpFetcher> {
    pub fn new(dir: impl Into<PathBuf>, offline: bool) -> Self {
        Self::with_fetcher(dir, offline, HttpFetcher::new())
    }
}

impl<F: Fetcher> CachedProvider<F> {
    pub fn with_fetcher(dir: impl Into<PathBuf>, offline: bool, fetcher: F) -> Self {
        Self {
            dir: dir.into(),
            offline,
            fetcher,
        }
    }

    pub fn cache_path(&self, resource: UcdResource) -> PathBuf {
        self.dir.join(resource.file_name())
    }

    fn read_cached(path: &Path) -> Result<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                Ok(None)
            }
            Err(err) => Err(Error::Io(err)),
        }
    }

    fn download(&self, resource: UcdResource, path: &Path) -> Result<Vec<u8>> {
        if self.offline {
            return Err(Error::fetch(
                resource.file_name(),
                format!("{} is not cached and --offline is set", path.display()),
            ));
        }
        let url = resource.url();
        info!(
            target: "pipeline",
            stage = "tablegen.fetch",
            resource = resource.file_name(),
            url = %url,
            status = "start"
        );
        let bytes = self.fetcher.fetch(resource, &url)?;
        self.store(resource, path, &bytes)?;
        info!(
            target: "pipeline",
            stage = "tablegen.fetch",
            resource = resource.file_name(),
            bytes = bytes.len(),
            status = "ok"
        );
        Ok(bytes)
    }

    fn store(&self, resource: UcdResource, path: &Path, bytes: &[u8]) -> Result<()> {
        let write = || -> std::io::Result<()> {
            fs::create_dir_all(&self.dir)?;
            let mut file = NamedTempFile::new_in(&self.dir)?;
            file.write_all(bytes)?;
            file.persist(path).map_err(|err| err.error)?;
            Ok(())
        };
        write().map_err(|err| {
            Error::fetch(
                resource.file_name(),
                format!("cannot write cache file {}: {err}", path.display()),
            )
        })
    }
}

impl<F: Fetcher> ResourceProvider for CachedProvider<F> {
    fn load(&self, resource: UcdResource) -> Result<String> {
        let path = self.cache_path(resource);
        let bytes = match Self::read_cached(&path)? {
            Some(bytes) => {
                tracing::debug!(
                    target: "pipeline",
                    stage = "tablegen.cache",
                    resource = resource.file_name(),
                    path = %path.display(),
                    status = "hit"
                );
                bytes
            }
            None => self.download(resource, &path)?,
        };
        decode_utf8(resource, bytes)
    }
}

fn decode_utf8(resource: UcdResource, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|err| Error::Format {
        resource: resource.file_name().to_string(),
        line: 0,
        field: format!("invalid UTF-8 at byte {}", err.utf8_error().valid_up_to()),
    })
}

/// Fixed resource texts held in memory.
#[derive(Debug, Default, Clone)]
pub struct StaticProvider {
    texts: HashMap<UcdResource, String>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, resource: UcdResource, text: impl Into<String>) -> Self {
        self.texts.insert(resource, text.into());
        self
    }
}

impl ResourceProvider for StaticProvider {
    fn load(&self, resource: UcdResource) -> Result<String> {
        self.texts
            .get(&resource)
            .cloned()
            .ok_or_else(|| Error::fetch(resource.file_name(), "resource not provided"))
    }
}
