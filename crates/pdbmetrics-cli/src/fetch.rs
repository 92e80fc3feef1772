use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://files.rcsb.org/download";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("'{id}' is not a valid PDB identifier (expected 4 alphanumeric characters)")]
    InvalidId { id: String },

    #[error("Download of '{id}' failed with HTTP status {status}")]
    Status {
        id: String,
        status: reqwest::StatusCode,
    },

    #[error("Download of '{id}' failed: {source}")]
    Transport {
        id: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to store '{id}' at '{path}': {source}", path = path.display())]
    Store {
        id: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine a cache directory; pass --cache-dir explicitly")]
    NoCacheDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub base_url: String,
    pub cache_dir: PathBuf,
    /// Download again even if a cached copy exists.
    pub refresh: bool,
}

/// Downloads PDB entries into a local cache directory.
#[derive(Debug)]
pub struct Fetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl Fetcher {
    pub fn new(settings: FetchSettings) -> Self {
        debug!("Fetcher initialized with cache at {:?}", &settings.cache_dir);
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Validates `id` and returns its canonical upper-case form.
    pub fn normalize_id(id: &str) -> Result<String, FetchError> {
        let trimmed = id.trim();
        if trimmed.len() != 4 || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(FetchError::InvalidId { id: id.to_string() });
        }
        Ok(trimmed.to_ascii_uppercase())
    }

    pub fn url_for(&self, id: &str) -> String {
        format!("{}/{}.pdb", self.settings.base_url.trim_end_matches('/'), id)
    }

    pub fn cache_path(&self, id: &str) -> PathBuf {
        self.settings.cache_dir.join(format!("{}.pdb", id))
    }

    /// Returns the local path of entry `id`, downloading it if it is not cached
    /// or if a refresh was requested.
    pub async fn fetch(&self, id: &str) -> Result<PathBuf, FetchError> {
        let id = Self::normalize_id(id)?;
        let path = self.cache_path(&id);

        if path.is_file() && !self.settings.refresh {
            debug!("Using cached copy of {} at {:?}", id, &path);
            return Ok(path);
        }

        let url = self.url_for(&id);
        info!("Downloading {} from {}", id, url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                id: id.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { id, status });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                id: id.clone(),
                source,
            })?;

        store(&path, &bytes).await.map_err(|source| FetchError::Store {
            id: id.clone(),
            path: path.clone(),
            source,
        })?;
        info!("Stored {} ({} bytes) at {:?}", id, bytes.len(), &path);
        Ok(path)
    }

    pub fn default_cache_dir() -> Result<PathBuf, FetchError> {
        ProjectDirs::from("edu", "caltech", "pdbmetrics")
            .map(|dirs| dirs.cache_dir().join("structures"))
            .ok_or(FetchError::NoCacheDir)
    }
}

/// Writes through a sibling temporary file so an interrupted download never
/// leaves a truncated entry in the cache.
async fn store(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let partial = path.with_extension("pdb.part");
    tokio::fs::write(&partial, bytes).await?;
    tokio::fs::rename(&partial, path).await
}
