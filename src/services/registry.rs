//! The external account registry: a JSON array of account documents owned by
//! the enforcement layer. We read it whole, rewrite it whole, and keep a
//! backup copy of the previous version next to it before every overwrite.
//!
//! Fields this crate does not know about are carried through untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("account {0} not found")]
    NotFound(String),
    #[error("registry I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("registry is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Expiry as epoch seconds; 0 means "not set".
    #[serde(default, deserialize_with = "null_as_default")]
    pub expire: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trial: bool,
    /// Suspended by an administrator.
    #[serde(default, deserialize_with = "null_as_default")]
    pub revoked: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccountRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expire > 0 && now > self.expire
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone)]
pub struct Registry {
    path: PathBuf,
    /// Serializes read-modify-write cycles inside this process.
    write_lock: Arc<Mutex<()>>,
}

impl Registry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty registry.
    pub async fn load(&self) -> Result<Vec<AccountRecord>, RegistryError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    pub async fn find(&self, name: &str) -> Result<Option<AccountRecord>, RegistryError> {
        Ok(self.load().await?.into_iter().find(|c| c.name == name))
    }

    pub async fn contains(&self, name: &str) -> Result<bool, RegistryError> {
        Ok(self.find(name).await?.is_some())
    }

    pub async fn count(&self) -> Result<usize, RegistryError> {
        Ok(self.load().await?.len())
    }

    /// Applies `change` to the named account and persists the registry.
    /// Returns the updated record.
    pub async fn update<F>(&self, name: &str, change: F) -> Result<AccountRecord, RegistryError>
    where
        F: FnOnce(&mut AccountRecord),
    {
        let _guard = self.write_lock.lock().await;
        let mut clients = self.load().await?;
        let record = clients
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        change(record);
        let updated = record.clone();
        self.save(&clients).await?;
        Ok(updated)
    }

    async fn save(&self, clients: &[AccountRecord]) -> Result<(), RegistryError> {
        if tokio::fs::try_exists(&self.path).await? {
            tokio::fs::copy(&self.path, sibling(&self.path, ".bot.bak")).await?;
        }
        let mut body = serde_json::to_string_pretty(clients)?;
        body.push('\n');
        let tmp = sibling(&self.path, ".bot.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}
