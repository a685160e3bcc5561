//! State shared by open writer and reader handles

use super::format::ContainerHeader;
use super::journal::{ContainerLock, RawContainer};
use crate::config::secret::non_empty;
use crate::config::SecretString;
use crate::core::access::password::{burn_verification, check_access, hash_password};
use crate::core::access::KdfParams;
use crate::core::store::ModuleStore;
use crate::domain::{FileAccessMode, FileInfo, OpenMode, Result, UmdfError};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// An open container: its header and replayed state
#[derive(Debug)]
pub(crate) struct OpenContainer {
    pub path: PathBuf,
    pub header: ContainerHeader,
    pub store: RwLock<ModuleStore>,
    pub open_mode: OpenMode,
    pub access_mode: Option<FileAccessMode>,
}

impl OpenContainer {
    pub fn new(
        path: &Path,
        header: ContainerHeader,
        store: ModuleStore,
        open_mode: OpenMode,
        access_mode: Option<FileAccessMode>,
    ) -> Self {
        Self {
            path: path.to_path_buf(),
            header,
            store: RwLock::new(store),
            open_mode,
            access_mode,
        }
    }

    pub async fn file_info(&self) -> FileInfo {
        let store = self.store.read().await;
        FileInfo {
            path: self.path.display().to_string(),
            author: self.header.author.clone(),
            created_at: self.header.created_at,
            format_version: self.header.format_version,
            open_mode: self.open_mode,
            access_mode: self.access_mode,
            password_protected: self.header.is_password_protected(),
            encounter_count: store.encounter_count(),
            module_count: store.module_count(),
            encounters: store.encounter_summaries(),
            modules: store.module_summaries(),
        }
    }
}

/// A container read from disk and admitted past the password gate
pub(crate) struct LoadedContainer {
    pub header: ContainerHeader,
    pub store: ModuleStore,
    pub next_seq: u64,
}

/// Reads `path`, checks the password and replays the journal
///
/// With a password supplied, a missing or unreadable container is reported as
/// [`UmdfError::AccessDenied`] after a full verification's worth of work.
pub(crate) async fn load_container(
    path: &Path,
    password: Option<&SecretString>,
    kdf: &KdfParams,
) -> Result<LoadedContainer> {
    let password = non_empty(password).cloned();

    let read = RawContainer::read(path).await.and_then(|raw| {
        let header = raw.header()?;
        Ok((raw, header))
    });
    let (raw, header) = match read {
        Ok(loaded) => loaded,
        Err(e) => return Err(deny_if_password(e, password, *kdf, path).await),
    };

    let stored = header.access.clone();
    let check_kdf = *kdf;
    run_blocking(move || check_access(stored.as_deref(), password.as_ref(), &check_kdf))
        .await
        .inspect_err(|e| {
            if matches!(e, UmdfError::AccessDenied) {
                tracing::warn!(path = %path.display(), "Rejected container access");
            }
        })?;

    let (store, next_seq) = raw.replay()?;
    Ok(LoadedContainer {
        header,
        store,
        next_seq,
    })
}

/// Takes the writer lock on an existing container
///
/// A missing container is reported the same way [`load_container`] reports it.
pub(crate) async fn lock_for_update(
    path: &Path,
    password: Option<&SecretString>,
    kdf: &KdfParams,
) -> Result<ContainerLock> {
    match ContainerLock::acquire(path).await {
        Err(e @ UmdfError::NotFound(_)) => {
            Err(deny_if_password(e, non_empty(password).cloned(), *kdf, path).await)
        }
        locked => locked,
    }
}

async fn deny_if_password(
    error: UmdfError,
    password: Option<SecretString>,
    kdf: KdfParams,
    path: &Path,
) -> UmdfError {
    match password {
        Some(password) => {
            let _ = run_blocking(move || {
                burn_verification(&password, &kdf);
                Ok(())
            })
            .await;
            tracing::warn!(path = %path.display(), "Rejected container access");
            UmdfError::AccessDenied
        }
        None => error,
    }
}

/// Hashes a new container password, or returns `None` for no/empty password
pub(crate) async fn seal_password(
    password: Option<&SecretString>,
    kdf: &KdfParams,
) -> Result<Option<String>> {
    let Some(password) = non_empty(password).cloned() else {
        return Ok(None);
    };
    let kdf = *kdf;
    run_blocking(move || hash_password(&password, &kdf)).await.map(Some)
}

/// Runs Argon2 hashing and blocking file work off the async worker threads
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| UmdfError::Io(format!("Blocking task failed: {e}")))?
}
