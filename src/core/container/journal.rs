//! Journal file I/O
//!
//! [`JournalWriter`] appends sealed records to an open container file while
//! holding its [`ContainerLock`]. [`RawContainer`] reads a container back and
//! replays its journal into a fresh [`ModuleStore`].

use super::format::{ContainerHeader, JournalLine, JournalRecord};
use super::session::run_blocking;
use crate::core::store::ModuleStore;
use crate::domain::{Result, UmdfError};
use fs2::FileExt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Exclusive advisory lock held by the writer of a container
///
/// A second writer on the same file, in this process or another, fails with
/// [`UmdfError::Conflict`] until the lock is dropped. Readers do not take it.
#[derive(Debug)]
pub struct ContainerLock {
    file: std::fs::File,
}

impl ContainerLock {
    /// Locks the existing container at `path`
    ///
    /// # Errors
    ///
    /// [`UmdfError::NotFound`] if the file does not exist and
    /// [`UmdfError::Conflict`] if another writer holds it.
    pub async fn acquire(path: &Path) -> Result<Self> {
        let path = path.to_path_buf();
        run_blocking(move || {
            let file = std::fs::File::open(&path).map_err(|e| not_found_or_io(e, &path))?;
            Self::hold(file, &path)
        })
        .await
    }

    /// Locks the container at `path`, or returns `None` if there is none
    pub async fn acquire_if_exists(path: &Path) -> Result<Option<Self>> {
        match Self::acquire(path).await {
            Ok(lock) => Ok(Some(lock)),
            Err(UmdfError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn hold(file: std::fs::File, path: &Path) -> Result<Self> {
        match FileExt::try_lock_exclusive(&file) {
            Ok(()) => Ok(Self { file }),
            Err(e) if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => {
                Err(UmdfError::Conflict(format!(
                    "Container is open in another writer: {}",
                    path.display()
                )))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for ContainerLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Append handle on a container file
#[derive(Debug)]
pub struct JournalWriter {
    file: File,
    path: PathBuf,
    next_seq: u64,
    sync_on_commit: bool,
    _lock: ContainerLock,
}

impl JournalWriter {
    /// Publishes a new container holding only `header` and locks it
    ///
    /// The header goes to a uniquely named sibling file that is locked and
    /// synced before it is moved to `path`, so no reader ever sees a partial
    /// header. Without `replace` an existing file at `path` is left untouched
    /// and [`UmdfError::Conflict`] is returned. With `replace` the existing
    /// container must not be held by another writer.
    pub async fn create(
        path: &Path,
        header: &ContainerHeader,
        replace: bool,
        sync_on_commit: bool,
    ) -> Result<Self> {
        let mut line = serde_json::to_string(header)?;
        line.push('\n');

        let previous = if replace {
            ContainerLock::acquire_if_exists(path).await?
        } else {
            None
        };

        let target = path.to_path_buf();
        let lock = run_blocking(move || publish(&target, &line, replace)).await?;
        drop(previous);

        Self::append_to(path, lock, 1, sync_on_commit).await
    }

    /// Opens an existing, already locked container for appending
    ///
    /// `next_seq` is the sequence number the next record receives.
    pub async fn append_to(
        path: &Path,
        lock: ContainerLock,
        next_seq: u64,
        sync_on_commit: bool,
    ) -> Result<Self> {
        let file = OpenOptions::new().append(true).open(path).await?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
            next_seq,
            sync_on_commit,
            _lock: lock,
        })
    }

    /// Appends one record
    ///
    /// On failure the file is truncated back to its previous length, so a
    /// failed append never leaves a partial line behind.
    pub async fn append(&mut self, record: &JournalRecord) -> Result<u64> {
        let seq = self.next_seq;
        let line = JournalLine::seal(seq, record.clone())?.to_line()?;
        let offset = self.file.metadata().await?.len();

        if let Err(e) = self.write_line(&line).await {
            if let Err(truncate) = self.file.set_len(offset).await {
                tracing::error!(
                    path = %self.path.display(),
                    error = %truncate,
                    "Failed to roll back partial journal entry"
                );
            }
            return Err(e);
        }

        self.next_seq += 1;
        Ok(seq)
    }

    async fn write_line(&mut self, line: &str) -> Result<()> {
        self.file.write_all(line.as_bytes()).await?;
        self.file.flush().await?;
        if self.sync_on_commit {
            self.file.sync_data().await?;
        }
        Ok(())
    }

    /// Flushes everything to disk
    pub async fn finish(mut self) -> Result<()> {
        self.file.flush().await?;
        self.file.sync_all().await?;
        Ok(())
    }

    /// Sequence number of the next record
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }
}

/// Writes `header_line` to a staged sibling of `path` and moves it into place
///
/// The returned lock is taken on the staged file before it becomes visible.
fn publish(path: &Path, header_line: &str, replace: bool) -> Result<ContainerLock> {
    let mut staged = stage_file(path)?;
    let lock = ContainerLock::hold(staged.as_file().try_clone()?, path)?;
    staged.write_all(header_line.as_bytes())?;
    staged.as_file().sync_all()?;

    let published = if replace {
        staged.persist(path)
    } else {
        staged.persist_noclobber(path)
    };
    published.map_err(|e| publish_error(e.error, path))?;
    Ok(lock)
}

/// Creates a uniquely named hidden file next to `path`
///
/// Removed on drop unless persisted.
pub(crate) fn stage_file(path: &Path) -> io::Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    tempfile::Builder::new()
        .prefix(".umdf-")
        .suffix(".tmp")
        .tempfile_in(dir)
}

/// Maps a failed move of a staged file onto `path`
pub(crate) fn publish_error(error: io::Error, path: &Path) -> UmdfError {
    if error.kind() == io::ErrorKind::AlreadyExists {
        UmdfError::Conflict(format!("Container already exists: {}", path.display()))
    } else {
        error.into()
    }
}

fn not_found_or_io(error: io::Error, path: &Path) -> UmdfError {
    if error.kind() == io::ErrorKind::NotFound {
        UmdfError::NotFound(format!("Container not found: {}", path.display()))
    } else {
        error.into()
    }
}

/// Raw container contents split into header and journal lines
#[derive(Debug)]
pub struct RawContainer {
    text: String,
}

impl RawContainer {
    /// Reads a container file
    ///
    /// # Errors
    ///
    /// [`UmdfError::NotFound`] if the file does not exist, [`UmdfError::Io`]
    /// for other read failures and [`UmdfError::Integrity`] for non-UTF-8 content.
    pub async fn read(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| not_found_or_io(e, path))?;
        let text = String::from_utf8(bytes)
            .map_err(|_| UmdfError::Integrity("Container is not valid UTF-8".to_string()))?;
        Ok(Self { text })
    }

    /// Parses the header line
    pub fn header(&self) -> Result<ContainerHeader> {
        let first = self
            .text
            .lines()
            .next()
            .ok_or_else(|| UmdfError::Integrity("Container is empty".to_string()))?;
        ContainerHeader::parse(first)
    }

    /// Replays the journal into a new store
    ///
    /// Returns the store and the sequence number the next record receives.
    pub fn replay(&self) -> Result<(ModuleStore, u64)> {
        let mut store = ModuleStore::new();
        let mut seq = 1;

        if !self.text.is_empty() && !self.text.ends_with('\n') {
            return Err(UmdfError::Integrity(
                "Container ends with an incomplete journal entry".to_string(),
            ));
        }

        for line in self.text.lines().skip(1).filter(|l| !l.trim().is_empty()) {
            let entry = JournalLine::open(line, seq)?;
            store.commit(entry.record).map_err(|e| {
                UmdfError::Integrity(format!("Journal entry {seq} cannot be applied: {e}"))
            })?;
            seq += 1;
        }

        Ok((store, seq))
    }
}
