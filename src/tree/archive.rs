use crate::core::path::ensure_dir;
use crate::core::{ReaderError, ReaderResult};
use crate::tree::{PathFilter, ResponseFile};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tar::{Archive, Builder, EntryType};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Default bound on the bytes extracted from one archive (256 MiB)
pub const DEFAULT_MAX_ARCHIVE_SIZE: u64 = 256 * 1024 * 1024;

/// Extracts provider archives into per-call scratch directories
///
/// Every extraction gets its own uniquely named directory under the
/// scratch root, so concurrent calls never collide. The directory is
/// removed when the last handle to the resulting [`ReadTreeResponse`]
/// (or any of its files) is dropped, and immediately on failure.
#[derive(Debug, Clone)]
pub struct TreeMaterializer {
    scratch_dir: PathBuf,
    max_size: u64,
}

impl TreeMaterializer {
    pub fn new(scratch_dir: PathBuf, max_size: u64) -> Self {
        Self {
            scratch_dir,
            max_size,
        }
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Extract a gzip-compressed tarball.
    ///
    /// The archive is consumed exactly once. Its single top-level
    /// directory (the `<owner>-<repo>-<sha>/` prefix providers add) is
    /// stripped, only entries under `subpath` are kept, and their paths
    /// are made relative to `subpath` before `filter` sees them.
    pub fn from_tar_gz<R: Read>(
        &self,
        archive: R,
        subpath: &str,
        etag: String,
        filter: Option<&PathFilter>,
    ) -> ReaderResult<ReadTreeResponse> {
        let dir = self.create_scratch()?;

        // On error `dir` is dropped here, which removes the partial tree
        let files = self.unpack(GzDecoder::new(archive), dir.path(), subpath, filter)?;

        tracing::debug!(
            files = files.len(),
            dir = %dir.path().display(),
            "Materialized archive"
        );

        Ok(ReadTreeResponse::new(etag, dir, files))
    }

    /// Materialize in-memory files, subject to the same filter and size
    /// bound as archive extraction. Paths are taken as already relative.
    pub fn from_files<I>(
        &self,
        entries: I,
        etag: String,
        filter: Option<&PathFilter>,
    ) -> ReaderResult<ReadTreeResponse>
    where
        I: IntoIterator<Item = (String, Vec<u8>)>,
    {
        let dir = self.create_scratch()?;
        let mut total: u64 = 0;
        let mut files = Vec::new();

        for (path, content) in entries {
            let Some(relative) = normalize_relative(Path::new(&path)) else {
                continue;
            };
            if filter.is_some_and(|f| !f.matches(&relative)) {
                continue;
            }

            total = total.saturating_add(content.len() as u64);
            self.check_size(total)?;

            let target = dir.path().join(&relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, &content)?;
            files.push(relative);
        }

        files.sort();
        files.dedup();
        Ok(ReadTreeResponse::new(etag, dir, files))
    }

    fn create_scratch(&self) -> ReaderResult<TempDir> {
        ensure_dir(&self.scratch_dir)?;
        let dir = tempfile::Builder::new()
            .prefix("tree-")
            .tempdir_in(&self.scratch_dir)?;
        Ok(dir)
    }

    fn check_size(&self, total: u64) -> ReaderResult<()> {
        if total > self.max_size {
            tracing::warn!(limit = self.max_size, "Archive exceeds extraction limit");
            return Err(ReaderError::ArchiveTooLarge {
                limit: self.max_size,
            });
        }
        Ok(())
    }

    fn unpack<R: Read>(
        &self,
        reader: R,
        dest: &Path,
        subpath: &str,
        filter: Option<&PathFilter>,
    ) -> ReaderResult<Vec<String>> {
        let subpath = subpath.trim_matches('/');
        let mut archive = Archive::new(reader);
        let mut total: u64 = 0;
        let mut files = Vec::new();

        for entry in archive.entries().map_err(invalid_archive)? {
            let mut entry = entry.map_err(invalid_archive)?;

            // Directories are implied by file paths; links and pax
            // headers are skipped.
            if !matches!(
                entry.header().entry_type(),
                EntryType::Regular | EntryType::Continuous
            ) {
                continue;
            }

            let raw_path = entry.path().map_err(invalid_archive)?.into_owned();
            let Some(relative) = scoped_path(&raw_path, subpath) else {
                continue;
            };
            if filter.is_some_and(|f| !f.matches(&relative)) {
                continue;
            }

            let size = entry.header().size().map_err(invalid_archive)?;
            total = total.saturating_add(size);
            self.check_size(total)?;

            let target = dest.join(&relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&target)?;
            io::copy(&mut entry.by_ref().take(size), &mut out).map_err(invalid_archive)?;
            files.push(relative);
        }

        files.sort();
        files.dedup();
        Ok(files)
    }
}

fn invalid_archive(e: io::Error) -> ReaderError {
    ReaderError::transport(format!("Invalid archive: {}", e))
}

/// Relative `/`-joined path, or `None` if the path is empty or tries to
/// escape its root.
fn normalize_relative(path: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Strip the archive's top-level directory and scope to `subpath`
fn scoped_path(raw: &Path, subpath: &str) -> Option<String> {
    let normalized = normalize_relative(raw)?;
    let (_, inner) = normalized.split_once('/')?;

    if subpath.is_empty() {
        return Some(inner.to_string());
    }

    inner
        .strip_prefix(subpath)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|rest| !rest.is_empty())
        .map(str::to_string)
}

struct MaterializedTree {
    dir: TempDir,
    files: Vec<String>,
}

/// Snapshot of a directory tree at one revision
///
/// Cloning is cheap and shares the extracted files.
#[derive(Clone)]
pub struct ReadTreeResponse {
    etag: String,
    tree: Arc<MaterializedTree>,
}

impl ReadTreeResponse {
    fn new(etag: String, dir: TempDir, files: Vec<String>) -> Self {
        Self {
            etag,
            tree: Arc::new(MaterializedTree { dir, files }),
        }
    }

    /// Revision this snapshot corresponds to (the commit id)
    pub fn etag(&self) -> &str {
        &self.etag
    }

    /// Paths of all files in the snapshot, sorted
    pub fn paths(&self) -> &[String] {
        &self.tree.files
    }

    /// All files in the snapshot, each with a lazy content accessor
    pub fn files(&self) -> Vec<ResponseFile> {
        self.tree
            .files
            .iter()
            .map(|path| {
                let tree = Arc::clone(&self.tree);
                let full_path = tree.dir.path().join(path);
                ResponseFile::new(path.clone(), move || {
                    // Holding `tree` keeps the scratch directory alive
                    let tree = Arc::clone(&tree);
                    let full_path = full_path.clone();
                    Box::pin(async move {
                        let bytes = tokio::fs::read(&full_path).await?;
                        drop(tree);
                        Ok(bytes)
                    })
                })
            })
            .collect()
    }

    /// Copy the snapshot into `target`, or into a new uniquely named
    /// directory next to the scratch tree when no target is given.
    /// The caller owns the returned directory.
    pub async fn dir(&self, target: Option<&Path>) -> ReaderResult<PathBuf> {
        let tree = Arc::clone(&self.tree);
        let target = target.map(Path::to_path_buf);

        tokio::task::spawn_blocking(move || -> ReaderResult<PathBuf> {
            let dest = match target {
                Some(dest) => {
                    ensure_dir(&dest)?;
                    dest
                }
                None => {
                    let parent = tree.dir.path().parent().ok_or_else(|| {
                        ReaderError::Path("Scratch tree has no parent directory".to_string())
                    })?;
                    tempfile::Builder::new()
                        .prefix("tree-out-")
                        .tempdir_in(parent)?
                        .into_path()
                }
            };

            copy_tree(tree.dir.path(), &dest)?;
            Ok(dest)
        })
        .await
        .map_err(|e| ReaderError::Io(io::Error::other(e)))?
    }

    /// The snapshot re-packed as a gzip-compressed tarball with paths
    /// relative to the tree root
    pub async fn archive(&self) -> ReaderResult<Vec<u8>> {
        let tree = Arc::clone(&self.tree);

        tokio::task::spawn_blocking(move || -> ReaderResult<Vec<u8>> {
            let encoder = GzEncoder::new(Vec::new(), Compression::default());
            let mut builder = Builder::new(encoder);
            for path in &tree.files {
                builder.append_path_with_name(tree.dir.path().join(path), path)?;
            }
            let encoder = builder.into_inner()?;
            Ok(encoder.finish()?)
        })
        .await
        .map_err(|e| ReaderError::Io(io::Error::other(e)))?
    }
}

impl std::fmt::Debug for ReadTreeResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadTreeResponse")
            .field("etag", &self.etag)
            .field("files", &self.tree.files.len())
            .finish()
    }
}

fn copy_tree(src: &Path, dest: &Path) -> ReaderResult<()> {
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| ReaderError::Path(e.to_string()))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                ensure_dir(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
