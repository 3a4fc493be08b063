//! Packaging of a project directory into a zip archive.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::core::config::ignore_path;
use crate::core::error::AppError;
use crate::core::exclusion::ExclusionMatcher;

/// A finished archive on disk.
#[derive(Debug, Clone)]
pub struct PackagedArchive {
    pub path: PathBuf,
    /// Number of files stored.
    pub entries: usize,
    /// Size of the archive in bytes.
    pub size: u64,
}

impl PackagedArchive {
    /// Deletes the archive file. Failures are logged and ignored.
    pub fn remove(self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::debug!(path = %self.path.display(), error = %e, "could not remove archive");
        }
    }
}

/// Builds deployment archives.
///
/// Symbolic links are never followed nor stored, so link cycles cannot make
/// the walk loop.
pub struct ArchiveBuilder {
    project_dir: PathBuf,
    subfolder: Option<String>,
    output: Option<PathBuf>,
}

impl ArchiveBuilder {
    /// Creates a builder packaging the whole project directory.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            subfolder: None,
            output: None,
        }
    }

    /// Packages only `<project>/<folder>` (e.g. a `dist` build output).
    pub fn subfolder(mut self, folder: Option<&str>) -> Self {
        self.subfolder = folder.map(String::from);
        self
    }

    /// Sets the output path. Defaults to `<project>/temp-<millis>.zip`.
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Writes the archive, removing the partial file on any failure.
    pub fn build(self) -> Result<PackagedArchive, AppError> {
        let project_dir = fs::canonicalize(&self.project_dir).map_err(|e| {
            AppError::Archive(format!(
                "Project directory {} is not accessible: {}",
                self.project_dir.display(),
                e
            ))
        })?;

        let root = match &self.subfolder {
            Some(folder) => {
                let root = project_dir.join(folder);
                if !root.is_dir() {
                    return Err(AppError::Archive(format!(
                        "Build folder '{}' not found. Build your project first.",
                        folder
                    )));
                }
                root
            }
            None => project_dir.clone(),
        };

        let matcher = ExclusionMatcher::load(&ignore_path(&project_dir));

        let output = self.output.unwrap_or_else(|| {
            project_dir.join(format!("temp-{}.zip", chrono::Utc::now().timestamp_millis()))
        });

        let file = File::create(&output).map_err(|e| {
            AppError::Archive(format!("Could not create {}: {}", output.display(), e))
        })?;
        // Canonical form is only available once the file exists
        let output = fs::canonicalize(&output).unwrap_or(output);

        match write_archive(file, &root, &output, &matcher) {
            Ok(entries) => {
                let size = fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
                tracing::debug!(path = %output.display(), entries, size, "archive created");
                Ok(PackagedArchive {
                    path: output,
                    entries,
                    size,
                })
            }
            Err(e) => {
                let _ = fs::remove_file(&output);
                Err(AppError::Archive(e.to_string()))
            }
        }
    }
}

/// Walks `root` depth-first and stores every non-excluded regular file.
fn write_archive(
    file: File,
    root: &Path,
    output: &Path,
    matcher: &ExclusionMatcher,
) -> io::Result<usize> {
    let mut zip = ZipWriter::new(file);
    let base_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9));
    let mut entries = 0;

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded_dir(entry, root, matcher));

    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        let file_type = entry.file_type();

        if file_type.is_symlink() {
            tracing::debug!(path = %entry.path().display(), "skipping symbolic link");
            continue;
        }
        if !file_type.is_file() || entry.path() == output {
            continue;
        }

        let Some(relative) = relative_path(entry.path(), root) else {
            continue;
        };
        if matcher.is_excluded(&relative) {
            tracing::trace!(path = %relative, "excluded");
            continue;
        }

        let options = base_options.unix_permissions(file_mode(&entry)?);
        zip.start_file(relative.as_str(), options)
            .map_err(io::Error::other)?;
        let mut source = File::open(entry.path())?;
        io::copy(&mut source, &mut zip)?;
        entries += 1;
    }

    zip.finish().map_err(io::Error::other)?;
    Ok(entries)
}

/// A directory is pruned when its relative path plus `/` matches a rule.
/// Every rule still matching once the path is extended, this prunes exactly
/// the directories whose files would all be excluded.
fn is_excluded_dir(entry: &DirEntry, root: &Path, matcher: &ExclusionMatcher) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    match relative_path(entry.path(), root) {
        Some(relative) => matcher.is_excluded(&format!("{}/", relative)),
        None => false,
    }
}

/// Path relative to `root`, always `/`-separated.
fn relative_path(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[cfg(unix)]
fn file_mode(entry: &DirEntry) -> io::Result<u32> {
    use std::os::unix::fs::PermissionsExt;
    Ok(entry.metadata().map_err(io::Error::from)?.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn file_mode(_entry: &DirEntry) -> io::Result<u32> {
    Ok(0o644)
}
