//! Common file system operations
//!
//! - [`copy_tree`]: recursive copy that keeps permissions, symlinks and (when allowed) ownership
//! - [`write_atomic`]: replace a file through a sibling temporary file

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Counts of what [`copy_tree`] copied
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    pub files: u64,
    pub dirs: u64,
    pub symlinks: u64,
}

/// Copy a directory tree from `src` into `dst`.
///
/// Symbolic links are recreated as links and never followed. Directory permissions are
/// applied after their contents are written so read-only directories still receive files.
pub fn copy_tree<P1, P2>(src: P1, dst: P2) -> io::Result<CopyStats>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let src_ref = src.as_ref();
    let dst_ref = dst.as_ref();

    if !src_ref.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("source directory {} does not exist", src_ref.display()),
        ));
    }

    fs::create_dir_all(dst_ref)?;

    let mut stats = CopyStats::default();
    let mut dirs: Vec<(PathBuf, fs::Metadata)> = Vec::new();

    for entry in WalkDir::new(src_ref).follow_links(false).min_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(src_ref)
            .map_err(io::Error::other)?;
        let target = dst_ref.join(relative);
        let file_type = entry.file_type();
        let metadata = entry.path().symlink_metadata()?;

        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
            dirs.push((target, metadata));
            stats.dirs += 1;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
            preserve_owner(&target, &metadata, true);
            stats.symlinks += 1;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            preserve_owner(&target, &metadata, false);
            stats.files += 1;
        }
    }

    for (dir, metadata) in dirs.iter().rev() {
        fs::set_permissions(dir, metadata.permissions())?;
        preserve_owner(dir, metadata, false);
    }
    let root_metadata = fs::metadata(src_ref)?;
    fs::set_permissions(dst_ref, root_metadata.permissions())?;
    preserve_owner(dst_ref, &root_metadata, false);

    Ok(stats)
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> io::Result<()> {
    let destination = fs::read_link(link)?;
    if target.symlink_metadata().is_ok() {
        if target.is_dir() && !target.is_symlink() {
            fs::remove_dir_all(target)?;
        } else {
            fs::remove_file(target)?;
        }
    }
    std::os::unix::fs::symlink(destination, target)
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, target: &Path) -> io::Result<()> {
    fs::copy(link, target).map(|_| ())
}

/// Carry uid/gid over to the copy. Without privilege this fails and the copy keeps
/// the invoking user as owner.
#[cfg(unix)]
fn preserve_owner(path: &Path, metadata: &fs::Metadata, is_link: bool) {
    use std::os::unix::fs::MetadataExt;

    let result = if is_link {
        std::os::unix::fs::lchown(path, Some(metadata.uid()), Some(metadata.gid()))
    } else {
        std::os::unix::fs::chown(path, Some(metadata.uid()), Some(metadata.gid()))
    };
    if let Err(e) = result {
        tracing::trace!(path = %path.display(), error = %e, "ownership not preserved");
    }
}

#[cfg(not(unix))]
fn preserve_owner(_path: &Path, _metadata: &fs::Metadata, _is_link: bool) {}

/// Replace `path` with `content` atomically.
///
/// The new content is written to a temporary file in the same directory, flushed, given
/// the original file's permissions and owner, then renamed over the original. Readers see
/// either the old file or the new one, never a partial write.
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let original = fs::metadata(path).ok();

    let mut temp = tempfile::Builder::new()
        .prefix(".sitestager-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;

    if let Some(metadata) = &original {
        fs::set_permissions(temp.path(), metadata.permissions())?;
        preserve_owner(temp.path(), metadata, false);
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
