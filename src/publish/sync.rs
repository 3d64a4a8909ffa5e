//! Directory synchronization with mirror or merge semantics

use std::fs;
use std::io;
use std::path::Path;

/// Counts of what a sync changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Files copied from the new output
    pub copied: usize,
    /// Previously published files removed (mirror mode only)
    pub removed: usize,
}

/// Synchronize the generated output into the staging tree.
///
/// With `keep_files = false` (mirror), files present in `dest` but absent
/// from `src` are deleted and emptied directories are pruned; the
/// top-level `.git` directory is always preserved. With
/// `keep_files = true` (merge), nothing is deleted. In both modes every
/// file under `src` is copied over.
pub fn sync_dir(src: &Path, dest: &Path, keep_files: bool) -> io::Result<SyncStats> {
    let mut stats = SyncStats::default();

    if !keep_files {
        prune(src, dest, true, &mut stats)?;
    }
    copy_tree(src, dest, &mut stats)?;

    Ok(stats)
}

fn prune(src: &Path, dest: &Path, top_level: bool, stats: &mut SyncStats) -> io::Result<()> {
    if !dest.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(dest)? {
        let entry = entry?;
        let name = entry.file_name();
        if top_level && name == ".git" {
            continue;
        }

        let dest_path = entry.path();
        let src_path = src.join(&name);
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            if src_path.is_dir() {
                prune(&src_path, &dest_path, false, stats)?;
                // Prune directories the sync emptied
                if fs::read_dir(&dest_path)?.next().is_none() {
                    fs::remove_dir(&dest_path)?;
                }
            } else {
                stats.removed += count_files(&dest_path)?;
                fs::remove_dir_all(&dest_path)?;
            }
        } else if !src_path.is_file() {
            fs::remove_file(&dest_path)?;
            stats.removed += 1;
        }
    }

    Ok(())
}

fn copy_tree(src: &Path, dest: &Path, stats: &mut SyncStats) -> io::Result<()> {
    fs::create_dir_all(dest)?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            copy_tree(&src_path, &dest_path, stats)?;
        } else {
            fs::copy(&src_path, &dest_path)?;
            stats.copied += 1;
        }
    }

    Ok(())
}

fn count_files(dir: &Path) -> io::Result<usize> {
    let mut count = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            count += count_files(&entry.path())?;
        } else {
            count += 1;
        }
    }
    Ok(count)
}
