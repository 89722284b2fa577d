// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Disk Utilities
//!
//! Crash-safe primitives the cache layer builds atomic promotion on top of:
//! atomic file write, backup-swap replace, and recursive directory
//! integration. Every operation here either fully succeeds or leaves the
//! target untouched.

use std::path::{Path, PathBuf};

use harvester_domain::HarvestError;

/// Ensures `path` exists and is zero-length, creating parent directories.
pub async fn create_empty_file(path: &Path) -> Result<(), HarvestError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::File::create(path).await?;
    Ok(())
}

/// Deletes `path` recursively. A missing path is not an error.
pub async fn delete_file(path: &Path) -> Result<(), HarvestError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => tokio::fs::remove_dir_all(path).await.or_else(ignore_not_found),
        Ok(_) => tokio::fs::remove_file(path).await.or_else(ignore_not_found),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn ignore_not_found(err: std::io::Error) -> Result<(), std::io::Error> {
    if err.kind() == std::io::ErrorKind::NotFound {
        Ok(())
    } else {
        Err(err)
    }
}

/// Copies `src` onto `dst` atomically (write to a sibling temp file, then
/// rename). If `src` is a directory, recurses. A missing `src` is reported
/// as a `HarvestError::Disk`, leaving `dst` untouched.
#[async_recursion::async_recursion]
pub async fn copy(src: &Path, dst: &Path) -> Result<(), HarvestError> {
    let meta = tokio::fs::metadata(src)
        .await
        .map_err(|err| HarvestError::disk(format!("copy: source missing: {src:?}: {err}")))?;

    if meta.is_dir() {
        tokio::fs::create_dir_all(dst).await?;
        let mut entries = tokio::fs::read_dir(src).await?;
        while let Some(entry) = entries.next_entry().await? {
            let child_src = entry.path();
            let child_dst = dst.join(entry.file_name());
            copy(&child_src, &child_dst).await?;
        }
        Ok(())
    } else {
        if let Some(parent) = dst.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = sibling_temp_path(dst);
        tokio::fs::copy(src, &tmp).await?;
        tokio::fs::rename(&tmp, dst).await?;
        Ok(())
    }
}

/// Atomic move with backup: if `target` exists, it is renamed to
/// `target.bkp` before `source` is moved onto it; the backup is removed on
/// success and restored on failure. A reader holding `target` open never
/// observes a truncated file.
pub async fn replace(target: &Path, source: &Path) -> Result<(), HarvestError> {
    let backup = backup_path(target);
    let had_target = tokio::fs::metadata(target).await.is_ok();

    if had_target {
        tokio::fs::rename(target, &backup).await?;
    }

    match tokio::fs::rename(source, target).await {
        Ok(()) => {
            if had_target {
                let _ = tokio::fs::remove_file(&backup).await;
            }
            Ok(())
        }
        Err(err) => {
            if had_target {
                // Best effort: restore the prior target so callers see it
                // unchanged, as promised.
                let _ = tokio::fs::rename(&backup, target).await;
            }
            Err(err.into())
        }
    }
}

/// Recursively moves every file from `source` into `target`, creating
/// missing sub-directories. On a name collision, `replace_existing`
/// decides whether the existing file in `target` is overwritten. `source`
/// is deleted on success. Safe to re-run: a partially integrated `source`
/// left over from a crash is completed by a subsequent call.
#[async_recursion::async_recursion]
pub async fn integrate_directory(source: &Path, target: &Path, replace_existing: bool) -> Result<(), HarvestError> {
    if tokio::fs::metadata(source).await.is_err() {
        return Ok(());
    }

    tokio::fs::create_dir_all(target).await?;
    let mut entries = tokio::fs::read_dir(source).await?;
    while let Some(entry) = entries.next_entry().await? {
        let child_source = entry.path();
        let child_target = target.join(entry.file_name());
        let file_type = entry.file_type().await?;

        if file_type.is_dir() {
            integrate_directory(&child_source, &child_target, replace_existing).await?;
        } else {
            let exists = tokio::fs::metadata(&child_target).await.is_ok();
            if exists && !replace_existing {
                continue;
            }
            if let Some(parent) = child_target.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            replace(&child_target, &child_source).await?;
        }
    }

    tokio::fs::remove_dir_all(source).await.or_else(ignore_not_found)?;
    Ok(())
}

fn sibling_temp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let file_name = tmp.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    tmp.set_file_name(format!(".{file_name}.tmp"));
    tmp
}

fn backup_path(path: &Path) -> PathBuf {
    let mut bkp = path.to_path_buf();
    let file_name = bkp.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    bkp.set_file_name(format!("{file_name}.bkp"));
    bkp
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn create_empty_file_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a/b/c.txt");
        create_empty_file(&path).await.unwrap();
        let meta = tokio::fs::metadata(&path).await.unwrap();
        assert_eq!(meta.len(), 0);
    }

    #[tokio::test]
    async fn delete_missing_file_is_ok() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        delete_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn replace_swaps_content_and_removes_backup() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("target.txt");
        let source = dir.path().join("source.txt");
        tokio::fs::write(&target, b"old").await.unwrap();
        tokio::fs::write(&source, b"new").await.unwrap();

        replace(&target, &source).await.unwrap();

        let content = tokio::fs::read(&target).await.unwrap();
        assert_eq!(content, b"new");
        assert!(tokio::fs::metadata(backup_path(&target)).await.is_err());
        assert!(tokio::fs::metadata(&source).await.is_err());
    }

    #[tokio::test]
    async fn integrate_directory_moves_files_and_removes_source() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        tokio::fs::create_dir_all(source.join("nested")).await.unwrap();
        tokio::fs::write(source.join("a.txt"), b"a").await.unwrap();
        tokio::fs::write(source.join("nested/b.txt"), b"b").await.unwrap();

        integrate_directory(&source, &target, true).await.unwrap();

        assert!(tokio::fs::metadata(&source).await.is_err());
        assert_eq!(tokio::fs::read(target.join("a.txt")).await.unwrap(), b"a");
        assert_eq!(tokio::fs::read(target.join("nested/b.txt")).await.unwrap(), b"b");
    }

    #[tokio::test]
    async fn integrate_directory_respects_replace_existing_false() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        tokio::fs::create_dir_all(&source).await.unwrap();
        tokio::fs::create_dir_all(&target).await.unwrap();
        tokio::fs::write(source.join("a.txt"), b"new").await.unwrap();
        tokio::fs::write(target.join("a.txt"), b"old").await.unwrap();

        integrate_directory(&source, &target, false).await.unwrap();

        assert_eq!(tokio::fs::read(target.join("a.txt")).await.unwrap(), b"old");
    }

    #[tokio::test]
    async fn integrate_directory_is_idempotent_when_rerun_on_partial_state() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        tokio::fs::create_dir_all(&source).await.unwrap();
        tokio::fs::write(source.join("a.txt"), b"a").await.unwrap();
        tokio::fs::write(source.join("b.txt"), b"b").await.unwrap();

        integrate_directory(&source, &target, true).await.unwrap();
        // Simulate a second harvest producing an overlapping WIP directory.
        tokio::fs::create_dir_all(&source).await.unwrap();
        tokio::fs::write(source.join("b.txt"), b"b2").await.unwrap();
        integrate_directory(&source, &target, true).await.unwrap();

        assert_eq!(tokio::fs::read(target.join("a.txt")).await.unwrap(), b"a");
        assert_eq!(tokio::fs::read(target.join("b.txt")).await.unwrap(), b"b2");
    }
}
