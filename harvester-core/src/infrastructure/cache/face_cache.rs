// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Document Face Cache
//!
//! Shared implementation behind the Document Versions Cache and Document
//! Changes Cache (§4.3): a persistent, two-partition (work-in-progress /
//! stable) map from document-id to an opaque payload, fanned out two
//! characters deep on disk. The two caches differ only in what they store
//! as `payload` — a short content hash for versions, a full serialized body
//! for changes — so both are this same type parameterized by nothing more
//! than a directory name.

use std::path::{Path, PathBuf};

use harvester_domain::value_objects::DocumentId;
use harvester_domain::HarvestError;

use crate::infrastructure::disk;

const SOURCE_MARKER: &str = "_source";

/// One face (`versions` or `changes`) of the harvester cache, rooted at a
/// directory that owns a `<root>_wip` work-in-progress partition and a
/// `<root>` stable partition.
pub struct FaceCache {
    stable_root: PathBuf,
    wip_root: PathBuf,
}

impl FaceCache {
    /// `root` is the stable partition's directory; the WIP partition lives
    /// as a sibling suffixed `_wip`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let stable_root = root.into();
        let wip_root = sibling_wip(&stable_root);
        Self { stable_root, wip_root }
    }

    /// Empties the WIP partition and writes `source_fingerprint` into its
    /// `_source` marker, if given. The stable partition is untouched.
    pub async fn init(&self, source_fingerprint: Option<&str>) -> Result<(), HarvestError> {
        disk::delete_file(&self.wip_root).await?;
        tokio::fs::create_dir_all(&self.wip_root).await?;
        if let Some(fingerprint) = source_fingerprint {
            tokio::fs::write(self.wip_root.join(SOURCE_MARKER), fingerprint.as_bytes()).await?;
        }
        Ok(())
    }

    /// Writes `payload` for `id` into the WIP partition. A later call for
    /// the same id within one harvest overwrites the earlier one.
    pub async fn put_file(&self, id: &DocumentId, payload: &[u8]) -> Result<(), HarvestError> {
        let path = self.entry_path(&self.wip_root, id);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, payload).await?;
        Ok(())
    }

    /// Deletes the WIP entry for `id`. Idempotent.
    pub async fn remove_file(&self, id: &DocumentId) -> Result<(), HarvestError> {
        disk::delete_file(&self.entry_path(&self.wip_root, id)).await
    }

    /// Reads `id`'s payload from the **stable** partition only.
    pub async fn get_file_content(&self, id: &DocumentId) -> Result<Option<Vec<u8>>, HarvestError> {
        match tokio::fs::read(self.entry_path(&self.stable_root, id)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Count of WIP entries (excludes the `_source` marker).
    pub async fn size(&self) -> Result<i64, HarvestError> {
        Ok(self.list_entries(&self.wip_root).await?.len() as i64)
    }

    /// Visits every (id, payload) pair in the **stable** partition. `visitor`
    /// returning `false` stops iteration early; that return value propagates.
    pub async fn for_each<F>(&self, mut visitor: F) -> Result<bool, HarvestError>
    where
        F: FnMut(&DocumentId, &[u8]) -> bool,
    {
        for (id, path) in self.list_entries(&self.stable_root).await? {
            let payload = tokio::fs::read(&path).await?;
            if !visitor(&id, &payload) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Atomically promotes every WIP entry into the stable partition.
    /// Idempotent: running it twice with no intervening writes is a no-op
    /// the second time.
    pub async fn apply_changes(&self) -> Result<(), HarvestError> {
        disk::integrate_directory(&self.wip_root, &self.stable_root, true).await
    }

    /// For every zero-length WIP entry, deletes the corresponding stable
    /// entry (and the WIP marker itself): a zero-length WIP write encodes
    /// "this document is gone from the source".
    pub async fn delete_empty_files(&self) -> Result<(), HarvestError> {
        for (id, path) in self.list_entries(&self.wip_root).await? {
            let meta = tokio::fs::metadata(&path).await?;
            if meta.len() == 0 {
                disk::delete_file(&self.entry_path(&self.stable_root, &id)).await?;
                disk::delete_file(&path).await?;
            }
        }
        Ok(())
    }

    /// True iff the stable `_source` marker is absent or differs from the
    /// WIP one (an absent stable marker counts as "differs").
    pub async fn is_outdated(&self) -> Result<bool, HarvestError> {
        let stable = tokio::fs::read_to_string(self.stable_root.join(SOURCE_MARKER)).await.ok();
        let wip = tokio::fs::read_to_string(self.wip_root.join(SOURCE_MARKER)).await.ok();
        Ok(stable != wip)
    }

    fn entry_path(&self, root: &Path, id: &DocumentId) -> PathBuf {
        root.join(id.fan_out_prefix()).join(id.fan_out_rest())
    }

    async fn list_entries(&self, root: &Path) -> Result<Vec<(DocumentId, PathBuf)>, HarvestError> {
        let mut out = Vec::new();
        let mut top = match tokio::fs::read_dir(root).await {
            Ok(rd) => rd,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(out),
            Err(err) => return Err(err.into()),
        };
        while let Some(prefix_entry) = top.next_entry().await? {
            if !prefix_entry.file_type().await?.is_dir() {
                continue;
            }
            let prefix = prefix_entry.file_name().to_string_lossy().to_string();
            let mut inner = tokio::fs::read_dir(prefix_entry.path()).await?;
            while let Some(file_entry) = inner.next_entry().await? {
                let rest = file_entry.file_name().to_string_lossy().to_string();
                if let Ok(id) = DocumentId::parse(&format!("{prefix}{rest}")) {
                    out.push((id, file_entry.path()));
                }
            }
        }
        Ok(out)
    }
}

fn sibling_wip(stable_root: &Path) -> PathBuf {
    let mut wip = stable_root.to_path_buf();
    let file_name = wip.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    wip.set_file_name(format!("{file_name}_wip"));
    wip
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn doc_id(seed: u8) -> DocumentId {
        DocumentId::from_source_id(&format!("source-{seed}"))
    }

    #[tokio::test]
    async fn put_then_promote_is_visible_in_stable_only_after_apply() {
        let dir = tempdir().unwrap();
        let cache = FaceCache::new(dir.path().join("versions"));
        cache.init(Some("fp-1")).await.unwrap();
        let id = doc_id(1);
        cache.put_file(&id, b"hash-a").await.unwrap();

        assert!(cache.get_file_content(&id).await.unwrap().is_none());

        cache.apply_changes().await.unwrap();

        assert_eq!(cache.get_file_content(&id).await.unwrap().unwrap(), b"hash-a");
    }

    #[tokio::test]
    async fn reapplying_with_no_new_writes_is_idempotent() {
        let dir = tempdir().unwrap();
        let cache = FaceCache::new(dir.path().join("versions"));
        cache.init(Some("fp-1")).await.unwrap();
        let id = doc_id(1);
        cache.put_file(&id, b"hash-a").await.unwrap();
        cache.apply_changes().await.unwrap();
        cache.apply_changes().await.unwrap();

        assert_eq!(cache.get_file_content(&id).await.unwrap().unwrap(), b"hash-a");
    }

    #[tokio::test]
    async fn delete_empty_files_removes_stable_entry() {
        let dir = tempdir().unwrap();
        let cache = FaceCache::new(dir.path().join("changes"));
        cache.init(Some("fp-1")).await.unwrap();
        let id = doc_id(1);
        cache.put_file(&id, b"{}").await.unwrap();
        cache.apply_changes().await.unwrap();
        assert!(cache.get_file_content(&id).await.unwrap().is_some());

        cache.init(Some("fp-2")).await.unwrap();
        cache.put_file(&id, b"").await.unwrap();
        cache.delete_empty_files().await.unwrap();
        cache.apply_changes().await.unwrap();

        assert!(cache.get_file_content(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn is_outdated_when_stable_marker_absent() {
        let dir = tempdir().unwrap();
        let cache = FaceCache::new(dir.path().join("versions"));
        cache.init(Some("fp-1")).await.unwrap();
        assert!(cache.is_outdated().await.unwrap());
    }

    #[tokio::test]
    async fn not_outdated_once_fingerprint_matches_stable() {
        let dir = tempdir().unwrap();
        let cache = FaceCache::new(dir.path().join("versions"));
        cache.init(Some("fp-1")).await.unwrap();
        cache.apply_changes().await.unwrap();
        cache.init(Some("fp-1")).await.unwrap();

        assert!(!cache.is_outdated().await.unwrap());
    }

    #[tokio::test]
    async fn size_counts_wip_entries() {
        let dir = tempdir().unwrap();
        let cache = FaceCache::new(dir.path().join("changes"));
        cache.init(None).await.unwrap();
        cache.put_file(&doc_id(1), b"a").await.unwrap();
        cache.put_file(&doc_id(2), b"b").await.unwrap();

        assert_eq!(cache.size().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn for_each_visits_stable_entries_and_honors_early_exit() {
        let dir = tempdir().unwrap();
        let cache = FaceCache::new(dir.path().join("versions"));
        cache.init(None).await.unwrap();
        cache.put_file(&doc_id(1), b"a").await.unwrap();
        cache.put_file(&doc_id(2), b"b").await.unwrap();
        cache.apply_changes().await.unwrap();

        let mut seen = 0;
        let completed = cache
            .for_each(|_id, _payload| {
                seen += 1;
                seen < 1
            })
            .await
            .unwrap();

        assert!(!completed);
        assert_eq!(seen, 1);
    }
}
