// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Harvester Cache
//!
//! Joins the Document Versions Cache and Document Changes Cache (§4.3) into
//! one incremental-harvest primitive owned exclusively by a single pipeline
//! (§3's ownership rule: the disk layout is never shared between pipelines).

use std::path::Path;

use harvester_domain::value_objects::{ContentHash, HarvestRange, SourceFingerprint};
use harvester_domain::{Document, HarvestError};

use super::FaceCache;

pub struct HarvesterCache {
    versions: FaceCache,
    changes: FaceCache,
}

impl HarvesterCache {
    /// `root` is this pipeline's exclusive cache directory; `versions` and
    /// `changes` live as its `versions`/`versions_wip` and
    /// `changes`/`changes_wip` children.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            versions: FaceCache::new(root.join("versions")),
            changes: FaceCache::new(root.join("changes")),
        }
    }

    /// Derives the composite fingerprint (`source_fingerprint ⊕ range`) so a
    /// range change invalidates prior output, inits both faces with it, and
    /// primes the Changes WIP partition with an empty marker for every id
    /// already present in the stable Versions face — the "not yet seen this
    /// harvest" bookkeeping that lets a successful harvest later detect
    /// deletions.
    pub async fn init(&self, source_fingerprint: &SourceFingerprint, range: &HarvestRange) -> Result<(), HarvestError> {
        let composite = source_fingerprint.composite_with_range(range);
        self.versions.init(Some(composite.as_str())).await?;
        self.changes.init(Some(composite.as_str())).await?;

        let mut ids = Vec::new();
        self.versions
            .for_each(|id, _payload| {
                ids.push(id.clone());
                true
            })
            .await?;
        for id in ids {
            self.changes.put_file(&id, b"").await?;
        }
        Ok(())
    }

    /// Stages `document` for promotion. Unless `forced`, a document whose
    /// content hash matches what's already stable is skipped (the empty
    /// "not yet seen" marker from `init` is removed instead of being
    /// rewritten, marking it as seen-and-unchanged).
    pub async fn cache_document(&self, document: &Document, forced: bool) -> Result<(), HarvestError> {
        let id = document.document_id();
        let new_hash = document.content_hash()?;

        if !forced {
            if let Some(existing) = self.versions.get_file_content(&id).await? {
                if existing == new_hash.as_str().as_bytes() {
                    self.changes.remove_file(&id).await?;
                    return Ok(());
                }
            }
        }

        self.versions.put_file(&id, new_hash.as_str().as_bytes()).await?;
        self.changes.put_file(&id, &document.canonical_serialize()?).await?;
        Ok(())
    }

    /// Promotes WIP into stable on both faces. On a successful harvest,
    /// zero-length markers are swept first so documents the source no
    /// longer contains are removed from stable; on a failed or aborted
    /// harvest, promotion still happens (whatever was staged is kept) but
    /// nothing is deleted, since an incomplete harvest has no evidence that
    /// an unseen document was actually removed from the source.
    pub async fn apply_changes(&self, harvest_succeeded: bool, harvest_aborted: bool) -> Result<(), HarvestError> {
        if harvest_succeeded && !harvest_aborted {
            self.versions.delete_empty_files().await?;
            self.changes.delete_empty_files().await?;
        }
        self.versions.apply_changes().await?;
        self.changes.apply_changes().await?;
        Ok(())
    }

    /// Discards all staged work. Used when a pipeline's precondition fails
    /// and no harvest actually ran.
    pub async fn skip_all_documents(&self) -> Result<(), HarvestError> {
        self.versions.init(None).await?;
        self.changes.init(None).await?;
        Ok(())
    }

    pub async fn is_outdated(&self) -> Result<bool, HarvestError> {
        self.versions.is_outdated().await
    }

    pub async fn changes_size(&self) -> Result<i64, HarvestError> {
        self.changes.size().await
    }

    pub async fn stable_content_hash(&self, document: &Document) -> Result<Option<ContentHash>, HarvestError> {
        let id = document.document_id();
        Ok(self
            .versions
            .get_file_content(&id)
            .await?
            .map(|bytes| ContentHash::from(String::from_utf8_lossy(&bytes).into_owned())))
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn fingerprint(value: &str) -> SourceFingerprint {
        SourceFingerprint::new(value)
    }

    #[tokio::test]
    async fn successful_harvest_promotes_and_removes_unseen_documents() {
        let dir = tempdir().unwrap();
        let cache = HarvesterCache::new(dir.path());
        let range = HarvestRange::default();

        cache.init(&fingerprint("v1"), &range).await.unwrap();
        let a = Document::new("a", json!({"title": "a"}));
        let b = Document::new("b", json!({"title": "b"}));
        cache.cache_document(&a, false).await.unwrap();
        cache.cache_document(&b, false).await.unwrap();
        cache.apply_changes(true, false).await.unwrap();

        // Second harvest only re-emits `a`; `b` disappeared from the source.
        cache.init(&fingerprint("v2"), &range).await.unwrap();
        cache.cache_document(&a, false).await.unwrap();
        cache.apply_changes(true, false).await.unwrap();

        assert!(cache.stable_content_hash(&a).await.unwrap().is_some());
        assert!(cache.stable_content_hash(&b).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unchanged_document_is_skipped_without_force() {
        let dir = tempdir().unwrap();
        let cache = HarvesterCache::new(dir.path());
        let range = HarvestRange::default();
        let doc = Document::new("a", json!({"title": "a"}));

        cache.init(&fingerprint("v1"), &range).await.unwrap();
        cache.cache_document(&doc, false).await.unwrap();
        cache.apply_changes(true, false).await.unwrap();
        let first_hash = cache.stable_content_hash(&doc).await.unwrap().unwrap();

        cache.init(&fingerprint("v2"), &range).await.unwrap();
        cache.cache_document(&doc, false).await.unwrap();
        assert_eq!(cache.changes_size().await.unwrap(), 0);
        cache.apply_changes(true, false).await.unwrap();

        assert_eq!(cache.stable_content_hash(&doc).await.unwrap().unwrap(), first_hash);
    }

    #[tokio::test]
    async fn failed_harvest_does_not_delete_previously_stable_documents() {
        let dir = tempdir().unwrap();
        let cache = HarvesterCache::new(dir.path());
        let range = HarvestRange::default();
        let a = Document::new("a", json!({"title": "a"}));

        cache.init(&fingerprint("v1"), &range).await.unwrap();
        cache.cache_document(&a, false).await.unwrap();
        cache.apply_changes(true, false).await.unwrap();

        cache.init(&fingerprint("v2"), &range).await.unwrap();
        // `a` not re-emitted this run (source call failed mid-stream).
        cache.apply_changes(false, false).await.unwrap();

        assert!(cache.stable_content_hash(&a).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn range_change_forces_full_resend_semantics() {
        let dir = tempdir().unwrap();
        let cache = HarvesterCache::new(dir.path());
        cache
            .init(&fingerprint("v1"), &HarvestRange::bounded(0, 10).unwrap())
            .await
            .unwrap();
        cache.apply_changes(true, false).await.unwrap();

        assert!(cache
            .init(&fingerprint("v1"), &HarvestRange::bounded(0, 20).unwrap())
            .await
            .is_ok());
        assert!(cache.is_outdated().await.unwrap());
    }
}
