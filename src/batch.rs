//! Batch processing of redaction items.
//!
//! Items are processed strictly one at a time: a single multi-page
//! raster document can be large when fully materialized, and sequential
//! processing bounds peak memory. One item's failure never aborts the
//! batch; every failure is caught at this boundary, logged with the
//! item's identity, and recorded in the report.

use crate::engine::RedactionEngine;
use crate::error::{Error, Result};
use crate::storage::ObjectStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One document to redact, by storage key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionItem {
    /// Key of the original document
    pub document_key: String,

    /// Key of its layout analysis JSON
    pub layout_key: String,

    /// Key of its entity analysis JSON
    pub entities_key: String,

    /// Workflow/document identifier, for logging and correlation
    pub document_id: String,

    /// When true, the original document is kept in storage even after a
    /// successful redaction
    #[serde(default)]
    pub retain_original: bool,
}

/// Outcome of one batch item.
#[derive(Debug, Clone, Serialize)]
pub struct ItemOutcome {
    /// Correlation identifier from the item
    pub document_id: String,

    /// Key of the original document
    pub document_key: String,

    /// What happened
    pub status: ItemStatus,
}

/// Terminal status of one batch item.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemStatus {
    /// Redacted output uploaded
    Redacted {
        /// Pages in the output document
        pages: u32,
        /// Redaction marks drawn
        marks: usize,
        /// Key the output was uploaded under
        output_key: String,
    },
    /// Item failed; the original document was left untouched
    Failed {
        /// Failure description, for external retry
        error: String,
    },
}

/// Report for one batch invocation.
///
/// Partial failure is an explicit return value: a batch with failed
/// items still completes, and callers inspect the outcomes rather than
/// catching anything.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// When processing started
    pub started: DateTime<Utc>,

    /// When the last item finished
    pub finished: DateTime<Utc>,

    /// Per-item outcomes, in input order
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    /// Number of items that produced an uploaded redacted document.
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, ItemStatus::Redacted { .. }))
            .count()
    }

    /// Number of items that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Whether every item succeeded.
    pub fn is_complete_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Sequences redaction across a list of items.
pub struct BatchProcessor<'a> {
    store: &'a dyn ObjectStore,
    engine: RedactionEngine,
}

impl<'a> BatchProcessor<'a> {
    /// Create a processor over the given store with a default engine.
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self {
            store,
            engine: RedactionEngine::new(),
        }
    }

    /// Create a processor with a configured engine.
    pub fn with_engine(store: &'a dyn ObjectStore, engine: RedactionEngine) -> Self {
        Self { store, engine }
    }

    /// Process every item, strictly sequentially.
    ///
    /// Returns `Err` only when the batch input itself is structurally
    /// invalid; per-item failures are reported, not raised.
    pub fn process(&self, items: &[RedactionItem]) -> Result<BatchReport> {
        validate_items(items)?;

        let started = Utc::now();
        let mut outcomes = Vec::with_capacity(items.len());

        for item in items {
            log::info!(
                "Processing document '{}' ({})",
                item.document_id,
                item.document_key
            );

            let status = match self.process_item(item) {
                Ok(status) => status,
                Err(e) => {
                    log::error!(
                        "Redaction failed for document '{}' ({}): {}",
                        item.document_id,
                        item.document_key,
                        e
                    );
                    ItemStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };

            outcomes.push(ItemOutcome {
                document_id: item.document_id.clone(),
                document_key: item.document_key.clone(),
                status,
            });
        }

        let report = BatchReport {
            started,
            finished: Utc::now(),
            outcomes,
        };
        log::info!(
            "Batch complete: {} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        );
        Ok(report)
    }

    /// Run one item end to end: fetch, redact, upload, clean up.
    fn process_item(&self, item: &RedactionItem) -> Result<ItemStatus> {
        let layout = self.store.get(&item.layout_key)?;
        let entities = self.store.get(&item.entities_key)?;
        let original = self.store.get(&item.document_key)?;

        let scratch = tempfile::tempdir()?;
        let original_path = scratch.path().join(object_file_name(&item.document_key));
        let redacted_path = redacted_file_name(&original_path);
        fs::write(&original_path, &original)?;

        let outcome = self.redact_and_upload(item, &layout, &entities, &original_path, &redacted_path);

        // Working copies are removed on every exit path; removal failures
        // are logged and never change the outcome. The scratch directory
        // itself is removed when `scratch` drops.
        clean_up(&[&original_path, &redacted_path]);

        let status = outcome?;

        if item.retain_original {
            log::debug!(
                "Retaining original document '{}' per item flag",
                item.document_key
            );
        } else if let Err(e) = self.store.delete(&item.document_key) {
            log::error!(
                "{}",
                Error::Cleanup(format!(
                    "failed to delete original '{}': {}",
                    item.document_key, e
                ))
            );
        }

        Ok(status)
    }

    fn redact_and_upload(
        &self,
        item: &RedactionItem,
        layout: &[u8],
        entities: &[u8],
        original_path: &Path,
        redacted_path: &Path,
    ) -> Result<ItemStatus> {
        let bytes = fs::read(original_path)?;
        let redacted = self.engine.redact(&bytes, layout, entities)?;
        fs::write(redacted_path, &redacted.bytes)?;

        let output_key = redacted_object_key(&item.document_key);
        let upload = fs::read(redacted_path)?;
        self.store.put(&output_key, &upload, redacted.mime_type)?;

        log::info!(
            "Uploaded redacted document '{}' as '{}' ({} page(s), {} mark(s))",
            item.document_id,
            output_key,
            redacted.page_count,
            redacted.marks_applied
        );

        Ok(ItemStatus::Redacted {
            pages: redacted.page_count,
            marks: redacted.marks_applied,
            output_key,
        })
    }
}

/// Reject structurally invalid batch input.
fn validate_items(items: &[RedactionItem]) -> Result<()> {
    if items.is_empty() {
        return Err(Error::InvalidBatch("batch contains no items".into()));
    }

    for (idx, item) in items.iter().enumerate() {
        for (field, value) in [
            ("document_key", &item.document_key),
            ("layout_key", &item.layout_key),
            ("entities_key", &item.entities_key),
        ] {
            if value.trim().is_empty() {
                return Err(Error::InvalidBatch(format!(
                    "item {}: field '{}' is blank",
                    idx, field
                )));
            }
        }
    }

    Ok(())
}

/// Remove local working files, logging failures without raising.
fn clean_up(paths: &[&Path]) {
    for path in paths {
        if !path.is_file() {
            continue;
        }
        match fs::remove_file(path) {
            Ok(()) => log::debug!("Removed working file {}", path.display()),
            Err(e) => log::error!(
                "{}",
                Error::Cleanup(format!("failed to remove '{}': {}", path.display(), e))
            ),
        }
    }
}

/// Basename of an object key.
fn object_file_name(key: &str) -> String {
    key.rsplit('/').next().unwrap_or(key).to_string()
}

/// Working path for the redacted copy: `name.ext` → `name-redacted.ext`.
fn redacted_file_name(original: &Path) -> PathBuf {
    let stem = original
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let name = match original.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}-redacted.{}", stem, ext),
        None => format!("{}-redacted", stem),
    };
    original.with_file_name(name)
}

/// Output key for a redacted document: the `orig-doc` path segment
/// becomes `redacted-doc`. Keys without that segment get a
/// `redacted-doc` directory in front of the basename, so the original
/// is never overwritten.
fn redacted_object_key(document_key: &str) -> String {
    let (dir, name) = match document_key.rsplit_once('/') {
        Some((dir, name)) => (dir, name),
        None => ("", document_key),
    };

    if dir.split('/').any(|seg| seg == "orig-doc") {
        let replaced: Vec<&str> = dir
            .split('/')
            .map(|seg| if seg == "orig-doc" { "redacted-doc" } else { seg })
            .collect();
        format!("{}/{}", replaced.join("/"), name)
    } else if dir.is_empty() {
        format!("redacted-doc/{}", name)
    } else {
        format!("{}/redacted-doc/{}", dir, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_object_key_replaces_segment() {
        assert_eq!(
            redacted_object_key("wf1/orig-doc/scan.pdf"),
            "wf1/redacted-doc/scan.pdf"
        );
        assert_eq!(
            redacted_object_key("public/a/orig-doc/b/scan.tiff"),
            "public/a/redacted-doc/b/scan.tiff"
        );
    }

    #[test]
    fn test_redacted_object_key_never_overwrites_original() {
        assert_eq!(redacted_object_key("scan.pdf"), "redacted-doc/scan.pdf");
        assert_eq!(
            redacted_object_key("uploads/scan.pdf"),
            "uploads/redacted-doc/scan.pdf"
        );
    }

    #[test]
    fn test_redacted_file_name() {
        assert_eq!(
            redacted_file_name(Path::new("/tmp/x/scan.pdf")),
            Path::new("/tmp/x/scan-redacted.pdf")
        );
        assert_eq!(
            redacted_file_name(Path::new("/tmp/x/scan")),
            Path::new("/tmp/x/scan-redacted")
        );
    }

    #[test]
    fn test_object_file_name() {
        assert_eq!(object_file_name("a/b/c.png"), "c.png");
        assert_eq!(object_file_name("c.png"), "c.png");
    }

    #[test]
    fn test_validate_rejects_empty_batch() {
        assert!(matches!(
            validate_items(&[]),
            Err(Error::InvalidBatch(_))
        ));
    }

    #[test]
    fn test_validate_rejects_blank_keys() {
        let item = RedactionItem {
            document_key: "doc.png".into(),
            layout_key: "  ".into(),
            entities_key: "e.json".into(),
            document_id: "wf-1".into(),
            retain_original: false,
        };
        assert!(matches!(
            validate_items(&[item]),
            Err(Error::InvalidBatch(_))
        ));
    }

    #[test]
    fn test_clean_up_removes_working_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("scan.png");
        let b = dir.path().join("scan-redacted.png");
        fs::write(&a, b"x").unwrap();
        fs::write(&b, b"y").unwrap();

        clean_up(&[&a, &b]);
        assert!(!a.exists());
        assert!(!b.exists());

        // Missing files are not an error.
        clean_up(&[&a, &b]);
    }

    #[test]
    fn test_item_deserializes_without_retain_flag() {
        let item: RedactionItem = serde_json::from_str(
            r#"{"document_key": "d", "layout_key": "l", "entities_key": "e", "document_id": "w"}"#,
        )
        .unwrap();
        assert!(!item.retain_original);
    }
}
