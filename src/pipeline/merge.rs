//! Size-bounded merge: concatenate tiled documents into numbered parts.
//!
//! Grouping is greedy, single pass and order-preserving. A document joins the
//! running group unless that would push the group past the threshold, in which
//! case the running group is flushed first. A document that is oversized on
//! its own still lands in a group by itself; documents are never split.
//!
//! Planning ([`plan_merge_groups`]) works on sizes only and is separate from
//! writing ([`merge_by_size`]) so the grouping rules can be exercised without
//! touching pdfium.

use crate::error::PdfGridError;
use crate::output::MergedFile;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A document queued for merging, with the size checked against the threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizedDocument {
    pub path: PathBuf,
    pub bytes: u64,
}

/// An ordered run of documents that will be written as one part.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergeGroup {
    pub documents: Vec<SizedDocument>,
    pub total_bytes: u64,
}

impl MergeGroup {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.documents.iter().map(|d| d.path.clone()).collect()
    }
}

/// Running state of the greedy grouping.
///
/// [`push`](Self::push) and [`finish`](Self::finish) both hand out groups
/// through the same `flush`, so a threshold-triggered group and the trailing
/// group are built identically.
#[derive(Debug)]
pub struct GroupAccumulator {
    threshold: u64,
    current: MergeGroup,
}

impl GroupAccumulator {
    pub fn new(threshold: u64) -> Self {
        Self {
            threshold,
            current: MergeGroup::default(),
        }
    }

    /// Add a document; returns the previous group if it had to be flushed.
    pub fn push(&mut self, doc: SizedDocument) -> Option<MergeGroup> {
        let flushed = if self.current.total_bytes.saturating_add(doc.bytes) > self.threshold
            && !self.current.is_empty()
        {
            self.flush()
        } else {
            None
        };

        self.current.total_bytes = self.current.total_bytes.saturating_add(doc.bytes);
        self.current.documents.push(doc);
        flushed
    }

    /// Flush whatever is left at the end of input.
    pub fn finish(mut self) -> Option<MergeGroup> {
        self.flush()
    }

    fn flush(&mut self) -> Option<MergeGroup> {
        if self.current.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.current))
    }
}

/// Split `documents` into merge groups under `threshold` bytes, keeping order.
pub fn plan_merge_groups(documents: Vec<SizedDocument>, threshold: u64) -> Vec<MergeGroup> {
    let mut acc = GroupAccumulator::new(threshold);
    let mut groups = Vec::new();
    for doc in documents {
        groups.extend(acc.push(doc));
    }
    groups.extend(acc.finish());
    groups
}

/// Output file name for the `index`-th part: `merged_part000.pdf`, …
pub fn part_file_name(index: usize) -> String {
    format!("merged_part{:03}.pdf", index)
}

/// Merge `tiled_paths` into `merge_dir` in parts of at most `threshold` bytes.
///
/// Sizes are read from disk. `on_written` is called after each part lands.
pub fn merge_by_size(
    pdfium: &Pdfium,
    tiled_paths: &[PathBuf],
    merge_dir: &Path,
    threshold: u64,
    mut on_written: impl FnMut(&MergedFile),
) -> Result<Vec<MergedFile>, PdfGridError> {
    std::fs::create_dir_all(merge_dir).map_err(|e| PdfGridError::OutputWriteFailed {
        path: merge_dir.to_path_buf(),
        source: e,
    })?;

    let sized = tiled_paths
        .iter()
        .map(|p| {
            Ok(SizedDocument {
                path: p.clone(),
                bytes: file_size(p)?,
            })
        })
        .collect::<Result<Vec<_>, PdfGridError>>()?;

    let groups = plan_merge_groups(sized, threshold);
    info!(
        "Merging {} documents into {} parts (threshold {} bytes)",
        tiled_paths.len(),
        groups.len(),
        threshold
    );

    let mut written = Vec::with_capacity(groups.len());
    for (index, group) in groups.into_iter().enumerate() {
        let out_path = merge_dir.join(part_file_name(index));
        let members = group.paths();
        concatenate(pdfium, &members, &out_path)?;

        let merged = MergedFile {
            bytes: file_size(&out_path)?,
            path: out_path,
            members,
            input_bytes: group.total_bytes,
        };
        on_written(&merged);
        written.push(merged);
    }

    Ok(written)
}

/// Concatenate `sources` page by page into a new PDF at `output`.
///
/// The document is saved to `<output>.tmp` and renamed into place, so an
/// interrupted run never leaves a truncated part behind.
pub fn concatenate(pdfium: &Pdfium, sources: &[PathBuf], output: &Path) -> Result<(), PdfGridError> {
    let failed = |detail: String| PdfGridError::MergeFailed {
        path: output.to_path_buf(),
        detail,
    };

    let mut merged = pdfium
        .create_new_pdf()
        .map_err(|e| failed(format!("{:?}", e)))?;

    for source in sources {
        let document = pdfium
            .load_pdf_from_file(source, None)
            .map_err(|e| failed(format!("cannot open '{}': {:?}", source.display(), e)))?;
        merged
            .pages_mut()
            .append(&document)
            .map_err(|e| failed(format!("cannot append '{}': {:?}", source.display(), e)))?;
        debug!("Appended {} → {}", source.display(), output.display());
    }

    let tmp_path = tmp_path_for(output);
    merged
        .save_to_file(&tmp_path)
        .map_err(|e| failed(format!("{:?}", e)))?;
    std::fs::rename(&tmp_path, output).map_err(|e| PdfGridError::OutputWriteFailed {
        path: output.to_path_buf(),
        source: e,
    })?;

    info!("Wrote {} ({} documents)", output.display(), sources.len());
    Ok(())
}

fn tmp_path_for(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn file_size(path: &Path) -> Result<u64, PdfGridError> {
    std::fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| PdfGridError::from_io(path, e))
}
