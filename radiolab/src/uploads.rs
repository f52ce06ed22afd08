use itertools::Itertools;
use std::fs;
use std::path::{Path, PathBuf};

/// A file selected for upload whose type the backend accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub path: PathBuf,
    pub file_name: String,
    pub content_type: &'static str,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub accepted: Vec<UploadCandidate>,
    pub rejected: Vec<RejectedFile>,
}

/// Content type for radiograph files: common image formats and DICOM.
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let content_type = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "dcm" => "application/dicom",
        _ => return None,
    };
    Some(content_type)
}

/// Expands a leading `~/` to the home directory.
pub fn expand_path(raw: &str) -> PathBuf {
    let raw = raw.trim();
    match (raw.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(raw),
    }
}

/// Resolves a typed path into accepted and rejected files. Directories contribute
/// their direct children, sorted by name.
pub fn scan(raw: &str) -> Selection {
    let path = expand_path(raw);
    let mut selection = Selection::default();

    let metadata = match fs::metadata(&path) {
        Ok(metadata) => metadata,
        Err(e) => {
            selection.rejected.push(RejectedFile {
                path,
                reason: e.to_string(),
            });
            return selection;
        }
    };

    if metadata.is_dir() {
        let entries = match fs::read_dir(&path) {
            Ok(entries) => entries,
            Err(e) => {
                selection.rejected.push(RejectedFile {
                    path,
                    reason: e.to_string(),
                });
                return selection;
            }
        };
        let files = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.is_file())
            .sorted();
        for file in files {
            classify(file, &mut selection);
        }
    } else {
        classify(path, &mut selection);
    }

    tracing::debug!(
        "Scanned {}: {} accepted, {} rejected",
        raw.trim(),
        selection.accepted.len(),
        selection.rejected.len()
    );
    selection
}

fn classify(path: PathBuf, selection: &mut Selection) {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match content_type_for(&path) {
        Some(content_type) => {
            let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            selection.accepted.push(UploadCandidate {
                path,
                file_name,
                content_type,
                size,
            });
        }
        None => selection.rejected.push(RejectedFile {
            path,
            reason: "not an image or DICOM file".to_string(),
        }),
    }
}

impl Selection {
    /// Adds `other`, skipping files that are already selected.
    pub fn merge(&mut self, other: Selection) {
        for candidate in other.accepted {
            if !self.accepted.iter().any(|c| c.path == candidate.path) {
                self.accepted.push(candidate);
            }
        }
        self.rejected.extend(other.rejected);
    }

    pub fn total_size(&self) -> u64 {
        self.accepted.iter().map(|c| c.size).sum()
    }

    pub fn rejected_names(&self) -> String {
        self.rejected
            .iter()
            .map(|r| {
                r.path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| r.path.display().to_string())
            })
            .join(", ")
    }
}
