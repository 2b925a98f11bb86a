use crate::candidate::CandidateFile;
use crate::constants::{IMAGE_MIME_PREFIX, MAX_BATCH_FILES, MAX_FILE_SIZE};
use std::fmt;

/// Limits applied to incoming candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    pub max_files: usize,
    pub max_file_size: u64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_files: MAX_BATCH_FILES,
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    NotAnImage,
    TooLarge,
    Duplicate,
    CapacityExceeded,
}

/// One rejected candidate. `Display` yields the user-facing text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub name: String,
    pub reason: RejectionReason,
    max_files: usize,
    max_file_size: u64,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            RejectionReason::NotAnImage => write!(f, "Skipped non-image file: {}", self.name),
            RejectionReason::TooLarge => write!(
                f,
                "Skipped large file: {} (max {}MB)",
                self.name,
                self.max_file_size / (1024 * 1024)
            ),
            RejectionReason::Duplicate => write!(f, "Skipped duplicate file: {}", self.name),
            RejectionReason::CapacityExceeded => {
                write!(f, "Maximum {} files allowed", self.max_files)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub accepted: Vec<CandidateFile>,
    pub rejections: Vec<Rejection>,
}

impl ValidationReport {
    /// True when candidates were offered but none made it through.
    pub fn nothing_accepted(&self) -> bool {
        self.accepted.is_empty() && !self.rejections.is_empty()
    }
}

/// Checks a single candidate against the batch as it stands right now.
fn check(
    candidate: &CandidateFile,
    batch: &[CandidateFile],
    limits: &ValidationLimits,
) -> Option<RejectionReason> {
    if !candidate.mime_type().starts_with(IMAGE_MIME_PREFIX) {
        return Some(RejectionReason::NotAnImage);
    }
    if candidate.size() > limits.max_file_size {
        return Some(RejectionReason::TooLarge);
    }
    if batch.iter().any(|existing| existing.is_same_file(candidate)) {
        return Some(RejectionReason::Duplicate);
    }
    if batch.len() >= limits.max_files {
        return Some(RejectionReason::CapacityExceeded);
    }
    None
}

/// Filters `candidates` in input order. Every accepted candidate counts
/// towards the duplicate and capacity checks of the ones after it, so the
/// result never pushes `existing` past `limits.max_files`.
pub fn validate(
    candidates: impl IntoIterator<Item = CandidateFile>,
    existing: &[CandidateFile],
    limits: &ValidationLimits,
) -> ValidationReport {
    let mut staged: Vec<CandidateFile> = existing.to_vec();
    let mut report = ValidationReport::default();

    for candidate in candidates {
        match check(&candidate, &staged, limits) {
            None => {
                tracing::debug!(name = candidate.name(), "accepted candidate");
                staged.push(candidate.clone());
                report.accepted.push(candidate);
            }
            Some(reason) => {
                tracing::debug!(name = candidate.name(), ?reason, "rejected candidate");
                report.rejections.push(Rejection {
                    name: candidate.name().to_string(),
                    reason,
                    max_files: limits.max_files,
                    max_file_size: limits.max_file_size,
                });
            }
        }
    }

    report
}
