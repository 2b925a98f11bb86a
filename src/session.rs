use crate::archive::{build_archive, Bundle};
use crate::candidate::CandidateFile;
use crate::constants::{
    ARCHIVE_ERROR_MESSAGE, BATCH_SUCCESS_MESSAGE, MAX_DIMENSION, MESSAGE_TTL,
    NO_VALID_IMAGES_MESSAGE, PROGRESS_HIDE_DELAY, STAGGER_INTERVAL,
};
use crate::error::{CompressionError, Result};
use crate::messages::MessageBoard;
use crate::processing::{compress, CompressedArtifact, CompressionOptions};
use crate::progress::{BatchProgress, EventSink, NullSink, ProgressAction, SessionEvent};
use crate::references::{ArtifactRef, ReferenceStore};
use crate::validation::{validate, ValidationLimits, ValidationReport};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinSet;

/// Runtime knobs for a [`Session`]. Defaults come from `constants`.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub limits: ValidationLimits,
    pub max_dimension: u32,
    pub stagger: Duration,
    pub hide_delay: Duration,
    pub message_ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            limits: ValidationLimits::default(),
            max_dimension: MAX_DIMENSION,
            stagger: STAGGER_INTERVAL,
            hide_delay: PROGRESS_HIDE_DELAY,
            message_ttl: MESSAGE_TTL,
        }
    }
}

impl SessionConfig {
    pub fn with_limits(mut self, limits: ValidationLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    pub fn with_hide_delay(mut self, hide_delay: Duration) -> Self {
        self.hide_delay = hide_delay;
        self
    }

    pub fn with_message_ttl(mut self, message_ttl: Duration) -> Self {
        self.message_ttl = message_ttl;
        self
    }

    /// No stagger and no hide delay.
    pub fn immediate() -> Self {
        Self::default()
            .with_stagger(Duration::ZERO)
            .with_hide_delay(Duration::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub index: Option<usize>,
    pub name: String,
    pub reason: String,
}

/// Outcome of one [`Session::run_batch`] call.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub completed: usize,
    pub succeeded: usize,
    pub failures: Vec<FileFailure>,
    pub original_bytes: u64,
    pub compressed_bytes: u64,
    /// The session was cleared while the run was in flight; its results
    /// were dropped.
    pub discarded: bool,
}

impl BatchSummary {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// References created by one run's tasks. Once closed, a task that finishes
/// late revokes its own reference instead of recording it.
#[derive(Default)]
struct IssuedRefs {
    refs: Vec<ArtifactRef>,
    closed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunPhase {
    Compressing,
    Hiding,
    Done,
}

/// Puts the session back in order when a `run_batch` future is dropped
/// before it finishes. Also owns the delayed progress hide.
struct RunGuard<'a> {
    session: &'a Session,
    generation: u64,
    issued: Arc<Mutex<IssuedRefs>>,
    phase: RunPhase,
}

impl RunGuard<'_> {
    fn is_current(&self, state: &SessionState) -> bool {
        state.generation == self.generation
    }

    /// Hides the final progress unless a clear or a newer run got there first.
    fn hide_progress(&mut self) {
        self.phase = RunPhase::Done;
        let mut state = self.session.state();
        if !self.is_current(&state) || state.progress.is_none() {
            return;
        }
        state.progress = None;
        drop(state);
        self.session.emit(SessionEvent::ProgressHidden);
    }

    fn abandon(&mut self) {
        self.phase = RunPhase::Done;
        let issued = {
            let mut issued = self.issued.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            issued.closed = true;
            std::mem::take(&mut issued.refs)
        };
        self.session.references.revoke_all(&issued);

        let mut state = self.session.state();
        if !self.is_current(&state) {
            return;
        }
        state.artifacts.clear();
        state.progress = None;
        state.running = false;
        drop(state);

        tracing::warn!(revoked = issued.len(), "batch dropped before completion");
        self.session.emit(SessionEvent::ProgressHidden);
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        match self.phase {
            RunPhase::Compressing => self.abandon(),
            RunPhase::Hiding => self.hide_progress(),
            RunPhase::Done => {}
        }
    }
}

struct SessionState {
    batch: Vec<CandidateFile>,
    artifacts: Vec<CompressedArtifact>,
    progress: Option<BatchProgress>,
    messages: MessageBoard,
    batch_download_enabled: bool,
    running: bool,
    generation: u64,
}

/// Owns the accepted batch, the artifact set and the progress state behind a
/// single lock. Only the batch runner touches artifacts and progress; only
/// add/remove/clear touch the batch.
pub struct Session {
    config: SessionConfig,
    state: Mutex<SessionState>,
    references: ReferenceStore,
    sink: Arc<dyn EventSink>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default(), Arc::new(NullSink))
    }
}

impl Session {
    pub fn new(config: SessionConfig, sink: Arc<dyn EventSink>) -> Self {
        let messages = MessageBoard::new(config.message_ttl);
        Self {
            config,
            state: Mutex::new(SessionState {
                batch: Vec::new(),
                artifacts: Vec::new(),
                progress: None,
                messages,
                batch_download_enabled: false,
                running: false,
                generation: 0,
            }),
            references: ReferenceStore::new(),
            sink,
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, event: SessionEvent) {
        self.sink.on_event(event);
    }

    fn post_error(&self, state: &mut SessionState, text: String) {
        tracing::warn!("{}", text);
        state.messages.show_error(text.clone());
        self.emit(SessionEvent::Error(text));
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Validates `candidates` and appends the accepted ones. Picker and
    /// drag-drop selections both come through here.
    pub fn add_files(&self, candidates: Vec<CandidateFile>) -> ValidationReport {
        let offered = candidates.len();
        let mut state = self.state();
        let report = validate(candidates, &state.batch, &self.config.limits);

        if report.accepted.is_empty() {
            if offered > 0 {
                self.post_error(&mut state, NO_VALID_IMAGES_MESSAGE.to_string());
            }
            return report;
        }

        state.messages.clear();
        for rejection in &report.rejections {
            self.post_error(&mut state, rejection.to_string());
        }
        state.batch.extend(report.accepted.iter().cloned());
        tracing::info!(
            accepted = report.accepted.len(),
            rejected = report.rejections.len(),
            batch = state.batch.len(),
            "files added"
        );

        report
    }

    /// Removes the file at `index`, along with its artifact if one exists.
    /// Removing the last file clears the session. Not allowed mid-run since
    /// in-flight results are keyed by position.
    pub fn remove_file(&self, index: usize) -> Result<CandidateFile> {
        let (removed, now_empty) = {
            let mut state = self.state();
            if state.running {
                return Err(CompressionError::BatchInProgress);
            }
            if index >= state.batch.len() {
                return Err(CompressionError::IndexOutOfRange(index));
            }
            let removed = state.batch.remove(index);

            let mut revoked = Vec::new();
            state.artifacts.retain(|artifact| {
                if artifact.index == index {
                    revoked.push(artifact.reference.clone());
                    false
                } else {
                    true
                }
            });
            for artifact in state.artifacts.iter_mut().filter(|a| a.index > index) {
                artifact.index -= 1;
            }
            self.references.revoke_all(&revoked);
            if state.artifacts.is_empty() {
                state.batch_download_enabled = false;
            }

            (removed, state.batch.is_empty())
        };

        if now_empty {
            self.clear();
        }
        Ok(removed)
    }

    /// Empties the batch and artifact set and revokes every reference. A run
    /// that is still in flight keeps going but its results are dropped.
    pub fn clear(&self) {
        let mut state = self.state();
        self.references
            .revoke_all(state.artifacts.iter().map(|a| &a.reference));
        state.batch.clear();
        state.artifacts.clear();
        state.progress = None;
        state.messages.clear();
        state.batch_download_enabled = false;
        state.running = false;
        state.generation += 1;
        drop(state);

        tracing::debug!("session cleared");
        self.emit(SessionEvent::ProgressHidden);
        self.emit(SessionEvent::BatchDownloadEnabled(false));
    }

    /// Compresses every file in the batch at `quality`. File `i` starts
    /// `i * stagger` after the run begins; completions are counted in
    /// whatever order they arrive. Failed files are reported and counted but
    /// produce no artifact. The final progress stays visible for
    /// `hide_delay`. Dropping the future abandons the run: its references
    /// are revoked and the session is ready for another run.
    pub async fn run_batch(&self, quality: u8) -> Result<BatchSummary> {
        let options =
            CompressionOptions::new(Some(quality))?.with_max_dimension(self.config.max_dimension);

        let (files, generation) = {
            let mut state = self.state();
            if state.running {
                return Err(CompressionError::BatchInProgress);
            }
            if state.batch.is_empty() {
                return Ok(BatchSummary::default());
            }

            self.references
                .revoke_all(state.artifacts.iter().map(|a| &a.reference));
            state.artifacts.clear();
            state.batch_download_enabled = false;
            state.running = true;
            state.generation += 1;
            let progress = BatchProgress::new(state.batch.len(), ProgressAction::Compressing);
            state.progress = Some(progress);
            self.emit(SessionEvent::BatchDownloadEnabled(false));
            self.emit(SessionEvent::Progress(progress));
            (state.batch.clone(), state.generation)
        };

        let mut guard = RunGuard {
            session: self,
            generation,
            issued: Arc::new(Mutex::new(IssuedRefs::default())),
            phase: RunPhase::Compressing,
        };
        let total = files.len();
        tracing::info!(total, quality, "batch started");

        let mut tasks = JoinSet::new();
        for (index, file) in files.into_iter().enumerate() {
            let delay = self.config.stagger * index as u32;
            let store = self.references.clone();
            let issued = Arc::clone(&guard.issued);
            tasks.spawn(async move {
                tokio::time::sleep(delay).await;
                let result = compress(&file, index, &options, &store).await;
                if let Ok(artifact) = &result {
                    let mut issued = issued.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                    if issued.closed {
                        store.revoke(&artifact.reference);
                    } else {
                        issued.refs.push(artifact.reference.clone());
                    }
                }
                (index, file.name().to_string(), result)
            });
        }

        let mut summary = BatchSummary {
            total,
            ..BatchSummary::default()
        };

        while let Some(joined) = tasks.join_next().await {
            summary.completed += 1;
            let mut state = self.state();
            let current = state.generation == generation;

            match joined {
                Ok((_, _, Ok(artifact))) => {
                    if current {
                        summary.succeeded += 1;
                        summary.original_bytes += artifact.original_byte_size;
                        summary.compressed_bytes += artifact.byte_size;
                        state.artifacts.push(artifact);
                    } else {
                        self.references.revoke(&artifact.reference);
                    }
                }
                Ok((index, name, Err(err))) => {
                    if err.is_file_scoped() {
                        tracing::warn!(%name, error = %err, "file failed");
                    } else {
                        tracing::error!(%name, error = %err, "file failed");
                    }
                    summary.failures.push(FileFailure {
                        index: Some(index),
                        name: name.clone(),
                        reason: err.to_string(),
                    });
                    if current {
                        self.post_error(&mut state, format!("Error processing {}", name));
                    }
                }
                Err(join_error) => {
                    tracing::error!(error = %join_error, "compression task aborted");
                    summary.failures.push(FileFailure {
                        index: None,
                        name: String::new(),
                        reason: join_error.to_string(),
                    });
                    if current {
                        self.post_error(&mut state, "Error processing file".to_string());
                    }
                }
            }

            if current {
                let progress = BatchProgress {
                    completed: summary.completed,
                    total,
                    action: ProgressAction::Compressing,
                };
                state.progress = Some(progress);
                self.emit(SessionEvent::Progress(progress));
            }
        }

        {
            let mut state = self.state();
            if state.generation != generation {
                guard.phase = RunPhase::Done;
                tracing::debug!("batch finished after clear; results dropped");
                summary.discarded = true;
                summary.succeeded = 0;
                summary.original_bytes = 0;
                summary.compressed_bytes = 0;
                return Ok(summary);
            }

            state.artifacts.sort_by_key(|a| a.index);
            state.running = false;
            state.batch_download_enabled = true;
            state.messages.show_success(BATCH_SUCCESS_MESSAGE);
            self.emit(SessionEvent::BatchDownloadEnabled(true));
            self.emit(SessionEvent::Success(BATCH_SUCCESS_MESSAGE.to_string()));
        }
        guard.phase = RunPhase::Hiding;
        tracing::info!(
            succeeded = summary.succeeded,
            failed = summary.failures.len(),
            "batch complete"
        );

        tokio::time::sleep(self.config.hide_delay).await;
        guard.hide_progress();

        Ok(summary)
    }

    /// Packages all artifacts into `compressed_images.zip`. `Ok(None)` when
    /// there is nothing to package. A failure leaves the artifacts in place
    /// for per-file download.
    pub async fn download_all(&self) -> Result<Option<Bundle>> {
        let artifacts = self.artifacts();
        if artifacts.is_empty() {
            return Ok(None);
        }

        self.emit(SessionEvent::Progress(BatchProgress::new(
            artifacts.len(),
            ProgressAction::PreparingZip,
        )));
        let result = build_archive(&artifacts, |progress| {
            self.emit(SessionEvent::Progress(progress));
        })
        .await;

        if let Err(err) = &result {
            tracing::error!(error = %err, "archive failed");
            let mut state = self.state();
            self.post_error(&mut state, ARCHIVE_ERROR_MESSAGE.to_string());
        }

        tokio::time::sleep(self.config.hide_delay).await;
        self.emit(SessionEvent::ProgressHidden);
        result
    }

    pub fn batch(&self) -> Vec<CandidateFile> {
        self.state().batch.clone()
    }

    pub fn batch_len(&self) -> usize {
        self.state().batch.len()
    }

    /// Artifacts of the last run, ordered by batch position.
    pub fn artifacts(&self) -> Vec<CompressedArtifact> {
        self.state().artifacts.clone()
    }

    pub fn progress(&self) -> Option<BatchProgress> {
        self.state().progress
    }

    pub fn is_running(&self) -> bool {
        self.state().running
    }

    pub fn batch_download_enabled(&self) -> bool {
        self.state().batch_download_enabled
    }

    pub fn current_error(&self) -> Option<String> {
        self.state().messages.current_error().map(str::to_string)
    }

    pub fn current_success(&self) -> Option<String> {
        self.state().messages.current_success().map(str::to_string)
    }

    pub fn references(&self) -> &ReferenceStore {
        &self.references
    }

    /// Bytes behind a preview/download reference, if it is still live.
    pub fn resolve(&self, reference: &ArtifactRef) -> Option<Arc<[u8]>> {
        self.references.resolve(reference)
    }
}
